//! The `freetext init` command.

use std::path::Path;

use anyhow::Result;

use freetext_core::view::ASSETS;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("freetext.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("blocks")?;
    write_if_missing(Path::new("blocks/example.toml"), EXAMPLE_BLOCK)?;

    std::fs::create_dir_all("public")?;
    for (name, contents) in ASSETS {
        write_if_missing(&Path::new("public").join(name), contents)?;
    }

    println!("\nNext steps:");
    println!("  1. Edit blocks/example.toml with your question");
    println!("  2. Run: freetext configure --settings blocks/example.toml");
    println!("  3. Run: freetext submit --course demo --block photosynthesis --student me --answer \"...\"");

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, contents)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# freetext configuration

asset_base_url = "public"
locale = "en"

[store]
type = "json"
path = "./freetext-data/store.json"

[publisher]
type = "jsonl"
path = "./freetext-data/grades.jsonl"
"#;

const EXAMPLE_BLOCK: &str = r#"[block]
course_id = "demo"
block_id = "photosynthesis"

[settings]
display_name = "Photosynthesis"
prompt = "In one or two sentences, explain how plants make their food."
weight = 10
max_attempts = 3
display_correctness = true
min_word_count = 5
max_word_count = 100
fullcredit_keyphrases = ["photosynthesis", "chlorophyll"]
halfcredit_keyphrases = ["sunlight"]
submitted_message = "Thanks, your answer has been recorded."
"#;
