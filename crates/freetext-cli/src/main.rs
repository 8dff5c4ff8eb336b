//! freetext CLI — drive a free-text response block from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "freetext", version, about = "Free-text response grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Identifies one learner's view of a block.
#[derive(Args, Debug, Clone)]
pub struct LearnerArgs {
    /// Course identifier
    #[arg(long)]
    course: String,

    /// Block identifier within the course
    #[arg(long)]
    block: String,

    /// Learner identifier
    #[arg(long)]
    student: String,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate block definition TOML files
    Validate {
        /// Path to a block definition file or directory
        #[arg(long)]
        settings: PathBuf,

        /// Config file path (selects the message locale)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate and store block settings
    Configure {
        /// Path to a block definition file or directory
        #[arg(long)]
        settings: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Submit an answer and print the feedback as JSON
    Submit {
        #[command(flatten)]
        learner: LearnerArgs,

        /// The learner's answer text
        #[arg(long)]
        answer: String,
    },

    /// Render the learner's view as an HTML page
    View {
        #[command(flatten)]
        learner: LearnerArgs,

        /// Write the page to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the fragment as JSON instead of a page
        #[arg(long)]
        fragment: bool,
    },

    /// Show a learner's attempt state
    Status {
        #[command(flatten)]
        learner: LearnerArgs,
    },

    /// Create starter config, example block and static assets
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("freetext=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { settings, config } => commands::validate::execute(settings, config),
        Commands::Configure { settings, config } => {
            commands::configure::execute(settings, config).await
        }
        Commands::Submit { learner, answer } => commands::submit::execute(learner, answer).await,
        Commands::View {
            learner,
            output,
            fragment,
        } => commands::view::execute(learner, output, fragment).await,
        Commands::Status { learner } => commands::status::execute(learner).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
