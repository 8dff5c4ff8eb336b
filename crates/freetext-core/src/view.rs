//! Student view rendering.
//!
//! Produces a [`Fragment`]: an HTML body plus the CSS/JS URLs and the
//! JavaScript initializer the host wires up.

use serde::{Deserialize, Serialize};

use crate::block::ResponseBlock;
use crate::messages::{Catalog, Message};
use crate::model::BlockContext;
use crate::traits::AssetResolver;

/// Stylesheet served alongside the view.
pub const VIEW_CSS: &str = include_str!("../public/view.css");

/// Script served alongside the view.
pub const VIEW_JS: &str = include_str!("../public/view.js");

/// Static assets as `(path, contents)` pairs, relative to the public directory.
pub const ASSETS: [(&str, &str); 2] = [("view.css", VIEW_CSS), ("view.js", VIEW_JS)];

/// Name of the JavaScript function that initializes the view.
pub const VIEW_INITIALIZER: &str = "FreeTextResponseView";

/// A renderable piece of a course page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub content: String,
    #[serde(default)]
    pub css_urls: Vec<String>,
    #[serde(default)]
    pub js_urls: Vec<String>,
    #[serde(default)]
    pub js_init_fn: Option<String>,
}

impl Fragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn add_css_url(&mut self, url: impl Into<String>) {
        self.css_urls.push(url.into());
    }

    pub fn add_javascript_url(&mut self, url: impl Into<String>) {
        self.js_urls.push(url.into());
    }

    pub fn initialize_js(&mut self, function: impl Into<String>) {
        self.js_init_fn = Some(function.into());
    }

    /// Assemble a standalone HTML page around this fragment.
    pub fn to_page(&self, title: &str) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
        for url in &self.css_urls {
            html.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                html_escape(url)
            ));
        }
        html.push_str("</head>\n<body>\n");
        html.push_str(&self.content);
        for url in &self.js_urls {
            html.push_str(&format!("<script src=\"{}\"></script>\n", html_escape(url)));
        }
        if let Some(init) = &self.js_init_fn {
            html.push_str("<script>\n");
            html.push_str("document.querySelectorAll('.freetextresponse').forEach(function (el) {\n");
            html.push_str(&format!("  {init}(el);\n"));
            html.push_str("});\n</script>\n");
        }
        html.push_str("</body>\n</html>\n");

        html
    }
}

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render the markup for a learner's view of the block.
pub fn render_view_html(block: &ResponseBlock, catalog: &dyn Catalog) -> String {
    let mut html = String::new();
    let indicator = block.indicator().css_class();

    html.push_str("<div class=\"freetextresponse\">\n");
    html.push_str(&format!(
        "<h2 class=\"problem-header\">{}</h2>\n",
        html_escape(&block.settings.display_name)
    ));
    html.push_str(&format!(
        "<div class=\"problem-progress\">{}</div>\n",
        html_escape(&block.problem_progress(catalog))
    ));
    html.push_str(&format!(
        "<p class=\"prompt\">{}</p>\n",
        html_escape(&block.settings.prompt)
    ));
    html.push_str("<div class=\"capa_inputtype textline\">\n");
    html.push_str(&format!(
        "<textarea class=\"student_answer\" name=\"student_answer\" rows=\"6\">{}</textarea>\n",
        html_escape(&block.state.student_answer)
    ));
    html.push_str(&format!(
        "<span class=\"indicator {} {}\" aria-hidden=\"true\"></span>\n",
        indicator,
        block.indicator_visibility_class()
    ));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<div class=\"word-count-message\">{}</div>\n",
        html_escape(&block.word_count_message(catalog, block.state.count_attempts > 0))
    ));
    html.push_str(&format!(
        "<div class=\"used-attempts-feedback\">{}</div>\n",
        html_escape(&block.used_attempts_feedback(catalog))
    ));
    html.push_str(&format!(
        "<div class=\"submission-received\">{}</div>\n",
        html_escape(block.submitted_message())
    ));
    html.push_str(&format!(
        "<button class=\"check submit {}\" type=\"button\">{}</button>\n",
        block.submit_class(),
        html_escape(&catalog.render(&Message::SubmitButton))
    ));
    html.push_str("</div>\n");

    html
}

/// Build the student view fragment, resolving asset URLs through `assets`.
pub fn student_view(
    block: &ResponseBlock,
    context: &BlockContext,
    catalog: &dyn Catalog,
    assets: &dyn AssetResolver,
) -> Fragment {
    let mut fragment = Fragment::new(render_view_html(block, catalog));
    fragment.add_css_url(assets.resource_url(context, "view.css"));
    fragment.add_javascript_url(assets.resource_url(context, "view.js"));
    fragment.initialize_js(VIEW_INITIALIZER);
    fragment
}
