//! Static asset URL resolution.

use freetext_core::traits::AssetResolver;
use freetext_core::BlockContext;

/// Serves every block's assets from one base URL or directory.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    base_url: String,
}

impl StaticAssets {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl AssetResolver for StaticAssets {
    fn resource_url(&self, _context: &BlockContext, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if base.is_empty() {
            path.to_string()
        } else {
            format!("{base}/{path}")
        }
    }
}
