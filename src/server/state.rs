//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::etag::ETagGenerator;
use crate::pipeline::SiteMeta;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Extraction pipeline, configured once at startup.
    pub site_meta: Arc<SiteMeta>,

    /// Tags successful responses for conditional requests.
    pub etags: ETagGenerator,
}

impl AppState {
    pub fn new(site_meta: SiteMeta) -> Self {
        Self {
            site_meta: Arc::new(site_meta),
            etags: ETagGenerator::new(),
        }
    }
}
