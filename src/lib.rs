//! Site Meta - Open Graph and Twitter Card extraction
//!
//! This library fetches a web page and returns its social-preview metadata
//! (`og:*` and `twitter:*` meta tags) as UTF-8, whatever charset the page
//! was served in.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `fetch`: `HEAD` probe and cancellable body retrieval
//! - `content_type`: HTML detection and charset hint from `Content-Type`
//! - `dom`: HTML5 parsing using html5ever and scraper, behind a small lookup interface
//! - `charset`: In-document charset resolution (`<meta charset>`, `http-equiv`)
//! - `extract`: Meta tag candidate extraction
//! - `encoding`: Conversion of candidates from the source charset to UTF-8
//! - `model`: Validated `MetaAttribute` / `MetadataSet` types
//! - `pipeline`: The `SiteMeta` entry point driving all stages
//! - `etag`: ETag generation using BLAKE3
//! - `config`, `logging`, `server`: The HTTP service around the library
//!
//! # Example
//!
//! ```no_run
//! use site_meta::SiteMeta;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), site_meta::SiteMetaError> {
//! let meta = SiteMeta::default()
//!     .parse("https://example.com/", &CancellationToken::new())
//!     .await?;
//! for (name, content) in &meta {
//!     println!("{name} - {content}");
//! }
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod charset;
pub mod config;
pub mod content_type;
pub mod dom;
pub mod encoding;
pub mod error;
pub mod etag;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod server;

// Re-export main types for convenience
pub use config::Config;
pub use error::SiteMetaError;
pub use fetch::FetchConfig;
pub use model::{MetaAttribute, MetadataSet};
pub use pipeline::SiteMeta;
pub use server::{AppState, router};
