//! Content-store fetch capability.
//!
//! The pipeline never talks to the network itself; it consumes this trait.
//! Passing the store in explicitly (instead of a process-wide client)
//! keeps the pagination machinery testable with an in-memory stub.

mod http;

pub use http::HttpContentStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;
use crate::record::{PageResponse, RawRecord};

/// Network or store failure. Recoverable: pagination state is left
/// untouched and the same page can be retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to content store failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("content store returned status {status}")]
    Status { status: u16 },
    #[error("failed to decode content store response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid pagination cursor: {cursor}")]
    InvalidCursor { cursor: String },
    #[error("no document with uid '{uid}'")]
    MissingDocument { uid: String },
}

/// Parameters of a listing page fetch.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub document_type: String,
    pub page_size: u32,
    /// Fields the store should include in each result, e.g. `post.title`.
    pub field_allowlist: Vec<String>,
}

impl PageQuery {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            document_type: config.document_type.clone(),
            page_size: config.page_size,
            field_allowlist: config.field_allowlist.clone(),
        }
    }
}

/// Fetch capability supplied by the content store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch one listing page. With no cursor this is the initial query;
    /// with a cursor it fetches exactly the page the cursor names.
    async fn fetch_page(
        &self,
        query: &PageQuery,
        cursor: Option<&str>,
    ) -> Result<PageResponse, FetchError>;

    /// Fetch a single document by uid for the detail page.
    async fn fetch_by_uid(&self, document_type: &str, uid: &str)
        -> Result<RawRecord, FetchError>;
}
