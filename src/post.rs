//! Canonical post shapes and normalization from raw store records.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::record::RawRecord;
use crate::richtext::{rich_text_from_raw, RichText};

/// A required field was absent from a raw record. Fatal to that single
/// normalization call only; callers report the record and move on.
#[derive(Debug, Error)]
#[error("malformed record (uid: {uid:?}): missing required field '{field}'")]
pub struct MalformedRecordError {
    pub field: &'static str,
    pub uid: Option<String>,
}

/// Listing projection of a content record. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub uid: String,
    /// Raw publication timestamp as delivered by the store; `None` for
    /// unpublished drafts. Display formatting is the consumer's concern.
    pub first_publication_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl Post {
    /// Parse the publication timestamp for display-side consumers.
    ///
    /// Accepts RFC 3339 and the store's colon-less UTC-offset variant.
    /// Returns `None` for drafts and for unparseable values.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.first_publication_date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
    }
}

/// Full projection used by the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    pub banner_url: Option<String>,
    pub content: Vec<ContentBlock>,
}

/// A heading plus its rich-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub heading: Option<String>,
    pub body: RichText,
}

/// Project a raw record into the listing shape.
///
/// This is a strict allow-list projection: fields not modeled here are
/// dropped, decoupling the internal model from store schema drift. A null
/// publication date passes through unmodified.
///
/// # Errors
///
/// Returns [`MalformedRecordError`] if `uid`, `title`, or `author` is absent.
pub fn normalize_listing(raw: &RawRecord) -> Result<Post, MalformedRecordError> {
    let uid = require(raw.uid.clone(), "uid", raw)?;
    let title = require(raw.data.title.clone(), "data.title", raw)?;
    let author = require(raw.data.author.clone(), "data.author", raw)?;

    Ok(Post {
        uid,
        first_publication_date: raw.first_publication_date.clone(),
        title,
        subtitle: raw.data.subtitle.clone().unwrap_or_default(),
        author,
    })
}

/// Project a raw record into the full detail shape.
///
/// # Errors
///
/// Returns [`MalformedRecordError`] if `uid`, `title`, or `author` is absent.
pub fn normalize_detail(raw: &RawRecord) -> Result<PostDetail, MalformedRecordError> {
    let post = normalize_listing(raw)?;

    let content = raw
        .data
        .content
        .iter()
        .map(|block| ContentBlock {
            heading: block.heading.clone(),
            body: rich_text_from_raw(&block.body),
        })
        .collect();

    Ok(PostDetail {
        post,
        banner_url: raw.data.banner.as_ref().and_then(|b| b.url.clone()),
        content,
    })
}

fn require(
    value: Option<String>,
    field: &'static str,
    raw: &RawRecord,
) -> Result<String, MalformedRecordError> {
    value.ok_or_else(|| MalformedRecordError {
        field,
        uid: raw.uid.clone(),
    })
}
