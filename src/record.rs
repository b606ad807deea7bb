//! Wire-shape models for the content store's JSON responses.
//!
//! These structs mirror what the store actually sends, so every field is
//! optional or defaulted. Structural validation happens during
//! normalization (`crate::post`), not during deserialization — a record
//! with a missing title should decode fine and then fail normalization,
//! not poison the whole page decode.

use serde::Deserialize;

/// One page of a paginated document search.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub results: Vec<RawRecord>,
    /// Opaque cursor for the next page; `None` means no further pages.
    #[serde(default)]
    pub next_page: Option<String>,
}

/// An unprocessed content-store record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub data: RawData,
}

/// The `data` envelope of a record. Only allow-listed fields are modeled;
/// anything else the store sends is dropped by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub banner: Option<RawBanner>,
    #[serde(default)]
    pub content: Vec<RawContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBanner {
    #[serde(default)]
    pub url: Option<String>,
}

/// A heading plus its rich-text body, as stored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContentBlock {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Vec<RawSpan>,
}

/// One rich-text span as delivered by the store.
///
/// The span kind is kept as a plain string here; mapping onto the closed
/// [`crate::richtext::SpanKind`] set (with its unknown-kind fallback)
/// happens in normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpan {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub spans: Vec<RawInlineMarker>,
}

/// An inline formatting marker over a character range of its span's text.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInlineMarker {
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Option<RawInlineData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInlineData {
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_record() {
        let record: RawRecord = serde_json::from_str(r#"{"uid":"abc"}"#).unwrap();
        assert_eq!(record.uid.as_deref(), Some("abc"));
        assert!(record.first_publication_date.is_none());
        assert!(record.data.title.is_none());
        assert!(record.data.content.is_empty());
    }

    #[test]
    fn test_decode_page_with_null_cursor() {
        let page: PageResponse =
            serde_json::from_str(r#"{"results":[],"next_page":null}"#).unwrap();
        assert!(page.results.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let json = r#"{
            "uid": "abc",
            "href": "https://store.example.com/abc",
            "tags": ["x"],
            "data": {
                "title": "Hello",
                "seo_description": "ignored"
            }
        }"#;
        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.data.title.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_decode_rich_text_span() {
        let json = r#"{
            "type": "paragraph",
            "text": "one two three",
            "spans": [
                {"start": 0, "end": 3, "type": "strong"},
                {"start": 4, "end": 7, "type": "hyperlink", "data": {"url": "https://example.com"}}
            ]
        }"#;
        let span: RawSpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.kind.as_deref(), Some("paragraph"));
        assert_eq!(span.spans.len(), 2);
        assert_eq!(
            span.spans[1].data.as_ref().and_then(|d| d.url.as_deref()),
            Some("https://example.com")
        );
    }
}
