//! reqwest-backed content-store client.

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::record::{PageResponse, RawRecord};

use super::{ContentStore, FetchError, PageQuery};

/// HTTP client for the remote content store's document-search API.
pub struct HttpContentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentStore {
    /// Build a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self {
            client,
            base_url: config.content_api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_page(&self, request: reqwest::RequestBuilder) -> Result<PageResponse, FetchError> {
        let response = request.send().await.map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(FetchError::Decode)
    }

    fn search_url(&self) -> String {
        format!("{}/documents/search", self.base_url)
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch_page(
        &self,
        query: &PageQuery,
        cursor: Option<&str>,
    ) -> Result<PageResponse, FetchError> {
        // Cursors are absolute URLs minted by the store; fetch them verbatim.
        if let Some(cursor) = cursor {
            validate_cursor(cursor)?;
            debug!(cursor = %cursor, "fetching next listing page");
            return self.get_page(self.client.get(cursor)).await;
        }

        debug!(document_type = %query.document_type, page_size = query.page_size, "fetching initial listing page");
        let request = self.client.get(self.search_url()).query(&[
            ("q", type_predicate(&query.document_type)),
            ("pageSize", query.page_size.to_string()),
            ("fetch", query.field_allowlist.join(",")),
        ]);
        self.get_page(request).await
    }

    async fn fetch_by_uid(
        &self,
        document_type: &str,
        uid: &str,
    ) -> Result<RawRecord, FetchError> {
        debug!(document_type = %document_type, uid = %uid, "fetching document by uid");
        let request = self.client.get(self.search_url()).query(&[
            ("q", uid_predicate(document_type, uid)),
            ("pageSize", "1".to_string()),
        ]);

        let mut page = self.get_page(request).await?;
        if page.results.is_empty() {
            return Err(FetchError::MissingDocument {
                uid: uid.to_string(),
            });
        }
        Ok(page.results.remove(0))
    }
}

fn validate_cursor(cursor: &str) -> Result<(), FetchError> {
    let invalid = || FetchError::InvalidCursor {
        cursor: cursor.to_string(),
    };
    let parsed = url::Url::parse(cursor).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(())
}

fn type_predicate(document_type: &str) -> String {
    format!(r#"[[at(document.type,"{document_type}")]]"#)
}

fn uid_predicate(document_type: &str, uid: &str) -> String {
    format!(r#"[[at(my.{document_type}.uid,"{uid}")]]"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_predicate() {
        assert_eq!(type_predicate("posts"), r#"[[at(document.type,"posts")]]"#);
    }

    #[test]
    fn test_uid_predicate() {
        assert_eq!(
            uid_predicate("posts", "my-post"),
            r#"[[at(my.posts.uid,"my-post")]]"#
        );
    }

    #[test]
    fn test_validate_cursor() {
        assert!(validate_cursor("https://store.example.com/search?page=2").is_ok());
        assert!(validate_cursor("ftp://store.example.com/x").is_err());
        assert!(validate_cursor("not a url").is_err());
    }
}
