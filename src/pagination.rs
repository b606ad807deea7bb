//! Incremental "load more" pagination over the listing.
//!
//! Modeled as an explicit state machine driven by discrete `load_next`
//! calls, so the core is decoupled from any particular UI event model.
//! State mutates only when a fetch completes; a failed fetch leaves the
//! state exactly as it was, cursor included, so the same page can be
//! retried.

use tracing::{debug, warn};

use crate::post::{normalize_listing, Post};
use crate::record::PageResponse;
use crate::store::{ContentStore, FetchError, PageQuery};

/// Ordered listing plus the cursor for the next page.
///
/// `next_cursor == None` is terminal: no further pages exist and the
/// "load more" affordance should be hidden by the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    posts: Vec<Post>,
    next_cursor: Option<String>,
}

impl PaginationState {
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Whether another page can be loaded.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Result of a `load_next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and merged; `appended` posts were added.
    Appended { appended: usize },
    /// The state is terminal; nothing was fetched.
    NoMorePages,
    /// Another load is in flight; this trigger was ignored.
    AlreadyLoading,
}

/// Drives the listing through successive page loads.
///
/// The state lives behind a `tokio` mutex that doubles as the
/// single-flight guard: a `load_next` issued while another is still
/// awaiting its fetch fails the `try_lock` and becomes a no-op, so at
/// most one fetch is ever outstanding and appends cannot duplicate or
/// race the cursor.
pub struct Paginator {
    state: tokio::sync::Mutex<PaginationState>,
}

impl Paginator {
    /// Fetch the first listing page and construct the initial state.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the initial page cannot be fetched.
    pub async fn load_initial(
        store: &dyn ContentStore,
        query: &PageQuery,
    ) -> Result<Self, FetchError> {
        let page = store.fetch_page(query, None).await?;

        let mut state = PaginationState {
            posts: Vec::new(),
            next_cursor: None,
        };
        let appended = merge_page(&mut state, page);
        debug!(posts = appended, has_more = state.has_more(), "initial listing page loaded");

        Ok(Self {
            state: tokio::sync::Mutex::new(state),
        })
    }

    /// Fetch the page at the current cursor and append its posts.
    ///
    /// No-op when the state is terminal or when another load is already
    /// in flight. On fetch failure the state is left unchanged and the
    /// error is surfaced for a retry.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the page fetch fails.
    pub async fn load_next(
        &self,
        store: &dyn ContentStore,
        query: &PageQuery,
    ) -> Result<LoadOutcome, FetchError> {
        let Ok(mut state) = self.state.try_lock() else {
            debug!("load_next ignored; a page fetch is already in flight");
            return Ok(LoadOutcome::AlreadyLoading);
        };

        let Some(cursor) = state.next_cursor.clone() else {
            return Ok(LoadOutcome::NoMorePages);
        };

        let page = store.fetch_page(query, Some(&cursor)).await?;
        let appended = merge_page(&mut state, page);
        debug!(appended, has_more = state.has_more(), "listing page merged");

        Ok(LoadOutcome::Appended { appended })
    }

    /// Snapshot of the current state.
    pub async fn snapshot(&self) -> PaginationState {
        self.state.lock().await.clone()
    }
}

/// Normalize and append a fetched page, then replace the cursor.
///
/// Existing posts keep their relative order and new posts are appended in
/// the order the store returned them. Malformed records are reported and
/// excluded without aborting the batch. A uid collision with an existing
/// entry indicates a cursor/store inconsistency; it is surfaced as a
/// warning, never silently dropped.
fn merge_page(state: &mut PaginationState, page: PageResponse) -> usize {
    let mut appended = 0;

    for raw in &page.results {
        match normalize_listing(raw) {
            Ok(post) => {
                if state.posts.iter().any(|existing| existing.uid == post.uid) {
                    warn!(uid = %post.uid, "merged page re-served an already-listed uid; store/cursor inconsistency");
                }
                state.posts.push(post);
                appended += 1;
            }
            Err(e) => {
                warn!(field = e.field, uid = ?e.uid, "excluding malformed record from listing");
            }
        }
    }

    state.next_cursor = page.next_page;
    appended
}
