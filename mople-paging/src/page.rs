/// Page and entity primitives.
///
/// - `Entity`: anything with a stable id that can be de-duplicated across pages
/// - `Page`: one immutable response of a cursor-based list endpoint
/// - `PageSource`: the remote fetch seam (`(cursor, size) -> Page`)
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::hash::Hash;

use crate::error::FetchError;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A list item with a stable identity.
///
/// `id()` is the id-extraction function used for de-duplication and for
/// patching items in place from action events.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Opaque token for the next page. Never interpreted by the client.
    pub next_cursor: Option<String>,
    pub has_next: bool,
    /// Server-reported total, if the endpoint provides one. Display only.
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>, has_next: bool) -> Self {
        Page {
            items,
            next_cursor,
            has_next,
            total_count: None,
        }
    }

    /// A page with a follow-up cursor.
    pub fn with_next(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Page::new(items, Some(cursor.into()), true)
    }

    /// The final page of a list.
    pub fn last(items: Vec<T>) -> Self {
        Page::new(items, None, false)
    }

    pub fn empty() -> Self {
        Page::last(Vec::new())
    }

    pub fn with_total_count(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }

    /// Number of items the server returned in this page.
    pub fn returned_size(&self) -> usize {
        self.items.len()
    }
}

// ---------------------------------------------------------------------------
// PageSource
// ---------------------------------------------------------------------------

/// Remote fetch function for one paginated endpoint.
///
/// `cursor` is `None` for the first page. Implementations must map every
/// transport or decoding failure into a `FetchError`.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch(&self, cursor: Option<String>, size: usize) -> Result<Page<T>, FetchError>;
}

/// Adapter turning an async closure into a `PageSource`.
pub struct FnSource<F> {
    f: F,
}

/// Wrap `f(cursor, size)` as a `PageSource`.
pub fn source_fn<F>(f: F) -> FnSource<F> {
    FnSource { f }
}

#[async_trait]
impl<T, F, Fut> PageSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(Option<String>, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>, FetchError>> + Send,
{
    async fn fetch(&self, cursor: Option<String>, size: usize) -> Result<Page<T>, FetchError> {
        (self.f)(cursor, size).await
    }
}
