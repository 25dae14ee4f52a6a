//! # Mople Paging
//!
//! **Cursor-based list pagination and cross-screen list synchronisation.**
//!
//! Every list screen in Mople (meetings, plans, reviews, comments,
//! notifications, member search) is backed by the same machinery:
//!
//! - **Cursor pager** with single-flight fetching, retry on failure, and
//!   de-duplication across page boundaries
//! - **UI projection** that turns the pager's phases into render flags
//!   (initial spinner/error, footer spinner/error, end of list)
//! - **Action event bus** per entity type, so a change made on one screen is
//!   patched into every other live list without a reload
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mople_paging::{source_fn, Entity, FetchError, Page, Pager};
//!
//! #[derive(Clone)]
//! struct Meeting { id: u64 }
//!
//! impl Entity for Meeting {
//!     type Id = u64;
//!     fn id(&self) -> u64 { self.id }
//! }
//!
//! # async fn demo() {
//! let pager = Pager::new(
//!     source_fn(|_cursor: Option<String>, _size: usize| async {
//!         Ok::<_, FetchError>(Page::last(vec![Meeting { id: 1 }]))
//!     }),
//!     30,
//! );
//! let state = pager.load_next().await;
//! assert!(state.is_last());
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`page`] | `Entity`, `Page`, and the `PageSource` fetch seam |
//! | [`state`] | Pure paging state machine, merge rules, local patches |
//! | [`pager`] | Async driver: single-flight, refresh coalescing, teardown |
//! | [`ui`] | `PagingUiState` render projection |
//! | [`event`] | `Action`/`ActionEvent` and the per-entity broadcast channel |
//! | [`feed`] | View-model binding a pager to an event channel |
//! | [`debounce`] | Last-call-wins gate for keyword search |
//! | [`limits`] | Page size and debounce bounds |

// Crate-level lint configuration: module docs use outer `///` blocks.
#![allow(clippy::empty_line_after_doc_comments, clippy::type_complexity)]

// ── Public modules ──────────────────────────────────────────────────────────

/// Fetch failures surfaced by a `PageSource`.
pub mod error;

/// Page size, channel capacity and debounce bounds.
pub mod limits;

/// Entities, pages, and the remote fetch seam.
pub mod page;

/// The paging state machine.
pub mod state;

/// Render flags derived from the paging state.
pub mod ui;

/// Async pager with single-flight fetching.
pub mod pager;

/// Action events and the broadcast channel they travel on.
pub mod event;

/// Pager + event subscription, one per list screen.
pub mod feed;

/// Debounced keyword search gate.
pub mod debounce;

// ── Re-exports for convenience ──────────────────────────────────────────────

pub use debounce::Debouncer;
pub use error::FetchError;
pub use event::{Action, ActionEvent, BroadcastChannel, EventChannel, Subscription};
pub use feed::{Feed, FeedBuilder};
pub use page::{source_fn, Entity, FnSource, Page, PageSource};
pub use pager::Pager;
pub use state::{EventOutcome, FooterPhase, InsertPolicy, LoadRequest, PagingState, Phase};
pub use ui::PagingUiState;

// ── Library metadata ────────────────────────────────────────────────────────

/// Mople Paging version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version string.
pub fn version() -> &'static str {
    VERSION
}

// ── Tests ───────────────────────────────────────────────────────────────────
