// Crate-level lint configuration: module docs use outer `///` blocks in the
// re-exported paging crate, and the test fakes are deliberately loose.
#![allow(clippy::empty_line_after_doc_comments, clippy::type_complexity)]

// ── Re-export Mople Paging modules ──────────────────────────────────────────
// The generic pager, UI projection and event bus live in `mople-paging`.
// They are re-exported here so the app only depends on `mople_core`.
pub use mople_paging::debounce;
pub use mople_paging::event;
pub use mople_paging::feed;
pub use mople_paging::limits;
pub use mople_paging::page;
pub use mople_paging::pager;
pub use mople_paging::state;
pub use mople_paging::ui;

// ── Local modules (app layer) ───────────────────────────────────────────────
pub mod actions;
pub mod config;
pub mod error;
pub mod events;
pub mod feeds;
pub mod logging;
pub mod mention;
pub mod model;
pub mod push;
pub mod repository;
pub mod search;
pub mod storage;

// ── Re-export main types ────────────────────────────────────────────────────
pub use mople_paging::{
    Action, ActionEvent, BroadcastChannel, Entity, EventChannel, Feed, FetchError, Page,
    PageSource, Pager, PagingUiState,
};

pub use actions::{CommentActions, MeetingActions, PlanActions};
pub use config::{AppConfig, ConfigError, LogConfig};
pub use error::AppError;
pub use events::EventHub;
pub use feeds::Feeds;
pub use logging::init_logging;
pub use mention::extract_mentions;
pub use push::{dispatch_push, PushKind, PushMessage};
#[cfg(feature = "network")]
pub use repository::{RemotePageSource, RestClient};
pub use search::ParticipantSearch;
pub use storage::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceKey, PreferenceStore, StorageError,
    ThemePreference,
};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version
pub fn get_version() -> &'static str {
    VERSION
}
