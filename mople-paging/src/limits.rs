/// Paging and event-bus guardrails.
///
/// These constants bound page requests, debounce windows, and per-channel
/// buffering so a slow screen cannot grow memory without limit.

/// Page size used by every list screen unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Upper bound accepted by the REST API for a single page.
pub const MAX_PAGE_SIZE: usize = 100;

/// Events buffered per subscriber before a slow listener starts missing them.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Keyword search debounce window.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;
pub const MIN_SEARCH_DEBOUNCE_MS: u64 = 400;
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 500;

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(size: usize) -> usize {
    size.clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a debounce window into the supported range.
pub fn clamp_debounce_ms(ms: u64) -> u64 {
    ms.clamp(MIN_SEARCH_DEBOUNCE_MS, MAX_SEARCH_DEBOUNCE_MS)
}
