//! Logging bootstrap.
//!
//! The library only talks to the `log` facade. On Android the logcat backend
//! is installed here; everywhere else the host app brings its own logger and
//! this only sets the level ceiling.

use log::LevelFilter;
use once_cell::sync::OnceCell;

use crate::config::LogConfig;

static INSTALLED_LEVEL: OnceCell<LevelFilter> = OnceCell::new();

/// Install logging once per process. Later calls keep the first
/// configuration and return its level.
pub fn init_logging(config: &LogConfig) -> LevelFilter {
    *INSTALLED_LEVEL.get_or_init(|| {
        let level = effective_level(config);
        install(config, level);
        log::info!("Mople core {} logging at {}", crate::VERSION, level);
        level
    })
}

fn effective_level(config: &LogConfig) -> LevelFilter {
    if cfg!(feature = "debug-logs") {
        LevelFilter::Debug.max(config.level_filter())
    } else {
        config.level_filter()
    }
}

#[cfg(feature = "android")]
fn install(config: &LogConfig, level: LevelFilter) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag(config.tag.clone()),
    );
}

#[cfg(not(feature = "android"))]
fn install(_config: &LogConfig, level: LevelFilter) {
    log::set_max_level(level);
}
