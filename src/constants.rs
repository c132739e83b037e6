//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Slice Previewer";

/// Directory name under the platform data dir for settings, logs and cache
pub const DATA_DIR_NAME: &str = "Slice Previewer";

/// Max images fetched concurrently during document prefetch
pub const PREFETCH_CONCURRENCY: usize = 8;
