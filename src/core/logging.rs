//! Logging initialization.
//!
//! Wraps `env_logger` with a compact format. The filter defaults to
//! `info` and is overridable through `RUST_LOG`.

use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialize the global logger.
///
/// Safe to call more than once; only the first call takes effect (useful
/// in tests where several cases may race to initialize).
pub fn init() {
    let env = Env::default().default_filter_or("info");
    let _ = Builder::from_env(env)
        .filter_module("walkdir", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{:<5}] {}",
                record.level(),
                record.args()
            )
        })
        .try_init();
}
