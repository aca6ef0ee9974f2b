//! MSD - shader binding layout tooling
//!
//! Settings, logging setup and reporting around the [`msd_gpu`] binding contract.

pub mod cli;
pub mod config;
pub mod report;

pub use config::{ConfigError, LogLevel, Settings};
pub use msd_gpu;
pub use report::{ReportError, layout_report, write_report};

/// Install the global logger. `RUST_LOG` overrides the settings level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: LogLevel) {
    let _ = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();
}
