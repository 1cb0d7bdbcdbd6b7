//! JobFinder: per-company résumé rendering and throttled email dispatch.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod generator;
pub mod image_validator;
pub mod layout;
pub mod mail;
pub mod prompt;
pub mod types;
pub mod utils;
pub mod watermark;

pub use config::AppConfig;
pub use generator::{BatchGenerator, GenerationReport};
pub use layout::DocumentLayoutEngine;
pub use types::profile::ProfileRecord;

/// Logs through `tracing` at the given level.
///
/// `app_log!(info, "Sent to {}", recipient)`
#[macro_export]
macro_rules! app_log {
    (trace, $($arg:tt)+) => { ::tracing::trace!($($arg)+) };
    (debug, $($arg:tt)+) => { ::tracing::debug!($($arg)+) };
    (info, $($arg:tt)+) => { ::tracing::info!($($arg)+) };
    (warn, $($arg:tt)+) => { ::tracing::warn!($($arg)+) };
    (error, $($arg:tt)+) => { ::tracing::error!($($arg)+) };
}
