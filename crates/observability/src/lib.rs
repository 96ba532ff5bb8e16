//! Tracing and logging setup shared by storefront binaries.

/// Initialize process-wide tracing using the format from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

/// Subscriber configuration (filters, formatting).
pub mod tracing;

pub use crate::tracing::LogFormat;
