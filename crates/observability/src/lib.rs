//! Tracing and logging setup shared by every shopfront process.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::Json);
}

/// Tracing configuration (filters, output format).
pub mod tracing;
