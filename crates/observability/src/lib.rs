//! Tracing/logging setup shared by warden binaries.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide tracing/logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
