//! Error types.

use thiserror::Error;

/// Errors surfaced by the terminal-facing edges of the crate.
///
/// Hooks themselves are infallible: environment limitations degrade to
/// `supported = false` state rather than erroring. `HookError` only appears
/// where real I/O happens, such as the event pump.
#[derive(Debug, Error)]
pub enum HookError {
    /// Terminal I/O failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
