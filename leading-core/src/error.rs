use std::path::PathBuf;
use thiserror::Error;

/// Contract violations surfaced by the wrapping entry points.
///
/// These are never recovered internally: blank text is a valid input and
/// every other oddity (tiny widths, oversized glyphs, mixed scripts) is
/// absorbed by the splitting policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WrapError {
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: String,
    },

    #[error("Out of range: '{name}' must be greater than zero, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
    },
}

/// Errors raised while loading a [`WrapConfig`](crate::config::WrapConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config rejected: {0}")]
    Invalid(#[from] WrapError),
}

/// Check a wrap width. Anything not strictly positive (NaN included) fails.
pub(crate) fn check_max_width(max_width: f32) -> Result<(), WrapError> {
    if max_width > 0.0 {
        Ok(())
    } else {
        Err(WrapError::OutOfRange {
            name: "max_width",
            value: max_width,
        })
    }
}
