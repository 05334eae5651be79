use std::time::Duration;

use thiserror::Error;

/// Convenient result alias for the shelter finder library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Retrieval of the shelter dataset failed (network, HTTP status, file access).
    #[error("failed to fetch shelter dataset from {location}: {reason}")]
    DataFetch { location: String, reason: String },

    /// The payload could not be parsed as tabular data or yielded no usable rows.
    #[error("failed to parse shelter dataset: {message}")]
    DataParse { message: String },

    /// Device positioning failed. Recovered by the controller through the fallback position.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// A recenter was requested before any position was resolved.
    #[error("no user position has been resolved yet")]
    NoPosition,

    /// Raised when configuration values are out of range or malformed.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Reasons a single-shot position request can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The host offers no positioning capability at all.
    #[error("geolocation is not supported on this device")]
    Unsupported,

    /// No fix arrived within the configured bound.
    #[error("timed out after {}s waiting for a position fix", .timeout.as_secs())]
    Timeout { timeout: Duration },

    /// The user or platform refused access to the position.
    #[error("permission to read the device position was denied")]
    PermissionDenied,

    /// The device reported that no position is currently available.
    #[error("position unavailable: {message}")]
    Unavailable { message: String },
}
