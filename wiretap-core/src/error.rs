//! Error types for the wiretap capture layer

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wiretap capture layer
///
/// The taxonomy is closed on purpose: callers dispatch on variants with
/// `match`, never on error message text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the operating system
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A BPF expression failed to compile or install
    #[error("filter error: {0}")]
    Filter(String),

    /// Operation invoked in the wrong session lifecycle state
    #[error("invalid session state: {0}")]
    State(String),

    /// Requested device is not known to the operating system
    #[error("device '{0}' not found")]
    DeviceNotFound(String),

    /// No capture device is available at all
    #[error("no capture device available")]
    NoDevice,

    /// Device is present but cannot be used (down, busy, or broken)
    #[error("device error: {0}")]
    Device(String),

    /// Monitor mode was requested on a device that cannot provide it
    #[error("monitor mode not supported on '{0}'")]
    MonitorUnsupported(String),

    /// Insufficient OS privilege to open a capture or injection handle
    #[error("insufficient privileges: {0}")]
    Permission(String),

    /// A configuration value was rejected before reaching the OS
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl Error {
    /// Create a filter error with a custom message
    pub fn filter<S: Into<String>>(msg: S) -> Self {
        Error::Filter(msg.into())
    }

    /// Create a state error with a custom message
    pub fn state<S: Into<String>>(msg: S) -> Self {
        Error::State(msg.into())
    }

    /// Create a device error with a custom message
    pub fn device<S: Into<String>>(msg: S) -> Self {
        Error::Device(msg.into())
    }

    /// Create a permission error with a custom message
    pub fn permission<S: Into<String>>(msg: S) -> Self {
        Error::Permission(msg.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
