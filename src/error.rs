//! Error handling for the pooled collections
//!
//! Every fallible operation in the crate reports one of a small set of
//! recoverable error kinds. None of them are fatal and none are logged here;
//! the caller decides what to do.

use thiserror::Error;

/// Main error type for the pooled collections
#[derive(Error, Debug)]
pub enum CollectionError {
    /// Null/stale handle, zero size or capacity, wrong payload length,
    /// or a cursor that is already at its end
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message describing the issue
        message: String,
    },

    /// Every cell of the backing pool is in use
    #[error("Resource exhausted: all {capacity} cells in use")]
    ResourceExhausted {
        /// Fixed capacity of the exhausted pool
        capacity: usize,
    },

    /// Index walked past a structural boundary
    #[error("Out of range: index {index}, length {len}")]
    OutOfRange {
        /// The requested index
        index: isize,
        /// Number of elements present
        len: usize,
    },

    /// Lookup target does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was looked up
        message: String,
    },

    /// The backing region could not be reserved
    #[error("Memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollectionError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    /// Create a resource exhausted error
    pub fn resource_exhausted(capacity: usize) -> Self {
        Self::ResourceExhausted { capacity }
    }

    /// Create an out of range error
    pub fn out_of_range(index: isize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound { message: message.into() }
    }

    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Check if the caller can recover by changing its own behavior
    /// (freeing cells, fixing an index) without recreating the container
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidArgument { .. } => true,
            Self::ResourceExhausted { .. } => true,
            Self::OutOfRange { .. } => true,
            Self::NotFound { .. } => true,
            Self::Io(_) => true,
            Self::OutOfMemory { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "argument",
            Self::ResourceExhausted { .. } => "exhausted",
            Self::OutOfRange { .. } => "range",
            Self::NotFound { .. } => "range",
            Self::OutOfMemory { .. } => "memory",
            Self::Configuration { .. } => "config",
            Self::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Check that a payload has exactly the container's element size
#[inline]
pub fn check_payload(data: &[u8], element_size: usize) -> Result<()> {
    if data.len() != element_size {
        return Err(CollectionError::invalid_argument(format!(
            "payload is {} bytes, element size is {}",
            data.len(),
            element_size
        )));
    }
    Ok(())
}
