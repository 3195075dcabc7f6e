//! Configuration for pooled containers
//!
//! Every container can be built from a [`ContainerConfig`], which carries the
//! payload size and capacity plus the optional pool behaviors (zeroing freed
//! cells, collecting [`PoolStats`](crate::PoolStats)).
//!
//! # Builder
//!
//! ```rust
//! use pooled_collections::config::ContainerConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContainerConfig::builder()
//!     .element_size(16)
//!     .capacity(1024)
//!     .zero_on_release(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Presets and environment
//!
//! ```rust
//! use pooled_collections::config::{Config, ContainerConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContainerConfig::realtime_preset();
//! assert!(config.validate().is_ok());
//!
//! // POOLED_COLLECTIONS_CONTAINER_CAPACITY=4096 etc.
//! let config = ContainerConfig::from_env()?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod container;


pub use container::{ContainerConfig, ContainerConfigBuilder};

/// Environment prefix used by [`Config::from_env`]
pub const ENV_PREFIX: &str = "POOLED_COLLECTIONS_";

/// Common configuration behavior: validation, environment initialization,
/// presets and persistence
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize from environment variables named `POOLED_COLLECTIONS_{COMPONENT}_{FIELD}`.
    ///
    /// Unset or unparsable variables keep their default value.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset favoring throughput over memory.
    fn performance_preset() -> Self;

    /// Preset favoring a small footprint.
    fn memory_preset() -> Self;

    /// Preset with predictable per-operation cost.
    fn realtime_preset() -> Self;

    /// Preset for general use.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save the configuration as JSON.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate a configuration saved by [`save_to_file`](Config::save_to_file).
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true, everything
/// else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
