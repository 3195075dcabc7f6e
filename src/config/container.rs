//! Container configuration.

use super::{parse_env_bool, parse_env_var, Config, ValidationError};
use crate::error::{CollectionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape and behavior of one pooled container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Payload size of every element in bytes
    pub element_size: usize,

    /// Maximum number of elements
    pub capacity: usize,

    /// Overwrite payload bytes with zeros when a cell returns to the pool
    pub zero_on_release: bool,

    /// Collect acquisition and release counters
    pub collect_stats: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new(8, 1024)
    }
}

impl ContainerConfig {
    /// Configuration for `capacity` elements of `element_size` bytes with
    /// statistics on and zeroing off.
    pub fn new(element_size: usize, capacity: usize) -> Self {
        Self {
            element_size,
            capacity,
            zero_on_release: false,
            collect_stats: true,
        }
    }

    /// Create a new builder starting from the default configuration.
    pub fn builder() -> ContainerConfigBuilder {
        ContainerConfigBuilder::new()
    }

    /// Preset that wipes released payloads, for containers holding secrets.
    pub fn secure_preset() -> Self {
        Self {
            zero_on_release: true,
            ..Self::default()
        }
    }

    /// Bytes the pool region will occupy, `None` on overflow.
    pub fn region_size(&self) -> Option<usize> {
        self.element_size
            .max(crate::memory::LINK_SIZE)
            .checked_mul(self.capacity)
    }
}

impl Config for ContainerConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.element_size == 0 {
            errors.push(
                ValidationError::new(
                    "element_size",
                    &self.element_size.to_string(),
                    "element size must be greater than 0",
                )
                .with_suggestion("size of one stored payload in bytes"),
            );
        }

        if self.capacity == 0 || self.capacity >= u32::MAX as usize {
            errors.push(
                ValidationError::new(
                    "capacity",
                    &self.capacity.to_string(),
                    "capacity must be between 1 and u32::MAX - 1",
                )
                .with_suggestion("typical values: 64-1M"),
            );
        }

        if self.region_size().is_none() {
            errors.push(ValidationError::new(
                "capacity",
                &self.capacity.to_string(),
                "element size times capacity overflows the address space",
            ));
        }

        if !errors.is_empty() {
            return Err(CollectionError::configuration(format!(
                "Container configuration validation failed: {}",
                errors
                    .into_iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            )));
        }

        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();

        config.element_size = parse_env_var(
            &format!("{}CONTAINER_ELEMENT_SIZE", prefix),
            config.element_size,
        );
        config.capacity = parse_env_var(&format!("{}CONTAINER_CAPACITY", prefix), config.capacity);
        config.zero_on_release = parse_env_bool(
            &format!("{}CONTAINER_ZERO_ON_RELEASE", prefix),
            config.zero_on_release,
        );
        config.collect_stats = parse_env_bool(
            &format!("{}CONTAINER_COLLECT_STATS", prefix),
            config.collect_stats,
        );

        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            capacity: 64 * 1024,
            collect_stats: false,
            ..Self::default()
        }
    }

    fn memory_preset() -> Self {
        Self {
            capacity: 64,
            collect_stats: false,
            ..Self::default()
        }
    }

    fn realtime_preset() -> Self {
        // Capacity is reserved up front, so every operation stays O(1).
        Self {
            capacity: 4096,
            zero_on_release: false,
            collect_stats: false,
            ..Self::default()
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            CollectionError::configuration(format!("Failed to serialize container config: {}", e))
        })?;

        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CollectionError::configuration(format!("Failed to parse container config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Builder for [`ContainerConfig`].
#[derive(Debug, Clone)]
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Create a builder from the default configuration.
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
        }
    }

    /// Set the payload size.
    pub fn element_size(mut self, size: usize) -> Self {
        self.config.element_size = size;
        self
    }

    /// Set the maximum number of elements.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Wipe payloads on release.
    pub fn zero_on_release(mut self, enabled: bool) -> Self {
        self.config.zero_on_release = enabled;
        self
    }

    /// Collect pool statistics.
    pub fn collect_stats(mut self, enabled: bool) -> Self {
        self.config.collect_stats = enabled;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ContainerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
