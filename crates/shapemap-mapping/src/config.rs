//! Mapper configuration
//!
//! Policies that govern how the registry and builders react to repeated or
//! unknown configuration. Defaults suit idempotent setup code.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when something is configured a second time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later definition replaces the earlier one
    #[default]
    Replace,
    /// The later definition is rejected with a configuration error
    Reject,
}

/// Configuration for a [`crate::TypeMapper`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Re-registering a (source, destination) pair
    pub on_duplicate_map: DuplicatePolicy,
    /// A second `for_member` for a field already in the plan
    pub on_duplicate_member: DuplicatePolicy,
    /// Reject member names the destination shape does not have at
    /// configuration time
    pub validate_members: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            on_duplicate_map: DuplicatePolicy::Replace,
            on_duplicate_member: DuplicatePolicy::Replace,
            validate_members: true,
        }
    }
}

impl MapperConfig {
    /// Strict configuration: duplicates are rejected, members validated
    #[must_use]
    pub fn strict() -> Self {
        Self {
            on_duplicate_map: DuplicatePolicy::Reject,
            on_duplicate_member: DuplicatePolicy::Reject,
            validate_members: true,
        }
    }

    /// Parse configuration from YAML
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML is malformed or names unknown policies.
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| crate::Error::Config(format!("Failed to parse mapper config: {e}")))
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
