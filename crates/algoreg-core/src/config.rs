//! # Registry Configuration
//!
//! The registries need two settings: which caller identity is privileged
//! (certify, revoke, mint) and how many collaborators a project may hold.
//!
//! ```yaml
//! privileged_identity: CONTRACT_OWNER
//! max_collaborators: 20
//! ```
//!
//! Missing fields take their defaults. `validate()` runs on every load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::identity::Identity;

/// Identity that certifies, revokes and mints unless configured otherwise.
pub const DEFAULT_PRIVILEGED_IDENTITY: &str = "CONTRACT_OWNER";

/// Collaborator cap per project, lead researcher included.
pub const DEFAULT_MAX_COLLABORATORS: usize = 20;

/// Settings shared by the three registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// The single identity allowed to certify, revoke and mint.
    pub privileged_identity: Identity,
    /// Maximum number of collaborators per project.
    pub max_collaborators: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            privileged_identity: Identity::from(DEFAULT_PRIVILEGED_IDENTITY),
            max_collaborators: DEFAULT_MAX_COLLABORATORS,
        }
    }
}

impl RegistryConfig {
    /// Default settings with a different privileged identity.
    pub fn with_privileged_identity(identity: impl Into<Identity>) -> Self {
        Self {
            privileged_identity: identity.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Reject settings no registry can operate under.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.privileged_identity.is_empty() {
            return Err(ConfigError::Invalid {
                field: "privileged_identity",
                reason: "must not be empty".to_string(),
            });
        }
        // The lead researcher always occupies one slot.
        if self.max_collaborators == 0 {
            return Err(ConfigError::Invalid {
                field: "max_collaborators",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
