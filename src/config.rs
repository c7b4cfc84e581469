//! Engine configuration supplied by the host

use serde::{Deserialize, Serialize};

/// What to do when a `required` resolver fails at runtime.
///
/// The engine does not guess; the host picks one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequiredResolutionPolicy {
    /// Propagate the attributed error; the host blocks navigation.
    #[default]
    Block,
    /// Degrade to "not enforced" and log a warning.
    TreatAsOptional,
}

/// Host-supplied engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Locale handed to the localization collaborator.
    pub locale: String,
    pub required_resolution: RequiredResolutionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            required_resolution: RequiredResolutionPolicy::default(),
        }
    }
}
