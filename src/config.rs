use crate::core::{HookImportance, Result};
use serde::{Deserialize, Serialize};

/// Hook engine configuration
///
/// Plain settings with builder-style setters. Hosts that keep settings in JSON
/// can load them with [`HookingConfig::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookingConfig {
    /// Run hooks at all when saving
    pub enabled: bool,

    /// Lowest importance dispatched by a save
    pub min_importance: HookImportance,

    /// Remember void outcomes so the same combination is never dispatched again
    pub detect_void_hooks: bool,
}

impl Default for HookingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_importance: HookImportance::Normal,
            detect_void_hooks: true,
        }
    }
}

impl HookingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether hooks run
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the importance floor
    pub fn min_importance(mut self, importance: HookImportance) -> Self {
        self.min_importance = importance;
        self
    }

    /// Set void-hook detection
    pub fn detect_void_hooks(mut self, detect: bool) -> Self {
        self.detect_void_hooks = detect;
        self
    }

    /// Settings for bulk imports and other long-running saves
    pub fn bulk() -> Self {
        Self::default().min_importance(HookImportance::Important)
    }

    /// Parse from JSON; missing fields keep their defaults
    ///
    /// # Examples
    ///
    /// ```
    /// # use savehook::{HookingConfig, HookImportance};
    /// let config = HookingConfig::from_json(r#"{ "min_importance": "Essential" }"#).unwrap();
    /// assert!(config.enabled);
    /// assert_eq!(config.min_importance, HookImportance::Essential);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
