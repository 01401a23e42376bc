// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Evaluator configuration

use crate::error::{CsgError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Tunable parameters for scene evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Plane classification tolerance for the BSP union, also used as the
    /// touching tolerance when comparing bounding boxes
    pub epsilon: f64,
    /// Grid size used to weld coincident vertices after a BSP union
    pub weld_tolerance: f64,
    /// Concatenate union operands whose interiors cannot overlap
    pub disjoint_shortcut: bool,
    /// Segment count used by part builders when the caller passes 0
    pub default_segments: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            weld_tolerance: 1e-6,
            disjoint_shortcut: true,
            default_segments: 32,
        }
    }
}

impl EvalConfig {
    /// Parse configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: EvalConfig =
            toml::from_str(content).context("Failed to parse evaluator config")?;
        config.validate().context("Evaluator config rejected")?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize evaluator config")
    }

    /// Apply `PARTFORGE_*` environment variable overrides.
    /// Unparseable values are logged and skipped; range checks happen in
    /// [`EvalConfig::validate`], which evaluation always runs.
    pub fn with_env_overrides(mut self) -> Self {
        env_override("PARTFORGE_EPSILON", &mut self.epsilon);
        env_override("PARTFORGE_WELD_TOLERANCE", &mut self.weld_tolerance);
        env_override("PARTFORGE_DISJOINT_SHORTCUT", &mut self.disjoint_shortcut);
        env_override("PARTFORGE_DEFAULT_SEGMENTS", &mut self.default_segments);
        self
    }

    /// Check that all values are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(CsgError::Config(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !(self.weld_tolerance.is_finite() && self.weld_tolerance > 0.0) {
            return Err(CsgError::Config(format!(
                "weld_tolerance must be positive, got {}",
                self.weld_tolerance
            )));
        }
        if self.default_segments < 3 {
            return Err(CsgError::Config(format!(
                "default_segments must be at least 3, got {}",
                self.default_segments
            )));
        }
        Ok(())
    }

    /// Resolve a caller-supplied segment count, treating 0 as "use the default"
    pub fn segments_or_default(&self, segments: u32) -> u32 {
        if segments > 0 {
            segments
        } else {
            self.default_segments
        }
    }
}

fn env_override<T: FromStr>(name: &str, field: &mut T) {
    let Ok(value) = std::env::var(name) else {
        return;
    };
    match value.parse() {
        Ok(parsed) => *field = parsed,
        Err(_) => warn!(variable = name, %value, "ignoring unparseable override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EvalConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EvalConfig::from_toml_str("disjoint_shortcut = false\n").unwrap();
        assert!(!config.disjoint_shortcut);
        assert_eq!(config.epsilon, 1e-5);
        assert_eq!(config.default_segments, 32);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EvalConfig {
            epsilon: 1e-4,
            default_segments: 48,
            ..EvalConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(EvalConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(EvalConfig::from_toml_str("epsilon = -1.0").is_err());
        assert!(EvalConfig::from_toml_str("default_segments = 2").is_err());
        assert!(EvalConfig::from_toml_str("epsilon = \"tiny\"").is_err());
    }

    #[test]
    fn test_segments_or_default() {
        let config = EvalConfig::default();
        assert_eq!(config.segments_or_default(0), 32);
        assert_eq!(config.segments_or_default(6), 6);
    }

    // the only test in the crate that touches PARTFORGE_* variables
    #[test]
    fn test_env_overrides() {
        const VARS: [&str; 4] = [
            "PARTFORGE_EPSILON",
            "PARTFORGE_WELD_TOLERANCE",
            "PARTFORGE_DISJOINT_SHORTCUT",
            "PARTFORGE_DEFAULT_SEGMENTS",
        ];

        std::env::set_var("PARTFORGE_EPSILON", "1e-4");
        std::env::set_var("PARTFORGE_DISJOINT_SHORTCUT", "false");
        std::env::set_var("PARTFORGE_DEFAULT_SEGMENTS", "many");
        let config = EvalConfig::default().with_env_overrides();
        assert_eq!(config.epsilon, 1e-4);
        assert!(!config.disjoint_shortcut);
        assert_eq!(config.weld_tolerance, 1e-6);
        assert_eq!(config.default_segments, 32);
        assert!(config.validate().is_ok());

        std::env::set_var("PARTFORGE_WELD_TOLERANCE", "0");
        let config = EvalConfig::default().with_env_overrides();
        assert_eq!(config.weld_tolerance, 0.0);
        assert!(matches!(config.validate(), Err(CsgError::Config(_))));

        for var in VARS {
            std::env::remove_var(var);
        }
        assert_eq!(EvalConfig::default().with_env_overrides(), EvalConfig::default());
    }
}
