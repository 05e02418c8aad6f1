use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::layout::LayoutError;

/// What to do with a group whose delegate call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DelegateFailurePolicy {
    /// Fail the whole layout call.
    #[default]
    Abort,
    /// Stack the failed group's nodes in a single column and carry on.
    LinearFallback,
}

/// Serializes with the same camelCase keys the config file uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Minimum gap between nodes in one rank; groups are separated by twice this.
    pub spacing: f32,
    pub default_width: f32,
    pub default_height: f32,
    pub on_delegate_error: DelegateFailurePolicy,
    /// Lay out groups concurrently when the `parallel` feature is built in.
    pub parallel: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 20.0,
            default_width: 200.0,
            default_height: 80.0,
            on_delegate_error: DelegateFailurePolicy::Abort,
            parallel: true,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "spacing must be a finite, non-negative number (got {})",
                self.spacing
            )));
        }
        for (name, value) in [
            ("defaultWidth", self.default_width),
            ("defaultHeight", self.default_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be a finite, positive number (got {value})"
                )));
            }
        }
        Ok(())
    }

    /// Spacing handed to the delegate inside one layer.
    pub(crate) fn node_spacing(&self, orphan: bool) -> f32 {
        if orphan {
            self.spacing / 2.0
        } else {
            self.spacing
        }
    }

    /// Spacing handed to the delegate between layers.
    pub(crate) fn rank_spacing(&self, orphan: bool) -> f32 {
        self.node_spacing(orphan) * 2.0
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    spacing: Option<f32>,
    default_width: Option<f32>,
    default_height: Option<f32>,
    on_delegate_error: Option<DelegateFailurePolicy>,
    parallel: Option<bool>,
}

fn apply_config_file(mut config: LayoutConfig, file: ConfigFile) -> LayoutConfig {
    if let Some(v) = file.spacing {
        config.spacing = v;
    }
    if let Some(v) = file.default_width {
        config.default_width = v;
    }
    if let Some(v) = file.default_height {
        config.default_height = v;
    }
    if let Some(v) = file.on_delegate_error {
        config.on_delegate_error = v;
    }
    if let Some(v) = file.parallel {
        config.parallel = v;
    }
    config
}

/// Parses config text (JSON or JSON5) on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let parsed: ConfigFile = json5::from_str(contents).context("invalid layout config")?;
    let config = apply_config_file(LayoutConfig::default(), parsed);
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("in config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn orphan_groups_get_half_spacing() {
        let config = LayoutConfig::default();
        assert_eq!(config.node_spacing(false), 20.0);
        assert_eq!(config.rank_spacing(false), 40.0);
        assert_eq!(config.node_spacing(true), 10.0);
        assert_eq!(config.rank_spacing(true), 20.0);
    }

    #[test]
    fn rejects_bad_numbers() {
        let config = LayoutConfig {
            spacing: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));

        let config = LayoutConfig {
            default_height: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_json5_config() {
        let config = parse_config(
            r#"{
                // tighter layout for small screens
                spacing: 12,
                onDelegateError: "linear-fallback",
            }"#,
        )
        .unwrap();
        assert_eq!(config.spacing, 12.0);
        assert_eq!(config.default_width, 200.0);
        assert_eq!(config.on_delegate_error, DelegateFailurePolicy::LinearFallback);
        assert!(config.parallel);
    }

    #[test]
    fn parse_validates_values() {
        assert!(parse_config(r#"{"defaultWidth": 0}"#).is_err());
    }

    #[test]
    fn serialized_config_reads_back_as_a_config_file() {
        let config = LayoutConfig {
            spacing: 8.0,
            on_delegate_error: DelegateFailurePolicy::LinearFallback,
            parallel: false,
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["defaultWidth"], 200.0);
        assert_eq!(json["onDelegateError"], "linear-fallback");

        let back = parse_config(&json.to_string()).unwrap();
        assert_eq!(back.spacing, 8.0);
        assert_eq!(back.on_delegate_error, DelegateFailurePolicy::LinearFallback);
        assert!(!back.parallel);
    }

    #[test]
    fn missing_path_means_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.spacing, LayoutConfig::default().spacing);
    }
}
