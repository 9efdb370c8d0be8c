//! Configuration schema types.
//!
//! The config file maps rule names to per-rule settings:
//!
//! ```yaml
//! rules:
//!   terraform_naming_standards:
//!     severity: error
//!     format: mixed_snake_case
//!   terraform_module_dependencies:
//!     style: semver
//! ```
//!
//! `enabled` and `severity` are understood for every rule; everything else is
//! kept as raw YAML and decoded by the rule itself.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TfstyleError};
use crate::lint::Severity;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Settings per rule name.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSettings>,
}

/// Settings for a single rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Enable or disable the rule. Unset means the rule's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override the rule's default severity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Rule-specific options.
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_yaml::Value>,
}

impl Config {
    /// Settings for `rule`, if the config mentions it.
    pub fn rule(&self, rule: &str) -> Option<&RuleSettings> {
        self.rules.get(rule)
    }
}

impl RuleSettings {
    /// Decode the rule-specific options into `T`.
    pub fn decode<T: DeserializeOwned>(&self, rule: &str) -> Result<T> {
        let mapping = self
            .options
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
            .collect::<serde_yaml::Mapping>();

        serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))
            .map_err(|e| TfstyleError::rule_config(rule, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Options {
        style: String,
        default_branches: Vec<String>,
    }

    #[test]
    fn parses_rule_settings() {
        let yaml = r#"
rules:
  terraform_module_dependencies:
    enabled: false
    severity: error
    style: semver
    default_branches: [main]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let settings = config.rule("terraform_module_dependencies").unwrap();

        assert_eq!(settings.enabled, Some(false));
        assert_eq!(settings.severity, Some(Severity::Error));
        assert!(!settings.options.contains_key("enabled"));
        assert!(settings.options.contains_key("style"));
    }

    #[test]
    fn decodes_options() {
        let yaml = "rules:\n  x:\n    style: flexible\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        let options: Options = config.rule("x").unwrap().decode("x").unwrap();
        assert_eq!(
            options,
            Options {
                style: "flexible".to_string(),
                default_branches: vec![],
            }
        );
    }

    #[test]
    fn decode_error_names_rule() {
        let yaml = "rules:\n  x:\n    default_branches: 3\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        let err = config.rule("x").unwrap().decode::<Options>("x").unwrap_err();
        assert!(matches!(err, TfstyleError::RuleConfig { ref rule, .. } if rule == "x"));
    }

    #[test]
    fn empty_config_has_no_rules() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.rules.is_empty());
        assert!(config.rule("anything").is_none());
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        assert!(serde_yaml::from_str::<Config>("plugins: {}").is_err());
    }
}
