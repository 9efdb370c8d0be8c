//! SARIF output formatter.
//!
//! SARIF (Static Analysis Results Interchange Format) is an OASIS standard
//! for static analysis tools, supported by GitHub, VS Code, and other tools.

use super::LintFormatter;
use crate::lint::{LintDiagnostic, RuleRegistry, Severity, Span};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// SARIF version we generate.
const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// Formats lint output as SARIF.
pub struct SarifFormatter {
    /// Tool name to report.
    pub tool_name: String,
    /// Tool version to report.
    pub tool_version: String,
    /// Known rule descriptions by id.
    descriptions: BTreeMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    start_column: usize,
    end_line: usize,
    end_column: usize,
}

impl SarifFormatter {
    /// Create a new SARIF formatter.
    pub fn new(tool_name: impl Into<String>, tool_version: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_version: tool_version.into(),
            descriptions: BTreeMap::new(),
        }
    }

    /// Describe reported rules with the descriptions from `registry`.
    pub fn with_rules(mut self, registry: &RuleRegistry) -> Self {
        self.descriptions.extend(
            registry
                .iter()
                .map(|rule| (rule.id().0, rule.description().to_string())),
        );
        self
    }

    fn severity_to_level(severity: Severity) -> &'static str {
        match severity {
            Severity::Hint => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    fn location(span: &Span) -> SarifLocation {
        SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation {
                    uri: span.file.display().to_string(),
                },
                region: SarifRegion {
                    start_line: span.start_line,
                    start_column: span.start_col,
                    end_line: span.end_line,
                    end_column: span.end_col,
                },
            },
        }
    }
}

impl LintFormatter for SarifFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[LintDiagnostic],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let reported: BTreeMap<&str, String> = diagnostics
            .iter()
            .map(|d| {
                let id = d.rule_id.as_str();
                let text = self
                    .descriptions
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| format!("Rule {}", id));
                (id, text)
            })
            .collect();

        let rules = reported
            .into_iter()
            .map(|(id, text)| SarifRule {
                id: id.to_string(),
                short_description: SarifMessage { text },
            })
            .collect();

        let results = diagnostics
            .iter()
            .map(|d| SarifResult {
                rule_id: d.rule_id.0.clone(),
                level: Self::severity_to_level(d.severity),
                message: SarifMessage {
                    text: d.message.clone(),
                },
                locations: d.span.iter().map(Self::location).collect(),
            })
            .collect();

        let log = SarifLog {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: self.tool_name.clone(),
                        version: self.tool_version.clone(),
                        rules,
                    },
                },
                results,
            }],
        };

        serde_json::to_writer_pretty(&mut *writer, &log).map_err(std::io::Error::other)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::RuleId;

    fn render(formatter: &SarifFormatter, diagnostics: &[LintDiagnostic]) -> serde_json::Value {
        let mut output = Vec::new();
        formatter.format(diagnostics, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn produces_valid_sarif() {
        let parsed = render(
            &SarifFormatter::new("tfstyle", "1.0.0"),
            &[LintDiagnostic::new(
                RuleId::new("terraform_meta_arguments"),
                Severity::Warning,
                "Invalid 'source' argument arrangement in module 'vpc'",
            )],
        );

        assert_eq!(parsed["version"], "2.1.0");
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "tfstyle");
        assert_eq!(parsed["runs"][0]["results"][0]["level"], "warning");
        assert!(parsed["runs"][0]["results"][0].get("locations").is_none());
    }

    #[test]
    fn maps_severity_to_sarif_level() {
        assert_eq!(SarifFormatter::severity_to_level(Severity::Error), "error");
        assert_eq!(
            SarifFormatter::severity_to_level(Severity::Warning),
            "warning"
        );
        assert_eq!(SarifFormatter::severity_to_level(Severity::Hint), "note");
    }

    #[test]
    fn rules_use_registry_descriptions() {
        let formatter =
            SarifFormatter::new("tfstyle", "1.0.0").with_rules(&RuleRegistry::with_builtins());
        let parsed = render(
            &formatter,
            &[
                LintDiagnostic::new(RuleId::new("terraform_required_tags"), Severity::Error, "a"),
                LintDiagnostic::new(RuleId::new("terraform_required_tags"), Severity::Error, "b"),
                LintDiagnostic::new(RuleId::new("custom_rule"), Severity::Warning, "c"),
            ],
        );

        let rules = parsed["runs"][0]["tool"]["driver"]["rules"]
            .as_array()
            .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["id"], "custom_rule");
        assert_eq!(rules[0]["shortDescription"]["text"], "Rule custom_rule");
        assert_eq!(rules[1]["id"], "terraform_required_tags");
        assert!(rules[1]["shortDescription"]["text"]
            .as_str()
            .unwrap()
            .contains("tags"));
    }

    #[test]
    fn includes_full_region() {
        let parsed = render(
            &SarifFormatter::new("tfstyle", "1.0.0"),
            &[LintDiagnostic::new(RuleId::new("test"), Severity::Error, "m")
                .with_span(Span::new("modules/vpc/main.tf", 3, 12, 3, 66))],
        );

        let location = &parsed["runs"][0]["results"][0]["locations"][0]["physicalLocation"];
        assert_eq!(location["artifactLocation"]["uri"], "modules/vpc/main.tf");
        assert_eq!(location["region"]["startLine"], 3);
        assert_eq!(location["region"]["startColumn"], 12);
        assert_eq!(location["region"]["endLine"], 3);
        assert_eq!(location["region"]["endColumn"], 66);
    }
}
