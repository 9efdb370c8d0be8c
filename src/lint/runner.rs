//! Module access for rules.
//!
//! A [`Runner`] is the only way a rule sees the module under inspection:
//! schema-filtered blocks, raw file text, expression evaluation and the
//! rule's own configuration. Findings go to an [`IssueSink`].

use std::path::Path;

use serde::de::DeserializeOwned;

use super::diagnostic::LintDiagnostic;
use super::rule::RuleId;
use crate::config::{Config, RuleSettings};
use crate::error::{Result, TfstyleError};
use crate::hcl::{Body, BodySchema, Evaluator, Expression, Module, SourceFile, Value};

/// Read access to one module.
pub trait Runner {
    /// The module directory.
    fn dir(&self) -> &Path;

    /// Module files in discovery order.
    fn files(&self) -> &[SourceFile];

    /// Blocks and attributes matching `schema`, across all files.
    fn module_content(&self, schema: &BodySchema) -> Result<Body>;

    /// A loaded file, by the path it was loaded with.
    fn file(&self, path: &Path) -> Result<&SourceFile>;

    /// Evaluate an expression in the module context.
    fn evaluate(&self, expr: &Expression) -> Result<Value>;

    /// Configured settings for `rule`, if any.
    fn rule_config(&self, rule: &RuleId) -> Option<&RuleSettings>;
}

/// Decode the options of `rule`, falling back to `T::default()` when unconfigured.
pub fn decode_rule_config<T>(runner: &dyn Runner, rule: &RuleId) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match runner.rule_config(rule) {
        Some(settings) => settings.decode(rule.as_str()),
        None => Ok(T::default()),
    }
}

/// Receives findings.
pub trait IssueSink {
    /// Record a finding.
    fn emit(&mut self, diagnostic: LintDiagnostic) -> Result<()>;
}

impl IssueSink for Vec<LintDiagnostic> {
    fn emit(&mut self, diagnostic: LintDiagnostic) -> Result<()> {
        self.push(diagnostic);
        Ok(())
    }
}

/// [`Runner`] over a loaded [`Module`].
pub struct ModuleRunner<'a> {
    module: &'a Module,
    config: &'a Config,
    evaluator: Evaluator<'a>,
}

impl<'a> ModuleRunner<'a> {
    /// Create a runner for `module` with `config`.
    pub fn new(module: &'a Module, config: &'a Config) -> Self {
        Self {
            module,
            config,
            evaluator: Evaluator::new(module),
        }
    }
}

impl Runner for ModuleRunner<'_> {
    fn dir(&self) -> &Path {
        &self.module.dir
    }

    fn files(&self) -> &[SourceFile] {
        &self.module.files
    }

    fn module_content(&self, schema: &BodySchema) -> Result<Body> {
        let mut content = Body::default();
        for file in &self.module.files {
            let filtered = schema.filter(&file.body)?;
            for (name, attr) in filtered.attributes {
                content.attributes.entry(name).or_insert(attr);
            }
            content.blocks.extend(filtered.blocks);
        }
        Ok(content)
    }

    fn file(&self, path: &Path) -> Result<&SourceFile> {
        self.module
            .file(path)
            .ok_or_else(|| TfstyleError::FileNotLoaded {
                path: path.to_path_buf(),
            })
    }

    fn evaluate(&self, expr: &Expression) -> Result<Value> {
        self.evaluator.evaluate(expr)
    }

    fn rule_config(&self, rule: &RuleId) -> Option<&RuleSettings> {
        self.config.rule(rule.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hcl::BlockSchema;
    use crate::lint::Severity;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Options {
        style: String,
    }

    fn module() -> Module {
        Module::from_sources([
            ("a.tf", "module \"one\" {\n  source = \"./one\"\n}\n"),
            ("b.tf", "module \"two\" {\n  source = \"./two\"\n}\n"),
        ])
        .unwrap()
    }

    #[test]
    fn module_content_spans_all_files() {
        let module = module();
        let config = Config::default();
        let runner = ModuleRunner::new(&module, &config);

        let schema = BodySchema::new().block(
            BlockSchema::new("module")
                .labels(&["name"])
                .body(BodySchema::new().attributes(&["source"])),
        );
        let content = runner.module_content(&schema).unwrap();

        let names: Vec<_> = content.blocks.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(content.blocks[1].def_span.file, Path::new("b.tf"));
    }

    #[test]
    fn file_lookup_fails_for_unknown_paths() {
        let module = module();
        let config = Config::default();
        let runner = ModuleRunner::new(&module, &config);

        assert!(runner.file(Path::new("a.tf")).is_ok());
        assert!(matches!(
            runner.file(Path::new("c.tf")),
            Err(TfstyleError::FileNotLoaded { .. })
        ));
    }

    #[test]
    fn decode_defaults_without_config() {
        let module = module();
        let config = Config::default();
        let runner = ModuleRunner::new(&module, &config);

        let options: Options = decode_rule_config(&runner, &RuleId::new("x")).unwrap();
        assert_eq!(options.style, "");
    }

    #[test]
    fn decode_reads_configured_options() {
        let module = module();
        let config: Config = serde_yaml::from_str("rules:\n  x:\n    style: semver\n").unwrap();
        let runner = ModuleRunner::new(&module, &config);

        let options: Options = decode_rule_config(&runner, &RuleId::new("x")).unwrap();
        assert_eq!(options.style, "semver");
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<LintDiagnostic> = Vec::new();
        sink.emit(LintDiagnostic::new(RuleId::new("x"), Severity::Warning, "m"))
            .unwrap();

        assert_eq!(sink.len(), 1);
    }
}
