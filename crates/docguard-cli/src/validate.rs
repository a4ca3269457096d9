//! # Validate Subcommand
//!
//! Loads a document, a schema and a rule list, runs the workflow and prints
//! the report.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use docguard_core::samples::{self, RuleSet};
use docguard_core::{SectionReport, ValidationReport, ValidationRequest};
use docguard_runtime::{build_workflow, RuntimeConfig};

/// Arguments for the `docguard validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON document to validate.
    #[arg(long, value_name = "FILE")]
    pub document: PathBuf,

    /// JSON Schema file. Defaults to the bundled sample schema.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// YAML or JSON file holding a list of rules.
    #[arg(long, value_name = "FILE", conflicts_with = "rule_set")]
    pub rules: Option<PathBuf>,

    /// Bundled rule set used when no rules file is given.
    #[arg(long, value_name = "NAME", default_value_t = RuleSet::Business)]
    pub rule_set: RuleSet,

    /// Runtime configuration (YAML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Provider name, overriding the config file.
    #[arg(long)]
    pub provider: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document is valid, 1 when it is not.
/// Input and configuration problems are returned as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let document = read_json(&args.document)?;
    let schema = match &args.schema {
        Some(path) => read_json(path)?,
        None => samples::sample_schema(),
    };
    let rules = match &args.rules {
        Some(path) => read_rules(path)?,
        None => args.rule_set.rules(),
    };

    let mut config = match &args.config {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    if let Some(provider) = &args.provider {
        config.provider = provider.clone();
    }

    let request =
        ValidationRequest::new(document, schema, rules).context("invalid validation request")?;
    let workflow = build_workflow(&config).context("failed to set up semantic judge")?;

    tracing::info!(
        document = %args.document.display(),
        rules = request.rules().len(),
        provider = %config.provider,
        "validating document"
    );

    let report = workflow.validate(&request);

    if args.json {
        println!("{}", report.to_json_pretty());
    } else {
        print!("{}", render_human(&report));
    }

    Ok(if report.overall_valid { 0 } else { 1 })
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Rules file: a YAML (or JSON) sequence of strings.
fn read_rules(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("{} must contain a list of rule strings", path.display()))
}

fn render_human(report: &ValidationReport) -> String {
    let mut out = String::new();
    let verdict = if report.overall_valid { "VALID" } else { "INVALID" };
    let _ = writeln!(out, "Result: {}", verdict);
    render_section(&mut out, "Schema validation", &report.structural);
    render_section(&mut out, "Semantic validation", &report.semantic);
    let _ = writeln!(out, "\n{}", report.summary);
    out
}

fn render_section(out: &mut String, title: &str, section: &SectionReport) {
    let mark = if section.passed { "passed" } else { "failed" };
    let _ = writeln!(out, "\n{}: {}", title, mark);
    for error in &section.errors {
        let _ = writeln!(out, "  - error: {}", error);
    }
    for warning in &section.warnings {
        let _ = writeln!(out, "  - warning: {}", warning);
    }
}
