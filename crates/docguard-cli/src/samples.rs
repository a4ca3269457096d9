//! # Samples Subcommand
//!
//! Prints the bundled fixtures so they can be saved and fed back to
//! `docguard validate`.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use docguard_core::samples::{self, RuleSet};

/// Which fixture to print.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    Schema,
    Valid,
    InvalidSchema,
    InvalidSemantic,
    EdgeCases,
    Rules,
}

/// Arguments for the `docguard samples` subcommand.
#[derive(Args, Debug)]
pub struct SamplesArgs {
    /// Print a single fixture instead of all of them.
    #[arg(long, value_enum)]
    pub only: Option<Fixture>,
}

pub fn run_samples(args: &SamplesArgs) -> Result<u8> {
    let value = match args.only {
        Some(fixture) => fixture_value(fixture),
        None => all_fixtures(),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(0)
}

fn fixture_value(fixture: Fixture) -> Value {
    match fixture {
        Fixture::Schema => samples::sample_schema(),
        Fixture::Valid => samples::valid_document(),
        Fixture::InvalidSchema => samples::invalid_schema_document(),
        Fixture::InvalidSemantic => samples::invalid_semantic_document(),
        Fixture::EdgeCases => Value::Array(samples::edge_case_documents()),
        Fixture::Rules => rule_sets(),
    }
}

fn rule_sets() -> Value {
    let mut sets = serde_json::Map::new();
    for set in [RuleSet::Business, RuleSet::Strict, RuleSet::Technical] {
        sets.insert(set.to_string(), json!(set.rules()));
    }
    Value::Object(sets)
}

fn all_fixtures() -> Value {
    json!({
        "schema": samples::sample_schema(),
        "documents": {
            "valid": samples::valid_document(),
            "invalid_schema": samples::invalid_schema_document(),
            "invalid_semantic": samples::invalid_semantic_document(),
            "edge_cases": samples::edge_case_documents(),
        },
        "rules": rule_sets(),
    })
}
