//! Sample schema, documents and rule sets.
//!
//! Used by the CLI's defaults and `samples` command, and by tests.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

/// Schema for a user record with metadata.
pub fn sample_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "user": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "minimum": 1},
                    "name": {"type": "string", "minLength": 1},
                    "email": {"type": "string", "format": "email"},
                    "age": {"type": "integer", "minimum": 0, "maximum": 150},
                    "roles": {
                        "type": "array",
                        "items": {"type": "string"},
                        "minItems": 1
                    }
                },
                "required": ["id", "name", "email", "age", "roles"]
            },
            "metadata": {
                "type": "object",
                "properties": {
                    "created_at": {"type": "string", "format": "date-time"},
                    "version": {"type": "string"}
                },
                "required": ["created_at", "version"]
            }
        },
        "required": ["user", "metadata"]
    })
}

/// Passes the sample schema and the business rules.
pub fn valid_document() -> Value {
    json!({
        "user": {
            "id": 123,
            "name": "John Doe",
            "email": "john.doe@company.com",
            "age": 30,
            "roles": ["admin", "user"]
        },
        "metadata": {
            "created_at": "2024-01-15T10:30:00Z",
            "version": "1.2.0"
        }
    })
}

/// Breaks the sample schema in several places.
pub fn invalid_schema_document() -> Value {
    json!({
        "user": {
            "id": "not_a_number",
            "name": "",
            "email": "invalid-email",
            "age": -5,
            "roles": []
        },
        "metadata": {
            "created_at": "invalid-date"
        }
    })
}

/// Passes the sample schema but breaks most business rules.
pub fn invalid_semantic_document() -> Value {
    json!({
        "user": {
            "id": 456,
            "name": "User123!@#",
            "email": "user@gmail.com",
            "age": 16,
            "roles": ["admin", "invalid_role"]
        },
        "metadata": {
            "created_at": "2025-12-31T23:59:59Z",
            "version": "invalid.version.format"
        }
    })
}

/// Boundary documents: minimum age, maximum age, many roles.
pub fn edge_case_documents() -> Vec<Value> {
    vec![
        json!({
            "user": {
                "id": 1,
                "name": "Young User",
                "email": "young@company.com",
                "age": 0,
                "roles": ["guest"]
            },
            "metadata": {"created_at": "2024-01-01T00:00:00Z", "version": "0.1.0"}
        }),
        json!({
            "user": {
                "id": 2,
                "name": "Senior User",
                "email": "senior@enterprise.org",
                "age": 150,
                "roles": ["user"]
            },
            "metadata": {"created_at": "2024-06-15T12:00:00Z", "version": "10.0.0"}
        }),
        json!({
            "user": {
                "id": 3,
                "name": "Multi Role User",
                "email": "multi@business.net",
                "age": 35,
                "roles": ["admin", "moderator", "user"]
            },
            "metadata": {"created_at": "2024-03-20T08:30:00Z", "version": "2.1.3"}
        }),
    ]
}

fn to_rules(rules: &[&str]) -> Vec<String> {
    rules.iter().map(|r| r.to_string()).collect()
}

pub fn business_rules() -> Vec<String> {
    to_rules(&[
        "User age must be reasonable for the assigned roles (e.g., admin role requires age >= 18)",
        "Email domain should be from a business domain (not personal email providers like gmail, yahoo, hotmail)",
        "User name should not contain special characters or numbers",
        "At least one role must be assigned, and roles should be from: ['user', 'admin', 'moderator', 'guest']",
        "Version should follow semantic versioning format (e.g., 1.0.0)",
        "Created timestamp should not be in the future",
    ])
}

pub fn strict_business_rules() -> Vec<String> {
    to_rules(&[
        "Admin users must be at least 21 years old",
        "Moderator users must be at least 18 years old",
        "Email domain must be from approved corporate domains: ['company.com', 'enterprise.org', 'business.net']",
        "User names must be between 2 and 50 characters and contain only letters and spaces",
        "Users can have maximum 3 roles assigned",
        "Version must be a stable release (no pre-release identifiers like alpha, beta, rc)",
        "Created timestamp must be within the last 2 years",
    ])
}

pub fn technical_rules() -> Vec<String> {
    to_rules(&[
        "User ID must be a positive integer and unique within the system",
        "Email must be a valid RFC 5322 compliant email address",
        "Age must be between 0 and 150 years",
        "Roles array must not contain duplicates",
        "Version must follow semantic versioning specification (semver.org)",
        "Created timestamp must be in ISO 8601 format with UTC timezone",
    ])
}

/// Named sample rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSet {
    #[default]
    Business,
    Strict,
    Technical,
}

impl RuleSet {
    pub fn rules(self) -> Vec<String> {
        match self {
            RuleSet::Business => business_rules(),
            RuleSet::Strict => strict_business_rules(),
            RuleSet::Technical => technical_rules(),
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSet::Business => write!(f, "business"),
            RuleSet::Strict => write!(f, "strict"),
            RuleSet::Technical => write!(f, "technical"),
        }
    }
}

impl FromStr for RuleSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "business" => Ok(RuleSet::Business),
            "strict" => Ok(RuleSet::Strict),
            "technical" => Ok(RuleSet::Technical),
            other => Err(format!(
                "unknown rule set '{}': expected business, strict or technical",
                other
            )),
        }
    }
}
