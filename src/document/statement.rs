use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::component::Product;

/// Impact status a statement asserts about a vulnerability and a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotAffected,
    Affected,
    Fixed,
    UnderInvestigation,
}

impl Default for Status {
    fn default() -> Self {
        Status::UnderInvestigation
    }
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotAffected => "not_affected",
            Status::Affected => "affected",
            Status::Fixed => "fixed",
            Status::UnderInvestigation => "under_investigation",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Machine-readable justification for a not_affected status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    ComponentNotPresent,
    VulnerableCodeNotPresent,
    VulnerableCodeNotInExecutePath,
    VulnerableCodeCannotBeControlledByAdversary,
    InlineMitigationsAlreadyExist,
}

/// A vulnerability as referenced by a statement: a canonical name, an
/// optional IRI, and any number of aliases in other tracking systems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// IRI identifying the vulnerability inside the document
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Canonical identifier, e.g. a CVE id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Identifiers for the same vulnerability in other tracking systems
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// A single claim about the impact of a vulnerability on a set of
/// products, with the timestamps that establish its authority over time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub vulnerability: Vulnerability,

    /// Time the statement was issued. When absent, the document timestamp
    /// applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Time of the last revision of this statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,

    #[serde(default)]
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_statement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_statement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_statement_timestamp: Option<DateTime<Utc>>,
}
