//! OpenVEX document model.
//!
//! Data structures for VEX documents and their JSON wire format, plus the
//! load helpers the CLI and the matching engine build on. Matching logic
//! itself lives in the `matching` module.

pub mod component;
pub mod statement;

pub use component::{Algorithm, Component, HashValue, IdentifierType, Product, Subcomponent};
pub use statement::{Justification, Statement, Status, Vulnerability};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::shared::{Result, VexError};

/// IRI of the OpenVEX context this model implements.
pub const CONTEXT: &str = "https://openvex.dev/ns/v0.2.0";

/// Document-level metadata: identity, authorship, and the timestamps that
/// act as fallback issue times for statements without their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "@context", default, skip_serializing_if = "String::is_empty")]
    pub context: String,

    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooling: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

/// An OpenVEX document: metadata plus an ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<Statement>,
}

impl Document {
    /// Parses an OpenVEX document from its JSON representation.
    pub fn from_json(content: &str) -> Result<Self> {
        let document: Document =
            serde_json::from_str(content).context("Failed to parse OpenVEX document")?;
        Ok(document)
    }

    /// Loads an OpenVEX document from a file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VexError::DocumentNotFound {
                path: path.to_path_buf(),
                suggestion: "Check the path, or point --document at an OpenVEX JSON file"
                    .to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read VEX document: {}", path.display()))?;

        Self::from_json(&content).map_err(|e| {
            VexError::DocumentParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize OpenVEX document")
    }
}
