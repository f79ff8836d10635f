//! CSAF advisory support.
//!
//! Minimal model of a CSAF document: enough to walk the product tree,
//! look up products by identification helper, and convert the advisory's
//! product-status buckets into OpenVEX statements for querying.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::document::{
    self, Component, Document, Metadata, Product, Statement, Status, Vulnerability,
};
use crate::shared::{Result, VexError};

/// A parsed CSAF advisory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Csaf {
    #[serde(default)]
    pub document: DocumentMeta,
    #[serde(default)]
    pub product_tree: ProductTree,
    #[serde(default)]
    pub vulnerabilities: Vec<CsafVulnerability>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tracking: Tracking,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tracking {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub initial_release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_release_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductTree {
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// A node of the product tree. Branches nest arbitrarily deep; products
/// hang off any level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product: Option<ProductEntry>,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductEntry {
    #[serde(rename = "product_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "product_identification_helper", default)]
    pub identification_helper: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub product_reference: String,
    #[serde(default)]
    pub relates_to_product_reference: String,
    #[serde(default)]
    pub full_product_name: Option<ProductEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsafVulnerability {
    #[serde(default)]
    pub cve: String,
    #[serde(default)]
    pub ids: Vec<TrackingId>,
    /// Product ids bucketed by status, e.g. "known_not_affected"
    #[serde(default)]
    pub product_status: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingId {
    #[serde(default)]
    pub system_name: String,
    #[serde(default)]
    pub text: String,
}

impl Csaf {
    /// Parses a CSAF advisory from its JSON representation.
    pub fn from_json(content: &str) -> Result<Self> {
        let csaf: Csaf = serde_json::from_str(content).context("Failed to parse CSAF document")?;
        Ok(csaf)
    }

    /// Loads a CSAF advisory from a file.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CSAF document: {}", path.display()))?;

        Self::from_json(&content).map_err(|e| {
            VexError::CsafParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the id of the first product in the tree.
    pub fn first_product_name(&self) -> Option<String> {
        self.product_tree.find_first_product()
    }

    /// Converts the advisory into an OpenVEX document.
    ///
    /// Each (vulnerability, product-status bucket) pair becomes one
    /// statement. Products are resolved through the product tree: the purl
    /// identification helper is preferred, the opaque product id is kept
    /// as a fallback so queries by CSAF product id still work.
    pub fn to_vex(&self) -> Document {
        let timestamp = self
            .document
            .tracking
            .current_release_date
            .or(self.document.tracking.initial_release_date);

        let mut statements = Vec::new();
        for vulnerability in &self.vulnerabilities {
            if vulnerability.cve.is_empty() {
                continue;
            }

            for (bucket, product_ids) in &vulnerability.product_status {
                let Some(status) = status_from_bucket(bucket) else {
                    continue;
                };

                let products: Vec<Product> = product_ids
                    .iter()
                    .map(|product_id| self.resolve_product(product_id))
                    .collect();
                if products.is_empty() {
                    continue;
                }

                statements.push(Statement {
                    vulnerability: Vulnerability {
                        name: vulnerability.cve.clone(),
                        ..Default::default()
                    },
                    timestamp,
                    products,
                    status,
                    ..Default::default()
                });
            }
        }

        Document {
            metadata: Metadata {
                context: document::CONTEXT.to_string(),
                id: self.document.tracking.id.clone(),
                timestamp,
                version: 1,
                ..Default::default()
            },
            statements,
        }
    }

    fn resolve_product(&self, product_id: &str) -> Product {
        let mut component = Component {
            id: product_id.to_string(),
            ..Default::default()
        };
        if let Some(entry) = self.product_tree.find_product(product_id) {
            for (helper_type, value) in &entry.identification_helper {
                component
                    .identifiers
                    .insert(helper_type.clone().into(), value.clone());
            }
        }
        Product {
            component,
            ..Default::default()
        }
    }
}

impl ProductTree {
    /// Returns the id of the first product found in declaration order.
    pub fn find_first_product(&self) -> Option<String> {
        for branch in &self.branches {
            if let Some(product) = branch.list_products().first() {
                return Some(product.id.clone());
            }
        }
        None
    }

    /// Finds a product by its id anywhere in the tree.
    pub fn find_product(&self, product_id: &str) -> Option<&ProductEntry> {
        self.branches
            .iter()
            .flat_map(|branch| branch.list_products())
            .find(|product| product.id == product_id)
    }

    /// Finds the first product carrying the given identification helper,
    /// e.g. `find_product_identifier("purl", "pkg:golang/...")`.
    pub fn find_product_identifier(
        &self,
        helper_type: &str,
        value: &str,
    ) -> Option<&ProductEntry> {
        self.branches
            .iter()
            .flat_map(|branch| branch.list_products())
            .find(|product| {
                product
                    .identification_helper
                    .get(helper_type)
                    .is_some_and(|helper| helper == value)
            })
    }
}

impl Branch {
    /// Collects every product under this branch, depth first.
    pub fn list_products(&self) -> Vec<&ProductEntry> {
        let mut products = Vec::new();
        if let Some(product) = &self.product {
            products.push(product);
        }
        for branch in &self.branches {
            products.extend(branch.list_products());
        }
        products
    }
}

fn status_from_bucket(bucket: &str) -> Option<Status> {
    match bucket {
        "known_affected" => Some(Status::Affected),
        "known_not_affected" => Some(Status::NotAffected),
        "fixed" | "first_fixed" => Some(Status::Fixed),
        "under_investigation" => Some(Status::UnderInvestigation),
        _ => None,
    }
}
