//! Statement matching engine.
//!
//! Decides which statements of a VEX document apply to a queried
//! (vulnerability, product, subcomponents) tuple and resolves conflicts
//! between matching statements over time. All comparisons are byte-exact;
//! the only structural matching is the purl relation in the `purl` module.
//! Every function here is total: malformed input degrades to a non-match,
//! never an error.

use chrono::{DateTime, Utc};

use crate::document::{Component, Document, IdentifierType, Product, Statement, Vulnerability};
use crate::purl;

impl Component {
    /// Returns true if the identifier denotes this component.
    ///
    /// The main ID, the typed identifiers, and the hashes are checked
    /// independently; any single match is enough. Purl-typed entries also
    /// match through the general-vs-specific purl relation.
    pub fn matches(&self, identifier: &str) -> bool {
        if !self.id.is_empty() && self.id == identifier {
            return true;
        }

        // The component ID may itself be a purl acting as a pattern
        if purl::is_purl(&self.id) && purl::purl_matches(&self.id, identifier) {
            return true;
        }

        for (identifier_type, value) in &self.identifiers {
            if value == identifier {
                return true;
            }
            if *identifier_type == IdentifierType::Purl
                && purl::is_purl(identifier)
                && purl::purl_matches(value, identifier)
            {
                return true;
            }
        }

        self.hashes.values().any(|hash| hash.as_str() == identifier)
    }
}

impl Product {
    /// Returns true if the product answers a query for the given product
    /// and subcomponent identifiers.
    ///
    /// A product without declared subcomponents matches on its component
    /// alone: it makes no claim about its constituents. A product with
    /// declared subcomponents additionally requires the queried
    /// subcomponent to match one of them, so an empty subcomponent query
    /// never satisfies a product that lists subcomponents.
    pub fn matches(&self, identifier: &str, subidentifier: &str) -> bool {
        if !self.component.matches(identifier) {
            return false;
        }

        if self.subcomponents.is_empty() {
            return true;
        }

        self.subcomponents
            .iter()
            .any(|subcomponent| subcomponent.component.matches(subidentifier))
    }
}

impl Vulnerability {
    /// Returns true if the identifier equals the vulnerability's IRI, its
    /// canonical name, or any of its aliases.
    pub fn matches(&self, identifier: &str) -> bool {
        if !self.id.is_empty() && self.id == identifier {
            return true;
        }
        if !self.name.is_empty() && self.name == identifier {
            return true;
        }
        self.aliases.iter().any(|alias| alias == identifier)
    }
}

impl Statement {
    /// Returns true if the statement answers a query for the given
    /// vulnerability, product, and candidate subcomponent identifiers.
    pub fn matches(&self, vuln: &str, product: &str, subcomponents: &[String]) -> bool {
        if !self.vulnerability.matches(vuln) {
            return false;
        }

        self.products.iter().any(|p| {
            if subcomponents.is_empty() {
                p.matches(product, "")
            } else {
                subcomponents.iter().any(|sc| p.matches(product, sc))
            }
        })
    }

    fn effective_time(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.last_updated.or(self.timestamp).unwrap_or(fallback)
    }
}

/// Sorts statements ascending by effective time.
///
/// A statement's effective time is its last_updated timestamp, then its
/// issue timestamp, then the given fallback. The sort is stable, so
/// statements with equal effective times keep their relative order and the
/// later-declared one stays later, i.e. more authoritative.
pub fn sort_statements(statements: &mut [Statement], fallback: DateTime<Utc>) {
    statements.sort_by_key(|statement| statement.effective_time(fallback));
}

impl Document {
    /// Returns every statement matching the query, ordered ascending by
    /// effective time with the most authoritative statement last.
    ///
    /// Statements without their own timestamp inherit the document
    /// timestamp; the current time covers documents without one.
    pub fn find_matches(
        &self,
        vuln: &str,
        product: &str,
        subcomponents: &[String],
    ) -> Vec<Statement> {
        self.find_matches_at(vuln, product, subcomponents, Utc::now())
    }

    /// Like [`Document::find_matches`] with an explicit fallback instant
    /// for documents that carry no timestamp of their own.
    pub fn find_matches_at(
        &self,
        vuln: &str,
        product: &str,
        subcomponents: &[String],
        fallback: DateTime<Utc>,
    ) -> Vec<Statement> {
        let document_time = self.metadata.timestamp.unwrap_or(fallback);

        let mut matches: Vec<Statement> = self
            .statements
            .iter()
            .filter(|statement| statement.matches(vuln, product, subcomponents))
            .cloned()
            .collect();

        sort_statements(&mut matches, document_time);
        matches
    }

    /// Returns the statement that currently holds authority over the
    /// queried vulnerability and product, or None when nothing matches.
    pub fn find_latest(
        &self,
        vuln: &str,
        product: &str,
        subcomponents: &[String],
    ) -> Option<Statement> {
        self.find_matches(vuln, product, subcomponents).pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        Algorithm, HashValue, Metadata, Status, Subcomponent,
    };
    use chrono::TimeZone;

    fn component_with_id(id: &str) -> Component {
        Component {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn component_with_purl(purl: &str) -> Component {
        let mut component = Component::default();
        component
            .identifiers
            .insert(IdentifierType::Purl, purl.to_string());
        component
    }

    fn subcomponent(id: &str) -> Subcomponent {
        Subcomponent {
            component: component_with_id(id),
        }
    }

    #[test]
    fn test_component_matches_iri() {
        let component = component_with_id("https://example.com/document.spdx.json#node");
        assert!(component.matches("https://example.com/document.spdx.json#node"));
        assert!(!component.matches("https://example.com/other.spdx.json#node"));
    }

    #[test]
    fn test_component_empty_id_does_not_match_empty_query() {
        let component = Component::default();
        assert!(!component.matches(""));
    }

    #[test]
    fn test_component_matches_custom_identifier() {
        let mut component = Component::default();
        component.identifiers.insert(
            IdentifierType::Custom("customIdentifier".to_string()),
            "madeup-2023-12345".to_string(),
        );
        assert!(component.matches("madeup-2023-12345"));
        assert!(!component.matches("another-string"));
    }

    #[test]
    fn test_component_matches_same_purl() {
        let component = component_with_purl("pkg:apk/wolfi/curl@8.1.2-r0?arch=x86_64");
        assert!(component.matches("pkg:apk/wolfi/curl@8.1.2-r0?arch=x86_64"));
    }

    #[test]
    fn test_component_matches_globing_purl() {
        let component = component_with_purl("pkg:oci/curl");
        assert!(component.matches(
            "pkg:oci/curl@sha256:47fed8868b46b060efb8699dc40e981a0c785650223e03602d8c4493fc75b68c"
        ));
    }

    #[test]
    fn test_component_matches_globing_purl_inverse() {
        let component = component_with_purl(
            "pkg:oci/curl@sha256:47fed8868b46b060efb8699dc40e981a0c785650223e03602d8c4493fc75b68c",
        );
        assert!(!component.matches("pkg:oci/curl"));
    }

    #[test]
    fn test_component_id_as_purl_pattern() {
        let component = component_with_id("pkg:oci/curl");
        assert!(component.matches(
            "pkg:oci/curl@sha256:47fed8868b46b060efb8699dc40e981a0c785650223e03602d8c4493fc75b68c"
        ));
    }

    #[test]
    fn test_component_matches_hash() {
        let mut component = Component::default();
        component.hashes.insert(
            Algorithm::Sha1,
            HashValue::from("77d86e9752cb933569dfa1f693ee4338e65b28b4"),
        );
        assert!(component.matches("77d86e9752cb933569dfa1f693ee4338e65b28b4"));
    }

    #[test]
    fn test_component_does_not_match_wrong_hash() {
        let mut component = Component::default();
        component.hashes.insert(
            Algorithm::Sha1,
            HashValue::from("b5cc41d90d7ccc195c4a24ceb32656942c9854ea"),
        );
        assert!(!component.matches("77d86e9752cb933569dfa1f693ee4338e65b28b4"));
    }

    #[test]
    fn test_product_matches_identifier_only() {
        let product = Product {
            component: component_with_id("pkg:apk/alpine/libcrypto3@3.0.8-r3"),
            ..Default::default()
        };
        assert!(product.matches("pkg:apk/alpine/libcrypto3@3.0.8-r3", ""));
    }

    #[test]
    fn test_product_matches_generic_purl() {
        let product = Product {
            component: component_with_purl("pkg:apk/alpine/libcrypto3"),
            ..Default::default()
        };
        assert!(product.matches("pkg:apk/alpine/libcrypto3@3.0.8-r3", ""));
    }

    #[test]
    fn test_product_matches_with_subcomponent() {
        let product = Product {
            component: component_with_id(
                "pkg:oci/alpine@sha256%3A124c7d2707904eea7431fffe91522a01e5a861a624ee31d03372cc1d138a3126",
            ),
            subcomponents: vec![subcomponent("pkg:apk/alpine/libcrypto3@3.0.8-r3")],
        };
        assert!(product.matches(
            "pkg:oci/alpine@sha256%3A124c7d2707904eea7431fffe91522a01e5a861a624ee31d03372cc1d138a3126",
            "pkg:apk/alpine/libcrypto3@3.0.8-r3"
        ));
    }

    #[test]
    fn test_product_with_subcomponents_requires_subcomponent_query() {
        // Declared subcomponents and an empty subcomponent query never match
        let product = Product {
            component: component_with_id("pkg:oci/alpine@sha256%3A124c7d"),
            subcomponents: vec![subcomponent("pkg:apk/alpine/libcrypto3@3.0.8-r3")],
        };
        assert!(!product.matches("pkg:oci/alpine@sha256%3A124c7d", ""));
    }

    #[test]
    fn test_product_without_subcomponents_matches_any_subcomponent_query() {
        let product = Product {
            component: component_with_id("pkg:oci/alpine@sha256%3A124c7d"),
            subcomponents: vec![],
        };
        assert!(product.matches(
            "pkg:oci/alpine@sha256%3A124c7d",
            "pkg:apk/alpine/libcrypto3@3.0.8-r3"
        ));
    }

    #[test]
    fn test_product_matches_one_of_many_subcomponents() {
        let product = Product {
            component: component_with_id("pkg:oci/alpine@sha256%3A124c7d"),
            subcomponents: vec![
                subcomponent("pkg:apk/alpine/libcrypto3@3.0.8-r3"),
                subcomponent("pkg:apk/alpine/libssl3@3.0.8-r3"),
            ],
        };
        assert!(product.matches("pkg:oci/alpine@sha256%3A124c7d", "pkg:apk/alpine/libcrypto3@3.0.8-r3"));
        assert!(product.matches("pkg:oci/alpine@sha256%3A124c7d", "pkg:apk/alpine/libssl3@3.0.8-r3"));
        assert!(!product.matches("pkg:oci/alpine@sha256%3A124c7d", "pkg:apk/alpine/busybox@1.36.0-r9"));
    }

    #[test]
    fn test_product_primary_mismatch_fails() {
        let product = Product {
            component: component_with_id("pkg:oci/alpine@sha256%3A124c7d"),
            subcomponents: vec![subcomponent("pkg:apk/alpine/libcrypto3@3.0.8-r3")],
        };
        assert!(!product.matches("pkg:oci/debian@sha256%3Aabcdef", "pkg:apk/alpine/libcrypto3@3.0.8-r3"));
    }

    #[test]
    fn test_vulnerability_matches() {
        let vulnerability = Vulnerability {
            id: "https://example.com/vulns/CVE-2023-1255".to_string(),
            name: "CVE-2023-1255".to_string(),
            aliases: vec!["GHSA-xw78-pcr6-wrg8".to_string()],
            ..Default::default()
        };
        assert!(vulnerability.matches("CVE-2023-1255"));
        assert!(vulnerability.matches("https://example.com/vulns/CVE-2023-1255"));
        assert!(vulnerability.matches("GHSA-xw78-pcr6-wrg8"));
        assert!(!vulnerability.matches("CVE-2023-9999"));
        assert!(!vulnerability.matches(""));
    }

    fn statement_for(vuln: &str, product_id: &str) -> Statement {
        Statement {
            vulnerability: Vulnerability {
                name: vuln.to_string(),
                ..Default::default()
            },
            products: vec![Product {
                component: component_with_id(product_id),
                ..Default::default()
            }],
            status: Status::Affected,
            ..Default::default()
        }
    }

    #[test]
    fn test_statement_matches() {
        let statement = statement_for("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0");
        assert!(statement.matches("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[]));
        assert!(!statement.matches("CVE-2023-9999", "pkg:apk/wolfi/curl@8.1.2-r0", &[]));
        assert!(!statement.matches("CVE-2023-1255", "pkg:apk/wolfi/bash@5.2.15-r0", &[]));
    }

    #[test]
    fn test_statement_matches_with_subcomponent_candidates() {
        let statement = Statement {
            vulnerability: Vulnerability {
                name: "CVE-2023-1255".to_string(),
                ..Default::default()
            },
            products: vec![Product {
                component: component_with_id("pkg:oci/alpine@sha256%3A124c7d"),
                subcomponents: vec![subcomponent("pkg:apk/alpine/libcrypto3@3.0.8-r3")],
            }],
            status: Status::NotAffected,
            ..Default::default()
        };

        let candidates = vec![
            "pkg:apk/alpine/busybox@1.36.0-r9".to_string(),
            "pkg:apk/alpine/libcrypto3@3.0.8-r3".to_string(),
        ];
        assert!(statement.matches("CVE-2023-1255", "pkg:oci/alpine@sha256%3A124c7d", &candidates));

        // No candidate sub-identifier and declared subcomponents: no match
        assert!(!statement.matches("CVE-2023-1255", "pkg:oci/alpine@sha256%3A124c7d", &[]));
    }

    fn timestamped_statement(vuln: &str, product_id: &str, ts: &str) -> Statement {
        Statement {
            timestamp: Some(ts.parse().unwrap()),
            ..statement_for(vuln, product_id)
        }
    }

    fn three_statement_document() -> Document {
        Document {
            metadata: Metadata {
                timestamp: Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
            statements: vec![
                timestamped_statement(
                    "CVE-2023-1255",
                    "pkg:apk/wolfi/curl@8.1.2-r0",
                    "2023-02-01T00:00:00Z",
                ),
                timestamped_statement(
                    "CVE-2023-1255",
                    "pkg:apk/wolfi/curl@8.1.2-r0",
                    "2023-03-01T00:00:00Z",
                ),
                timestamped_statement(
                    "CVE-2023-1255",
                    "pkg:apk/wolfi/curl@8.1.2-r0",
                    "2023-02-15T00:00:00Z",
                ),
            ],
        }
    }

    #[test]
    fn test_find_matches_ascending_time_order() {
        let document = three_statement_document();
        let matches = document.find_matches("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[]);
        assert_eq!(matches.len(), 3);
        let times: Vec<_> = matches.iter().map(|s| s.timestamp.unwrap()).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn test_find_latest_returns_most_recent() {
        let document = three_statement_document();
        let latest = document
            .find_latest("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[])
            .unwrap();
        assert_eq!(
            latest.timestamp.unwrap(),
            "2023-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_find_matches_is_idempotent() {
        let document = three_statement_document();
        let first = document.find_matches("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[]);
        let second = document.find_matches("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_matches_tie_break_keeps_declaration_order() {
        // Statements without their own timestamp all fall back to the
        // document time; the later-declared one must sort last.
        let mut first = statement_for("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0");
        first.id = "first".to_string();
        let mut second = statement_for("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0");
        second.id = "second".to_string();

        let document = Document {
            metadata: Metadata {
                timestamp: Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
            statements: vec![first, second],
        };

        let matches = document.find_matches("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[]);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "first");
        assert_eq!(matches[1].id, "second");

        let latest = document
            .find_latest("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[])
            .unwrap();
        assert_eq!(latest.id, "second");
    }

    #[test]
    fn test_find_matches_uses_fallback_for_untimestamped_document() {
        let statement = statement_for("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0");
        let document = Document {
            statements: vec![statement],
            ..Default::default()
        };

        let fallback = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let matches = document.find_matches_at(
            "CVE-2023-1255",
            "pkg:apk/wolfi/curl@8.1.2-r0",
            &[],
            fallback,
        );
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_empty_document_returns_empty_results() {
        let document = Document::default();
        assert!(document
            .find_matches("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[])
            .is_empty());
        assert!(document
            .find_latest("CVE-2023-1255", "pkg:apk/wolfi/curl@8.1.2-r0", &[])
            .is_none());
    }

    #[test]
    fn test_find_matches_alias_query() {
        let mut document = three_statement_document();
        document.statements[1].vulnerability.aliases = vec!["GHSA-xw78-pcr6-wrg8".to_string()];

        let matches = document.find_matches("GHSA-xw78-pcr6-wrg8", "pkg:apk/wolfi/curl@8.1.2-r0", &[]);
        assert_eq!(matches.len(), 1);
    }
}
