//! Container image identifier bundles.
//!
//! Expands a digest-pinned image reference into the purl and hash
//! candidates a caller can feed into document queries. References that do
//! not pin a digest are rejected: resolving a tag would require talking to
//! the registry, which this crate does not do.

use anyhow::anyhow;
use packageurl::PackageUrl;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::document::{Algorithm, HashValue, IdentifierType};
use crate::shared::{Result, VexError};

const DEFAULT_REGISTRY: &str = "docker.io";
const DEFAULT_NAMESPACE: &str = "library";

/// Software identifiers and hashes collected for one artifact, keyed the
/// same way a component keys them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifiersBundle {
    pub identifiers: BTreeMap<IdentifierType, Vec<String>>,
    pub hashes: BTreeMap<Algorithm, Vec<HashValue>>,
}

impl IdentifiersBundle {
    /// Flattens all identifiers and hashes into one sorted string list.
    pub fn to_string_slice(&self) -> Vec<String> {
        let mut all = Vec::new();
        for values in self.identifiers.values() {
            all.extend(values.iter().cloned());
        }
        for hashes in self.hashes.values() {
            all.extend(hashes.iter().map(|h| h.as_str().to_string()));
        }
        all.sort();
        all
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.values().all(Vec::is_empty) && self.hashes.values().all(Vec::is_empty)
    }
}

/// A parsed container image reference of the form
/// `[registry/]repository[:tag][@sha256:digest]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub registry: String,
    /// Repository path including the image name, e.g. `wolfi/curl`
    pub repository: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl ImageReference {
    /// Last segment of the repository path.
    pub fn name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }

    /// Registry plus the repository path without the image name, the way
    /// purl `repository_url` qualifiers spell it.
    pub fn repository_url(&self) -> String {
        match self.repository.rsplit_once('/') {
            Some((prefix, _)) => format!("{}/{}", self.registry, prefix),
            None => self.registry.clone(),
        }
    }
}

impl FromStr for ImageReference {
    type Err = VexError;

    fn from_str(reference: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = |reason: &str| VexError::InvalidImageReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
            hint: "Use a reference like registry.example.com/repo/image@sha256:<digest>"
                .to_string(),
        };

        if reference.is_empty() {
            return Err(invalid("reference is empty"));
        }

        let (base, digest) = match reference.split_once('@') {
            Some((base, digest)) => {
                if !digest.starts_with("sha256:") || digest.len() <= "sha256:".len() {
                    return Err(invalid("digest must be of the form sha256:<hex>"));
                }
                (base, Some(digest.to_string()))
            }
            None => (reference, None),
        };

        // A colon in the last path segment separates the tag
        let (repo_part, tag) = match base.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') => (repo, Some(tag.to_string())),
            _ => (base, None),
        };

        if repo_part.is_empty() {
            return Err(invalid("reference has no repository"));
        }

        // The first segment is a registry host only if it looks like one
        let (registry, repository) = match repo_part.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (first.to_string(), rest.to_string())
            }
            Some(_) => (DEFAULT_REGISTRY.to_string(), repo_part.to_string()),
            None => (
                DEFAULT_REGISTRY.to_string(),
                format!("{}/{}", DEFAULT_NAMESPACE, repo_part),
            ),
        };

        if repository.is_empty() {
            return Err(invalid("reference has no repository"));
        }

        Ok(ImageReference {
            registry,
            repository,
            tag,
            digest,
        })
    }
}

/// Expands an image reference into the identifiers that can match a VEX
/// product: the image digest as a sha-256 hash plus purl variants with and
/// without qualifiers. The qualified variant carries everything known
/// about the reference (repository_url, tag, os, arch) to match documents
/// with more specific purls.
pub fn reference_identifiers(
    reference: &str,
    os: Option<&str>,
    arch: Option<&str>,
) -> Result<IdentifiersBundle> {
    let image_ref: ImageReference = reference.parse()?;

    let Some(digest) = image_ref.digest.clone() else {
        return Err(VexError::InvalidImageReference {
            reference: reference.to_string(),
            reason: "reference does not pin a digest".to_string(),
            hint: "Resolving a tag requires registry access; pass repo@sha256:<digest> instead"
                .to_string(),
        }
        .into());
    };

    let mut bundle = IdentifiersBundle::default();
    bundle
        .hashes
        .entry(Algorithm::Sha256)
        .or_default()
        .push(HashValue::from(digest.trim_start_matches("sha256:")));

    let purls = image_purl_variants(
        &image_ref.repository_url(),
        image_ref.name(),
        &digest,
        image_ref.tag.as_deref(),
        os,
        arch,
    )?;
    bundle
        .identifiers
        .entry(IdentifierType::Purl)
        .or_default()
        .extend(purls);

    Ok(bundle)
}

/// Builds the purl variants for one image: a bare name@digest purl and a
/// second one qualified with everything known about the reference.
fn image_purl_variants(
    repository_url: &str,
    name: &str,
    digest: &str,
    tag: Option<&str>,
    os: Option<&str>,
    arch: Option<&str>,
) -> Result<Vec<String>> {
    let mut purl =
        PackageUrl::new("oci", name.to_string()).map_err(|e| anyhow!("building oci purl: {}", e))?;
    purl.with_version(digest.to_string());

    let mut purls = vec![purl.to_string()];

    let mut qualifiers: Vec<(&str, String)> = Vec::new();
    if !repository_url.is_empty() {
        qualifiers.push((
            "repository_url",
            repository_url.trim_end_matches('/').to_string(),
        ));
    }
    if let Some(tag) = tag {
        qualifiers.push(("tag", tag.to_string()));
    }
    if let Some(os) = os {
        qualifiers.push(("os", os.to_string()));
    }
    if let Some(arch) = arch {
        qualifiers.push(("arch", arch.to_string()));
    }

    for (key, value) in qualifiers {
        purl.add_qualifier(key, value)
            .map_err(|e| anyhow!("adding purl qualifier: {}", e))?;
    }
    purls.push(purl.to_string());

    Ok(purls)
}
