//! Package URL comparison.
//!
//! Implements the general-vs-specific matching relation used to decide
//! whether a purl found in a document covers a queried purl.

use packageurl::PackageUrl;
use std::collections::HashMap;
use std::str::FromStr;

/// Scheme prefix that marks an identifier string as a package URL.
pub const PURL_SCHEME_PREFIX: &str = "pkg:";

/// Returns true when the identifier looks like a package URL.
pub fn is_purl(identifier: &str) -> bool {
    identifier.starts_with(PURL_SCHEME_PREFIX)
}

/// Returns true if `general` matches the more specific `specific` purl.
///
/// All segments of the purl are taken into account, including qualifiers.
/// `general` is considered to be the more general of the two, so:
///
/// - If `general` has no version, it matches any version in `specific`.
/// - Every qualifier on `general` must be present with the same value on
///   `specific`; `specific` may carry any number of extra qualifiers and
///   still match.
/// - If either purl fails to parse, the result is false, never an error.
///
/// The relation is asymmetric: swapping the arguments can change the
/// result. Purl version ranges are not supported.
pub fn purl_matches(general: &str, specific: &str) -> bool {
    let Ok(general) = PackageUrl::from_str(general) else {
        return false;
    };
    let Ok(specific) = PackageUrl::from_str(specific) else {
        return false;
    };

    if general.ty() != specific.ty() {
        return false;
    }

    if general.namespace().unwrap_or("") != specific.namespace().unwrap_or("") {
        return false;
    }

    if general.name() != specific.name() {
        return false;
    }

    let general_version = general.version().unwrap_or("");
    let specific_version = specific.version().unwrap_or("");
    if !general_version.is_empty() && specific_version.is_empty() {
        return false;
    }
    if !general_version.is_empty()
        && !specific_version.is_empty()
        && general_version != specific_version
    {
        return false;
    }

    // All qualifiers on the general purl must be present on the specific one
    let specific_qualifiers: HashMap<&str, &str> = specific
        .qualifiers()
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();

    for (key, value) in general.qualifiers().iter() {
        match specific_qualifiers.get(key.as_ref()) {
            Some(found) if *found == value.as_ref() => {}
            _ => return false,
        }
    }

    true
}
