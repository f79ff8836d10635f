use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier types recognized on a component.
///
/// Known types get a dedicated variant so callers can switch on them;
/// anything else is carried through as a custom string. Stored in a
/// BTreeMap so iteration order is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdentifierType {
    /// Package URL (pkg:...)
    Purl,
    /// CPE 2.2 URI binding
    Cpe22,
    /// CPE 2.3 formatted string binding
    Cpe23,
    /// Any other identifier type
    Custom(String),
}

impl IdentifierType {
    pub fn as_str(&self) -> &str {
        match self {
            IdentifierType::Purl => "purl",
            IdentifierType::Cpe22 => "cpe22",
            IdentifierType::Cpe23 => "cpe23",
            IdentifierType::Custom(s) => s,
        }
    }
}

impl From<String> for IdentifierType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "purl" => IdentifierType::Purl,
            "cpe22" => IdentifierType::Cpe22,
            "cpe23" => IdentifierType::Cpe23,
            _ => IdentifierType::Custom(s),
        }
    }
}

impl From<IdentifierType> for String {
    fn from(t: IdentifierType) -> String {
        t.as_str().to_string()
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hashing algorithms recognized on a component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2s256,
    Blake2b256,
    Blake2b512,
    Blake3,
    /// Any other algorithm
    Custom(String),
}

impl Algorithm {
    pub fn as_str(&self) -> &str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha-256",
            Algorithm::Sha384 => "sha-384",
            Algorithm::Sha512 => "sha-512",
            Algorithm::Sha3_256 => "sha3-256",
            Algorithm::Sha3_384 => "sha3-384",
            Algorithm::Sha3_512 => "sha3-512",
            Algorithm::Blake2s256 => "blake2s-256",
            Algorithm::Blake2b256 => "blake2b-256",
            Algorithm::Blake2b512 => "blake2b-512",
            Algorithm::Blake3 => "blake3",
            Algorithm::Custom(s) => s,
        }
    }
}

impl From<String> for Algorithm {
    fn from(s: String) -> Self {
        match s.as_str() {
            "md5" => Algorithm::Md5,
            "sha1" => Algorithm::Sha1,
            "sha-256" => Algorithm::Sha256,
            "sha-384" => Algorithm::Sha384,
            "sha-512" => Algorithm::Sha512,
            "sha3-256" => Algorithm::Sha3_256,
            "sha3-384" => Algorithm::Sha3_384,
            "sha3-512" => Algorithm::Sha3_512,
            "blake2s-256" => Algorithm::Blake2s256,
            "blake2b-256" => Algorithm::Blake2b256,
            "blake2b-512" => Algorithm::Blake2b512,
            "blake3" => Algorithm::Blake3,
            _ => Algorithm::Custom(s),
        }
    }
}

impl From<Algorithm> for String {
    fn from(a: Algorithm) -> String {
        a.as_str().to_string()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hash digest value, treated as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(String);

impl HashValue {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HashValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HashValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A software artifact reference.
///
/// A component can be pointed at by its main identifier (an IRI, which may
/// itself be a purl), by typed software identifiers, or by hash digests of
/// its content. Any one of the three is enough to identify it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Main identifier of the component (IRI or purl)
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Software identifiers keyed by type (purl, cpe, custom types)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identifiers: BTreeMap<IdentifierType, String>,

    /// Content hashes keyed by algorithm
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hashes: BTreeMap<Algorithm, HashValue>,
}

/// A constituent of a product, for example a package inside a
/// container image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcomponent {
    #[serde(flatten)]
    pub component: Component,
}

/// A piece of software a statement makes a claim about: a component plus
/// the subcomponents the claim may be narrowed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub component: Component,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcomponents: Vec<Subcomponent>,
}
