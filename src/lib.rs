//! vexquery - VEX statement-matching engine
//!
//! This library loads OpenVEX documents (or CSAF advisories converted on
//! load) and answers the question "which statements apply to this
//! vulnerability and this product?", resolving conflicts between matching
//! statements by their effective time.
//!
//! # Modules
//!
//! - **`document`**: OpenVEX document model and JSON load/serialize
//! - **`matching`**: the matching engine and document resolver
//! - **`purl`**: general-vs-specific package URL comparison
//! - **`csaf`**: CSAF advisory model and conversion to OpenVEX
//! - **`oci`**: identifier bundles for digest-pinned container images
//! - **`shared`**: common error types and the `Result` alias
//!
//! # Example
//!
//! ```no_run
//! use vexquery::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<()> {
//! let document = Document::open(Path::new("vex.json"))?;
//!
//! // Everything we know about CVE-2023-1255 and this package
//! let matches = document.find_matches(
//!     "CVE-2023-1255",
//!     "pkg:apk/wolfi/curl@8.1.2-r0",
//!     &[],
//! );
//!
//! // The statement that currently holds authority
//! if let Some(latest) = document.find_latest(
//!     "CVE-2023-1255",
//!     "pkg:apk/wolfi/curl@8.1.2-r0",
//!     &[],
//! ) {
//!     println!("{}: {}", latest.vulnerability.name, latest.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod csaf;
pub mod document;
pub mod matching;
pub mod oci;
pub mod purl;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::csaf::Csaf;
    pub use crate::document::{
        Algorithm, Component, Document, HashValue, IdentifierType, Justification, Metadata,
        Product, Statement, Status, Subcomponent, Vulnerability,
    };
    pub use crate::matching::sort_statements;
    pub use crate::oci::{reference_identifiers, IdentifiersBundle, ImageReference};
    pub use crate::purl::{is_purl, purl_matches};
    pub use crate::shared::{ExitCode, Result, VexError};
}
