use clap::Parser;
use std::path::PathBuf;

/// Wire formats a queried document can come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    OpenVex,
    Csaf,
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openvex" | "vex" => Ok(DocumentFormat::OpenVex),
            "csaf" => Ok(DocumentFormat::Csaf),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'openvex' or 'csaf'",
                s
            )),
        }
    }
}

/// Query VEX documents for statements about a vulnerability and a product
#[derive(Parser, Debug)]
#[command(name = "vexquery")]
#[command(version)]
#[command(
    about = "Query VEX documents for statements about a vulnerability and a product",
    long_about = None
)]
pub struct Args {
    /// Path to the document to query
    #[arg(short, long)]
    pub document: PathBuf,

    /// Document format: openvex or csaf (defaults to openvex)
    #[arg(short, long)]
    pub format: Option<DocumentFormat>,

    /// Vulnerability identifier (CVE id, alias, or IRI)
    #[arg(short, long)]
    pub vuln: String,

    /// Product identifier (purl, IRI, or hash digest)
    #[arg(short, long)]
    pub product: Option<String>,

    /// Subcomponent identifier to narrow the query (can be repeated)
    #[arg(short, long = "subcomponent", value_name = "IDENTIFIER")]
    pub subcomponents: Vec<String>,

    /// Container image reference to expand into candidate product
    /// identifiers (must pin a digest)
    #[arg(long)]
    pub image: Option<String>,

    /// Operating system qualifier for image purls
    #[arg(long)]
    pub os: Option<String>,

    /// Architecture qualifier for image purls
    #[arg(long)]
    pub arch: Option<String>,

    /// Print every matching statement instead of only the latest
    #[arg(long)]
    pub all: bool,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a config file (defaults to vexquery.config.yml in the
    /// working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
