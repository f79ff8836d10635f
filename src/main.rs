use std::path::Path;
use std::process;

use vexquery::cli::{Args, DocumentFormat};
use vexquery::config::{self, ConfigFile};
use vexquery::csaf::Csaf;
use vexquery::document::{Document, Statement};
use vexquery::matching::sort_statements;
use vexquery::oci;
use vexquery::shared::{ExitCode, Result, VexError};

use anyhow::Context;
use chrono::Utc;

fn main() {
    match run() {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn run() -> Result<ExitCode> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Load config: explicit path wins, otherwise discover in the
    // working directory
    let config = match &args.config {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(Path::new("."))?,
    };

    let format = resolve_format(&args, config.as_ref());
    let document = load_document(&args.document, format)?;

    let candidates = candidate_products(&args, config.as_ref())?;

    // Collect matches across all candidate product identifiers, then
    // re-sort so the merged list keeps ascending effective-time order
    let mut matches: Vec<Statement> = Vec::new();
    for candidate in &candidates {
        for statement in document.find_matches(&args.vuln, candidate, &args.subcomponents) {
            if !matches.contains(&statement) {
                matches.push(statement);
            }
        }
    }
    let document_time = document.metadata.timestamp.unwrap_or_else(Utc::now);
    sort_statements(&mut matches, document_time);

    let Some(latest) = matches.last() else {
        eprintln!(
            "No statements in {} match {} for the queried product",
            args.document.display(),
            args.vuln
        );
        return Ok(ExitCode::NoMatch);
    };

    let rendered = if args.all {
        serde_json::to_string_pretty(&matches)
    } else {
        serde_json::to_string_pretty(latest)
    }
    .context("Failed to serialize matching statements")?;

    present(&rendered, &args)?;

    Ok(ExitCode::Success)
}

fn resolve_format(args: &Args, config: Option<&ConfigFile>) -> DocumentFormat {
    if let Some(format) = args.format {
        return format;
    }
    // Config values are validated on load, so the parse cannot fail here
    config
        .and_then(|c| c.format.as_ref())
        .and_then(|f| f.parse().ok())
        .unwrap_or(DocumentFormat::OpenVex)
}

fn load_document(path: &Path, format: DocumentFormat) -> Result<Document> {
    match format {
        DocumentFormat::OpenVex => Document::open(path),
        DocumentFormat::Csaf => Ok(Csaf::open(path)?.to_vex()),
    }
}

/// Builds the list of candidate product identifiers to query: the
/// explicit --product plus everything a --image reference expands to.
fn candidate_products(args: &Args, config: Option<&ConfigFile>) -> Result<Vec<String>> {
    let mut candidates = Vec::new();

    if let Some(product) = &args.product {
        candidates.push(product.clone());
    }

    if let Some(image) = &args.image {
        let os = args
            .os
            .clone()
            .or_else(|| config.and_then(|c| c.os.clone()));
        let arch = args
            .arch
            .clone()
            .or_else(|| config.and_then(|c| c.arch.clone()));

        let bundle = oci::reference_identifiers(image, os.as_deref(), arch.as_deref())?;
        candidates.extend(bundle.to_string_slice());
    }

    if candidates.is_empty() {
        return Err(VexError::Validation {
            message: "either --product or --image is required".to_string(),
        }
        .into());
    }

    Ok(candidates)
}

fn present(rendered: &str, args: &Args) -> Result<()> {
    match &args.output {
        Some(path) => std::fs::write(path, rendered).map_err(|e| {
            VexError::FileWriteError {
                path: path.clone(),
                details: e.to_string(),
            }
            .into()
        }),
        None => {
            println!("{}", rendered);
            Ok(())
        }
    }
}
