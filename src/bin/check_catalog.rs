//! Check a translation catalog for gaps and mistakes.
//!
//! Usage:
//!   cargo run --bin check-catalog
//!
//! Validates the built-in catalog, or the JSON catalog at CATALOG_FILE when
//! set. Exits non-zero when the report contains errors.

use anyhow::{bail, Context, Result};
use portfolio_i18n::i18n::{builtin_catalog, Catalog, CatalogValidator};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_i18n=info".parse()?),
        )
        .init();

    let catalog = match std::env::var("CATALOG_FILE") {
        Ok(path) => {
            info!("Checking catalog file {}", path);
            Catalog::from_file(Path::new(&path))
                .with_context(|| format!("Failed to load catalog {}", path))?
        }
        Err(_) => {
            info!("Checking built-in catalog");
            builtin_catalog()
        }
    };

    let languages: Vec<String> = catalog.languages().map(|l| l.to_string()).collect();
    println!("Languages: {}", languages.join(", "));

    let report = CatalogValidator::validate(&catalog);

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    for error in &report.errors {
        println!("error: {}", error);
    }

    if report.has_errors() {
        bail!(
            "Catalog has {} error(s) and {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }

    if report.is_clean() {
        println!("Catalog is clean");
    } else {
        println!("Catalog has {} warning(s)", report.warnings.len());
    }
    Ok(())
}
