//! Render a page fixture through both initialization phases.
//!
//! Usage:
//!   cargo run -- [LANG]     # optionally switch to LANG after startup
//!
//! Required environment variables:
//! - PAGE_FIXTURE (JSON element tree of the page)
//!
//! Optional:
//! - NAVBAR_FIXTURE (JSON element tree injected into the body before phase two)
//! - PAGE_URL (defaults to https://giorgiovigna.com/index.html)
//! - PREFERENCES_FILE (defaults to data/preferences.json)
//! - CATALOG_FILE (JSON catalog; defaults to the built-in strings)
//! - LANG_STORAGE_KEY, LANG_QUERY_PARAM, DRAG_THRESHOLD_PX, ADMIN_* (see config)

use anyhow::{Context, Result};
use portfolio_i18n::browser::{Browser, FileStore, MemoryHistory};
use portfolio_i18n::config::Config;
use portfolio_i18n::dom::{Document, ElementSpec, MemoryDocument};
use portfolio_i18n::i18n::{builtin_catalog, Catalog};
use portfolio_i18n::lifecycle::PageSession;
use portfolio_i18n::switcher::SwitchOutcome;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Inputs of the command line renderer
struct CliConfig {
    page_fixture: String,
    navbar_fixture: Option<String>,
    page_url: String,
    preferences_file: String,
    catalog_file: Option<String>,
}

impl CliConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            page_fixture: std::env::var("PAGE_FIXTURE").context("PAGE_FIXTURE not set")?,
            navbar_fixture: std::env::var("NAVBAR_FIXTURE").ok(),
            page_url: std::env::var("PAGE_URL")
                .unwrap_or_else(|_| "https://giorgiovigna.com/index.html".to_string()),
            preferences_file: std::env::var("PREFERENCES_FILE")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),
            catalog_file: std::env::var("CATALOG_FILE").ok(),
        })
    }
}

fn load_catalog(path: Option<&str>) -> Result<Catalog> {
    match path {
        Some(path) => {
            info!("Loading catalog from {}", path);
            Catalog::from_file(Path::new(path)).with_context(|| format!("Failed to load catalog {}", path))
        }
        None => Ok(builtin_catalog()),
    }
}

fn load_document(path: &str) -> Result<MemoryDocument> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read page fixture {}", path))?;
    MemoryDocument::from_json(&json).with_context(|| format!("Invalid page fixture {}", path))
}

fn inject_navbar(session: &mut PageSession, path: &str) -> Result<()> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read navbar fixture {}", path))?;
    let navbar: ElementSpec =
        serde_json::from_str(&json).with_context(|| format!("Invalid navbar fixture {}", path))?;

    let document = session.browser_mut().document.as_mut();
    let body = document.body().context("Page fixture has no <body>")?;
    document
        .append_fragment(body, &navbar)
        .context("Failed to inject navigation bar")?;
    info!("Injected navigation bar from {}", path);
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let cli = CliConfig::from_env()?;

    let catalog = load_catalog(cli.catalog_file.as_deref())?;
    let document = load_document(&cli.page_fixture)?;
    let history = MemoryHistory::parse(&cli.page_url)?;
    let store = FileStore::new(&cli.preferences_file);
    let browser = Browser::new(document, store, history);

    let mut session = PageSession::new(&config, browser, catalog);

    // Phase 1: the page's own markup
    let report = session.init_core();
    info!("Core pass: {} updated, {} unchanged", report.updated, report.unchanged);

    // Phase 2: after the navigation bar arrives
    if let Some(path) = &cli.navbar_fixture {
        inject_navbar(&mut session, path)?;
    }
    let report = session.init_navbar();
    info!("Full pass: {} updated, {} unchanged", report.updated, report.unchanged);

    if let Some(code) = std::env::args().nth(1) {
        match session.switch_language(&code) {
            SwitchOutcome::Switched(language) => info!("Switched to {}", language.native_name()),
            SwitchOutcome::Unchanged => info!("Already showing '{}'", code),
            SwitchOutcome::Rejected => warn!("Unsupported language '{}'", code),
        }
    }

    let browser = session.into_browser();
    let snapshot = browser.document.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!("{}", browser.history.location());
    Ok(())
}
