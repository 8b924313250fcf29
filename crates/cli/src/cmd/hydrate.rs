//! Resolve a page of records against the fixture backend

use anyhow::{Context, Result};
use cg_core::format_page_items;
use cli_lib::config::AppConfig;
use cli_lib::fixtures::{self, PageFile};
use cli_lib::util;
use owo_colors::OwoColorize;
use session::{ListSession, PageQuery};
use std::path::Path;

pub async fn run(config: &AppConfig, screen: &str, page_path: &Path) -> Result<()> {
    // 1. Resolve screen
    config.validate().context("Invalid configuration")?;
    let screen = config.screen(screen)?;

    // 2. Load primary records
    let page = fixtures::read_page(page_path)?;
    let query = PageQuery::new(page.page, screen.page_size);

    // 3. Build session over the fixture backend
    let extractors = fixtures::extractors_for(screen, &config.backend.fixtures_dir);
    let session = ListSession::new(PageFile::new(page), extractors)
        .with_context(|| format!("Invalid relations for screen '{}'", screen.name))?;

    // 4. Hydrate
    let loaded = session.load(query).await.context("Failed to hydrate page")?;
    util::print_json(&loaded.items)?;

    // 5. Summary on stderr so stdout stays machine-readable
    if loaded.total_pages > 0 {
        eprintln!(
            "{} {} of {}: {}",
            "Page".bold(),
            loaded.page,
            loaded.total_pages,
            format_page_items(&loaded.pages)
        );
    }
    let stats = session.hydrator().stats();
    eprintln!(
        "{}",
        format!(
            "{} {} record(s), {} fetch(es), {} cache hit(s), {} soft miss(es)",
            loaded.items.len(),
            screen.primary,
            stats.fetches_issued,
            stats.cache_hits,
            stats.soft_failures
        )
        .dimmed()
    );

    Ok(())
}
