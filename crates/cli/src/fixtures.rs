//! File-backed backend
//!
//! Stands in for the HTTP API when running from the command line. Entities
//! live at `<root>/<kind>/<id>.json` and hold either a bare record or a
//! `{ success, data, message }` envelope.

use crate::config::ScreenConfig;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use cg_core::{EntityId, EntityKind, Record};
use hydrate::{EntityFetcher, FetchResponse, RelationExtractor};
use serde_json::Value;
use session::{Page, PageQuery, PageSource};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Fetches entities of one kind from a fixture directory
#[derive(Debug, Clone)]
pub struct FixtureFetcher {
    dir: PathBuf,
}

impl FixtureFetcher {
    pub fn new(root: impl AsRef<Path>, kind: &EntityKind) -> Self {
        Self {
            dir: root.as_ref().join(kind.as_str()),
        }
    }

    /// Fixture file for an id, or None if the id cannot name a file
    pub fn path_for(&self, id: &EntityId) -> Option<PathBuf> {
        let id = id.as_str();
        if id.contains(['/', '\\']) || id == "." || id == ".." {
            return None;
        }
        Some(self.dir.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl EntityFetcher for FixtureFetcher {
    async fn fetch(&self, id: &EntityId) -> Result<FetchResponse> {
        let Some(path) = self.path_for(id) else {
            return Ok(FetchResponse::failure(format!("invalid id '{}'", id)));
        };

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No fixture at {}", path.display());
                return Ok(FetchResponse::failure(format!("{} not found", id)));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        decode_entity(value).with_context(|| format!("Invalid fixture {}", path.display()))
    }
}

/// Interpret a fixture document as a fetch response
fn decode_entity(value: Value) -> Result<FetchResponse> {
    match value {
        Value::Object(map) if map.get("success").map_or(false, Value::is_boolean) => {
            Ok(serde_json::from_value(Value::Object(map))?)
        }
        Value::Object(map) => Ok(FetchResponse::ok(map)),
        _ => bail!("expected a JSON object"),
    }
}

/// Bind a screen's relations to fixture fetchers under `root`
pub fn extractors_for(screen: &ScreenConfig, root: &Path) -> Vec<RelationExtractor> {
    screen
        .relations
        .iter()
        .map(|spec| {
            let fetcher = Arc::new(FixtureFetcher::new(root, &spec.kind));
            RelationExtractor::from_spec(spec.clone(), fetcher)
        })
        .collect()
}

/// Read a page file: a JSON array of records or a `Page` object
pub fn read_page(path: &Path) -> Result<Page> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page file {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match value {
        Value::Array(items) => {
            let records = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(record) => Ok(record),
                    _ => bail!("item {} of {} is not an object", i, path.display()),
                })
                .collect::<Result<Vec<Record>>>()?;
            Ok(Page::single(records))
        }
        Value::Object(_) => serde_json::from_value(value)
            .with_context(|| format!("Invalid page object in {}", path.display())),
        _ => bail!("{} must hold an array or a page object", path.display()),
    }
}

/// Page source that always serves one pre-loaded page
#[derive(Debug, Clone)]
pub struct PageFile {
    page: Page,
}

impl PageFile {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl PageSource for PageFile {
    async fn fetch_page(&self, _query: &PageQuery) -> Result<Page> {
        Ok(self.page.clone())
    }
}
