//! Page queries and the primary page source

use anyhow::Result;
use async_trait::async_trait;
use cg_core::paginate::{page_items, total_pages};
use cg_core::{PageItem, Record};
use hydrate::ViewModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// What the list view is currently asking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    /// Backend filter parameters (e.g. `status = "pending"`)
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Same filters, different page
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of primary records as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Record>,
    #[serde(default = "first_page")]
    pub page: u32,
    /// Zero when the backend only reports `total_items`
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
}

fn first_page() -> u32 {
    1
}

impl Page {
    /// A single page holding every record
    pub fn single(items: Vec<Record>) -> Self {
        Self {
            total_items: Some(items.len() as u64),
            items,
            page: 1,
            total_pages: 1,
        }
    }

    /// Page count, derived from `total_items` when not reported
    pub fn page_count(&self, page_size: u32) -> u32 {
        match (self.total_pages, self.total_items) {
            (0, Some(items)) => total_pages(items, page_size),
            (pages, _) => pages,
        }
    }
}

/// Primary record source for a list view
///
/// Errors here are hard failures: the whole page load fails and no
/// hydration is attempted.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page>;
}

/// A hydrated page ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct LoadedPage {
    /// Generation of the load that produced this page
    #[serde(skip)]
    pub ticket: crate::LoadTicket,
    pub items: Vec<ViewModel>,
    pub page: u32,
    pub total_pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    /// Pagination bar for this page
    pub pages: Vec<PageItem>,
}

impl LoadedPage {
    pub(crate) fn new(
        ticket: crate::LoadTicket,
        page: Page,
        items: Vec<ViewModel>,
        page_size: u32,
    ) -> Self {
        let total_pages = page.page_count(page_size);
        Self {
            ticket,
            items,
            page: page.page,
            total_pages,
            total_items: page.total_items,
            pages: page_items(page.page, total_pages),
        }
    }
}
