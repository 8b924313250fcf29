//! Page-number formatting for paginated lists

use serde::Serialize;
use std::fmt;

/// Lists with at most this many pages are shown in full
const FULL_LIST_LIMIT: u32 = 7;

/// One slot in a pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    /// A clickable page number (1-based)
    Page(u32),
    /// A run of hidden pages
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

/// Build the page-number list for a pagination bar
///
/// Always shows the first page, the last page and the neighbours of
/// `current`. A hidden run of a single page is shown instead of an ellipsis.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total);

    if total <= FULL_LIST_LIMIT {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut anchors = vec![1, total];
    anchors.extend(current.saturating_sub(1).max(1)..=current.saturating_add(1).min(total));
    anchors.sort_unstable();
    anchors.dedup();

    let mut items = Vec::with_capacity(anchors.len() + 2);
    let mut previous: Option<u32> = None;

    for page in anchors {
        if let Some(prev) = previous {
            match page - prev {
                1 => {}
                2 => items.push(PageItem::Page(prev + 1)),
                _ => items.push(PageItem::Ellipsis),
            }
        }
        items.push(PageItem::Page(page));
        previous = Some(page);
    }

    items
}

/// Number of pages needed for `total_items` at `page_size` per page
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Render items as a space-separated bar, e.g. `1 … 4 5 6 … 10`
pub fn format_page_items(items: &[PageItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
