//! Print the page-number list for a pagination bar

use anyhow::{bail, Result};
use cg_core::{format_page_items, page_items};

pub async fn run(current: u32, total: u32) -> Result<()> {
    if current == 0 {
        bail!("Page numbers start at 1");
    }

    println!("{}", format_page_items(&page_items(current, total)));
    Ok(())
}
