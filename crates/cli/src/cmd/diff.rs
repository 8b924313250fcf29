//! Show the partial-update payload between two versions of a record

use anyhow::Result;
use cg_core::{cleared_fields, ChangeSet};
use cli_lib::{diff_utils, util};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub async fn run(original: &Path, updated: &Path, as_json: bool, context: usize) -> Result<()> {
    // 1. Load both versions
    let original = util::read_record(original)?;
    let updated = util::read_record(updated)?;

    // 2. Reduce to the payload that would be submitted
    let payload = ChangeSet::between(&original, &updated);
    let ignored = cleared_fields(&original, &updated);

    if as_json {
        return util::print_json(&json!({
            "payload": payload,
            "ignored_clears": ignored,
        }));
    }

    // 3. Display payload
    if payload.is_empty() {
        println!("{}", "No changes to submit".dimmed());
    } else {
        println!(
            "{} ({} field{})",
            "PATCH payload".bold(),
            payload.len(),
            if payload.len() == 1 { "" } else { "s" }
        );
        println!("{}", util::to_pretty_json(&payload)?);
    }

    if !ignored.is_empty() {
        println!();
        println!(
            "{} Cleared fields are not submitted: {}",
            "!".yellow(),
            util::format_fields(&ignored).yellow()
        );
    }

    // 4. Show what the record looks like once the payload lands
    if !payload.is_empty() {
        let applied = payload.apply_to(&original);
        println!();
        println!("{}", "Result".bold());
        print!("{}", diff_utils::record_diff(&original, &applied, context)?);
    }

    Ok(())
}
