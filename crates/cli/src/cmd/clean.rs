//! Strip empty fields from a record

use anyhow::Result;
use cg_core::remove_empty_fields;
use cli_lib::util;
use std::path::Path;

pub async fn run(path: &Path) -> Result<()> {
    let record = util::read_record(path)?;
    util::print_json(&remove_empty_fields(&record))
}
