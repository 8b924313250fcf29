//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use cg_core::{parse_record, Record};
use serde::Serialize;
use std::path::Path;

/// Read a JSON object from disk as a record
pub fn read_record(path: &Path) -> Result<Record> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_record(&text).with_context(|| format!("Invalid record in {}", path.display()))
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}

/// Join field names for display, or "-" when there are none
pub fn format_fields(fields: &[String]) -> String {
    if fields.is_empty() {
        "-".to_string()
    } else {
        fields.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_record() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, r#"{"capacity": 12}"#).unwrap();
        std::fs::write(&bad, "[1, 2]").unwrap();

        assert_eq!(read_record(&good).unwrap()["capacity"], 12);
        let err = read_record(&bad).unwrap_err();
        assert!(format!("{:#}", err).contains("expected a JSON object"));
        assert!(read_record(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_format_fields() {
        assert_eq!(format_fields(&[]), "-");
        assert_eq!(
            format_fields(&["notes".to_string(), "phone".to_string()]),
            "notes, phone"
        );
    }
}
