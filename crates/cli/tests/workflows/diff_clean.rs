//! Payload reduction and record cleaning

use crate::common::TestBackend;
use anyhow::Result;
use serde_json::json;

const NO_SCREENS: &str = "[logging]\nlevel = \"warn\"\n";

#[test]
fn test_diff_json_payload() -> Result<()> {
    let backend = TestBackend::with_config(NO_SCREENS)?;
    let original = backend.file(
        "original.json",
        json!({"name": "Room A", "capacity": 10, "notes": "Bring ID"}),
    )?;
    let updated = backend.file(
        "updated.json",
        json!({"name": "Room A", "capacity": 12, "notes": ""}),
    )?;

    let result = crate::concierge!(
        backend.path(),
        "diff",
        original.as_str(),
        updated.as_str(),
        "--json"
    )
    .assert_success()?;

    assert_eq!(
        result.json()?,
        json!({"payload": {"capacity": 12}, "ignored_clears": ["notes"]})
    );
    Ok(())
}

#[test]
fn test_diff_shows_payload_and_result() -> Result<()> {
    let backend = TestBackend::with_config(NO_SCREENS)?;
    let original = backend.file("original.json", json!({"name": "Room A", "capacity": 10}))?;
    let updated = backend.file("updated.json", json!({"name": "Room A", "capacity": 12}))?;

    let result = crate::concierge!(backend.path(), "diff", original.as_str(), updated.as_str())
        .assert_success()?;

    assert!(result.contains_stdout("PATCH payload"));
    assert!(result.contains_stdout("1 field)"));
    assert!(result.contains_stdout("\"capacity\": 12"));
    assert!(result.contains_stdout("-  \"capacity\": 10,"));
    assert!(result.contains_stdout("+  \"capacity\": 12,"));
    Ok(())
}

#[test]
fn test_diff_without_changes() -> Result<()> {
    let backend = TestBackend::with_config(NO_SCREENS)?;
    let original = backend.file("original.json", json!({"capacity": 12, "phone": "555-0100"}))?;
    // Same value, different numeric form, plus a cleared field
    let updated = backend.file("updated.json", json!({"capacity": 12.0, "phone": null}))?;

    let result = crate::concierge!(backend.path(), "diff", original.as_str(), updated.as_str())
        .assert_success()?;

    assert!(result.contains_stdout("No changes to submit"));
    assert!(result.contains_stdout("Cleared fields are not submitted"));
    assert!(result.contains_stdout("phone"));
    assert!(!result.contains_stdout("PATCH payload"));
    Ok(())
}

#[test]
fn test_diff_rejects_non_object() -> Result<()> {
    let backend = TestBackend::with_config(NO_SCREENS)?;
    let original = backend.file("original.json", json!([1, 2, 3]))?;
    let updated = backend.file("updated.json", json!({"capacity": 12}))?;

    let result = crate::concierge!(backend.path(), "diff", original.as_str(), updated.as_str())
        .assert_failure()?;

    assert!(result.contains_stderr("expected a JSON object"));
    Ok(())
}

#[test]
fn test_clean_strips_empty_fields() -> Result<()> {
    let backend = TestBackend::with_config(NO_SCREENS)?;
    let record = backend.file(
        "record.json",
        json!({
            "name": "Room A",
            "notes": "",
            "owner": null,
            "tags": [],
            "address": {"street": "", "city": "Oslo"},
            "meta": {"legacy": null},
            "capacity": 0
        }),
    )?;

    let result = crate::concierge!(backend.path(), "clean", record.as_str()).assert_success()?;

    assert_eq!(
        result.json()?,
        json!({"name": "Room A", "address": {"city": "Oslo"}, "capacity": 0})
    );
    Ok(())
}
