//! Hydrating a page against the fixture backend

use crate::common::TestBackend;
use anyhow::Result;
use serde_json::json;

fn reservations_page(backend: &TestBackend) -> Result<String> {
    backend.file(
        "page.json",
        json!({
            "items": [
                {"id": "r1", "facility_id": "f1", "user_id": "u1"},
                {"id": "r2", "facility_id": "f2", "user_id": "u2"},
                {"id": "r3", "facility_id": "f1", "user_id": "u1"},
                {"id": "r4", "facility_id": "f9", "user_id": ""}
            ],
            "page": 1,
            "total_items": 7
        }),
    )
}

#[test]
fn test_hydrate_resolves_relations() -> Result<()> {
    let backend = TestBackend::reservations()?;
    let page = reservations_page(&backend)?;
    let config = backend.config_path();

    let result = crate::concierge!(
        backend.path(),
        "--config",
        config.to_str().unwrap(),
        "hydrate",
        "--screen",
        "reservations",
        page.as_str()
    )
    .assert_success()?;

    let views = result.json()?;
    let views = views.as_array().unwrap();
    assert_eq!(views.len(), 4);

    // Direct and transitive relations
    assert_eq!(views[0]["facility"]["name"], json!("Gym"));
    assert_eq!(views[0]["user"]["name"], json!("Ada"));
    assert_eq!(views[0]["building"]["name"], json!("North Hall"));
    assert_eq!(views[1]["building"]["name"], json!("North Hall"));

    // Soft misses leave the relation unset
    assert!(views[1].get("user").is_none());
    assert!(views[3].get("facility").is_none());
    assert!(views[3].get("building").is_none());

    // Primary fields pass through untouched
    assert_eq!(views[2]["id"], json!("r3"));
    assert_eq!(views[2]["facility_id"], json!("f1"));

    Ok(())
}

#[test]
fn test_hydrate_reports_deduplicated_fetches() -> Result<()> {
    let backend = TestBackend::reservations()?;
    let page = reservations_page(&backend)?;

    // Config discovered from the working directory
    let result = crate::concierge!(backend.path(), "hydrate", "-s", "reservations", page.as_str())
        .assert_success()?;

    // f1, f2, f9, u1, u2, then b1 once for both facilities
    assert!(result.contains_stderr("4 reservations record(s)"));
    assert!(result.contains_stderr("6 fetch(es)"));
    assert!(result.contains_stderr("2 soft miss(es)"));
    assert!(result.contains_stderr("1 of 4: 1 2 3 4"));

    Ok(())
}

#[test]
fn test_hydrate_accepts_plain_array() -> Result<()> {
    let backend = TestBackend::reservations()?;
    let page = backend.file(
        "rows.json",
        json!([{"id": "r1", "facility_id": "f2", "user_id": "u1"}]),
    )?;

    let result = crate::concierge!(backend.path(), "hydrate", "--screen", "reservations", page.as_str())
        .assert_success()?;

    let views = result.json()?;
    assert_eq!(views[0]["facility"]["name"], json!("Pool"));
    assert!(result.contains_stderr("1 of 1"));

    Ok(())
}

#[test]
fn test_hydrate_unknown_screen_fails() -> Result<()> {
    let backend = TestBackend::reservations()?;
    let page = reservations_page(&backend)?;

    let result = crate::concierge!(backend.path(), "hydrate", "--screen", "invoices", page.as_str())
        .assert_failure()?;

    assert!(result.contains_stderr("unknown screen 'invoices'"));
    Ok(())
}

#[test]
fn test_hydrate_missing_page_file_fails() -> Result<()> {
    let backend = TestBackend::reservations()?;

    let result = crate::concierge!(
        backend.path(),
        "hydrate",
        "--screen",
        "reservations",
        "absent.json"
    )
    .assert_failure()?;

    assert!(result.contains_stderr("Failed to read page file"));
    Ok(())
}
