//! Configuration commands and the page-number list

use crate::common::fixtures::RESERVATIONS_CONFIG;
use crate::common::TestBackend;
use anyhow::Result;

#[test]
fn test_config_check_valid() -> Result<()> {
    let backend = TestBackend::with_config(RESERVATIONS_CONFIG)?;

    let result = crate::concierge!(backend.path(), "config", "check").assert_success()?;

    assert!(result.contains_stdout("Configuration is valid (1 screen(s), 3 relation(s))"));
    Ok(())
}

#[test]
fn test_config_check_reports_bad_relation() -> Result<()> {
    let backend = TestBackend::with_config(
        r#"
[[screens]]
name = "reservations"
primary = "reservations"

[[screens.relations]]
field = "building"
kind = "buildings"
foreign_key = "building_id"
through = "facility"
"#,
    )?;

    let result = crate::concierge!(backend.path(), "config", "check").assert_failure()?;

    assert!(result.contains_stderr("screen 'reservations': invalid relations"));
    Ok(())
}

#[test]
fn test_config_check_reports_bad_page_size() -> Result<()> {
    let backend = TestBackend::with_config(
        "[[screens]]\nname = \"users\"\nprimary = \"users\"\npage_size = 0\n",
    )?;

    let result = crate::concierge!(backend.path(), "config", "check").assert_failure()?;

    assert!(result.contains_stderr("page_size 0 is out of range"));
    Ok(())
}

#[test]
fn test_config_list_shows_relations() -> Result<()> {
    let backend = TestBackend::with_config(RESERVATIONS_CONFIG)?;
    let config = backend.config_path();

    let result = crate::concierge!(
        backend.path(),
        "--config",
        config.to_str().unwrap(),
        "config",
        "list"
    )
    .assert_success()?;

    assert!(result.contains_stdout("reservations"));
    assert!(result.contains_stdout("via facility.building_id"));
    assert!(result.contains_stdout("via record.user_id"));
    Ok(())
}

#[test]
fn test_config_path_prefers_local_file() -> Result<()> {
    let backend = TestBackend::with_config(RESERVATIONS_CONFIG)?;

    let result = crate::concierge!(backend.path(), "config", "path").assert_success()?;

    assert_eq!(result.stdout.trim(), "concierge.toml");
    Ok(())
}

#[test]
fn test_config_example_round_trips() -> Result<()> {
    let backend = TestBackend::with_config("")?;

    let example = crate::concierge!(backend.path(), "config", "example").assert_success()?;
    let written = TestBackend::with_config(&example.stdout)?;

    crate::concierge!(written.path(), "config", "check").assert_success()?;
    Ok(())
}

#[test]
fn test_pages_with_ellipses() -> Result<()> {
    let backend = TestBackend::with_config("")?;

    let result =
        crate::concierge!(backend.path(), "pages", "--current", "5", "--total", "10").assert_success()?;
    assert_eq!(result.stdout.trim(), "1 … 4 5 6 … 10");

    let result =
        crate::concierge!(backend.path(), "pages", "--current", "1", "--total", "5").assert_success()?;
    assert_eq!(result.stdout.trim(), "1 2 3 4 5");

    Ok(())
}

#[test]
fn test_pages_rejects_page_zero() -> Result<()> {
    let backend = TestBackend::with_config("")?;

    crate::concierge!(backend.path(), "pages", "--current", "0", "--total", "3").assert_failure()?;
    Ok(())
}
