//! On-disk backend fixtures for CLI tests

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Reservations screen joined to facilities, users and buildings
pub const RESERVATIONS_CONFIG: &str = r#"
[backend]
fixtures_dir = "fixtures"

[[screens]]
name = "reservations"
primary = "reservations"
page_size = 2

[[screens.relations]]
field = "facility"
kind = "facilities"
foreign_key = "facility_id"

[[screens.relations]]
field = "user"
kind = "users"
foreign_key = "user_id"

[[screens.relations]]
field = "building"
kind = "buildings"
foreign_key = "building_id"
through = "facility"
"#;

/// Temporary directory holding a config file and fixture tree
pub struct TestBackend {
    dir: TempDir,
}

impl TestBackend {
    /// Empty backend with the given config text
    pub fn with_config(config: &str) -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp dir")?;
        std::fs::write(dir.path().join("concierge.toml"), config)?;
        Ok(Self { dir })
    }

    /// Reservations backend with a few related entities
    pub fn reservations() -> Result<Self> {
        let backend = Self::with_config(RESERVATIONS_CONFIG)?;

        backend.entity("facilities", "f1", json!({"id": "f1", "name": "Gym", "building_id": "b1"}))?;
        backend.entity("facilities", "f2", json!({"id": "f2", "name": "Pool", "building_id": "b1"}))?;
        backend.entity("users", "u1", json!({"id": "u1", "name": "Ada"}))?;
        backend.entity(
            "users",
            "u2",
            json!({"success": false, "message": "User suspended"}),
        )?;
        backend.entity("buildings", "b1", json!({"id": "b1", "name": "North Hall"}))?;

        Ok(backend)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("concierge.toml")
    }

    /// Write `fixtures/<kind>/<id>.json`
    pub fn entity(&self, kind: &str, id: &str, value: Value) -> Result<()> {
        let dir = self.dir.path().join("fixtures").join(kind);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join(format!("{}.json", id)), serde_json::to_string(&value)?)?;
        Ok(())
    }

    /// Write an arbitrary JSON file and return its path as a string
    pub fn file(&self, name: &str, value: Value) -> Result<String> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_string_pretty(&value)?)?;
        Ok(path.to_string_lossy().into_owned())
    }
}
