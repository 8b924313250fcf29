//! Configuration management command
//!
//! Shows, locates and validates the screen configuration.

use anyhow::Result;
use cli_lib::config::{self, AppConfig, ScreenConfig};
use owo_colors::OwoColorize;
use std::path::Path;

/// List backend, logging and screen settings
pub async fn run_list(config: &AppConfig) -> Result<()> {
    println!("{}", "Configuration".bold());
    match &config.source {
        Some(path) => println!("{}: {}\n", "Location".dimmed(), path.display().dimmed()),
        None => println!("{}\n", "No config file found, using defaults".dimmed()),
    }

    println!("{}", "[backend]".yellow());
    println!(
        "  {} = {}",
        "fixtures_dir".cyan(),
        config.backend.fixtures_dir.display()
    );

    println!("\n{}", "[logging]".yellow());
    println!("  {} = {}", "level".cyan(), config.logging.level);
    if let Some(dir) = &config.logging.directory {
        println!("  {} = {}", "directory".cyan(), dir.display());
    }

    if config.screens.is_empty() {
        println!("\n{}", "No screens configured".dimmed());
    }
    for screen in &config.screens {
        print_screen(screen);
    }

    Ok(())
}

fn print_screen(screen: &ScreenConfig) {
    println!(
        "\n{} {} {}",
        "[screen]".yellow(),
        screen.name.bold(),
        format!("({}, {} per page)", screen.primary, screen.page_size).dimmed()
    );

    for relation in &screen.relations {
        let source = relation.through.as_deref().unwrap_or("record");
        println!(
            "  {} <- {} {}",
            relation.field.cyan(),
            relation.kind,
            format!("via {}.{}", source, relation.foreign_key).dimmed()
        );
    }
}

/// Show the config file path
pub async fn run_path(explicit: Option<&Path>) -> Result<()> {
    match config::locate(explicit) {
        Some(path) => println!("{}", path.display()),
        None => {
            match config::config_file_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("{}", config::LOCAL_CONFIG_FILE),
            }
            println!(
                "{}",
                "File does not exist. Use 'concierge config example' for a starting point.".yellow()
            );
        }
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Validate the configuration
pub async fn run_check(config: &AppConfig) -> Result<()> {
    config.validate()?;

    let relations: usize = config.screens.iter().map(|s| s.relations.len()).sum();
    println!(
        "{} Configuration is valid ({} screen(s), {} relation(s))",
        "✓".green(),
        config.screens.len(),
        relations
    );
    Ok(())
}
