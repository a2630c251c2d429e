//! Configuration and status handlers for eza-history CLI

use crate::cli::args::*;
use crate::cli::{config_path, load_config, Cli, CliApp};
use crate::config::{BackendKind, Config};
use crate::database::SqliteMedium;
use crate::error::{Error, Result};
use crate::history::LogState;

pub fn handle_config(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let path = config_path(cli)?;

    if args.init {
        if path.exists() && !args.force {
            return Err(Error::invalid_arguments(format!(
                "{} already exists, pass --force to overwrite it",
                path.display()
            )));
        }
        Config::default().save_to_path(&path)?;
        println!("Configuration initialized at {}", path.display());
    } else if args.validate {
        // Parsed without validation so every problem is reported here
        let config = Config::read_from_path(&path)?;
        config.validate()?;
        println!("{} is valid", path.display());
    } else {
        let config = load_config(cli)?;
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    Ok(())
}

pub fn handle_status(app: &mut CliApp) -> Result<()> {
    println!("eza-history Status");
    println!("==================\n");

    println!("Storage: {}", app.store.medium().describe());
    println!("Key: {}", app.store.settings().key);

    match app.store.inspect() {
        LogState::Missing => println!("State: empty (nothing saved yet)"),
        LogState::Readable(count) => println!("State: {} entries", count),
        LogState::Unreadable { bytes, reason } => {
            println!("State: unreadable ({} bytes): {}", bytes, reason);
            println!("   The next save will replace it; `clear` removes it now");
        }
        LogState::Unavailable(reason) => println!("State: storage unavailable: {}", reason),
    }

    if app.config.backend == BackendKind::Sqlite {
        let db = SqliteMedium::open(&app.config.sqlite_path())?;
        let stats = db.get_stats()?;
        println!("\nDatabase:");
        println!("  Keys: {}", stats.total_keys);
        println!("  Size: {} bytes", stats.total_bytes);
        if let Some(last_write) = stats.last_write {
            println!("  Last write: {}", last_write.format("%Y-%m-%d %H:%M:%S"));
        }
    }

    println!("\nConfiguration:");
    println!("  Max entries: {}", app.config.max_entries);
    println!("  Title length: {}", app.config.title_max_chars);
    println!("  Max tags: {}", app.config.tags.max_tags);
    println!(
        "  Built-in tag rules: {}",
        if app.config.tags.use_builtin_rules { "on" } else { "off" }
    );

    let stats = app.store.stats();
    if stats.total_entries > 0 {
        println!("\nHistory:");
        if let (Some(oldest), Some(newest)) = (stats.oldest_entry, stats.newest_entry) {
            println!("  Oldest: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
            println!("  Newest: {}", newest.format("%Y-%m-%d %H:%M:%S"));
        }

        let mut tags: Vec<_> = stats.tag_counts.iter().collect();
        tags.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        if !tags.is_empty() {
            println!("  Tags:");
            for (tag, count) in tags {
                println!("    {}: {}", tag, count);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn config_args(cli: &Cli) -> &ConfigArgs {
        match &cli.command {
            crate::cli::Commands::Config(args) => args,
            _ => panic!("expected config"),
        }
    }

    fn path_str(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn test_init_writes_to_given_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf.json");

        let cli = parse(&["eza-history", "-c", path_str(&path), "config", "--init"]);
        handle_config(&cli, config_args(&cli)).unwrap();

        let written = Config::load_from_path(&path).unwrap();
        assert_eq!(written.max_entries, crate::config::DEFAULT_MAX_ENTRIES);

        // A second init refuses to clobber the file
        let again = handle_config(&cli, config_args(&cli));
        assert!(matches!(again, Err(Error::InvalidArguments { .. })));

        let forced = parse(&["eza-history", "-c", path_str(&path), "config", "--init", "-F"]);
        handle_config(&forced, config_args(&forced)).unwrap();
    }

    #[test]
    fn test_validate_reports_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf.json");
        fs::write(&path, r#"{"max_entries": 0}"#).unwrap();

        let cli = parse(&["eza-history", "-c", path_str(&path), "config", "--validate"]);
        let result = handle_config(&cli, config_args(&cli));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        fs::write(&path, r#"{"max_entries": 10}"#).unwrap();
        handle_config(&cli, config_args(&cli)).unwrap();
    }

    #[test]
    fn test_validate_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let cli = parse(&["eza-history", "-c", path_str(&path), "config", "--validate"]);
        let result = handle_config(&cli, config_args(&cli));
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn test_status_with_sqlite_backend() {
        let dir = TempDir::new().unwrap();
        let cli = parse(&["eza-history", "status"]);
        let mut config = Config::default();
        config.backend = BackendKind::Sqlite;
        config.data_dir = dir.path().to_path_buf();

        let mut app = CliApp::with_config(&cli, config).unwrap();
        app.store
            .save_analysis(&json!({ "issues": ["health_risk"] }), "Detox çayı")
            .unwrap();

        handle_status(&mut app).unwrap();
        assert!(app.config.sqlite_path().exists());
    }
}
