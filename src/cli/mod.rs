//! Command-line interface module for eza-history
//!
//! This module is organized into submodules:
//! - `args`: Command-line argument structures
//! - `handlers`: Command handler implementations

mod args;
mod handlers;

pub use args::*;
use handlers::*;

use crate::config::{BackendKind, Config, LoggingConfig};
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::medium::StorageMedium;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// eza-history - local history of EZA content analyses
#[derive(Parser)]
#[command(name = "eza-history")]
#[command(about = "Local history of EZA content analyses")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured storage backend
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Override the configured data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a finished analysis to history
    Save(SaveArgs),
    /// List saved analyses, newest first
    List(ListArgs),
    /// Show one saved analysis
    Show(ShowArgs),
    /// Delete one saved analysis
    Delete(DeleteArgs),
    /// Clear the whole history
    Clear(ClearArgs),
    /// Browse history interactively
    Browse(BrowseArgs),
    /// Show store status and statistics
    Status,
    /// Show configuration
    Config(ConfigArgs),
}

/// Main CLI application
pub struct CliApp {
    pub config: Config,
    pub store: HistoryStore<Box<dyn StorageMedium>>,
    pub verbose: bool,
    pub quiet: bool,
}

impl CliApp {
    /// Create a new CLI application
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = load_config(cli)?;
        Self::with_config(cli, config)
    }

    /// Create a CLI application around an already loaded configuration
    pub fn with_config(cli: &Cli, config: Config) -> Result<Self> {
        let store = crate::init_with_config(&config)?;

        Ok(Self {
            config,
            store,
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Run the command named on the command line
    pub fn run(&mut self, cli: &Cli) -> Result<()> {
        self.verbose_println(&format!("Using {} storage", self.store.medium().describe()));

        match &cli.command {
            Commands::Save(args) => handle_save(self, args),
            Commands::List(args) => handle_list(self, args),
            Commands::Show(args) => handle_show(self, args),
            Commands::Delete(args) => handle_delete(self, args),
            Commands::Clear(args) => handle_clear(self, args),
            Commands::Browse(args) => handle_browse(self, args),
            Commands::Status => handle_status(self),
            Commands::Config(args) => handle_config(cli, args),
        }
    }

    pub fn verbose_println(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("[verbose] {}", message);
        }
    }
}

/// Path of the configuration file the command line refers to
fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Config::default_config_path(),
    }
}

/// Load the configuration named on the command line, applying overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        match Config::load() {
            Ok(config) => config,
            Err(Error::HomeDirectoryNotFound) => Config::default(),
            Err(e) => return Err(e),
        }
    };

    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    Ok(config)
}

/// Install the stderr subscriber
///
/// `RUST_LOG` wins over the configured level; `--verbose` forces debug.
fn init_tracing(level: &str, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    // A subscriber may already be installed when embedded
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Handled before loading so a broken file can still be checked or replaced
    if let Commands::Config(args) = &cli.command {
        init_tracing(&LoggingConfig::default().level, cli.verbose);
        return handle_config(&cli, args);
    }

    let config = load_config(&cli)?;
    init_tracing(&config.logging.level, cli.verbose);

    let mut app = CliApp::with_config(&cli, config)?;
    app.run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_save() {
        let cli = Cli::try_parse_from([
            "eza-history",
            "--backend",
            "memory",
            "save",
            "--result",
            "result.json",
            "--text",
            "hello",
        ])
        .unwrap();

        assert_eq!(cli.backend, Some(BackendKind::Memory));
        match cli.command {
            Commands::Save(args) => {
                assert_eq!(args.result, PathBuf::from("result.json"));
                assert_eq!(args.text.as_deref(), Some("hello"));
                assert!(args.input.is_none());
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn test_save_input_conflicts_with_text() {
        let parsed = Cli::try_parse_from([
            "eza-history",
            "save",
            "-r",
            "r.json",
            "-i",
            "in.txt",
            "-t",
            "inline",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_config_force_requires_init() {
        assert!(Cli::try_parse_from(["eza-history", "config", "--force"]).is_err());
        assert!(Cli::try_parse_from(["eza-history", "config", "--show", "--init"]).is_err());
        assert!(Cli::try_parse_from(["eza-history", "config", "--init", "--force"]).is_ok());
    }

    #[test]
    fn test_app_with_memory_backend() {
        let cli = Cli::try_parse_from(["eza-history", "--backend", "memory", "status"]).unwrap();
        let mut config = Config::default();
        config.backend = BackendKind::Memory;

        let app = CliApp::with_config(&cli, config).unwrap();
        assert_eq!(app.store.medium().describe(), "memory");
        assert!(app.store.get_history().is_empty());
    }
}
