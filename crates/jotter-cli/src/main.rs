//! Jotter CLI
//!
//! Command-line interface for Jotter - a scratch log with favorites and
//! important marks.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jotter_core::{Collection, Config, EntryId, JsonFilePersistence, Store};

mod commands;
mod output;
mod terminal;
mod tui;

use commands::CliStore;
use output::{Output, OutputFormat};
use terminal::TerminalUi;

#[derive(Parser)]
#[command(name = "jot")]
#[command(about = "Jotter - record short texts, keep favorites, mark what matters")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Record a new text (reads stdin when no text is given)
    #[command(alias = "a")]
    Add {
        /// Text to record
        text: Vec<String>,
    },
    /// List a collection, newest first
    #[command(alias = "ls")]
    List {
        /// texts, favorites or important
        #[arg(default_value = "texts")]
        collection: Collection,
    },
    /// Delete a text (favorites and important marks are kept)
    #[command(alias = "rm")]
    Delete {
        /// Text ID
        id: EntryId,
    },
    /// Remove every entry from a collection
    Clear {
        /// texts, favorites or important
        collection: Collection,
    },
    /// Manage favorites
    #[command(alias = "favorites")]
    Fav {
        #[command(subcommand)]
        command: FavCommands,
    },
    /// Manage important marks
    #[command(alias = "imp")]
    Important {
        #[command(subcommand)]
        command: ImportantCommands,
    },
    /// Export the texts log as plain text
    Export {
        /// Directory to write into (defaults to the configured export_dir)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Print an entry's content for piping into a clipboard tool
    Copy {
        /// texts, favorites or important
        collection: Collection,
        /// Entry ID
        id: EntryId,
    },
    /// Show collection counts and storage location
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum FavCommands {
    /// Add a text to favorites
    Add {
        /// Text ID
        text_id: EntryId,
    },
    /// Remove a favorite
    #[command(alias = "remove")]
    Rm {
        /// Favorite ID
        favorite_id: EntryId,
    },
    /// Toggle the important mark of a favorite's text
    Star {
        /// Favorite ID
        favorite_id: EntryId,
    },
    /// Mark a favorite's text important
    Important {
        /// Favorite ID
        favorite_id: EntryId,
    },
}

#[derive(Subcommand)]
enum ImportantCommands {
    /// Mark a text important
    Add {
        /// Text ID
        text_id: EntryId,
    },
    /// Remove an important entry
    #[command(alias = "remove")]
    Rm {
        /// Important entry ID
        important_id: EntryId,
    },
    /// Toggle the important mark of a text
    Toggle {
        /// Text ID
        text_id: EntryId,
    },
    /// Check whether a text is marked important
    Check {
        /// Text ID
        text_id: EntryId,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, export_dir, timestamp_format, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    // Handle TUI (default when no command given)
    let Some(command) = cli.command else {
        return tui::run(&config);
    };
    if matches!(command, Commands::Tui) {
        return tui::run(&config);
    }

    let ui = TerminalUi::new(output, config.export_dir(), cli.yes);
    let mut store = Store::open(
        JsonFilePersistence::from_config(&config),
        ui,
        (&config).into(),
    );
    // Load problems are reported once, before the command runs
    for notice in store.ui_mut().take_notices() {
        output.warn(&notice);
    }

    match command {
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Add { text } => commands::texts::add(&mut store, text, &output),
        Commands::List { collection } => commands::texts::list(&mut store, collection),
        Commands::Delete { id } => commands::texts::delete(&mut store, id, &output),
        Commands::Clear { collection } => commands::texts::clear(&mut store, collection, &output),
        Commands::Fav { command } => handle_fav_command(command, &mut store, &output),
        Commands::Important { command } => handle_important_command(command, &mut store, &output),
        Commands::Export { output: dir } => commands::export::export(&mut store, dir, &output),
        Commands::Copy { collection, id } => {
            commands::export::copy(&mut store, collection, id, &output)
        }
        Commands::Status => commands::status::show(&store, &output),
    }
}

fn handle_fav_command(command: FavCommands, store: &mut CliStore, output: &Output) -> Result<()> {
    match command {
        FavCommands::Add { text_id } => commands::favorites::add(store, text_id, output),
        FavCommands::Rm { favorite_id } => commands::favorites::remove(store, favorite_id, output),
        FavCommands::Star { favorite_id } => commands::favorites::star(store, favorite_id, output),
        FavCommands::Important { favorite_id } => {
            commands::favorites::important(store, favorite_id, output)
        }
    }
}

fn handle_important_command(
    command: ImportantCommands,
    store: &mut CliStore,
    output: &Output,
) -> Result<()> {
    match command {
        ImportantCommands::Add { text_id } => commands::important::add(store, text_id, output),
        ImportantCommands::Rm { important_id } => {
            commands::important::remove(store, important_id, output)
        }
        ImportantCommands::Toggle { text_id } => {
            commands::important::toggle(store, text_id, output)
        }
        ImportantCommands::Check { text_id } => commands::important::check(store, text_id, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if JOTTER_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log) so
/// output never mixes with command output or the TUI.
fn init_logging(config: &Config) {
    // Only log if JOTTER_LOG is set
    let Ok(log_level) = std::env::var("JOTTER_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::options().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "jotter_core={},jotter_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
