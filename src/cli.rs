// CLI module - command-line argument parsing and handlers
//
// Running without a subcommand opens the viewer. Subcommands:
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR
// - config --update: Rewrite config with the current layout (keeps values)
// - config --path: Print the config file location
// - page --template: Print the built-in page content as TOML

use crate::config::{Config, VERSION};
use crate::page::PortfolioContent;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// folio - an interactive portfolio page in the terminal
#[derive(Parser)]
#[command(name = "folio")]
#[command(version = VERSION)]
#[command(about = "Interactive portfolio page in the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Page content file (TOML); overrides FOLIO_PAGE and the config file
    pub page: Option<PathBuf>,

    /// Let the scripted tour drive the page
    #[arg(long)]
    pub demo: bool,

    /// Run the scripted tour without a terminal UI, logging to stdout
    #[arg(long)]
    pub headless: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Update config with the latest layout (preserves user values)
        #[arg(long)]
        update: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
    /// Page content helpers
    Page {
        /// Print the built-in page as a starting point for your own
        #[arg(long)]
        template: bool,
    },
}

impl Cli {
    /// Fold command-line flags into the loaded config (flags win)
    pub fn apply(&self, config: &mut Config) {
        if let Some(page) = &self.page {
            config.page = Some(page.clone());
        }
        if self.demo {
            config.demo_mode = true;
        }
        if self.headless {
            config.enable_tui = false;
        }
    }
}

/// Handle CLI subcommands. Returns true if a command was handled (exit after).
pub fn handle_cli(cli: &Cli) -> bool {
    match &cli.command {
        Some(Commands::Config {
            show,
            reset,
            edit,
            update,
            path,
        }) => {
            if *path {
                handle_config_path();
            } else if *show {
                handle_config_show();
            } else if *reset {
                handle_config_reset();
            } else if *edit {
                handle_config_edit();
            } else if *update {
                handle_config_update();
            } else {
                println!("Usage: folio config [--show|--reset|--edit|--update|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --edit    Open config file in $EDITOR");
                println!("  --update  Update config with the latest layout (preserves user values)");
                println!("  --path    Show config file path");
            }
            true
        }
        Some(Commands::Page { template }) => {
            if *template {
                print!("{}", PortfolioContent::default().to_toml());
            } else {
                println!("Usage: folio page --template > my-page.toml");
            }
            true
        }
        None => false,
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!("# demo_mode = {}, tui = {}", config.demo_mode, config.enable_tui);
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

fn handle_config_update() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
        return;
    }

    let updated = Config::from_env().to_toml();

    let backup_path = path.with_extension("toml.bak");
    if let Err(e) = std::fs::copy(&path, &backup_path) {
        eprintln!("Warning: Could not create backup: {}", e);
    } else {
        println!("Backup created: {}", backup_path.display());
    }

    if let Err(e) = std::fs::write(&path, updated) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config updated with latest structure: {}", path.display());
    println!("Your values have been preserved.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["folio", "me.toml", "--demo", "--headless"]);
        assert!(cli.command.is_none());

        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.page, Some(PathBuf::from("me.toml")));
        assert!(config.demo_mode);
        assert!(!config.enable_tui);
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::parse_from(["folio", "config", "--path"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config { path: true, .. })
        ));

        let cli = Cli::parse_from(["folio", "page", "--template"]);
        assert!(matches!(cli.command, Some(Commands::Page { template: true })));
    }
}
