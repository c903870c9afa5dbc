//! Configuration for the portfolio viewer
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/folio/config.toml)
//! 3. Built-in defaults (lowest priority)

use crate::page::{CellMetrics, Rgba};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod behaviors;
mod observability;
mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use behaviors::{
    FileHeader, FileHero, FileHover, FileNavigation, FileReveal, FileTheme,
    HeaderConfig, HeroConfig, HoverConfig, NavigationConfig, RevealConfig, RevealGroupConfig,
    ThemeConfig,
};
pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Accent used when the configured one does not parse
const FALLBACK_ACCENT: Rgba = Rgba::rgb(0x25, 0x63, 0xeb);

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Page content (TOML); the built-in page when unset
    pub page: Option<PathBuf>,

    /// Run the terminal UI (disabled = headless run of the scripted tour)
    pub enable_tui: bool,

    /// Demo mode: the scripted tour drives the page
    pub demo_mode: bool,

    /// Paint the page background (true) or keep the terminal's own (false)
    pub use_theme_background: bool,

    /// Time between rendered frames
    pub frame_interval_ms: u64,

    /// CSS pixels per terminal row / column
    pub row_height_px: f32,
    pub column_width_px: f32,

    pub navigation: NavigationConfig,
    pub reveal: RevealConfig,
    pub header: HeaderConfig,
    pub hero: HeroConfig,
    pub hover: HoverConfig,
    pub theme: ThemeConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        let metrics = CellMetrics::default();
        Self {
            page: None,
            enable_tui: true,
            demo_mode: false,
            use_theme_background: true,
            frame_interval_ms: 16,
            row_height_px: metrics.row_height_px,
            column_width_px: metrics.column_width_px,
            navigation: NavigationConfig::default(),
            reveal: RevealConfig::default(),
            header: HeaderConfig::default(),
            hero: HeroConfig::default(),
            hover: HoverConfig::default(),
            theme: ThemeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub page: Option<String>,
    pub use_theme_background: Option<bool>,
    pub frame_interval_ms: Option<u64>,
    pub row_height_px: Option<f32>,
    pub column_width_px: Option<f32>,

    pub navigation: Option<FileNavigation>,
    pub reveal: Option<FileReveal>,
    pub header: Option<FileHeader>,
    pub hero: Option<FileHero>,
    pub hover: Option<FileHover>,
    pub theme: Option<FileTheme>,
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

fn is_truthy(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

impl Config {
    /// Get the config file path: ~/.config/folio/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("folio").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// # Exits
    /// If the config file exists but cannot be read or parsed. A broken
    /// config fails fast instead of silently falling back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Numbers written as strings (use 450, not \"450\")");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `folio config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Page content: env > file > built-in
        let page = env("FOLIO_PAGE").or(file.page).map(PathBuf::from);

        // Runtime flags: env only
        let enable_tui = env("FOLIO_NO_TUI").map(|v| !is_truthy(&v)).unwrap_or(true);
        let demo_mode = env("FOLIO_DEMO").map(|v| is_truthy(&v)).unwrap_or(false);

        let mut logging = LoggingConfig::from_file(file.logging);
        if let Some(level) = env("FOLIO_LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            page,
            enable_tui,
            demo_mode,
            use_theme_background: file
                .use_theme_background
                .unwrap_or(defaults.use_theme_background),
            frame_interval_ms: file
                .frame_interval_ms
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.frame_interval_ms),
            row_height_px: file
                .row_height_px
                .filter(|&px| px > 0.0)
                .unwrap_or(defaults.row_height_px),
            column_width_px: file
                .column_width_px
                .filter(|&px| px > 0.0)
                .unwrap_or(defaults.column_width_px),
            navigation: NavigationConfig::from_file(file.navigation),
            reveal: RevealConfig::from_file(file.reveal),
            header: HeaderConfig::from_file(file.header),
            hero: HeroConfig::from_file(file.hero),
            hover: HoverConfig::from_file(file.hover),
            theme: ThemeConfig::from_file(file.theme),
            logging,
        }
    }

    // ─── Derived values ──────────────────────────────────────

    pub fn cell_metrics(&self) -> CellMetrics {
        CellMetrics {
            row_height_px: self.row_height_px,
            column_width_px: self.column_width_px,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.navigation.smooth_scroll_ms)
    }

    /// `--accent-color`; an unparsable value logs a warning and falls back
    pub fn accent_color(&self) -> Rgba {
        match Rgba::parse(&self.theme.accent_color) {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!("Invalid theme.accent_color: {}", e);
                FALLBACK_ACCENT
            }
        }
    }
}
