//! Configuration tests
//!
//! Guards that every config field is serialized by `to_toml()` and survives a
//! round-trip through the file layer.

use super::*;
use std::collections::HashMap;

fn parse(toml_str: &str) -> FileConfig {
    match toml::from_str(toml_str) {
        Ok(file) => file,
        Err(e) => panic!("TOML should parse.\nTOML:\n{}\nError: {}", toml_str, e),
    }
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let reloaded = Config::resolve(parse(&config.to_toml()), no_env);

    assert_eq!(reloaded.page, None);
    assert_eq!(reloaded.navigation, config.navigation);
    assert_eq!(reloaded.reveal, config.reveal);
    assert_eq!(reloaded.header, config.header);
    assert_eq!(reloaded.hero, config.hero);
    assert_eq!(reloaded.hover, config.hover);
    assert_eq!(reloaded.theme, config.theme);
    assert_eq!(reloaded.logging, config.logging);
    assert_eq!(reloaded.frame_interval_ms, config.frame_interval_ms);
    assert_eq!(reloaded.row_height_px, config.row_height_px);
    assert_eq!(reloaded.column_width_px, config.column_width_px);
}

/// Every non-default value must survive serialization. When you add a field,
/// set it here and compare it below.
#[test]
fn test_config_roundtrip_custom_values() {
    let mut config = Config::default();
    config.page = Some(PathBuf::from("/tmp/me.toml"));
    config.use_theme_background = false;
    config.frame_interval_ms = 33;
    config.row_height_px = 20.0;
    config.column_width_px = 10.0;
    config.navigation.smooth_scroll_ms = 700;
    config.navigation.scroll_margin_px = 20.0;
    config.reveal.cards.stagger_ms = 150;
    config.reveal.tags.threshold = 0.5;
    config.reveal.sections.bottom_margin_px = -80.0;
    config.header.threshold_px = 64.0;
    config.hero.delay_ms = 500;
    config.hover.scale = 1.1;
    config.theme.accent_color = "#ff6600".to_string();
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let reloaded = Config::resolve(parse(&config.to_toml()), no_env);

    assert_eq!(reloaded.page, config.page);
    assert!(!reloaded.use_theme_background);
    assert_eq!(reloaded.frame_interval_ms, 33);
    assert_eq!(reloaded.row_height_px, 20.0);
    assert_eq!(reloaded.column_width_px, 10.0);
    assert_eq!(reloaded.navigation, config.navigation);
    assert_eq!(reloaded.reveal, config.reveal);
    assert_eq!(reloaded.header, config.header);
    assert_eq!(reloaded.hero, config.hero);
    assert_eq!(reloaded.hover, config.hover);
    assert_eq!(reloaded.theme, config.theme);
    assert_eq!(reloaded.logging, config.logging);
}

#[test]
fn test_template_lists_every_section() {
    let toml_str = Config::default().to_toml();
    for section in [
        "[navigation]",
        "[reveal.sections]",
        "[reveal.cards]",
        "[reveal.tags]",
        "[header]",
        "[hero]",
        "[hover]",
        "[theme]",
        "[logging]",
    ] {
        assert!(
            toml_str.contains(section),
            "{} missing from TOML output!\nTOML output:\n{}",
            section,
            toml_str
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Partial files and precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_partial_file_keeps_defaults() {
    let file = parse(
        r#"
[reveal.cards]
stagger_ms = 250

[header]
threshold_px = 40.0
"#,
    );
    let config = Config::resolve(file, no_env);
    let defaults = RevealConfig::default();

    assert_eq!(config.reveal.cards.stagger_ms, 250);
    assert_eq!(config.reveal.cards.transition_ms, defaults.cards.transition_ms);
    assert_eq!(config.reveal.tags, defaults.tags);
    assert_eq!(config.header.threshold_px, 40.0);
    assert_eq!(config.hero, HeroConfig::default());
}

#[test]
fn test_env_overrides_file() {
    let file = parse(
        r#"
page = "from-file.toml"

[logging]
level = "warn"
"#,
    );
    let env: HashMap<&str, &str> = [
        ("FOLIO_PAGE", "from-env.toml"),
        ("FOLIO_LOG_LEVEL", "trace"),
        ("FOLIO_DEMO", "true"),
        ("FOLIO_NO_TUI", "1"),
    ]
    .into_iter()
    .collect();
    let config = Config::resolve(file, |k| env.get(k).map(|v| v.to_string()));

    assert_eq!(config.page, Some(PathBuf::from("from-env.toml")));
    assert_eq!(config.logging.level, "trace");
    assert!(config.demo_mode);
    assert!(!config.enable_tui);
}

#[test]
fn test_invalid_values_fall_back() {
    let file = parse(
        r#"
frame_interval_ms = 0
row_height_px = -4.0

[reveal.tags]
threshold = 3.0

[logging]
file_rotation = "weekly"
"#,
    );
    let config = Config::resolve(file, no_env);
    assert_eq!(config.frame_interval_ms, 16);
    assert_eq!(config.row_height_px, 16.0);
    assert_eq!(config.reveal.tags.threshold, 1.0);
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_accent_color_parses_or_falls_back() {
    let mut config = Config::default();
    assert_eq!(config.accent_color(), Rgba::rgb(0x25, 0x63, 0xeb));

    config.theme.accent_color = "rgb(255, 0, 0)".to_string();
    assert_eq!(config.accent_color(), Rgba::rgb(255, 0, 0));

    config.theme.accent_color = "blurple".to_string();
    assert_eq!(config.accent_color(), FALLBACK_ACCENT);

    config.theme.accent_color = "#€".to_string();
    assert_eq!(config.accent_color(), FALLBACK_ACCENT);
}

#[test]
fn test_unknown_keys_ignored_wrong_types_rejected() {
    assert!(toml::from_str::<FileConfig>("mystery = 1").is_ok());
    assert!(toml::from_str::<FileConfig>("frame_interval_ms = \"fast\"").is_err());
}
