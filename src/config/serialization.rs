//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::{Config, RevealGroupConfig};

impl Config {
    fn reveal_group_to_toml(name: &str, group: &RevealGroupConfig) -> String {
        format!(
            "[reveal.{name}]\n\
             transition_ms = {transition}\n\
             stagger_ms = {stagger}\n\
             threshold = {threshold:?}\n\
             bottom_margin_px = {margin:?}\n",
            name = name,
            transition = group.transition_ms,
            stagger = group.stagger_ms,
            threshold = group.threshold,
            margin = group.bottom_margin_px,
        )
    }

    /// Serialize the config as a commented TOML document
    pub fn to_toml(&self) -> String {
        let page = match &self.page {
            Some(path) => format!("page = {:?}\n", path.display().to_string()),
            None => "# page = \"~/portfolio.toml\"  # `folio page --template` prints one\n"
                .to_string(),
        };

        format!(
            r#"# folio configuration

# Page content (TOML). Without it the built-in sample page is shown.
{page}
# Paint the page background (true) or keep the terminal's default (false)
use_theme_background = {use_bg}

# Milliseconds between rendered frames
frame_interval_ms = {frame}

# CSS pixels per terminal cell (scroll offsets, thresholds and slide
# distances are all expressed in these pixels)
row_height_px = {row:?}
column_width_px = {col:?}

# In-page navigation links
[navigation]
smooth_scroll_ms = {smooth}
# Extra gap kept between the fixed header and the section scrolled to
scroll_margin_px = {margin:?}

# ─────────────────────────────────────────────────────────────────────────────
# SCROLL REVEAL
# ─────────────────────────────────────────────────────────────────────────────
# Elements fade in the first time they enter the viewport, once.
# threshold: visible fraction needed; bottom_margin_px: negative values make
# elements wait until they are further inside the viewport.

{sections}
{cards}
{tags}
# Header turns more opaque (with a shadow) past this scroll offset
[header]
threshold_px = {header:?}

# Hero entrance after the page has loaded
[hero]
delay_ms = {hero_delay}
stagger_ms = {hero_stagger}
transition_ms = {hero_transition}

# Profile image hover
[hover]
scale = {hover_scale:?}
transition_ms = {hover_transition}

[theme]
accent_color = "{accent}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to the log panel or stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            page = page,
            use_bg = self.use_theme_background,
            frame = self.frame_interval_ms,
            row = self.row_height_px,
            col = self.column_width_px,
            smooth = self.navigation.smooth_scroll_ms,
            margin = self.navigation.scroll_margin_px,
            sections = Self::reveal_group_to_toml("sections", &self.reveal.sections),
            cards = Self::reveal_group_to_toml("cards", &self.reveal.cards),
            tags = Self::reveal_group_to_toml("tags", &self.reveal.tags),
            header = self.header.threshold_px,
            hero_delay = self.hero.delay_ms,
            hero_stagger = self.hero.stagger_ms,
            hero_transition = self.hero.transition_ms,
            hover_scale = self.hover.scale,
            hover_transition = self.hover.transition_ms,
            accent = self.theme.accent_color,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
