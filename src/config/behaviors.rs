//! Page behavior configuration: navigation, reveal groups, header, hero,
//! hover and theme
//!
//! Each section has a runtime struct with defaults and a `File*` twin with
//! every field optional, merged by `from_file()`.

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    /// Duration of the smooth scroll animation
    pub smooth_scroll_ms: u64,
    /// Extra gap between the header and the scrolled-to section
    pub scroll_margin_px: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            smooth_scroll_ms: 450,
            scroll_margin_px: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileNavigation {
    pub smooth_scroll_ms: Option<u64>,
    pub scroll_margin_px: Option<f32>,
}

impl NavigationConfig {
    pub fn from_file(file: Option<FileNavigation>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        Self {
            smooth_scroll_ms: file.smooth_scroll_ms.unwrap_or(defaults.smooth_scroll_ms),
            scroll_margin_px: file.scroll_margin_px.unwrap_or(defaults.scroll_margin_px),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll reveal
// ─────────────────────────────────────────────────────────────────────────────

/// One reveal group (sections, cards or tags)
#[derive(Debug, Clone, PartialEq)]
pub struct RevealGroupConfig {
    pub transition_ms: u64,
    /// Delay between elements revealed in the same batch
    pub stagger_ms: u64,
    /// Visible fraction required to count as intersecting
    pub threshold: f32,
    /// Added to the viewport's bottom edge (negative shrinks it)
    pub bottom_margin_px: f32,
}

#[derive(Debug, Deserialize, Default)]
pub struct FileRevealGroup {
    pub transition_ms: Option<u64>,
    pub stagger_ms: Option<u64>,
    pub threshold: Option<f32>,
    pub bottom_margin_px: Option<f32>,
}

impl RevealGroupConfig {
    fn merge(file: Option<FileRevealGroup>, defaults: Self) -> Self {
        let file = file.unwrap_or_default();
        Self {
            transition_ms: file.transition_ms.unwrap_or(defaults.transition_ms),
            stagger_ms: file.stagger_ms.unwrap_or(defaults.stagger_ms),
            threshold: file
                .threshold
                .map(|t| t.clamp(0.0, 1.0))
                .unwrap_or(defaults.threshold),
            bottom_margin_px: file.bottom_margin_px.unwrap_or(defaults.bottom_margin_px),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    pub sections: RevealGroupConfig,
    pub cards: RevealGroupConfig,
    pub tags: RevealGroupConfig,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            sections: RevealGroupConfig {
                transition_ms: 600,
                stagger_ms: 0,
                threshold: 0.1,
                bottom_margin_px: -50.0,
            },
            cards: RevealGroupConfig {
                transition_ms: 600,
                stagger_ms: 100,
                threshold: 0.1,
                bottom_margin_px: -30.0,
            },
            tags: RevealGroupConfig {
                transition_ms: 400,
                stagger_ms: 50,
                threshold: 0.1,
                bottom_margin_px: 0.0,
            },
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileReveal {
    pub sections: Option<FileRevealGroup>,
    pub cards: Option<FileRevealGroup>,
    pub tags: Option<FileRevealGroup>,
}

impl RevealConfig {
    pub fn from_file(file: Option<FileReveal>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        Self {
            sections: RevealGroupConfig::merge(file.sections, defaults.sections),
            cards: RevealGroupConfig::merge(file.cards, defaults.cards),
            tags: RevealGroupConfig::merge(file.tags, defaults.tags),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderConfig {
    /// Offset past which the header switches to its scrolled look
    pub threshold_px: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self { threshold_px: 100.0 }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileHeader {
    pub threshold_px: Option<f32>,
}

impl HeaderConfig {
    pub fn from_file(file: Option<FileHeader>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            threshold_px: file.threshold_px.unwrap_or(Self::default().threshold_px),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hero entrance & hover
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HeroConfig {
    /// Wait after `load` before the first element appears
    pub delay_ms: u64,
    pub stagger_ms: u64,
    pub transition_ms: u64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            delay_ms: 300,
            stagger_ms: 200,
            transition_ms: 800,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileHero {
    pub delay_ms: Option<u64>,
    pub stagger_ms: Option<u64>,
    pub transition_ms: Option<u64>,
}

impl HeroConfig {
    pub fn from_file(file: Option<FileHero>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        Self {
            delay_ms: file.delay_ms.unwrap_or(defaults.delay_ms),
            stagger_ms: file.stagger_ms.unwrap_or(defaults.stagger_ms),
            transition_ms: file.transition_ms.unwrap_or(defaults.transition_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverConfig {
    pub scale: f32,
    pub transition_ms: u64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            scale: 1.05,
            transition_ms: 300,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileHover {
    pub scale: Option<f32>,
    pub transition_ms: Option<u64>,
}

impl HoverConfig {
    pub fn from_file(file: Option<FileHover>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        Self {
            scale: file.scale.unwrap_or(defaults.scale),
            transition_ms: file.transition_ms.unwrap_or(defaults.transition_ms),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeConfig {
    /// Value of `--accent-color` (`#rrggbb`, `#rgb`, `rgb()` or `rgba()`)
    pub accent_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent_color: "#2563eb".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTheme {
    pub accent_color: Option<String>,
}

impl ThemeConfig {
    pub fn from_file(file: Option<FileTheme>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            accent_color: file
                .accent_color
                .unwrap_or_else(|| Self::default().accent_color),
        }
    }
}
