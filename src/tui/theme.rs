// Page palette for the TUI
//
// Colors come from the page stylesheet's custom properties, so a configured
// accent color shows up in headings, chips and focus outlines alike.

use crate::page::{vars, Rgba, Stylesheet};
use ratatui::style::Color;

/// Used when a custom property is missing from the stylesheet
const FALLBACK_TEXT: Rgba = Rgba::rgb(0x33, 0x33, 0x33);
const FALLBACK_BACKGROUND: Rgba = Rgba::rgb(0xff, 0xff, 0xff);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub text: Rgba,
    pub muted: Rgba,
    pub accent: Rgba,
    /// Fill cells with `background` (false keeps the terminal's own)
    pub paint_background: bool,
}

impl Palette {
    pub fn from_stylesheet(sheet: &Stylesheet, paint_background: bool) -> Self {
        let text = sheet.variable(vars::TEXT).unwrap_or(FALLBACK_TEXT);
        Self {
            background: sheet
                .variable(vars::BACKGROUND)
                .unwrap_or(FALLBACK_BACKGROUND),
            text,
            muted: sheet.variable(vars::MUTED).unwrap_or(text),
            accent: sheet.variable(vars::ACCENT).unwrap_or(text),
            paint_background,
        }
    }

    /// Cell background for the page body
    pub fn page_bg(&self) -> Color {
        if self.paint_background {
            to_color(self.background)
        } else {
            Color::Reset
        }
    }

    /// `color` at `opacity`, blended over the page background
    pub fn fade(&self, color: Rgba, opacity: f32) -> Color {
        to_color(color.faded(opacity, self.background))
    }
}

/// Composite over black when translucent; terminals have no alpha
pub fn to_color(color: Rgba) -> Color {
    let c = if color.a < 1.0 {
        color.over(Rgba::rgb(0, 0, 0))
    } else {
        color
    };
    Color::Rgb(c.r, c.g, c.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::default_stylesheet;

    #[test]
    fn test_palette_follows_stylesheet_variables() {
        let sheet = default_stylesheet(Rgba::rgb(0xff, 0x66, 0x00));
        let palette = Palette::from_stylesheet(&sheet, true);
        assert_eq!(palette.accent, Rgba::rgb(0xff, 0x66, 0x00));
        assert_eq!(palette.page_bg(), Color::Rgb(0xf8, 0xf9, 0xfa));

        let plain = Palette::from_stylesheet(&sheet, false);
        assert_eq!(plain.page_bg(), Color::Reset);
    }

    #[test]
    fn test_fade_blends_toward_background() {
        let palette = Palette::from_stylesheet(&Stylesheet::new(), true);
        assert_eq!(palette.fade(palette.text, 1.0), Color::Rgb(0x33, 0x33, 0x33));
        assert_eq!(palette.fade(palette.text, 0.0), Color::Rgb(0xff, 0xff, 0xff));
    }
}
