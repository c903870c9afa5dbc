//! Page view - paints the laid-out document into the terminal buffer
//!
//! Styles are read as they appear at the controller's clock, so running
//! transitions animate between frames:
//! - opacity (multiplied down the ancestor chain) fades text toward the page
//!   background
//! - translateY (summed down the chain) shifts boxes by whole rows
//! - scale widens the profile image frame
//!
//! The fixed header is painted last, over the content, with its own
//! background and an optional shadow row below it.

use super::scrollbar::{render_scrollbar_raw, ScrollbarStyle};
use crate::page::{BoxKind, Document, ElementId, LayoutBox, Rgba};
use crate::tui::app::App;
use crate::tui::input::scroll_rows;
use crate::tui::theme::{to_color, Palette};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Rows a translated box can move into view from outside the viewport
const MAX_SHIFT_ROWS: u32 = 4;

/// Boxes fainter than this are not drawn
const MIN_OPACITY: f32 = 0.02;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let page = app.page();
    let now = app.controller.now();
    let palette = app.palette;
    let top = scroll_rows(page);

    let mut painter = Painter {
        buf: f.buffer_mut(),
        area,
        palette,
        doc: &page.document,
        now,
        row_px: page.metrics.row_height_px,
    };
    painter.fill(area, Style::default().bg(palette.page_bg()));

    let first = top.saturating_sub(MAX_SHIFT_ROWS);
    let rows = u32::from(area.height) + 2 * MAX_SHIFT_ROWS;
    for b in page.layout.visible(first, rows) {
        painter.content_box(b, top, page.layout.header_rows);
    }
    painter.header(&page.layout.header_boxes, page.layout.header_rows);

    render_scrollbar_raw(
        f,
        area,
        page.layout.document_rows as usize,
        usize::from(area.height),
        top as usize,
        ScrollbarStyle::Minimal,
    );
}

/// Opacity and vertical offset (px) of `id` including its ancestors
pub fn effective_style(doc: &Document, id: ElementId, now: Duration) -> (f32, f32) {
    let mut opacity = 1.0;
    let mut shift = 0.0;
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        if let Some(el) = doc.get(current) {
            opacity *= el.style().opacity_at(now);
            shift += el.style().transform_at(now).translate_y;
        }
        cursor = doc.parent(current);
    }
    (opacity, shift)
}

struct Painter<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    palette: Palette,
    doc: &'a Document,
    now: Duration,
    row_px: f32,
}

impl Painter<'_> {
    fn fill(&mut self, rect: Rect, style: Style) {
        self.buf.set_style(rect.intersection(self.area), style);
    }

    /// Write `text` at page-relative (x, y), clipped to the page area
    fn put(&mut self, x: i32, y: i32, text: &str, style: Style) {
        if y < 0 || y >= i32::from(self.area.height) {
            return;
        }
        let skip = (-x).max(0) as usize;
        let x = x.max(0);
        if x >= i32::from(self.area.width) {
            return;
        }
        let visible: String = text.chars().skip(skip).collect();
        let max = usize::from(self.area.width) - x as usize;
        self.buf.set_stringn(
            self.area.x + x as u16,
            self.area.y + y as u16,
            visible,
            max,
            style,
        );
    }

    /// Focus outline from the committed style; only set while the injected
    /// keyboard-navigation rule matches
    fn outline(&self, id: ElementId) -> Option<Rgba> {
        let el = self.doc.get(id)?;
        if self.doc.focused() != Some(id) {
            return None;
        }
        el.style().committed().outline.map(|o| o.color)
    }

    fn text_style(&self, kind: BoxKind, opacity: f32) -> Style {
        let p = &self.palette;
        let base = Style::default().bg(p.page_bg());
        match kind {
            BoxKind::Heading => base
                .fg(p.fade(p.accent, opacity))
                .add_modifier(Modifier::BOLD),
            BoxKind::Name | BoxKind::CardTitle => base
                .fg(p.fade(p.text, opacity))
                .add_modifier(Modifier::BOLD),
            BoxKind::Catchcopy => base
                .fg(p.fade(p.muted, opacity))
                .add_modifier(Modifier::ITALIC),
            BoxKind::Footer | BoxKind::CardText => base.fg(p.fade(p.muted, opacity)),
            _ => base.fg(p.fade(p.text, opacity)),
        }
    }

    fn content_box(&mut self, b: &LayoutBox, top: u32, header_rows: u16) {
        let (opacity, shift_px) = effective_style(self.doc, b.element, self.now);
        if opacity < MIN_OPACITY {
            return;
        }
        let shift = (shift_px / self.row_px).round() as i32;
        let y0 = b.row as i32 - top as i32 + shift;
        let header = i32::from(header_rows);
        let visible = |y: i32| y >= header;

        match b.kind {
            BoxKind::CardFrame => {
                let color = self.palette.fade(self.palette.muted, opacity * 0.6);
                let style = Style::default().fg(color).bg(self.palette.page_bg());
                self.frame(i32::from(b.col), y0, b.width, b.height, style, header);
            }
            BoxKind::Image => {
                let scale = self
                    .doc
                    .get(b.element)
                    .map(|el| el.style().transform_at(self.now).scale)
                    .unwrap_or(1.0);
                let width = (f32::from(b.width) * scale).round().max(4.0) as u16;
                let x = i32::from(b.col) + (i32::from(b.width) - i32::from(width)) / 2;
                let color = self.palette.fade(self.palette.accent, opacity);
                let style = Style::default().fg(color).bg(self.palette.page_bg());
                self.frame(x, y0, width, b.height, style, header);

                let label = b.lines.first().map(String::as_str).unwrap_or_default();
                let label_x = x + (i32::from(width) - label.width() as i32) / 2;
                let label_y = y0 + i32::from(b.height) / 2;
                if visible(label_y) {
                    self.put(label_x, label_y, label, style);
                }
            }
            BoxKind::Chip => {
                let p = self.palette;
                let style = Style::default()
                    .fg(p.fade(p.background, opacity))
                    .bg(p.fade(p.accent, opacity));
                for (i, line) in b.lines.iter().enumerate() {
                    let y = y0 + i as i32;
                    if visible(y) {
                        self.put(i32::from(b.col), y, line, style);
                    }
                }
            }
            kind => {
                let mut style = self.text_style(kind, opacity);
                if let Some(color) = self.outline(b.element) {
                    style = style
                        .fg(to_color(color))
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                }
                for (i, line) in b.lines.iter().enumerate() {
                    let y = y0 + i as i32;
                    if !visible(y) {
                        continue;
                    }
                    let x = if kind.is_centered() {
                        i32::from(b.col) + (i32::from(b.width) - line.width() as i32) / 2
                    } else {
                        i32::from(b.col)
                    };
                    self.put(x, y, line, style);
                }
            }
        }
    }

    /// Rounded box outline; rows above `min_y` are left to the header
    fn frame(&mut self, x: i32, y: i32, width: u16, height: u16, style: Style, min_y: i32) {
        if width < 2 || height < 2 {
            return;
        }
        let inner = usize::from(width - 2);
        let top = format!("╭{}╮", "─".repeat(inner));
        let bottom = format!("╰{}╯", "─".repeat(inner));
        let last = y + i32::from(height) - 1;
        for row in y..=last {
            if row < min_y {
                continue;
            }
            if row == y {
                self.put(x, row, &top, style);
            } else if row == last {
                self.put(x, row, &bottom, style);
            } else {
                self.put(x, row, "│", style);
                self.put(x + i32::from(width) - 1, row, "│", style);
            }
        }
    }

    fn header(&mut self, boxes: &[LayoutBox], header_rows: u16) {
        if header_rows == 0 {
            return;
        }
        let p = self.palette;
        let header = self.doc.query_selector(".header").ok().flatten();
        let committed = header
            .and_then(|h| self.doc.get(h))
            .map(|el| el.style().committed().clone());

        let background = committed
            .as_ref()
            .and_then(|s| s.background)
            .map(|c| c.over(p.background))
            .unwrap_or(p.background);
        let bg = to_color(background);
        let rows = header_rows.min(self.area.height);
        self.fill(
            Rect::new(self.area.x, self.area.y, self.area.width, rows),
            Style::default().bg(bg),
        );

        for b in boxes {
            let mut style = match b.kind {
                BoxKind::Logo => Style::default()
                    .fg(to_color(p.accent))
                    .add_modifier(Modifier::BOLD),
                _ => Style::default().fg(to_color(p.text)),
            }
            .bg(bg);
            if let Some(color) = self.outline(b.element) {
                style = style
                    .fg(to_color(color))
                    .add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            for (i, line) in b.lines.iter().enumerate() {
                self.put(i32::from(b.col), b.row as i32 + i as i32, line, style);
            }
        }

        // shadow row just under the header
        if let Some(shadow) = committed.and_then(|s| s.box_shadow) {
            if header_rows < self.area.height {
                let shade = to_color(shadow.color.over(p.background));
                self.fill(
                    Rect::new(self.area.x, self.area.y + header_rows, self.area.width, 1),
                    Style::default().bg(shade),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::document::ElementSpec;
    use crate::page::{StyleDeclarations, Transform};

    #[test]
    fn test_effective_style_compounds_ancestors() {
        let mut doc = Document::new();
        let body = doc.body();
        let section = doc.append(body, ElementSpec::new("section"));
        let card = doc.append(section, ElementSpec::new("div"));
        let title = doc.append(card, ElementSpec::new("h3").text("Card"));

        doc.set_inline_style(section, &StyleDeclarations::new().opacity(0.5));
        doc.set_inline_style(
            card,
            &StyleDeclarations::new()
                .opacity(0.5)
                .transform(Transform::translate_y(30.0)),
        );
        doc.commit_styles(Duration::ZERO);

        let (opacity, shift) = effective_style(&doc, title, Duration::ZERO);
        assert_eq!(opacity, 0.25);
        assert_eq!(shift, 30.0);

        let (opacity, shift) = effective_style(&doc, body, Duration::ZERO);
        assert_eq!(opacity, 1.0);
        assert_eq!(shift, 0.0);
    }
}
