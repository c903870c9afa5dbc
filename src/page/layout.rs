// Layout - terminal cell geometry for the document
//
// The page is laid out on a grid of terminal cells. Every cell maps to a
// fixed number of CSS pixels (row height / column width) so the behaviors can
// keep reasoning in pixels (`offsetTop`, 100px thresholds, 30px slides) while
// the renderer works in rows and columns.
//
// Layout is block flow with a few special containers:
// - `.header`: fixed at the top, logo left, nav links right
// - `.works-grid`: cards in one or two columns
// - `.experience-tags`: inline chips that wrap
// - `img`: a fixed-size frame

use super::document::{Document, ElementId, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Pixel size of one terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub row_height_px: f32,
    pub column_width_px: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            row_height_px: 16.0,
            column_width_px: 8.0,
        }
    }
}

impl CellMetrics {
    pub fn rows_to_px(&self, rows: f32) -> f32 {
        rows * self.row_height_px
    }

    pub fn px_to_rows(&self, px: f32) -> f32 {
        if self.row_height_px <= 0.0 {
            return 0.0;
        }
        px / self.row_height_px
    }
}

/// How the renderer should draw a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Logo,
    NavLink,
    Catchcopy,
    Name,
    Heading,
    Paragraph,
    CardFrame,
    CardTitle,
    CardText,
    Chip,
    Image,
    Footer,
}

impl BoxKind {
    pub fn is_centered(self) -> bool {
        matches!(self, BoxKind::Catchcopy | BoxKind::Name | BoxKind::Footer)
    }
}

/// One drawable box in cell coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub element: ElementId,
    pub kind: BoxKind,
    pub col: u16,
    /// Document row (header rows included)
    pub row: u32,
    pub width: u16,
    pub height: u16,
    pub lines: Vec<String>,
}

/// Result of laying out a document at a given terminal width
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub header_rows: u16,
    pub document_rows: u32,
    /// Content boxes (scroll with the page), in paint order
    pub boxes: Vec<LayoutBox>,
    /// Header boxes (fixed), in paint order
    pub header_boxes: Vec<LayoutBox>,
}

const IMAGE_HEIGHT: u16 = 5;
const IMAGE_WIDTH: u16 = 16;
const CARD_GAP: u16 = 2;
const CHIP_GAP: u16 = 1;
const MARGIN: u16 = 2;

struct Flow<'a> {
    doc: &'a Document,
    metrics: CellMetrics,
    rects: Vec<(ElementId, Rect)>,
    boxes: Vec<LayoutBox>,
}

impl Layout {
    /// Lay out `doc` for a terminal `width` columns wide and store each
    /// element's pixel rect back into the document.
    pub fn compute(doc: &mut Document, metrics: CellMetrics, width: u16) -> Layout {
        let width = width.max(20);
        let mut flow = Flow {
            doc: &*doc,
            metrics,
            rects: Vec::new(),
            boxes: Vec::new(),
        };

        let body = doc.body();
        let children: Vec<ElementId> = doc
            .get(body)
            .map(|b| b.children().to_vec())
            .unwrap_or_default();

        let header = children
            .iter()
            .copied()
            .find(|&c| doc.get(c).is_some_and(|e| e.tag() == "header"));
        let header_rows = match header {
            Some(h) => flow.header(h, width),
            None => 0,
        };
        let header_boxes = std::mem::take(&mut flow.boxes);

        let mut row = u32::from(header_rows);
        for child in children.into_iter().filter(|&c| Some(c) != header) {
            row = flow.block(child, MARGIN, width.saturating_sub(MARGIN * 2), row);
        }
        let document_rows = row + 1;
        flow.rect(body, 0, 0, width, document_rows);

        let Flow { rects, boxes, .. } = flow;
        for (id, rect) in rects {
            doc.set_rect(id, rect);
        }

        Layout {
            header_rows,
            document_rows,
            boxes,
            header_boxes,
        }
    }

    /// Boxes whose rows overlap `[top_row, top_row + rows)`
    pub fn visible(&self, top_row: u32, rows: u32) -> impl Iterator<Item = &LayoutBox> {
        let bottom = top_row + rows;
        self.boxes
            .iter()
            .filter(move |b| b.row < bottom && b.row + u32::from(b.height) > top_row)
    }

    /// Box (content or header) under a document cell, topmost first
    pub fn hit(&self, col: u16, row: u32, in_header: bool) -> Option<&LayoutBox> {
        let boxes = if in_header {
            &self.header_boxes
        } else {
            &self.boxes
        };
        boxes.iter().rev().find(|b| {
            col >= b.col
                && col < b.col + b.width
                && row >= b.row
                && row < b.row + u32::from(b.height)
        })
    }
}

impl<'a> Flow<'a> {
    fn rect(&mut self, id: ElementId, col: u16, row: u32, width: u16, height: u32) {
        let m = self.metrics;
        self.rects.push((
            id,
            Rect {
                left: f32::from(col) * m.column_width_px,
                top: row as f32 * m.row_height_px,
                width: f32::from(width) * m.column_width_px,
                height: height as f32 * m.row_height_px,
            },
        ));
    }

    #[allow(clippy::too_many_arguments)]
    fn push_box(
        &mut self,
        element: ElementId,
        kind: BoxKind,
        col: u16,
        row: u32,
        width: u16,
        lines: Vec<String>,
        height: u16,
    ) {
        self.rect(element, col, row, width, u32::from(height));
        self.boxes.push(LayoutBox {
            element,
            kind,
            col,
            row,
            width,
            height,
            lines,
        });
    }

    fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.doc
            .get(id)
            .map(|e| e.children().to_vec())
            .unwrap_or_default()
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.doc
            .get(id)
            .is_some_and(|e| e.class_list().contains(class))
    }

    /// Fixed header: padding row, logo + nav row(s), padding row
    fn header(&mut self, header: ElementId, width: u16) -> u16 {
        let doc = self.doc;
        let mut nav_links = Vec::new();
        let mut logo = None;
        for child in self.children(header) {
            if self.has_class(child, "logo") {
                logo = Some(child);
            } else {
                nav_links.extend(self.children(child).into_iter().map(|l| (child, l)));
            }
        }

        let mut logo_width = 0;
        if let Some(logo) = logo {
            let text = doc.get(logo).and_then(|e| e.text()).unwrap_or_default();
            logo_width = (text.width() as u16).min(width.saturating_sub(MARGIN * 2));
            let lines = vec![truncate(text, logo_width)];
            self.push_box(logo, BoxKind::Logo, MARGIN, 1, logo_width, lines, 1);
        }

        // nav links are right-aligned; wrap onto extra rows when crowded
        let labels: Vec<(ElementId, String)> = nav_links
            .iter()
            .map(|&(_, l)| {
                let text = doc.get(l).and_then(|e| e.text()).unwrap_or_default();
                (l, format!(" {} ", text))
            })
            .collect();
        let available = width.saturating_sub(MARGIN * 2 + logo_width + 2).max(8);
        let mut rows: Vec<Vec<(ElementId, String)>> = vec![Vec::new()];
        let mut used = 0u16;
        for (id, label) in labels {
            let w = label.width() as u16;
            if used > 0 && used + w > available {
                rows.push(Vec::new());
                used = 0;
            }
            used += w + 1;
            if let Some(current) = rows.last_mut() {
                current.push((id, label));
            }
        }
        for (i, row_links) in rows.iter().enumerate() {
            let total: u16 = row_links.iter().map(|(_, l)| l.width() as u16 + 1).sum();
            let mut col = width.saturating_sub(MARGIN + total);
            for (id, label) in row_links {
                let w = label.width() as u16;
                self.push_box(*id, BoxKind::NavLink, col, 1 + i as u32, w, vec![label.clone()], 1);
                col += w + 1;
            }
        }
        if let Some(&(nav, _)) = nav_links.first() {
            self.rect(nav, 0, 1, width, rows.len() as u32);
        }

        let header_rows = 2 + rows.len() as u16;
        self.rect(header, 0, 0, width, u32::from(header_rows));
        header_rows
    }

    /// Lay out a block element at `row`; returns the row after it
    fn block(&mut self, id: ElementId, col: u16, width: u16, row: u32) -> u32 {
        let doc = self.doc;
        let Some(el) = doc.get(id) else {
            return row;
        };
        let tag = el.tag().to_string();

        if el.class_list().contains("works-grid") {
            return self.grid(id, col, width, row);
        }
        if el.class_list().contains("experience-tags") {
            return self.chips(id, col, width, row);
        }
        if tag == "img" {
            let w = IMAGE_WIDTH.min(width);
            let x = col + (width.saturating_sub(w)) / 2;
            let alt = el.attr("alt").unwrap_or_default().to_string();
            self.push_box(id, BoxKind::Image, x, row, w, vec![alt], IMAGE_HEIGHT);
            return row + u32::from(IMAGE_HEIGHT) + 1;
        }
        if let Some(text) = el.text() {
            let kind = self.text_kind(id, &tag);
            let text = match kind {
                BoxKind::Heading => format!("■ {}", text),
                _ => text.to_string(),
            };
            let lines = wrap(&text, width);
            let height = lines.len() as u16;
            self.push_box(id, kind, col, row, width, lines, height);
            return row + u32::from(height) + 1;
        }

        // plain container: stack children with section padding
        let padded = el.class_list().contains("section") || el.class_list().contains("hero");
        let start = row;
        let mut cursor = if padded { row + 1 } else { row };
        for child in self.children(id) {
            cursor = self.block(child, col, width, cursor);
        }
        if padded {
            cursor += 1;
        }
        self.rect(id, col, start, width, cursor - start);
        cursor
    }

    fn text_kind(&self, id: ElementId, tag: &str) -> BoxKind {
        if self.has_class(id, "hero-catchcopy") {
            return BoxKind::Catchcopy;
        }
        if self.has_class(id, "hero-name") {
            return BoxKind::Name;
        }
        let in_footer = self
            .doc
            .parent(id)
            .and_then(|p| self.doc.get(p))
            .is_some_and(|p| p.tag() == "footer");
        if in_footer {
            return BoxKind::Footer;
        }
        match tag {
            "h1" | "h2" => BoxKind::Heading,
            _ => BoxKind::Paragraph,
        }
    }

    fn grid(&mut self, grid: ElementId, col: u16, width: u16, row: u32) -> u32 {
        let doc = self.doc;
        let cards = self.children(grid);
        let columns: u16 = if width >= 60 { 2 } else { 1 };
        let card_width = (width - CARD_GAP * (columns - 1)) / columns;
        let inner = card_width.saturating_sub(4).max(1);

        let mut cursor = row;
        for pair in cards.chunks(usize::from(columns)) {
            let mut tallest = 0u16;
            let mut measured = Vec::new();
            for &card in pair {
                let parts: Vec<(ElementId, BoxKind, Vec<String>)> = self
                    .children(card)
                    .into_iter()
                    .filter_map(|child| {
                        let el = doc.get(child)?;
                        let text = el.text()?;
                        let kind = if el.class_list().contains("work-title") {
                            BoxKind::CardTitle
                        } else {
                            BoxKind::CardText
                        };
                        Some((child, kind, wrap(text, inner)))
                    })
                    .collect();
                let height = 2 + parts.iter().map(|(_, _, l)| l.len() as u16).sum::<u16>();
                tallest = tallest.max(height);
                measured.push((card, parts));
            }
            for (i, (card, parts)) in measured.into_iter().enumerate() {
                let x = col + i as u16 * (card_width + CARD_GAP);
                self.push_box(card, BoxKind::CardFrame, x, cursor, card_width, Vec::new(), tallest);
                let mut inner_row = cursor + 1;
                for (child, kind, lines) in parts {
                    let h = lines.len() as u16;
                    self.push_box(child, kind, x + 2, inner_row, inner, lines, h);
                    inner_row += u32::from(h);
                }
            }
            cursor += u32::from(tallest) + 1;
        }
        self.rect(grid, col, row, width, cursor - row);
        cursor
    }

    fn chips(&mut self, container: ElementId, col: u16, width: u16, row: u32) -> u32 {
        let mut x = col;
        let mut cursor = row;
        let mut any = false;
        for tag in self.children(container) {
            let text = self
                .doc
                .get(tag)
                .and_then(|e| e.text())
                .unwrap_or_default()
                .to_string();
            let label = format!(" {} ", truncate(&text, width.saturating_sub(2)));
            let w = label.width() as u16;
            if x > col && x + w > col + width {
                x = col;
                cursor += 2;
            }
            self.push_box(tag, BoxKind::Chip, x, cursor, w, vec![label], 1);
            x += w + CHIP_GAP;
            any = true;
        }
        let end = if any { cursor + 2 } else { cursor };
        self.rect(container, col, row, width, end - row);
        end
    }
}

/// Greedy word wrap by display width; words wider than `width` are split
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let sep = usize::from(!current.is_empty());
        if current_width + sep + word_width <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        for c in word.chars() {
            let cw = c.width().unwrap_or(0);
            if current_width + cw > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += cw;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` to at most `width` display columns
pub fn truncate(text: &str, width: u16) -> String {
    let width = usize::from(width);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    out
}
