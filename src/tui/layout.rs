/// Screen regions and responsive breakpoints for the TUI.
///
/// Single source of truth for width thresholds and panel heights - no magic
/// numbers scattered in render code.
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the status bar (top border + text)
const STATUS_ROWS: u16 = 2;
/// Rows taken by the log panel when visible
const LOG_ROWS: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 60 cols: hints dropped from the status bar
    Compact,
    /// 60-99 cols
    Normal,
    /// 100+ cols: full status bar
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        self.ordinal() >= min.ordinal()
    }

    fn ordinal(&self) -> u8 {
        match self {
            Breakpoint::Compact => 0,
            Breakpoint::Normal => 1,
            Breakpoint::Wide => 2,
        }
    }
}

/// Where each part of the screen goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub page: Rect,
    pub logs: Option<Rect>,
    pub status: Rect,
}

impl Screen {
    pub fn split(area: Rect, show_logs: bool) -> Self {
        // keep at least a few page rows on tiny terminals
        let logs = if show_logs && area.height >= LOG_ROWS + STATUS_ROWS + 4 {
            LOG_ROWS
        } else {
            0
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(logs),
                Constraint::Length(STATUS_ROWS),
            ])
            .split(area);
        Self {
            page: chunks[0],
            logs: (logs > 0).then_some(chunks[1]),
            status: chunks[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_thresholds() {
        assert_eq!(Breakpoint::from_width(40), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(60), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(99), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(100), Breakpoint::Wide);
        assert!(Breakpoint::Wide.at_least(Breakpoint::Normal));
        assert!(!Breakpoint::Compact.at_least(Breakpoint::Normal));
    }

    #[test]
    fn screen_split_with_and_without_logs() {
        let area = Rect::new(0, 0, 100, 40);
        let plain = Screen::split(area, false);
        assert_eq!(plain.page.height, 38);
        assert_eq!(plain.logs, None);
        assert_eq!(plain.status.y, 38);

        let logs = Screen::split(area, true);
        assert_eq!(logs.page.height, 30);
        assert_eq!(logs.logs.map(|r| r.height), Some(LOG_ROWS));

        // too small for a log panel
        let tiny = Screen::split(Rect::new(0, 0, 40, 10), true);
        assert_eq!(tiny.logs, None);
    }
}
