// Components module - UI building blocks
//
// - Page view: the portfolio page itself
// - Status bar: hints, scroll offset, header variant
// - Logs panel: captured log entries
//
// Each component is a focused, single-responsibility module.

pub mod logs_panel;
pub mod page_view;
pub mod scrollbar;
pub mod status_bar;
