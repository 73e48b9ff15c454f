//! Frame-level view model.
//!
//! Built by `AppState::compute_viewmodel` around the table's own
//! [`TableViewModel`], adding the chrome around it: screen tabs, search bar,
//! notification and key hints. Rows are already windowed to the terminal
//! height and carry search highlight ranges.

use crate::table::TableViewModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub search_bar: Option<SearchBarInfo>,
    pub table: TableViewModel,
    /// Rows hidden above the visible window, for the scroll indicator.
    pub rows_above: usize,
    pub rows_below: usize,
    pub notification: Option<NotificationInfo>,
    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub tabs: Vec<TabInfo>,
    /// Signed-in school, `None` after logout.
    pub school: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// Whether keystrokes currently edit the query.
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationInfo {
    pub message: String,
    pub is_error: bool,
}
