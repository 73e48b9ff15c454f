//! Application state and view model computation.
//!
//! [`AppState`] is the host side of the data table: it owns the loaded page,
//! the total, the loading flag and the [`TableState`], and it decides when to
//! ask the worker for a new page. The table itself is rebuilt on demand by
//! [`screens`](super::screens) because its callbacks are not `Clone`.
//!
//! # Refresh protocol
//!
//! Every page, sort, search, page-size or screen change calls
//! [`AppState::request_refresh`], which bumps `generation`, turns loading on
//! and emits a `List` request tagged with the new generation. A `Listed`
//! response is applied only if it carries the current generation, so a slow
//! answer to an old request can never overwrite a newer one.

use super::modes::{InputMode, Screen, SearchFocus};
use super::screens::{self, ColumnSizes};
use super::Action;
use crate::domain::error::Result;
use crate::domain::{RecordId, SchoolContext};
use crate::storage::ListQuery;
use crate::table::{EmptyState, TableError, TableState, TableViewModel, DEFAULT_PAGE_SIZE};
use crate::ui::components::{CHROME_ROWS, SEARCH_BAR_ROWS};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, HeaderInfo, NotificationInfo, SearchBarInfo, TabInfo, UIViewModel};
use crate::worker::{ScreenRows, WorkerMessage};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;

/// Page sizes offered by `+`/`-`.
pub const PAGE_SIZE_STEPS: [usize; 5] = [5, 10, 20, 50, 100];

/// Runs `$body` with the current screen's table and rows bound to
/// `$table`/`$data`. Evaluates to `Result<_, TableError>`; the error is the
/// table failing to build.
macro_rules! with_screen_table {
    ($rows:expr, $sizes:expr, |$table:ident, $data:ident| $body:expr) => {
        match $rows {
            ScreenRows::Books($data) => screens::books($sizes).map(|$table| $body),
            ScreenRows::Administrators($data) => screens::administrators($sizes).map(|$table| $body),
            ScreenRows::Expenses($data) => screens::expenses($sizes).map(|$table| $body),
        }
    };
}

pub(crate) use with_screen_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A one-line message shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,

    /// The loaded page. Always the collection of `screen`.
    pub rows: ScreenRows,

    /// Records matching the current query across all pages.
    pub total: usize,

    /// Set while a `List` request for `generation` is in flight.
    pub is_loading: bool,

    pub table: TableState<RecordId>,

    /// Focused row within `rows`.
    pub cursor: usize,

    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,

    /// Signed-in school; `None` after logout.
    pub context: Option<SchoolContext>,

    /// Configured school, used to sign back in.
    pub school: Option<String>,

    /// Tag of the latest `List` request.
    pub generation: u64,

    pub notification: Option<Notification>,

    pub column_sizes: ColumnSizes,
}

impl Default for AppState {
    /// Signed out, default theme and page size.
    fn default() -> Self {
        Self {
            screen: Screen::default(),
            rows: ScreenRows::empty(Screen::default().entity()),
            total: 0,
            is_loading: false,
            table: TableState::new(DEFAULT_PAGE_SIZE).unwrap_or_else(|_| TableState::unpaginated()),
            cursor: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme: Theme::default(),
            context: None,
            school: None,
            generation: 0,
            notification: None,
            column_sizes: ColumnSizes::new(),
        }
    }
}

impl AppState {
    /// Creates state on the first screen, signed in to `school` if it is non-blank.
    ///
    /// # Errors
    ///
    /// Returns an error for a page size of zero.
    pub fn new(theme: Theme, school: Option<String>, page_size: usize) -> Result<Self> {
        Ok(Self {
            table: TableState::new(page_size)?,
            theme,
            context: school.as_deref().and_then(SchoolContext::new),
            school,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_column_sizes(mut self, column_sizes: ColumnSizes) -> Self {
        self.column_sizes = column_sizes;
        self
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.table.pagination.as_ref().map_or(0, |p| p.page_size())
    }

    /// The query for the current screen, or `None` when signed out.
    #[must_use]
    pub fn list_query(&self) -> Option<ListQuery> {
        let context = self.context.as_ref()?;
        let mut query = ListQuery::new(context)
            .filter(&self.search_query)
            .sort(self.table.sort.state());
        if let Some(pagination) = &self.table.pagination {
            query = query.page_of(pagination);
        }
        Some(query)
    }

    /// Starts loading the current page. Returns the request to send.
    pub fn request_refresh(&mut self) -> Vec<Action> {
        let Some(query) = self.list_query() else {
            tracing::debug!("not signed in, skipping refresh");
            self.is_loading = false;
            return vec![];
        };

        self.generation += 1;
        self.is_loading = true;
        tracing::debug!(
            generation = self.generation,
            screen = self.screen.title(),
            page = query.page,
            "requesting page"
        );
        vec![Action::PostToWorker(WorkerMessage::list(
            self.screen.entity(),
            query,
            self.generation,
        ))]
    }

    /// Clears the selection and puts the cursor back on the first row.
    ///
    /// Called on page navigation, search change and screen switch. Sorting and
    /// page-size changes keep the selection; keys that leave the page go inert.
    pub fn reset_selection(&mut self) {
        self.table.selection.clear();
        self.cursor = 0;
    }

    /// Applies a `Listed` response. Returns `(should_render, follow-up actions)`.
    ///
    /// Stale generations are dropped. When the reported total no longer reaches
    /// the current page the page is clamped and fetched again.
    pub fn apply_listed(&mut self, generation: u64, rows: ScreenRows, total: usize) -> (bool, Vec<Action>) {
        if generation != self.generation || rows.kind() != self.screen.entity() {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping stale page"
            );
            return (false, vec![]);
        }

        self.is_loading = false;
        self.rows = rows;
        self.total = total;
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));

        let clamped = self
            .table
            .pagination
            .as_mut()
            .is_some_and(|p| p.set_total(total));
        if clamped {
            self.reset_selection();
            return (true, self.request_refresh());
        }
        (true, vec![])
    }

    /// Applies a `Failed` response.
    ///
    /// Failures of superseded `List` requests are ignored; everything else ends
    /// loading and surfaces as an error notification. Loaded rows are kept.
    pub fn apply_failure(&mut self, operation: &str, message: &str, generation: Option<u64>) -> bool {
        if generation.is_some_and(|g| g != self.generation) {
            tracing::debug!(operation, "ignoring failure of superseded request");
            return false;
        }
        if generation.is_some() {
            self.is_loading = false;
        }
        self.notify_error(format!("Could not {operation}: {message}"));
        true
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            level: NotificationLevel::Info,
        });
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            level: NotificationLevel::Error,
        });
    }

    /// Shows `screen` with a fresh table state and loads its first page.
    pub fn switch_screen(&mut self, screen: Screen) -> Vec<Action> {
        let page_size = self.page_size();
        self.screen = screen;
        self.rows = ScreenRows::empty(screen.entity());
        self.total = 0;
        self.table = TableState::new(page_size).unwrap_or_else(|_| TableState::unpaginated());
        self.reset_selection();
        self.input_mode = InputMode::Normal;
        self.search_query.clear();
        self.notification = None;
        self.request_refresh()
    }

    /// Drops the school context and everything loaded for it.
    pub fn logout(&mut self) {
        if let Some(context) = self.context.take() {
            tracing::info!(school = %context.school_id, "signed out");
        }
        // In-flight responses belong to the old session.
        self.generation += 1;
        self.is_loading = false;
        self.rows = ScreenRows::empty(self.screen.entity());
        self.total = 0;
        if let Some(pagination) = self.table.pagination.as_mut() {
            pagination.set_total(0);
            pagination.set_page(1);
        }
        self.reset_selection();
        self.notify("Signed out");
    }

    /// Signs in to the configured school again and loads the current screen.
    pub fn login(&mut self) -> Vec<Action> {
        let Some(context) = self.school.as_deref().and_then(SchoolContext::new) else {
            self.notify_error("No school configured");
            return vec![];
        };
        tracing::info!(school = %context.school_id, "signed in");
        self.notify(format!("Signed in to {}", context.school_id));
        self.context = Some(context);
        self.request_refresh()
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.rows.len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    pub fn move_cursor_up(&mut self) {
        let len = self.rows.len();
        if len > 0 {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Builds the current screen's table view.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen's table is misconfigured.
    pub fn table_view(&self) -> std::result::Result<TableViewModel, TableError> {
        if self.context.is_none() {
            return Ok(TableViewModel::Empty(EmptyState {
                message: "Signed out".to_string(),
                subtitle: "Press L to sign in again".to_string(),
            }));
        }
        let cursor = Some(self.cursor);
        with_screen_table!(&self.rows, &self.column_sizes, |table, data| {
            table.view(data, &self.table, self.is_loading, cursor)
        })
    }

    /// Computes the frame for a `rows` × `cols` terminal.
    ///
    /// Rows are windowed around the cursor when the page is taller than the
    /// space left by the chrome, and cells carry search highlight ranges.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, _cols: usize) -> UIViewModel {
        let mut table = self.table_view().unwrap_or_else(|e| {
            tracing::error!(error = %e, "table misconfigured");
            TableViewModel::Empty(EmptyState {
                message: "This table cannot be shown".to_string(),
                subtitle: e.to_string(),
            })
        });

        let mut rows_above = 0;
        let mut rows_below = 0;

        if let TableViewModel::Populated(populated) = &mut table {
            let available_rows = self.calculate_available_rows(rows);
            let len = populated.rows.len();

            let mut visible_start = self.cursor.saturating_sub(available_rows / 2);
            let visible_end = (visible_start + available_rows).min(len);
            if visible_end - visible_start < available_rows && len >= available_rows {
                visible_start = visible_end.saturating_sub(available_rows);
            }

            rows_above = visible_start;
            rows_below = len - visible_end;
            populated.rows.truncate(visible_end);
            populated.rows.drain(..visible_start);

            if !self.search_query.trim().is_empty() {
                let matcher = SkimMatcherV2::default().ignore_case();
                for cell in populated.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
                    cell.highlight_ranges = compute_highlight_ranges(&cell.text, &self.search_query, &matcher);
                }
            }
        }

        UIViewModel {
            header: self.compute_header(),
            search_bar: self.compute_search_bar(),
            table,
            rows_above,
            rows_below,
            notification: self.notification.as_ref().map(|n| NotificationInfo {
                message: n.message.clone(),
                is_error: n.level == NotificationLevel::Error,
            }),
            footer: self.compute_footer(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        HeaderInfo {
            title: format!(" Registrar · {} ({}) ", self.screen.title(), self.total),
            tabs: Screen::ALL
                .iter()
                .map(|s| TabInfo {
                    label: s.title().to_string(),
                    active: *s == self.screen,
                })
                .collect(),
            school: self.context.as_ref().map(|c| c.school_id.clone()),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Search(SearchFocus::Typing) => "ESC: exit search  Enter: browse results  Type to filter",
            InputMode::Search(SearchFocus::Navigating) => {
                "ESC: exit search  /: edit query  j/k: move  space: select  Enter: action  h/l: page"
            }
            InputMode::Normal if self.context.is_none() => "L: sign in  Tab: screen  q: quit",
            InputMode::Normal => {
                "j/k: move  space/a/c: select  1-9: sort  h/l: page  +/-: size  Enter/x/X: action  b: bulk  /: search  Tab: screen  L: sign out  q: quit"
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        match self.input_mode {
            InputMode::Search(focus) => Some(SearchBarInfo {
                query: self.search_query.clone(),
                is_typing: focus == SearchFocus::Typing,
            }),
            InputMode::Normal => None,
        }
    }

    /// Table rows that fit under the chrome, at least one.
    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        let chrome = match self.input_mode {
            InputMode::Normal => CHROME_ROWS,
            InputMode::Search(_) => CHROME_ROWS + SEARCH_BAR_ROWS,
        };
        let available = total_rows.saturating_sub(chrome);
        if available == 0 {
            1
        } else {
            available
        }
    }
}

/// Character ranges of `text` matched by any whitespace-separated token of
/// `query`, coalesced into `(start, end)` runs with exclusive ends.
fn compute_highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    let indices: BTreeSet<usize> = query
        .split_whitespace()
        .filter_map(|token| matcher.fuzzy_indices(text, token))
        .flat_map(|(_score, indices)| indices)
        .collect();

    let mut ranges = Vec::new();
    let mut start = None;
    let mut prev = None;

    for idx in indices {
        match (start, prev) {
            (Some(_), Some(p)) if idx == p + 1 => {
                prev = Some(idx);
            }
            (Some(s), Some(p)) => {
                ranges.push((s, p + 1));
                start = Some(idx);
                prev = Some(idx);
            }
            _ => {
                start = Some(idx);
                prev = Some(idx);
            }
        }
    }

    if let (Some(s), Some(p)) = (start, prev) {
        ranges.push((s, p + 1));
    }

    ranges
}
