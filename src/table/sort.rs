//! Sort controller: a three-state cycle per column.
//!
//! ```text
//! Unsorted ──click k──▶ Ascending(k) ──click k──▶ Descending(k) ──click k──▶ Unsorted
//!     any state ──click j (j ≠ active)──▶ Ascending(j)
//! ```
//!
//! The controller never reorders data. It only emits a [`SortState`] that the
//! host forwards to its data source, since the loaded rows may be a single page.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Applies this direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    /// Header marker for this direction.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// Current sort: a column key and a direction, or no column at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    /// Active sort key; `None` means source-defined order.
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    #[must_use]
    pub const fn unsorted() -> Self {
        Self {
            column: None,
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            column: Some(key.into()),
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            column: Some(key.into()),
            direction: SortDirection::Desc,
        }
    }

    #[must_use]
    pub const fn is_sorted(&self) -> bool {
        self.column.is_some()
    }

    /// Direction applied to `key`, if it is the active column.
    #[must_use]
    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        (self.column.as_deref() == Some(key)).then_some(self.direction)
    }
}

/// Tracks the active sort column and drives the click cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortController {
    state: SortState,
}

impl SortController {
    #[must_use]
    pub fn state(&self) -> SortState {
        self.state.clone()
    }

    /// Advances the cycle for a click on the header with sort key `key` and
    /// returns the new state.
    pub fn click(&mut self, key: &str) -> SortState {
        let next = match self.state.direction_for(key) {
            None => SortState::ascending(key),
            Some(SortDirection::Asc) => SortState::descending(key),
            Some(SortDirection::Desc) => SortState::unsorted(),
        };

        tracing::debug!(
            from = ?self.state.column,
            to = ?next.column,
            direction = ?next.direction,
            "sort changed"
        );

        self.state = next;
        self.state.clone()
    }

    pub fn reset(&mut self) {
        self.state = SortState::unsorted();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_three_states() {
        let mut sort = SortController::default();
        assert_eq!(sort.click("title"), SortState::ascending("title"));
        assert_eq!(sort.click("title"), SortState::descending("title"));
        assert_eq!(sort.click("title"), SortState::unsorted());
        assert_eq!(sort.click("title"), SortState::ascending("title"));
    }

    #[test]
    fn other_column_always_starts_ascending() {
        let mut sort = SortController::default();
        sort.click("title");
        sort.click("title");
        assert_eq!(sort.click("author"), SortState::ascending("author"));
    }

    #[test]
    fn direction_applies_to_ordering() {
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
    }
}
