//! Input modes and the screen being shown.
//!
//! ```text
//! Normal ──/──▶ Search(Typing) ──Enter──▶ Search(Navigating) ──/──▶ Search(Typing)
//!    ▲                 │                          │
//!    └──────Esc────────┴───────────Esc────────────┘
//! ```

use crate::worker::EntityKind;

/// Focus within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keystrokes edit the query.
    Typing,
    /// Keystrokes drive the table while the query stays applied.
    Navigating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search(SearchFocus),
}

/// One table screen per record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Books,
    Administrators,
    Expenses,
}

impl Screen {
    /// Tab order.
    pub const ALL: [Self; 3] = [Self::Books, Self::Administrators, Self::Expenses];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Books => "Books",
            Self::Administrators => "Administrators",
            Self::Expenses => "Expenses",
        }
    }

    #[must_use]
    pub const fn entity(self) -> EntityKind {
        match self {
            Self::Books => EntityKind::Books,
            Self::Administrators => EntityKind::Administrators,
            Self::Expenses => EntityKind::Expenses,
        }
    }

    /// The next tab, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Books => Self::Administrators,
            Self::Administrators => Self::Expenses,
            Self::Expenses => Self::Books,
        }
    }

    /// Noun for `count` records of this screen, for notifications.
    #[must_use]
    pub const fn noun(self, count: usize) -> &'static str {
        match (self, count) {
            (Self::Books, 1) => "book",
            (Self::Books, _) => "books",
            (Self::Administrators, 1) => "administrator",
            (Self::Administrators, _) => "administrators",
            (Self::Expenses, 1) => "expense",
            (Self::Expenses, _) => "expenses",
        }
    }
}

impl From<EntityKind> for Screen {
    fn from(entity: EntityKind) -> Self {
        match entity {
            EntityKind::Books => Self::Books,
            EntityKind::Administrators => Self::Administrators,
            EntityKind::Expenses => Self::Expenses,
        }
    }
}
