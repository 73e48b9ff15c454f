//! The signed-in school.
//!
//! Every listing is scoped to one school. The context is created from the
//! `school` configuration key on load, passed explicitly into every
//! [`ListQuery`](crate::storage::ListQuery) and dropped on logout, which also
//! discards whatever rows were loaded for it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolContext {
    /// Identifier records are scoped by.
    pub school_id: String,
}

impl SchoolContext {
    /// Returns `None` for a blank school identifier.
    pub fn new(school_id: impl Into<String>) -> Option<Self> {
        let school_id = school_id.into().trim().to_string();
        if school_id.is_empty() {
            None
        } else {
            Some(Self { school_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_school_is_rejected() {
        assert_eq!(SchoolContext::new("   "), None);
        assert_eq!(
            SchoolContext::new(" north-high "),
            Some(SchoolContext {
                school_id: "north-high".to_string()
            })
        );
    }
}
