//! Selection tracker keyed by record identity.
//!
//! The tracker stores keys, never records, so a data refresh cannot leave it
//! holding stale objects. A key whose record is no longer loaded is inert: it
//! is ignored by [`SelectionTracker::selected_records`] until the set is
//! cleared.
//!
//! # Persistence policy
//!
//! Selection is per page. It survives re-sorting and reloads of the same page,
//! and the host clears it on page navigation, page-size change, search change
//! and screen switch (see `AppState::reset_selection`). Keys are never carried
//! across pages.

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct SelectionTracker<K> {
    keys: HashSet<K>,
}

impl<K> Default for SelectionTracker<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> SelectionTracker<K> {
    /// Flips membership of `key`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Deselects every visible key if all of them are selected, otherwise
    /// selects all of them.
    pub fn toggle_all(&mut self, visible: &[K]) {
        if !visible.is_empty() && visible.iter().all(|k| self.keys.contains(k)) {
            for key in visible {
                self.keys.remove(key);
            }
        } else {
            self.keys.extend(visible.iter().cloned());
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    #[must_use]
    pub fn is_selected(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Number of keys held, including inert ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Records from `data` whose key is selected, in `data` order.
    pub fn selected_records<'a, T>(&self, data: &'a [T], key_fn: impl Fn(&T) -> K) -> Vec<&'a T> {
        data.iter().filter(|r| self.keys.contains(&key_fn(r))).collect()
    }

    /// Whether every key in `visible` is selected (false for an empty page).
    #[must_use]
    pub fn all_selected(&self, visible: &[K]) -> bool {
        !visible.is_empty() && visible.iter().all(|k| self.keys.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionTracker::default();
        assert!(selection.toggle(7));
        assert!(selection.is_selected(&7));
        assert!(!selection.toggle(7));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_selects_missing_then_clears() {
        let mut selection = SelectionTracker::default();
        selection.toggle(2);
        selection.toggle_all(&[1, 2, 3]);
        assert!(selection.all_selected(&[1, 2, 3]));
        selection.toggle_all(&[1, 2, 3]);
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_leaves_keys_outside_the_page() {
        let mut selection = SelectionTracker::default();
        selection.toggle(99);
        selection.toggle_all(&[1, 2]);
        selection.toggle_all(&[1, 2]);
        assert!(selection.is_selected(&99));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn selected_records_keep_data_order() {
        let data = [5, 3, 9, 1];
        let mut selection = SelectionTracker::default();
        selection.toggle(1);
        selection.toggle(5);
        assert_eq!(selection.selected_records(&data, |v| *v), vec![&5, &1]);
    }
}
