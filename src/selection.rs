//! Bulk selection over the visible list

use std::collections::BTreeSet;

/// How much of the list is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// Ids of the emails checked for a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<i64>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id. Returns whether it is now selected.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.ids.extend(ids);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are no longer in `visible`.
    pub fn retain(&mut self, visible: &[i64]) {
        self.ids.retain(|id| visible.contains(id));
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    /// Checkbox state for a list of `total` emails.
    #[must_use]
    pub fn state(&self, total: usize) -> SelectionState {
        if self.ids.is_empty() {
            SelectionState::None
        } else if total > 0 && self.ids.len() == total {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }
}
