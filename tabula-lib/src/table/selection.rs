//! Selection set

use std::collections::HashSet;

use crate::model::RowId;

/// The ids of the rows an operator has ticked in one table instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<RowId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id is selected.
    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    /// Selects an id.
    pub fn insert(&mut self, id: RowId) {
        self.ids.insert(id);
    }

    /// Deselects an id.
    pub fn remove(&mut self, id: &RowId) {
        self.ids.remove(id);
    }

    /// Flips the selection state of one id.
    pub fn toggle(&mut self, id: RowId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// "Select all": if every candidate is already selected, deselects them;
    /// otherwise selects all of them.
    pub fn toggle_all(&mut self, candidates: &[RowId]) {
        if self.contains_all(candidates) {
            for id in candidates {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(candidates.iter().copied());
        }
    }

    /// Returns `true` if every candidate is selected and there is at least one.
    pub fn contains_all(&self, candidates: &[RowId]) -> bool {
        !candidates.is_empty() && candidates.iter().all(|id| self.ids.contains(id))
    }

    /// Drops ids that are not in `keep`.
    pub fn retain_only(&mut self, keep: &HashSet<RowId>) {
        self.ids.retain(|id| keep.contains(id));
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the selected ids in a stable order.
    pub fn to_vec(&self) -> Vec<RowId> {
        let mut ids: Vec<RowId> = self.ids.iter().copied().collect();
        ids.sort();
        ids
    }
}

impl FromIterator<RowId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = RowId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
