use std::collections::HashSet;

use uuid::Uuid;

/// Device ids the user has checked, kept apart from the filter state so a
/// selection survives page navigation and sort changes.
///
/// Select-all is deliberately scoped to the visible page: flipping to the
/// next page never silently grows the selection, so a bulk action can only
/// cover rows the user has actually seen.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    ids: HashSet<Uuid>,
}

impl SelectionSet {
    pub fn new() -> Self {
        SelectionSet::default()
    }

    pub fn toggle(&mut self, id: Uuid) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Toggle over the currently displayed page. If every visible row is
    /// already selected, deselects exactly those rows; otherwise selects
    /// them all. Never touches ids from other pages.
    pub fn select_all_visible(&mut self, visible: &[Uuid]) {
        if visible.is_empty() {
            return;
        }
        if visible.iter().all(|id| self.ids.contains(id)) {
            for id in visible {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(visible.iter().copied());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    /// Snapshot for a bulk request body.
    pub fn ids(&self) -> Vec<Uuid> {
        self.ids.iter().copied().collect()
    }
}
