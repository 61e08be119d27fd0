use std::collections::HashSet;

use shared::domain::{BlogId, BlogPost};

/// Posts marked for bulk action. Independent of the filtered view: ids stay
/// selected when a filter change hides them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<BlogId>,
}

impl Selection {
    pub fn toggle(&mut self, id: &BlogId) {
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    /// Clears the selection when it is as large as `visible`, otherwise
    /// replaces it with exactly the visible ids.
    pub fn toggle_all(&mut self, visible: &[BlogPost]) {
        if self.ids.len() == visible.len() {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|post| post.id.clone()).collect();
        }
    }

    pub fn all_selected(&self, visible: &[BlogPost]) -> bool {
        !visible.is_empty() && self.ids.len() == visible.len()
    }

    pub fn forget(&mut self, id: &BlogId) {
        self.ids.remove(id);
    }

    pub fn contains(&self, id: &BlogId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn sorted_ids(&self) -> Vec<BlogId> {
        let mut ids: Vec<BlogId> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}
