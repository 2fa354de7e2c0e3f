use std::collections::BTreeSet;

use crate::{Job, JobId};

/// Job ids marked for a bulk command.
///
/// Selection is independent of the displayed page: ids stay selected across
/// pagination and search changes even when their job is no longer visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    ids: BTreeSet<JobId>,
}

impl SelectionSet {
    /// Replaces the selection with exactly the visible jobs.
    pub fn select_all(&mut self, visible: &[Job]) {
        self.ids = visible.iter().map(|job| job.id.clone()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }

    pub fn toggle(&mut self, id: &str, included: bool) {
        if included {
            self.ids.insert(id.to_owned());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &BTreeSet<JobId> {
        &self.ids
    }

    /// State of the "select all" checkbox for `visible`.
    ///
    /// Always derived, never stored: checked iff something is visible and
    /// every visible job is selected.
    pub fn all_selected(&self, visible: &[Job]) -> bool {
        !visible.is_empty() && visible.iter().all(|job| self.ids.contains(&job.id))
    }
}
