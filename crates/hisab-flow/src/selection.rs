//! Members chosen for a new group.

use hisab_model::{Member, UserId};
use tracing::debug;

/// Ordered set of selected members plus the open/closed state of the picker
/// used to add them.
///
/// Entries are unique by id and kept in selection order. The only way to
/// change the content is `add`, `remove` and `reset`.
#[derive(Clone, Debug, Default)]
pub struct MemberSelection {
    members: Vec<Member>,
    picker_open: bool,
}

impl MemberSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `candidate` unless a member with the same id is already selected.
    /// Closes the picker either way. Returns whether the set changed.
    pub fn add(&mut self, candidate: Member) -> bool {
        self.picker_open = false;
        if self.contains(&candidate.id) {
            debug!("Member {} already selected", candidate.id);
            return false;
        }
        self.members.push(candidate);
        true
    }

    /// Remove the member with `id`. Returns whether the set changed.
    pub fn remove(&mut self, id: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| &m.id != id);
        self.members.len() != before
    }

    pub fn reset(&mut self) {
        self.members.clear();
        self.picker_open = false;
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> Vec<UserId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn open_picker(&mut self) {
        self.picker_open = true;
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }
}
