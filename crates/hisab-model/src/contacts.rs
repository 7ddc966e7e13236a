//! Contacts page payload.

use serde::{Deserialize, Serialize};

use super::{GroupId, Member};

/// Group entry as listed on the contacts page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: GroupId,
    pub name: String,
    pub member_count: usize,
}

/// People and groups visible to the current user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    pub users: Vec<Member>,
    pub groups: Vec<GroupSummary>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}
