//! Group types for shared-expense groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GroupId, UserId};

/// Group record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_by: UserId,
    pub members: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Payload of the `createGroup` mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Selected members in selection order. The creator is implied.
    pub members: Vec<UserId>,
}
