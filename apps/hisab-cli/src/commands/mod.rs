pub mod contacts;
pub mod group;
pub mod user;

use std::time::Duration;

pub use contacts::cmd_contacts;
pub use group::cmd_group_create;
pub use user::{cmd_user_add, cmd_user_list, cmd_user_search, cmd_user_use, cmd_user_whoami};

/// Upper bound on waiting for a search subscription to deliver.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
