//! Group creation flow for hisab.
//!
//! The modal that creates a group is split into four pieces of state, each
//! owned exclusively by one `CreateGroupModal`:
//! - `MemberSelection`: chosen members, unique by id, in selection order
//! - `MemberSearch`: reactive user lookup with a tri-state presentation
//! - `GroupForm`: name/description draft and its validation
//! - `SubmissionController`: the single in-flight `createGroup` mutation
//!
//! Collaborators are injected through `Services` instead of ambient context.

pub mod contacts;
pub mod form;
pub mod modal;
pub mod navigate;
pub mod notify;
pub mod search;
pub mod selection;
pub mod submit;

#[cfg(test)]
pub(crate) mod test_support;

use hisab_api::{MutationService, QueryService};
use std::sync::Arc;

pub use contacts::ContactsPage;
pub use form::{Field, FieldError, GroupForm, ValidGroup};
pub use modal::CreateGroupModal;
pub use navigate::{Navigator, Route};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use search::{MemberSearch, SearchState};
pub use selection::MemberSelection;
pub use submit::{SubmissionController, SubmitError, SubmitHooks, SubmitState};

/// Everything the flow talks to outside the process.
#[derive(Clone)]
pub struct Services {
    pub queries: Arc<dyn QueryService>,
    pub mutations: Arc<dyn MutationService>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}
