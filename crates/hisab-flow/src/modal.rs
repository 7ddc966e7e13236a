//! "Create New Group" modal.

use hisab_api::ApiError;
use hisab_model::{GroupId, Member, UserId};
use tokio::sync::watch;
use tracing::debug;

use crate::form::GroupForm;
use crate::search::{MemberSearch, SearchState};
use crate::selection::MemberSelection;
use crate::submit::{SubmissionController, SubmitError, SubmitHooks, SubmitState, NEEDS_MEMBERS};
use crate::Services;

/// Owns the whole state of one group-creation session.
///
/// Opening always starts from an empty draft and an empty selection;
/// dismissing (cancel or success) clears them again and releases the search
/// subscription.
pub struct CreateGroupModal {
    services: Services,
    open: bool,
    current_user: Option<Member>,
    form: GroupForm,
    selection: MemberSelection,
    search: MemberSearch,
    submitter: SubmissionController,
    hooks: SubmitHooks,
}

impl CreateGroupModal {
    pub fn new(services: Services) -> Self {
        let search = MemberSearch::new(services.queries.clone());
        let submitter =
            SubmissionController::new(services.mutations.clone(), services.notifier.clone());
        Self {
            services,
            open: false,
            current_user: None,
            form: GroupForm::new(),
            selection: MemberSelection::new(),
            search,
            submitter,
            hooks: SubmitHooks::default(),
        }
    }

    pub fn with_min_search_chars(mut self, min_chars: usize) -> Self {
        self.search = MemberSearch::new(self.services.queries.clone()).with_min_chars(min_chars);
        self
    }

    /// Called whenever the modal closes (cancel or success).
    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.on_close = Some(Box::new(f));
        self
    }

    /// Called with the new group id after a successful submission.
    pub fn on_success(mut self, f: impl Fn(&GroupId) + Send + Sync + 'static) -> Self {
        self.hooks.on_success = Some(Box::new(f));
        self
    }

    /// Open with a fresh session and load the current user's badge.
    ///
    /// The modal stays open when the profile cannot be loaded; only the badge
    /// is missing then.
    pub async fn open(&mut self) -> Result<(), ApiError> {
        self.clear();
        self.open = true;
        debug!("Opened group creation");

        let profile = self.services.queries.get_current_user().await;
        self.current_user = profile.as_ref().ok().cloned();
        profile.map(|_| ())
    }

    /// Cancel: discard the session and tell the owner.
    pub fn dismiss(&mut self) {
        if !self.open {
            return;
        }
        self.clear();
        self.open = false;
        debug!("Dismissed group creation");
        if let Some(on_close) = &self.hooks.on_close {
            on_close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Signed-in account, shown as an implicit member.
    pub fn current_user(&self) -> Option<&Member> {
        self.current_user.as_ref()
    }

    pub fn form(&self) -> &GroupForm {
        &self.form
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.set_name(name);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.set_description(description);
    }

    pub fn selection(&self) -> &MemberSelection {
        &self.selection
    }

    pub fn open_picker(&mut self) {
        self.selection.open_picker();
    }

    pub fn close_picker(&mut self) {
        self.selection.close_picker();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search.set_query(query);
    }

    pub fn search_state(&self) -> SearchState<'_> {
        self.search.state()
    }

    pub fn search(&self) -> &MemberSearch {
        &self.search
    }

    /// Wait for the next result set of the current query.
    pub async fn search_changed(&mut self) -> bool {
        self.search.changed().await
    }

    pub fn apply_search_results(&mut self) -> bool {
        self.search.apply_pending()
    }

    /// Pick a candidate from the picker. Returns whether it was new.
    pub fn add_member(&mut self, candidate: Member) -> bool {
        self.selection.add(candidate)
    }

    pub fn remove_member(&mut self, id: &UserId) -> bool {
        self.selection.remove(id)
    }

    /// Inline warning under the member list.
    pub fn member_warning(&self) -> Option<&'static str> {
        self.selection.is_empty().then_some(NEEDS_MEMBERS)
    }

    pub fn submit_enabled(&self) -> bool {
        self.submitter.can_submit(&self.selection)
    }

    pub fn submit_label(&self) -> &'static str {
        self.submitter.label()
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submitter.state()
    }

    pub fn watch_submit(&self) -> watch::Receiver<SubmitState> {
        self.submitter.watch()
    }

    /// Submit the draft. On success the hooks run, the search subscription
    /// is released and the modal ends up closed.
    pub async fn submit(&mut self) -> Result<GroupId, SubmitError> {
        let outcome = self
            .submitter
            .submit(&mut self.form, &mut self.selection, &self.hooks)
            .await;
        if outcome.is_ok() {
            self.search.reset();
            self.open = false;
        }
        outcome
    }

    fn clear(&mut self) {
        self.form.reset();
        self.selection.reset();
        self.search.reset();
        self.submitter.reset();
    }
}
