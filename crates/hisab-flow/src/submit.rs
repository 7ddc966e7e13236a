//! The `createGroup` submission state machine.

use hisab_api::{ApiError, MutationService};
use hisab_model::{CreateGroupParams, GroupId};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::form::{FieldError, GroupForm};
use crate::notify::Notifier;
use crate::selection::MemberSelection;

pub const GROUP_CREATED: &str = "Group created successfully!";
pub const NEEDS_MEMBERS: &str = "Add at least one member to the group.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    /// Last attempt created this group.
    Succeeded(GroupId),
    /// Last attempt failed with this message.
    Failed(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Add at least one member to the group.")]
    NoMembers,
    #[error("invalid group: {}", join_messages(.0))]
    Invalid(Vec<FieldError>),
    #[error("Failed to create group: {0}")]
    Remote(#[from] ApiError),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Side effects a successful submission triggers after the state reset.
#[derive(Default)]
pub struct SubmitHooks {
    pub on_close: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_success: Option<Box<dyn Fn(&GroupId) + Send + Sync>>,
}

/// Drives one group-creation mutation at a time.
///
/// The state is published on a watch channel so a view can follow it (for
/// the "Creating..." label) without borrowing the controller.
pub struct SubmissionController {
    mutations: Arc<dyn MutationService>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SubmitState>,
}

/// Puts the controller back to `Idle` when a submission future is dropped
/// before it settles.
struct InFlight<'a> {
    state: &'a watch::Sender<SubmitState>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, outcome: SubmitState) {
        self.settled = true;
        self.state.send_replace(outcome);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Group submission abandoned");
            self.state.send_replace(SubmitState::Idle);
        }
    }
}

impl SubmissionController {
    pub fn new(mutations: Arc<dyn MutationService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            mutations,
            notifier,
            state: watch::channel(SubmitState::Idle).0,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        *self.state.borrow() == SubmitState::Submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self, selection: &MemberSelection) -> bool {
        !self.is_submitting() && !selection.is_empty()
    }

    pub fn label(&self) -> &'static str {
        if self.is_submitting() {
            "Creating..."
        } else {
            "Create Group"
        }
    }

    /// Back to `Idle`, forgetting the outcome of the last attempt.
    pub fn reset(&self) {
        if !self.is_submitting() {
            self.state.send_replace(SubmitState::Idle);
        }
    }

    /// Validate, send exactly one `createGroup` and apply its outcome.
    ///
    /// Gates run in the order the view enforces them: an empty selection
    /// keeps the control disabled before the form is even validated. A gate
    /// failure leaves the state untouched and sends nothing.
    ///
    /// On success: notify, reset the form and the selection, then call
    /// `on_close` and `on_success`. On failure: notify and keep the form and
    /// the selection as they were.
    pub async fn submit(
        &mut self,
        form: &mut GroupForm,
        selection: &mut MemberSelection,
        hooks: &SubmitHooks,
    ) -> Result<GroupId, SubmitError> {
        if selection.is_empty() {
            return Err(SubmitError::NoMembers);
        }
        let valid = form.validate().map_err(SubmitError::Invalid)?;

        let params = CreateGroupParams {
            name: valid.name,
            description: valid.description,
            members: selection.ids(),
        };

        self.state.send_replace(SubmitState::Submitting);
        let in_flight = InFlight {
            state: &self.state,
            settled: false,
        };
        debug!(
            "Creating group {:?} with {} members",
            params.name,
            params.members.len()
        );

        match self.mutations.create_group(&params).await {
            Ok(group_id) => {
                in_flight.settle(SubmitState::Succeeded(group_id.clone()));
                info!("Created group {}", group_id);

                self.notifier.success(GROUP_CREATED);
                form.reset();
                selection.reset();
                if let Some(on_close) = &hooks.on_close {
                    on_close();
                }
                if let Some(on_success) = &hooks.on_success {
                    on_success(&group_id);
                }
                Ok(group_id)
            }
            Err(e) => {
                let error = SubmitError::Remote(e);
                let message = error.to_string();
                in_flight.settle(SubmitState::Failed(message.clone()));
                warn!("{}", message);

                self.notifier.error(&message);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingNotifier;
    use hisab_api::MockMutationService;
    use hisab_model::{Member, UserId};
    use mockall::predicate::eq;
    use std::sync::Mutex;

    fn goa_form() -> GroupForm {
        let mut form = GroupForm::new();
        form.set_name("Trip to Goa");
        form.set_description("Expenses for the Goa trip");
        form
    }

    fn two_members() -> MemberSelection {
        let mut selection = MemberSelection::new();
        selection.add(Member::new("u1", "Asha"));
        selection.add(Member::new("u2", "Ravi"));
        selection
    }

    fn goa_params() -> CreateGroupParams {
        CreateGroupParams {
            name: "Trip to Goa".to_string(),
            description: Some("Expenses for the Goa trip".to_string()),
            members: vec![UserId::from("u1"), UserId::from("u2")],
        }
    }

    #[tokio::test]
    async fn test_success_resets_and_runs_hooks_in_order() {
        let mut mutations = MockMutationService::new();
        mutations
            .expect_create_group()
            .with(eq(goa_params()))
            .times(1)
            .returning(|_| Ok(GroupId::from("g123")));

        let notifier = Arc::new(RecordingNotifier::default());
        let mut controller = SubmissionController::new(Arc::new(mutations), notifier.clone());

        let calls = Arc::new(Mutex::new(Vec::<String>::new()));
        let close_calls = Arc::clone(&calls);
        let success_calls = Arc::clone(&calls);
        let hooks = SubmitHooks {
            on_close: Some(Box::new(move || {
                close_calls.lock().unwrap().push("close".to_string())
            })),
            on_success: Some(Box::new(move |id: &GroupId| {
                success_calls.lock().unwrap().push(format!("success {}", id))
            })),
        };

        let mut form = goa_form();
        let mut selection = two_members();
        let id = controller
            .submit(&mut form, &mut selection, &hooks)
            .await
            .unwrap();

        assert_eq!(id, GroupId::from("g123"));
        assert!(form.is_pristine());
        assert!(selection.is_empty());
        assert_eq!(*calls.lock().unwrap(), vec!["close", "success g123"]);
        assert_eq!(notifier.successes(), vec![GROUP_CREATED]);
        assert_eq!(
            controller.state(),
            SubmitState::Succeeded(GroupId::from("g123"))
        );
    }

    #[tokio::test]
    async fn test_empty_name_blocks_submission() {
        let mut mutations = MockMutationService::new();
        mutations.expect_create_group().never();

        let notifier = Arc::new(RecordingNotifier::default());
        let mut controller = SubmissionController::new(Arc::new(mutations), notifier.clone());

        let mut form = GroupForm::new();
        let mut selection = two_members();
        let err = controller
            .submit(&mut form, &mut selection, &SubmitHooks::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Invalid(_)));
        assert_eq!(
            form.error_for(crate::form::Field::Name),
            Some("Group name is required")
        );
        assert_eq!(selection.len(), 2);
        assert_eq!(controller.state(), SubmitState::Idle);
        assert!(notifier.all().is_empty());
    }

    #[tokio::test]
    async fn test_empty_selection_blocks_submission() {
        let mut mutations = MockMutationService::new();
        mutations.expect_create_group().never();

        let notifier = Arc::new(RecordingNotifier::default());
        let mut controller = SubmissionController::new(Arc::new(mutations), notifier);

        let mut form = goa_form();
        let mut selection = MemberSelection::new();
        assert!(!controller.can_submit(&selection));

        let err = controller
            .submit(&mut form, &mut selection, &SubmitHooks::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::NoMembers));
        assert_eq!(err.to_string(), NEEDS_MEMBERS);
        // The disabled control never reaches validation
        assert!(form.errors().is_empty());
        assert_eq!(controller.state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn test_rejection_preserves_state_and_notifies() {
        let mut mutations = MockMutationService::new();
        mutations
            .expect_create_group()
            .times(1)
            .returning(|_| Err(ApiError::Rejected("network error".to_string())));

        let notifier = Arc::new(RecordingNotifier::default());
        let mut controller = SubmissionController::new(Arc::new(mutations), notifier.clone());

        let mut form = goa_form();
        let mut selection = two_members();
        let err = controller
            .submit(&mut form, &mut selection, &SubmitHooks::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Remote(_)));
        let errors = notifier.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("network error"));
        assert_eq!(errors[0], "Failed to create group: network error");

        assert_eq!(form.name(), "Trip to Goa");
        assert_eq!(form.description(), "Expenses for the Goa trip");
        assert_eq!(
            selection.ids(),
            vec![UserId::from("u1"), UserId::from("u2")]
        );
        assert!(matches!(controller.state(), SubmitState::Failed(_)));
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let mut mutations = MockMutationService::new();
        let mut seq = mockall::Sequence::new();
        mutations
            .expect_create_group()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ApiError::Network("timeout".to_string())));
        mutations
            .expect_create_group()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(GroupId::from("g2")));

        let notifier = Arc::new(RecordingNotifier::default());
        let mut controller = SubmissionController::new(Arc::new(mutations), notifier.clone());

        let mut form = goa_form();
        let mut selection = two_members();
        let hooks = SubmitHooks::default();
        assert!(controller
            .submit(&mut form, &mut selection, &hooks)
            .await
            .is_err());
        assert!(controller.can_submit(&selection));

        let id = controller
            .submit(&mut form, &mut selection, &hooks)
            .await
            .unwrap();
        assert_eq!(id, GroupId::from("g2"));
        assert_eq!(notifier.errors().len(), 1);
        assert_eq!(notifier.successes().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_description_is_sent_as_absent() {
        let mut mutations = MockMutationService::new();
        mutations
            .expect_create_group()
            .withf(|params| params.description.is_none() && params.name == "Flat")
            .times(1)
            .returning(|_| Ok(GroupId::from("g1")));

        let mut controller = SubmissionController::new(
            Arc::new(mutations),
            Arc::new(RecordingNotifier::default()),
        );
        let mut form = GroupForm::new();
        form.set_name("Flat");
        let mut selection = two_members();

        controller
            .submit(&mut form, &mut selection, &SubmitHooks::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_watchers_see_submitting_then_outcome() {
        let mut mutations = MockMutationService::new();
        mutations
            .expect_create_group()
            .returning(|_| Ok(GroupId::from("g9")));

        let mut controller = SubmissionController::new(
            Arc::new(mutations),
            Arc::new(RecordingNotifier::default()),
        );
        let rx = controller.watch();
        assert_eq!(controller.label(), "Create Group");

        let mut form = goa_form();
        let mut selection = two_members();
        controller
            .submit(&mut form, &mut selection, &SubmitHooks::default())
            .await
            .unwrap();

        assert_eq!(*rx.borrow(), SubmitState::Succeeded(GroupId::from("g9")));
        assert_eq!(controller.label(), "Create Group");
    }

    struct Stalled;

    #[async_trait::async_trait]
    impl MutationService for Stalled {
        async fn create_group(&self, _params: &CreateGroupParams) -> Result<GroupId, ApiError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_abandoned_submission_returns_to_idle() {
        let mut controller =
            SubmissionController::new(Arc::new(Stalled), Arc::new(RecordingNotifier::default()));
        let rx = controller.watch();

        let mut form = goa_form();
        let mut selection = two_members();
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.submit(&mut form, &mut selection, &SubmitHooks::default()),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(*rx.borrow(), SubmitState::Idle);
        assert!(controller.can_submit(&selection));
        assert_eq!(form.name(), "Trip to Goa");
        assert_eq!(selection.len(), 2);
    }
}
