//! Contacts page: people, groups and the entry point to group creation.

use hisab_api::ApiError;
use hisab_model::{Contacts, GroupId};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::modal::CreateGroupModal;
use crate::navigate::Route;
use crate::submit::SubmitError;
use crate::Services;

pub const NO_PEOPLE: &str = "No contacts yet. Add an expense with someone to see them here.";
pub const NO_GROUPS: &str = "No groups yet. Create a group to start tracking shared expenses.";

/// Query parameter that opens the creation modal on arrival.
pub const CREATE_GROUP_PARAM: &str = "createGroup";

pub struct ContactsPage {
    services: Services,
    contacts: Option<Contacts>,
    modal: CreateGroupModal,
    /// The modal was opened by the `createGroup=true` link.
    linked: bool,
}

impl ContactsPage {
    /// A successful group creation navigates to the new group.
    pub fn new(services: Services) -> Self {
        let navigator = services.navigator.clone();
        let modal = CreateGroupModal::new(services.clone())
            .on_success(move |id| navigator.push(Route::Group(id.clone())));
        Self {
            services,
            contacts: None,
            modal,
            linked: false,
        }
    }

    pub fn with_min_search_chars(mut self, min_chars: usize) -> Self {
        self.modal = self.modal.with_min_search_chars(min_chars);
        self
    }

    pub async fn load(&mut self) -> Result<&Contacts, ApiError> {
        let contacts = self.services.queries.get_contacts().await?;
        debug!(
            "Loaded {} people and {} groups",
            contacts.users.len(),
            contacts.groups.len()
        );
        Ok(self.contacts.insert(contacts))
    }

    pub fn is_loading(&self) -> bool {
        self.contacts.is_none()
    }

    pub fn contacts(&self) -> Option<&Contacts> {
        self.contacts.as_ref()
    }

    /// Empty-state text for the people column.
    pub fn people_placeholder(&self) -> Option<&'static str> {
        match &self.contacts {
            Some(c) if c.users.is_empty() => Some(NO_PEOPLE),
            _ => None,
        }
    }

    /// Empty-state text for the groups column.
    pub fn groups_placeholder(&self) -> Option<&'static str> {
        match &self.contacts {
            Some(c) if c.groups.is_empty() => Some(NO_GROUPS),
            _ => None,
        }
    }

    /// Handle the page's query string (without `?`).
    ///
    /// `createGroup=true` opens the creation modal and is stripped from the
    /// address; other parameters are kept. Returns whether the modal opened.
    pub async fn handle_query(&mut self, query: &str) -> Result<bool, ApiError> {
        let mut requested = false;
        let mut kept = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == CREATE_GROUP_PARAM {
                requested |= value == "true";
            } else {
                kept.append_pair(&key, &value);
            }
        }
        if !requested {
            return Ok(false);
        }

        let kept = kept.finish();
        self.services.navigator.replace(Route::Contacts {
            query: (!kept.is_empty()).then_some(kept),
        });
        self.linked = true;
        self.modal.open().await?;
        Ok(true)
    }

    pub async fn open_create_group(&mut self) -> Result<(), ApiError> {
        self.linked = false;
        self.modal.open().await
    }

    /// Cancel group creation. A modal that came from the link sends the user
    /// back to where they were.
    pub fn cancel_create_group(&mut self) {
        if !self.modal.is_open() {
            return;
        }
        self.modal.dismiss();
        if std::mem::take(&mut self.linked) {
            self.services.navigator.back();
        }
    }

    pub fn modal(&self) -> &CreateGroupModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut CreateGroupModal {
        &mut self.modal
    }

    /// Submit the modal and refresh the lists on success.
    pub async fn submit_group(&mut self) -> Result<GroupId, SubmitError> {
        let id = self.modal.submit().await?;
        self.linked = false;
        if let Err(e) = self.load().await {
            warn!("Failed to refresh contacts: {}", e);
        }
        Ok(id)
    }
}
