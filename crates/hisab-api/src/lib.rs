//! Data service abstraction for hisab.
//!
//! The flow crate talks to the data service only through these traits so it
//! never depends on a concrete backend:
//! - `QueryService`: reads, where `search_users` is reactive and keeps
//!   re-delivering results as the underlying data changes
//! - `MutationService`: imperative writes with a single response
//!
//! `hisab-api-memory` provides an in-process implementation.

use async_trait::async_trait;
use futures::Stream;
use hisab_model::{Contacts, CreateGroupParams, GroupId, Member};
use std::pin::Pin;
use thiserror::Error;

/// Uniform error type for all data service backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not signed in")]
    Unauthenticated,
    /// The service refused the request; the message is meant for the user.
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Stream of query results. Each item is a complete, fresh result set.
pub type QueryStream<T> = Pin<Box<dyn Stream<Item = Result<T, ApiError>> + Send>>;

/// Read side of the data service.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Profile of the signed-in account.
    async fn get_current_user(&self) -> Result<Member, ApiError>;

    /// People and groups visible to the signed-in account.
    async fn get_contacts(&self) -> Result<Contacts, ApiError>;

    /// Subscribe to users matching `query` by name or email.
    ///
    /// The stream yields the current matches first and then a new result set
    /// whenever the data behind it changes. It ends only when dropped.
    async fn search_users(&self, query: &str) -> Result<QueryStream<Vec<Member>>, ApiError>;
}

/// Write side of the data service.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait MutationService: Send + Sync {
    /// Create a group with the signed-in account as creator.
    async fn create_group(&self, params: &CreateGroupParams) -> Result<GroupId, ApiError>;
}
