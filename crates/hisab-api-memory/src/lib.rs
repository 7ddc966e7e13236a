//! In-memory data service using DashMap and tokio broadcast channels.
//!
//! This implementation is suitable for:
//! - The `hisab` CLI, which persists it as a JSON snapshot between runs
//! - Development and testing of the flow crate
//!
//! Reactive queries are driven by a single change channel: every write
//! publishes a tick and every live `search_users` stream re-runs its query.

mod snapshot;

pub use snapshot::{Snapshot, SnapshotError};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use futures::StreamExt;
use hisab_api::{ApiError, MutationService, QueryService, QueryStream};
use hisab_model::{Contacts, CreateGroupParams, Group, GroupId, GroupSummary, Member, UserId};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info};

const CHANNEL_CAPACITY: usize = 100;

/// Queries shorter than this never match anything.
pub const MIN_QUERY_CHARS: usize = 2;

struct Inner {
    users: DashMap<UserId, Member>,
    groups: DashMap<GroupId, Group>,
    current_user: RwLock<Option<UserId>>,
    changes: broadcast::Sender<()>,
}

impl Inner {
    fn current_user_id(&self) -> Result<UserId, ApiError> {
        self.current_user
            .read()
            .map_err(|_| ApiError::Backend("session lock poisoned".to_string()))?
            .clone()
            .ok_or(ApiError::Unauthenticated)
    }

    fn search(&self, query: &str) -> Vec<Member> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        let current = self.current_user_id().ok();

        let mut matches: Vec<Member> = self
            .users
            .iter()
            .filter(|entry| Some(entry.key()) != current.as_ref())
            .filter(|entry| {
                let user = entry.value();
                user.name.to_lowercase().contains(&needle)
                    || user
                        .email
                        .as_ref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matches
    }

    fn notify(&self) {
        // No receivers is fine
        let _ = self.changes.send(());
    }
}

/// In-process data service.
///
/// Cloning is cheap and clones share the same data set.
#[derive(Clone)]
pub struct MemoryDataService {
    inner: Arc<Inner>,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                users: DashMap::new(),
                groups: DashMap::new(),
                current_user: RwLock::new(None),
                changes: broadcast::channel(CHANNEL_CAPACITY).0,
            }),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let service = Self::new();
        for user in snapshot.users {
            service.inner.users.insert(user.id.clone(), user);
        }
        for group in snapshot.groups {
            service.inner.groups.insert(group.id.clone(), group);
        }
        service
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users(),
            groups: self.groups(),
        }
    }

    /// Act as `user_id` for all following queries and mutations.
    pub fn sign_in(&self, user_id: &UserId) -> Result<(), ApiError> {
        if !self.inner.users.contains_key(user_id) {
            return Err(ApiError::NotFound(format!("user {}", user_id)));
        }
        let mut current = self
            .inner
            .current_user
            .write()
            .map_err(|_| ApiError::Backend("session lock poisoned".to_string()))?;
        *current = Some(user_id.clone());
        debug!("Signed in as {}", user_id);
        Ok(())
    }

    /// Insert or replace a user and wake reactive queries.
    pub fn upsert_user(&self, user: Member) {
        debug!("Upserting user {}", user.id);
        self.inner.users.insert(user.id.clone(), user);
        self.inner.notify();
    }

    pub fn find_user(&self, user_id: &UserId) -> Option<Member> {
        self.inner.users.get(user_id).map(|u| u.value().clone())
    }

    /// All users sorted by name.
    pub fn users(&self) -> Vec<Member> {
        let mut users: Vec<Member> = self
            .inner
            .users
            .iter()
            .map(|u| u.value().clone())
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        users
    }

    /// All groups in creation order.
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self
            .inner
            .groups
            .iter()
            .map(|g| g.value().clone())
            .collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        groups
    }
}

impl Default for MemoryDataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryService for MemoryDataService {
    async fn get_current_user(&self) -> Result<Member, ApiError> {
        let user_id = self.inner.current_user_id()?;
        self.find_user(&user_id)
            .ok_or_else(|| ApiError::NotFound(format!("user {}", user_id)))
    }

    async fn get_contacts(&self) -> Result<Contacts, ApiError> {
        let me = self.inner.current_user_id()?;

        let mut groups: Vec<Group> = self
            .inner
            .groups
            .iter()
            .filter(|g| g.value().has_member(&me))
            .map(|g| g.value().clone())
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let mut people: Vec<Member> = Vec::new();
        for group in &groups {
            for member_id in group.members.iter().filter(|id| **id != me) {
                if people.iter().any(|p| &p.id == member_id) {
                    continue;
                }
                if let Some(user) = self.find_user(member_id) {
                    people.push(user);
                }
            }
        }
        people.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(Contacts {
            users: people,
            groups: groups
                .into_iter()
                .map(|g| GroupSummary {
                    member_count: g.members.len(),
                    id: g.id,
                    name: g.name,
                })
                .collect(),
        })
    }

    async fn search_users(&self, query: &str) -> Result<QueryStream<Vec<Member>>, ApiError> {
        // Subscribe before the first read so no write slips in between
        let rx = self.inner.changes.subscribe();
        let initial = self.inner.search(query);

        let inner = Arc::clone(&self.inner);
        let query = query.to_string();
        // A lagged receiver still means "something changed", so re-run either way
        let updates =
            BroadcastStream::new(rx).map(move |_| Ok::<_, ApiError>(inner.search(&query)));

        let stream =
            futures::stream::once(async move { Ok::<_, ApiError>(initial) }).chain(updates);
        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl MutationService for MemoryDataService {
    async fn create_group(&self, params: &CreateGroupParams) -> Result<GroupId, ApiError> {
        let creator = self.inner.current_user_id()?;

        if params.name.is_empty() {
            return Err(ApiError::Rejected("Group name is required".to_string()));
        }
        if params.members.is_empty() {
            return Err(ApiError::Rejected(
                "A group needs at least one other member".to_string(),
            ));
        }
        if let Some(unknown) = params
            .members
            .iter()
            .find(|id| !self.inner.users.contains_key(*id))
        {
            return Err(ApiError::NotFound(format!("user {}", unknown)));
        }

        let mut members = vec![creator.clone()];
        for id in &params.members {
            if !members.contains(id) {
                members.push(id.clone());
            }
        }

        let group = Group {
            id: GroupId::generate(),
            name: params.name.clone(),
            description: params.description.clone(),
            created_by: creator,
            members,
            created_at: Utc::now(),
        };
        let id = group.id.clone();
        info!(
            "Created group {} ({}) with {} members",
            group.name,
            id,
            group.members.len()
        );
        self.inner.groups.insert(id.clone(), group);
        self.inner.notify();

        Ok(id)
    }
}
