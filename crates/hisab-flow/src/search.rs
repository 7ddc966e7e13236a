//! Reactive member lookup behind the "Add Members" picker.
//!
//! Every change of the query text replaces the live `search_users`
//! subscription. Deliveries are tagged with the generation of the query that
//! produced them, so results of a superseded query can never overwrite the
//! results of the current one.

use futures::StreamExt;
use hisab_api::{ApiError, QueryService};
use hisab_model::Member;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_MIN_CHARS: usize = 2;
pub const SEARCHING: &str = "Searching...";
pub const NO_USERS_FOUND: &str = "No users found";

/// What the picker shows for the current query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchState<'a> {
    /// Query below the presentational threshold, whatever the backend says.
    QueryTooShort { min_chars: usize },
    /// The current query has not delivered yet.
    InFlight,
    /// Latest result set of the current query. Empty means "no users found".
    Results(&'a [Member]),
}

impl SearchState<'_> {
    /// Placeholder text for the list, `None` when there are results to show.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            SearchState::QueryTooShort { min_chars } => Some(format!(
                "Type at least {} characters to search",
                min_chars
            )),
            SearchState::InFlight => Some(SEARCHING.to_string()),
            SearchState::Results([]) => Some(NO_USERS_FOUND.to_string()),
            SearchState::Results(_) => None,
        }
    }
}

struct SearchUpdate {
    generation: u64,
    result: Result<Vec<Member>, ApiError>,
}

/// Live `search_users` subscription. Dropping it stops delivery.
struct Subscription {
    task: JoinHandle<()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Subscription {
    fn spawn(
        queries: Arc<dyn QueryService>,
        query: String,
        generation: u64,
        tx: mpsc::UnboundedSender<SearchUpdate>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut stream = match queries.search_users(&query).await {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = tx.send(SearchUpdate {
                        generation,
                        result: Err(e),
                    });
                    return;
                }
            };
            while let Some(result) = stream.next().await {
                if tx.send(SearchUpdate { generation, result }).is_err() {
                    break;
                }
            }
        });
        Self { task }
    }
}

/// Search box state of the member picker.
///
/// `set_query` must be called from within a tokio runtime.
pub struct MemberSearch {
    queries: Arc<dyn QueryService>,
    min_chars: usize,
    query: String,
    generation: u64,
    results: Option<Vec<Member>>,
    subscription: Option<Subscription>,
    tx: mpsc::UnboundedSender<SearchUpdate>,
    rx: mpsc::UnboundedReceiver<SearchUpdate>,
}

impl MemberSearch {
    pub fn new(queries: Arc<dyn QueryService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            queries,
            min_chars: DEFAULT_MIN_CHARS,
            query: String::new(),
            generation: 0,
            results: None,
            subscription: None,
            tx,
            rx,
        }
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars.max(1);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Replace the query text and resubscribe.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query && self.subscription.is_some() {
            return;
        }

        // Drop the old subscription before the new one starts delivering
        self.subscription = None;
        self.generation += 1;
        self.query = query;
        self.results = None;
        debug!(
            "Searching users for {:?} (generation {})",
            self.query, self.generation
        );
        self.subscription = Some(Subscription::spawn(
            Arc::clone(&self.queries),
            self.query.clone(),
            self.generation,
            self.tx.clone(),
        ));
    }

    pub fn state(&self) -> SearchState<'_> {
        if self.query.chars().count() < self.min_chars {
            return SearchState::QueryTooShort {
                min_chars: self.min_chars,
            };
        }
        match &self.results {
            None => SearchState::InFlight,
            Some(results) => SearchState::Results(results),
        }
    }

    /// Apply deliveries that already arrived. Returns whether anything changed.
    pub fn apply_pending(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.rx.try_recv() {
            changed |= self.apply(update);
        }
        changed
    }

    /// Wait until the current query delivers a result set.
    ///
    /// Returns `false` right away when no subscription is live. A live
    /// subscription only resolves this when the data changes, so callers that
    /// need a bound should wrap it in `tokio::time::timeout`.
    pub async fn changed(&mut self) -> bool {
        if self.subscription.is_none() {
            return false;
        }
        while let Some(update) = self.rx.recv().await {
            if self.apply(update) {
                return true;
            }
        }
        false
    }

    /// Drop the subscription and clear the query.
    pub fn reset(&mut self) {
        self.subscription = None;
        self.generation += 1;
        self.query.clear();
        self.results = None;
        while self.rx.try_recv().is_ok() {}
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn apply(&mut self, update: SearchUpdate) -> bool {
        if update.generation != self.generation {
            debug!(
                "Discarding results of superseded search (generation {}, current {})",
                update.generation, self.generation
            );
            return false;
        }
        let members = update.result.unwrap_or_else(|e| {
            warn!("User search for {:?} failed: {}", self.query, e);
            Vec::new()
        });
        self.results = Some(members);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisab_api::{MockQueryService, QueryStream};
    use hisab_api_memory::MemoryDataService;
    use hisab_model::UserId;
    use std::time::Duration;

    fn once(members: Vec<Member>) -> QueryStream<Vec<Member>> {
        Box::pin(futures::stream::iter(vec![Ok::<_, ApiError>(members)]))
    }

    async fn next_change(search: &mut MemberSearch) {
        let changed = tokio::time::timeout(Duration::from_millis(200), search.changed())
            .await
            .expect("timeout");
        assert!(changed);
    }

    #[tokio::test]
    async fn test_empty_query_is_too_short() {
        let search = MemberSearch::new(Arc::new(MockQueryService::new()));
        let state = search.state();
        assert_eq!(state, SearchState::QueryTooShort { min_chars: 2 });
        assert_eq!(
            state.placeholder().as_deref(),
            Some("Type at least 2 characters to search")
        );
    }

    #[tokio::test]
    async fn test_short_query_ignores_backend_results() {
        let mut mock = MockQueryService::new();
        mock.expect_search_users()
            .returning(|_| Ok(once(vec![Member::new("u1", "Asha")])));

        let mut search = MemberSearch::new(Arc::new(mock));
        search.set_query("a");
        next_change(&mut search).await;

        assert_eq!(search.state(), SearchState::QueryTooShort { min_chars: 2 });
    }

    #[tokio::test]
    async fn test_in_flight_until_first_delivery() {
        let mut mock = MockQueryService::new();
        mock.expect_search_users().returning(|_| {
            let slow = futures::stream::once(async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, ApiError>(vec![Member::new("u2", "Ravi")])
            });
            Ok(Box::pin(slow) as QueryStream<Vec<Member>>)
        });

        let mut search = MemberSearch::new(Arc::new(mock));
        search.set_query("ra");
        assert_eq!(search.state(), SearchState::InFlight);
        assert_eq!(search.state().placeholder().as_deref(), Some("Searching..."));

        next_change(&mut search).await;
        match search.state() {
            SearchState::Results(members) => assert_eq!(members[0].id, UserId::from("u2")),
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(search.state().placeholder(), None);
    }

    #[tokio::test]
    async fn test_empty_results_mean_no_users_found() {
        let mut mock = MockQueryService::new();
        mock.expect_search_users().returning(|_| Ok(once(vec![])));

        let mut search = MemberSearch::new(Arc::new(mock));
        search.set_query("zz");
        next_change(&mut search).await;

        assert_eq!(search.state(), SearchState::Results(&[]));
        assert_eq!(
            search.state().placeholder().as_deref(),
            Some("No users found")
        );
    }

    #[tokio::test]
    async fn test_lookup_error_presents_as_empty_results() {
        let mut mock = MockQueryService::new();
        mock.expect_search_users()
            .returning(|_| Err(ApiError::Network("offline".to_string())));

        let mut search = MemberSearch::new(Arc::new(mock));
        search.set_query("asha");
        next_change(&mut search).await;

        assert_eq!(search.state(), SearchState::Results(&[]));
    }

    #[tokio::test]
    async fn test_stale_generation_is_discarded() {
        let mut mock = MockQueryService::new();
        mock.expect_search_users().returning(|_| Ok(once(vec![])));

        let mut search = MemberSearch::new(Arc::new(mock));
        search.set_query("ra");
        search.set_query("rav");

        let stale = SearchUpdate {
            generation: search.generation - 1,
            result: Ok(vec![Member::new("u9", "Stale")]),
        };
        assert!(!search.apply(stale));
        assert_ne!(
            search.state(),
            SearchState::Results(&[Member::new("u9", "Stale")])
        );
    }

    #[tokio::test]
    async fn test_superseded_query_never_shows() {
        let mut mock = MockQueryService::new();
        mock.expect_search_users().returning(|query| {
            let delay = if query == "ra" { 50 } else { 0 };
            let name = format!("match for {}", query);
            let stream = futures::stream::once(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, ApiError>(vec![Member::new("u1", name)])
            });
            Ok(Box::pin(stream) as QueryStream<Vec<Member>>)
        });

        let mut search = MemberSearch::new(Arc::new(mock));
        search.set_query("ra");
        search.set_query("rav");
        next_change(&mut search).await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        search.apply_pending();

        match search.state() {
            SearchState::Results(members) => assert_eq!(members[0].name, "match for rav"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_results_follow_data_changes() {
        let service = MemoryDataService::new();
        service.upsert_user(Member::new("me", "Gaurav"));
        service.sign_in(&UserId::from("me")).unwrap();

        let mut search = MemberSearch::new(Arc::new(service.clone()));
        search.set_query("pri");
        next_change(&mut search).await;
        assert_eq!(search.state(), SearchState::Results(&[]));

        let priya = Member::new("u4", "Priya").with_email("priya@example.com");
        service.upsert_user(priya.clone());
        next_change(&mut search).await;
        assert_eq!(search.state(), SearchState::Results(&[priya]));
    }

    #[tokio::test]
    async fn test_reset_drops_subscription() {
        let mut mock = MockQueryService::new();
        mock.expect_search_users().returning(|_| Ok(once(vec![])));

        let mut search = MemberSearch::new(Arc::new(mock));
        search.set_query("asha");
        assert!(search.is_subscribed());

        search.reset();
        assert!(!search.is_subscribed());
        assert_eq!(search.query(), "");
        assert!(!search.changed().await);
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let search = MemberSearch::new(Arc::new(MockQueryService::new())).with_min_chars(3);
        assert_eq!(
            search.state().placeholder().as_deref(),
            Some("Type at least 3 characters to search")
        );
    }
}
