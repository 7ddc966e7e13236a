//! Routes the flow can send the user to.

use hisab_model::{GroupId, UserId};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Contacts page, with an optional query string (without the `?`).
    Contacts { query: Option<String> },
    Group(GroupId),
    Person(UserId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Contacts { query: None } => "/contacts".to_string(),
            Route::Contacts { query: Some(q) } => format!("/contacts?{}", q),
            Route::Group(id) => format!("/groups/{}", id),
            Route::Person(id) => format!("/person/{}", id),
        }
    }

    /// Parse a path produced by `path`. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["contacts"] => Some(Route::Contacts {
                query: query.filter(|q| !q.is_empty()).map(str::to_string),
            }),
            ["groups", id] if !id.is_empty() => Some(Route::Group(GroupId::from(*id))),
            ["person", id] if !id.is_empty() => Some(Route::Person(UserId::from(*id))),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the user between views.
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);

    /// Swap the current entry without adding history.
    fn replace(&self, route: Route);

    /// Return to the previous view.
    fn back(&self);
}
