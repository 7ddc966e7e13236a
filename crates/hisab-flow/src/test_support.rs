//! Recording collaborators for flow tests.

use crate::navigate::{Navigator, Route};
use crate::notify::{Notification, NotificationLevel, Notifier};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NotificationLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(NotificationLevel::Success)
    }

    fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nav {
    Push(Route),
    Replace(Route),
    Back,
}

#[derive(Default)]
pub struct RecordingNavigator {
    seen: Mutex<Vec<Nav>>,
}

impl RecordingNavigator {
    pub fn all(&self) -> Vec<Nav> {
        self.seen.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.seen.lock().unwrap().push(Nav::Push(route));
    }

    fn replace(&self, route: Route) {
        self.seen.lock().unwrap().push(Nav::Replace(route));
    }

    fn back(&self) {
        self.seen.lock().unwrap().push(Nav::Back);
    }
}
