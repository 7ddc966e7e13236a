//! Notifier and navigator that write to the terminal.

use hisab_flow::{Navigator, Notification, NotificationLevel, Notifier, Route};

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("✓ {}", notification.message),
            NotificationLevel::Error => eprintln!("✗ {}", notification.message),
        }
    }
}

/// Prints where the web client would navigate next.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn push(&self, route: Route) {
        println!("→ {}", route);
    }

    fn replace(&self, route: Route) {
        println!("→ {}", route);
    }

    fn back(&self) {
        println!("← back");
    }
}
