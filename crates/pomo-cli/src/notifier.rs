use colored::Colorize;
use pomo_core::error::Result;
use pomo_core::ports::{Notification, NotificationKind, Notifier};

/// Prints notifications as a highlighted banner on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let title = match notification.kind {
            NotificationKind::WorkSessionComplete => notification.title.green().bold(),
            NotificationKind::BreakOver => notification.title.yellow().bold(),
        };
        println!("\n{} {}", title, notification.description);
        Ok(())
    }
}
