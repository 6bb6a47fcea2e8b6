use tracing::info;

use super::Notifier;

/// Fallback notification sink that writes to the log stream. Hosting
/// shells replace this with a real desktop notification provider.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!("[notification] {title}: {body}");
    }
}
