//! Notification sinks.

use crate::effects::{Notification, NotificationLevel};
use tokio::sync::mpsc;

/// User-facing notification channel.
///
/// Delivery is fire-and-forget: a notifier must not block and has no way
/// to report failure back into the session.
pub trait Notifier: Send + Sync {
    /// Deliver `notification`.
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the `tracing` log.
///
/// Success at `INFO`, failure at `WARN`. Suits CLIs and headless services.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(target: "gurubook::notify", "{}", notification.message);
            },
            NotificationLevel::Failure => {
                tracing::warn!(target: "gurubook::notify", "{}", notification.message);
            },
        }
    }
}

/// Forwards notifications to an unbounded channel (e.g. a UI task).
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Wrap an existing sender.
    #[must_use]
    pub const fn new(sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self { sender }
    }

    /// Create a notifier and the receiver its notifications arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_notifier_forwards_in_order() {
        let (notifier, mut rx) = ChannelNotifier::channel();

        notifier.notify(Notification::success("one"));
        notifier.notify(Notification::failure("two"));

        assert_eq!(rx.try_recv().ok(), Some(Notification::success("one")));
        assert_eq!(rx.try_recv().ok(), Some(Notification::failure("two")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_not_an_error() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(Notification::success("ignored"));
    }
}
