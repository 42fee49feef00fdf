use fitplan_core::events::Notification;

pub trait NotificationPublisher {
    fn publish(&self, notification: &Notification) -> Result<(), String>;
}

/// Used when no event bus is configured.
pub struct NoopPublisher;

impl NotificationPublisher for NoopPublisher {
    fn publish(&self, _notification: &Notification) -> Result<(), String> {
        Ok(())
    }
}
