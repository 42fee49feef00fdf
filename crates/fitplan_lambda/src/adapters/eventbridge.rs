use aws_sdk_eventbridge::error::DisplayErrorContext;
use aws_sdk_eventbridge::types::PutEventsRequestEntry;
use fitplan_core::events::Notification;

use super::notify::NotificationPublisher;

pub struct EventBridgePublisher {
    client: aws_sdk_eventbridge::Client,
    event_bus_name: String,
}

impl EventBridgePublisher {
    pub fn new(client: &aws_sdk_eventbridge::Client, event_bus_name: &str) -> Self {
        Self {
            client: client.clone(),
            event_bus_name: event_bus_name.to_string(),
        }
    }
}

impl NotificationPublisher for EventBridgePublisher {
    fn publish(&self, notification: &Notification) -> Result<(), String> {
        let entry = PutEventsRequestEntry::builder()
            .event_bus_name(&self.event_bus_name)
            .source(&notification.source)
            .detail_type(&notification.detail_type)
            .detail(&notification.detail)
            .build();
        let client = self.client.clone();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_events()
                    .entries(entry)
                    .send()
                    .await
                    .map_err(|error| {
                        format!("failed to put event: {}", DisplayErrorContext(error))
                    })
            })
        })?;

        if output.failed_entry_count() > 0 {
            let reason = output
                .entries()
                .iter()
                .filter_map(|entry| entry.error_message())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(format!("event bus rejected notification: {reason}"));
        }

        Ok(())
    }
}
