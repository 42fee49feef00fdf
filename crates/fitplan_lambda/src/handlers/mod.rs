use chrono::{SecondsFormat, Utc};
use fitplan_core::prompts::PromptRenderer;

use crate::adapters::model::TextModel;
use crate::adapters::notify::NotificationPublisher;
use crate::adapters::record_store::{PlanStore, ProfileStore};

pub mod generation;
pub mod plans;
pub mod profiles;
pub mod relay;
pub mod router;

/// Per-request values fixed when the invocation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub event_time: String,
}

impl RequestContext {
    pub fn new(event_time: impl Into<String>) -> Self {
        Self {
            event_time: event_time.into(),
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Adapters a resolver request may touch.
pub struct Backends<'a> {
    pub profiles: &'a dyn ProfileStore,
    pub plans: &'a dyn PlanStore,
    pub model: &'a dyn TextModel,
    pub publisher: &'a dyn NotificationPublisher,
    pub prompts: &'a PromptRenderer,
}
