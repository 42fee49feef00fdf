use crate::error::ServiceError;

pub const USER_PROFILE_TABLE_VAR: &str = "USER_PROFILE_TABLE";
pub const QUIZ_RESPONSE_TABLE_VAR: &str = "QUIZ_RESPONSE_TABLE";
pub const EXERCISE_PLAN_TABLE_VAR: &str = "EXERCISE_PLAN_TABLE";
pub const DIET_PLAN_TABLE_VAR: &str = "DIET_PLAN_TABLE";
pub const MODEL_ID_VAR: &str = "BEDROCK_MODEL_ID";
pub const EVENT_BUS_NAME_VAR: &str = "EVENT_BUS_NAME";

/// Deployment settings injected through the environment. Missing values
/// default to empty strings and are rejected where they are used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub user_profile_table: String,
    pub quiz_response_table: String,
    pub exercise_plan_table: String,
    pub diet_plan_table: String,
    pub model_id: String,
    pub event_bus_name: String,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            user_profile_table: read(USER_PROFILE_TABLE_VAR),
            quiz_response_table: read(QUIZ_RESPONSE_TABLE_VAR),
            exercise_plan_table: read(EXERCISE_PLAN_TABLE_VAR),
            diet_plan_table: read(DIET_PLAN_TABLE_VAR),
            model_id: read(MODEL_ID_VAR),
            event_bus_name: read(EVENT_BUS_NAME_VAR),
        }
    }

    /// `None` when no event bus is configured; publishing is then skipped.
    pub fn event_bus(&self) -> Option<&str> {
        non_empty(&self.event_bus_name)
    }
}

/// Returns `value` or a `Misconfiguration` error naming `variable`.
pub fn require<'a>(value: &'a str, variable: &str) -> Result<&'a str, ServiceError> {
    non_empty(value).ok_or_else(|| ServiceError::Misconfiguration(variable.to_string()))
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
