use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Detail type of externally produced notifications carrying both plans.
pub const PLANS_GENERATED_DETAIL_TYPE: &str = "PlansGenerated";
/// Detail type published after the resolver persisted freshly generated plans.
pub const USER_PLANS_READY_DETAIL_TYPE: &str = "UserPlansReady";
pub const NOTIFICATION_SOURCE: &str = "fitplan.plans";

/// `detail` of a `PlansGenerated` notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlansGeneratedDetail {
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub exercise_plan: Option<Value>,
    #[serde(default)]
    pub diet_plan: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RelayOutcome {
    Ignored,
    Invalid {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Success {
        user_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        connection_id: Option<String>,
        exercise_plan_id: String,
        diet_plan_id: String,
    },
}

/// Published to the event bus once generated plans are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPlansReady {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_plan_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub source: String,
    pub detail_type: String,
    pub detail: String,
}

impl Notification {
    pub fn user_plans_ready(ready: &UserPlansReady) -> Result<Self, serde_json::Error> {
        Ok(Self {
            source: NOTIFICATION_SOURCE.to_string(),
            detail_type: USER_PLANS_READY_DETAIL_TYPE.to_string(),
            detail: serde_json::to_string(ready)?,
        })
    }
}
