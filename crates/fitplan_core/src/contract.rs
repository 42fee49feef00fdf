use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::records::{DietPlan, ExercisePlan};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserIdArgs {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanLookupArgs {
    pub user_id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
}

/// Mutation arguments arrive wrapped in a single `input` object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputArgs<T> {
    pub input: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserProfileInput {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Partial profile update. Every non-null field besides the key is written
/// under its own name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileInput {
    pub user_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuizResponseInput {
    pub user_id: String,
    pub question_id: String,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub response_data: String,
    #[serde(default)]
    pub step_number: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    Exercise,
    Diet,
    Both,
}

impl PlanType {
    pub fn includes_exercise(self) -> bool {
        matches!(self, Self::Exercise | Self::Both)
    }

    pub fn includes_diet(self) -> bool {
        matches!(self, Self::Diet | Self::Both)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlansInput {
    pub user_id: String,
    pub plan_type: PlanType,
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlans {
    pub user_id: String,
    pub exercise_plan: Option<ExercisePlan>,
    pub diet_plan: Option<DietPlan>,
}
