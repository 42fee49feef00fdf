use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contract::{CreateUserProfileInput, SaveQuizResponseInput};

pub const USER_ID_ATTRIBUTE: &str = "userId";
pub const QUESTION_ID_ATTRIBUTE: &str = "questionId";
pub const PLAN_ID_ATTRIBUTE: &str = "planId";
pub const CREATED_AT_ATTRIBUTE: &str = "createdAt";
pub const UPDATED_AT_ATTRIBUTE: &str = "updatedAt";

/// Profile item. Updates may write any attribute with any value, so the
/// typed fields are read leniently: a value of the wrong type stays in
/// `attributes` under its own name instead of failing the whole item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UserProfile {
    pub fn from_input(input: CreateUserProfileInput, timestamp: &str) -> Self {
        let mut attributes = input.attributes;
        attributes.retain(|_, value| !value.is_null());
        attributes.remove(CREATED_AT_ATTRIBUTE);
        attributes.remove(UPDATED_AT_ATTRIBUTE);

        Self {
            user_id: input.user_id,
            name: input.name,
            age: input.age,
            gender: input.gender,
            height: input.height,
            weight: input.weight,
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
            attributes,
        }
    }
}

impl TryFrom<Map<String, Value>> for UserProfile {
    type Error = String;

    fn try_from(mut item: Map<String, Value>) -> Result<Self, Self::Error> {
        item.retain(|_, value| !value.is_null());
        let user_id = take_typed(&mut item, USER_ID_ATTRIBUTE, as_string)
            .ok_or_else(|| format!("profile item has no string {USER_ID_ATTRIBUTE}"))?;

        Ok(Self {
            user_id,
            name: take_typed(&mut item, "name", as_string),
            age: take_typed(&mut item, "age", |value| {
                value.as_u64().and_then(|age| u32::try_from(age).ok())
            }),
            gender: take_typed(&mut item, "gender", as_string),
            height: take_typed(&mut item, "height", Value::as_f64),
            weight: take_typed(&mut item, "weight", Value::as_f64),
            created_at: take_typed(&mut item, CREATED_AT_ATTRIBUTE, as_string)
                .unwrap_or_default(),
            updated_at: take_typed(&mut item, UPDATED_AT_ATTRIBUTE, as_string)
                .unwrap_or_default(),
            attributes: item,
        })
    }
}

/// Removes `name` from `item` only when `read` accepts its value.
fn take_typed<T>(
    item: &mut Map<String, Value>,
    name: &str,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let typed = item.get(name).and_then(read)?;
    item.remove(name);
    Some(typed)
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub user_id: String,
    pub question_id: String,
    #[serde(default)]
    pub question_text: String,
    /// Opaque JSON document as sent by the client.
    #[serde(default)]
    pub response_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_number: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl QuizResponse {
    pub fn from_input(input: SaveQuizResponseInput, timestamp: &str) -> Self {
        Self {
            user_id: input.user_id,
            question_id: input.question_id,
            question_text: input.question_text.unwrap_or_default(),
            response_data: input.response_data,
            step_number: input.step_number,
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Exercise,
    Diet,
}

impl PlanKind {
    pub fn entity_name(self) -> &'static str {
        match self {
            Self::Exercise => "ExercisePlan",
            Self::Diet => "DietPlan",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlan {
    pub user_id: String,
    pub plan_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl ExercisePlan {
    /// Builds a plan from a model- or event-supplied JSON body. Fields that
    /// are missing or of the wrong type fall back to empty values.
    pub fn from_generated(user_id: &str, plan_id: &str, timestamp: &str, body: &Value) -> Self {
        Self {
            user_id: user_id.to_string(),
            plan_id: plan_id.to_string(),
            title: string_field(body, "title"),
            description: string_field(body, "description"),
            exercises: array_field(body, "exercises"),
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub user_id: String,
    pub plan_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_calories: Option<u32>,
    #[serde(default)]
    pub meals: Vec<Value>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl DietPlan {
    pub fn from_generated(user_id: &str, plan_id: &str, timestamp: &str, body: &Value) -> Self {
        let dietary_restrictions = array_field(body, "dietaryRestrictions")
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();

        Self {
            user_id: user_id.to_string(),
            plan_id: plan_id.to_string(),
            title: string_field(body, "title"),
            daily_calories: body.get("dailyCalories").and_then(lenient_calories),
            meals: array_field(body, "meals"),
            dietary_restrictions,
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPlans {
    pub exercise_plans: Vec<ExercisePlan>,
    pub diet_plans: Vec<DietPlan>,
}

fn string_field(body: &Value, name: &str) -> String {
    body.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn array_field(body: &Value, name: &str) -> Vec<Value> {
    body.get(name)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn lenient_calories(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v.round() as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(text) => {
            let digits: String = text
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == ',')
                .filter(char::is_ascii_digit)
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn exercise_plan_tolerates_missing_fields() {
        let plan = ExercisePlan::from_generated("user-1", "plan-1", "t0", &json!({"title": 7}));

        assert_eq!(plan.title, "");
        assert_eq!(plan.description, "");
        assert!(plan.exercises.is_empty());
        assert_eq!(plan.created_at, "t0");
    }

    #[test]
    fn diet_plan_reads_calories_from_strings_and_numbers() {
        let from_text = DietPlan::from_generated(
            "user-1",
            "plan-1",
            "t0",
            &json!({"dailyCalories": "2,150 kcal"}),
        );
        let from_float =
            DietPlan::from_generated("user-1", "plan-1", "t0", &json!({"dailyCalories": 1999.6}));
        let from_garbage =
            DietPlan::from_generated("user-1", "plan-1", "t0", &json!({"dailyCalories": "lots"}));

        assert_eq!(from_text.daily_calories, Some(2150));
        assert_eq!(from_float.daily_calories, Some(2000));
        assert_eq!(from_garbage.daily_calories, None);
    }

    #[test]
    fn diet_plan_keeps_only_string_restrictions() {
        let plan = DietPlan::from_generated(
            "user-1",
            "plan-1",
            "t0",
            &json!({"dietaryRestrictions": ["vegan", 3, null, "no nuts"]}),
        );

        assert_eq!(plan.dietary_restrictions, vec!["vegan", "no nuts"]);
    }

    #[test]
    fn profile_round_trips_extra_attributes() {
        let stored = json!({
            "userId": "user-1",
            "name": "Ada",
            "createdAt": "t0",
            "updatedAt": "t1",
            "fitnessGoal": "endurance"
        });

        let profile: UserProfile = serde_json::from_value(stored.clone()).expect("profile parses");
        assert_eq!(profile.attributes.get("fitnessGoal"), Some(&json!("endurance")));
        assert_eq!(serde_json::to_value(&profile).expect("profile serializes"), stored);
    }

    #[test]
    fn wrongly_typed_profile_fields_stay_as_raw_attributes() {
        let stored = json!({
            "userId": "user-1",
            "age": "thirty",
            "height": 172,
            "weight": {"kg": 70},
            "createdAt": "t0",
            "updatedAt": "t1"
        });

        let profile: UserProfile =
            serde_json::from_value(stored.clone()).expect("profile parses");

        assert_eq!(profile.age, None);
        assert_eq!(profile.height, Some(172.0));
        assert_eq!(profile.weight, None);
        assert_eq!(profile.attributes.get("age"), Some(&json!("thirty")));
        assert_eq!(profile.attributes.get("weight"), Some(&json!({"kg": 70})));
        let written = serde_json::to_value(&profile).expect("profile serializes");
        assert_eq!(written["age"], "thirty");
        assert_eq!(written["weight"], json!({"kg": 70}));
        assert_eq!(written["height"], 172.0);
    }

    #[test]
    fn profile_item_without_user_id_is_rejected() {
        let error = serde_json::from_value::<UserProfile>(json!({"userId": 7, "name": "Ada"}))
            .expect_err("numeric userId should fail");
        assert!(error.to_string().contains("userId"));
    }
}
