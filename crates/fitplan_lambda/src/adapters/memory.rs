//! In-process adapters for tests and local runs.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use fitplan_core::error::StoreError;
use fitplan_core::events::Notification;
use fitplan_core::records::{DietPlan, ExercisePlan, QuizResponse, UserProfile};
use fitplan_core::update_expression::FieldUpdate;
use serde_json::{Map, Value};

use super::model::TextModel;
use super::notify::NotificationPublisher;
use super::record_store::{PlanStore, ProfileStore};

type CompositeKey = (String, String);
type Item = Map<String, Value>;

/// Mirrors the four tables. Profiles are kept as raw items and decoded on
/// read, like DynamoDB items. Range queries return sort-key order, like a
/// DynamoDB `Query` with ascending index traversal.
#[derive(Default)]
pub struct InMemoryStore {
    profiles: Mutex<BTreeMap<String, Item>>,
    quiz_responses: Mutex<BTreeMap<CompositeKey, QuizResponse>>,
    exercise_plans: Mutex<BTreeMap<CompositeKey, ExercisePlan>>,
    diet_plans: Mutex<BTreeMap<CompositeKey, DietPlan>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exercise_plan_count(&self) -> usize {
        self.exercise_plans.lock().expect("poisoned mutex").len()
    }

    pub fn diet_plan_count(&self) -> usize {
        self.diet_plans.lock().expect("poisoned mutex").len()
    }
}

fn partition<V: Clone>(map: &BTreeMap<CompositeKey, V>, user_id: &str) -> Vec<V> {
    map.iter()
        .filter(|((owner, _), _)| owner == user_id)
        .map(|(_, value)| value.clone())
        .collect()
}

fn encode_profile(profile: &UserProfile) -> Result<Item, StoreError> {
    match serde_json::to_value(profile) {
        Ok(Value::Object(item)) => Ok(item),
        Ok(_) => Err(StoreError::Backend("profile is not an object".to_string())),
        Err(error) => Err(StoreError::Backend(format!("failed to encode item: {error}"))),
    }
}

fn decode_profile(item: &Item) -> Result<UserProfile, StoreError> {
    serde_json::from_value(Value::Object(item.clone()))
        .map_err(|error| StoreError::Backend(format!("invalid profile item: {error}")))
}

impl ProfileStore for InMemoryStore {
    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        self.profiles
            .lock()
            .expect("poisoned mutex")
            .get(user_id)
            .map(decode_profile)
            .transpose()
    }

    fn create_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let item = encode_profile(profile)?;
        let mut profiles = self.profiles.lock().expect("poisoned mutex");
        if profiles.contains_key(&profile.user_id) {
            return Err(StoreError::ConditionFailed);
        }
        profiles.insert(profile.user_id.clone(), item);
        Ok(())
    }

    /// Commits the assignments before decoding the new item, as `UpdateItem`
    /// with `ALL_NEW` does.
    fn update_profile(
        &self,
        user_id: &str,
        update: &FieldUpdate,
    ) -> Result<UserProfile, StoreError> {
        let mut profiles = self.profiles.lock().expect("poisoned mutex");
        let item = profiles
            .get_mut(user_id)
            .ok_or(StoreError::ConditionFailed)?;
        for (name, value) in update.assignments() {
            item.insert(name.clone(), value.clone());
        }
        decode_profile(item)
    }

    fn query_quiz_responses(&self, user_id: &str) -> Result<Vec<QuizResponse>, StoreError> {
        Ok(partition(
            &self.quiz_responses.lock().expect("poisoned mutex"),
            user_id,
        ))
    }

    fn put_quiz_response(&self, response: &QuizResponse) -> Result<(), StoreError> {
        self.quiz_responses.lock().expect("poisoned mutex").insert(
            (response.user_id.clone(), response.question_id.clone()),
            response.clone(),
        );
        Ok(())
    }
}

impl PlanStore for InMemoryStore {
    fn get_exercise_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<ExercisePlan>, StoreError> {
        Ok(self
            .exercise_plans
            .lock()
            .expect("poisoned mutex")
            .get(&(user_id.to_string(), plan_id.to_string()))
            .cloned())
    }

    fn latest_exercise_plan(&self, user_id: &str) -> Result<Option<ExercisePlan>, StoreError> {
        Ok(self.query_exercise_plans(user_id)?.pop())
    }

    fn query_exercise_plans(&self, user_id: &str) -> Result<Vec<ExercisePlan>, StoreError> {
        Ok(partition(
            &self.exercise_plans.lock().expect("poisoned mutex"),
            user_id,
        ))
    }

    fn put_exercise_plan(&self, plan: &ExercisePlan) -> Result<(), StoreError> {
        self.exercise_plans
            .lock()
            .expect("poisoned mutex")
            .insert((plan.user_id.clone(), plan.plan_id.clone()), plan.clone());
        Ok(())
    }

    fn get_diet_plan(&self, user_id: &str, plan_id: &str) -> Result<Option<DietPlan>, StoreError> {
        Ok(self
            .diet_plans
            .lock()
            .expect("poisoned mutex")
            .get(&(user_id.to_string(), plan_id.to_string()))
            .cloned())
    }

    fn latest_diet_plan(&self, user_id: &str) -> Result<Option<DietPlan>, StoreError> {
        Ok(self.query_diet_plans(user_id)?.pop())
    }

    fn query_diet_plans(&self, user_id: &str) -> Result<Vec<DietPlan>, StoreError> {
        Ok(partition(
            &self.diet_plans.lock().expect("poisoned mutex"),
            user_id,
        ))
    }

    fn put_diet_plan(&self, plan: &DietPlan) -> Result<(), StoreError> {
        self.diet_plans
            .lock()
            .expect("poisoned mutex")
            .insert((plan.user_id.clone(), plan.plan_id.clone()), plan.clone());
        Ok(())
    }
}

/// Replays canned replies in order and records every prompt it receives.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|reply| Ok(reply.to_string())))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("poisoned mutex").clone()
    }
}

impl TextModel for ScriptedModel {
    fn generate(&self, prompt: &str) -> Result<String, String> {
        self.prompts
            .lock()
            .expect("poisoned mutex")
            .push(prompt.to_string());
        self.replies
            .lock()
            .expect("poisoned mutex")
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()))
    }
}

#[derive(Default)]
pub struct CapturingPublisher {
    notifications: Mutex<Vec<Notification>>,
}

impl CapturingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().expect("poisoned mutex").clone()
    }
}

impl NotificationPublisher for CapturingPublisher {
    fn publish(&self, notification: &Notification) -> Result<(), String> {
        self.notifications
            .lock()
            .expect("poisoned mutex")
            .push(notification.clone());
        Ok(())
    }
}
