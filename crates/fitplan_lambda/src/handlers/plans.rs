use fitplan_core::error::ServiceError;
use fitplan_core::records::{DietPlan, ExercisePlan, UserPlans};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::profiles::require_user_id;
use super::RequestContext;
use crate::adapters::record_store::PlanStore;

/// Time-ordered identifier, so the greatest `planId` is the newest plan.
pub fn new_plan_id() -> String {
    Uuid::now_v7().to_string()
}

pub fn get_exercise_plan(
    store: &dyn PlanStore,
    user_id: &str,
    plan_id: Option<&str>,
) -> Result<Option<ExercisePlan>, ServiceError> {
    let user_id = require_user_id(user_id)?;
    let plan = match plan_id.filter(|id| !id.trim().is_empty()) {
        Some(plan_id) => store.get_exercise_plan(user_id, plan_id)?,
        None => store.latest_exercise_plan(user_id)?,
    };
    Ok(plan)
}

pub fn get_diet_plan(
    store: &dyn PlanStore,
    user_id: &str,
    plan_id: Option<&str>,
) -> Result<Option<DietPlan>, ServiceError> {
    let user_id = require_user_id(user_id)?;
    let plan = match plan_id.filter(|id| !id.trim().is_empty()) {
        Some(plan_id) => store.get_diet_plan(user_id, plan_id)?,
        None => store.latest_diet_plan(user_id)?,
    };
    Ok(plan)
}

pub fn get_user_plans(store: &dyn PlanStore, user_id: &str) -> Result<UserPlans, ServiceError> {
    let user_id = require_user_id(user_id)?;
    Ok(UserPlans {
        exercise_plans: store.query_exercise_plans(user_id)?,
        diet_plans: store.query_diet_plans(user_id)?,
    })
}

/// Persists a new, write-once exercise plan built from a generated body.
pub fn save_generated_exercise_plan(
    store: &dyn PlanStore,
    user_id: &str,
    body: &Value,
    context: &RequestContext,
) -> Result<ExercisePlan, ServiceError> {
    let plan = ExercisePlan::from_generated(user_id, &new_plan_id(), &context.event_time, body);
    store.put_exercise_plan(&plan)?;
    info!(
        component = "plans",
        event = "exercise_plan_saved",
        user_id = %plan.user_id,
        plan_id = %plan.plan_id,
        exercises = plan.exercises.len()
    );
    Ok(plan)
}

pub fn save_generated_diet_plan(
    store: &dyn PlanStore,
    user_id: &str,
    body: &Value,
    context: &RequestContext,
) -> Result<DietPlan, ServiceError> {
    let plan = DietPlan::from_generated(user_id, &new_plan_id(), &context.event_time, body);
    store.put_diet_plan(&plan)?;
    info!(
        component = "plans",
        event = "diet_plan_saved",
        user_id = %plan.user_id,
        plan_id = %plan.plan_id,
        meals = plan.meals.len()
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::memory::InMemoryStore;

    fn exercise_plan(user_id: &str, plan_id: &str, title: &str) -> ExercisePlan {
        ExercisePlan::from_generated(user_id, plan_id, "t0", &json!({ "title": title }))
    }

    #[test]
    fn latest_plan_is_the_greatest_plan_id() {
        let store = InMemoryStore::new();
        store
            .put_exercise_plan(&exercise_plan("user-1", "p1", "first"))
            .expect("put p1");
        store
            .put_exercise_plan(&exercise_plan("user-1", "p2", "second"))
            .expect("put p2");
        store
            .put_exercise_plan(&exercise_plan("user-2", "p3", "other user"))
            .expect("put p3");

        let latest = get_exercise_plan(&store, "user-1", None)
            .expect("lookup should succeed")
            .expect("plan should exist");

        assert_eq!(latest.plan_id, "p2");
    }

    #[test]
    fn point_lookup_uses_plan_id() {
        let store = InMemoryStore::new();
        store
            .put_exercise_plan(&exercise_plan("user-1", "p1", "first"))
            .expect("put p1");
        store
            .put_exercise_plan(&exercise_plan("user-1", "p2", "second"))
            .expect("put p2");

        let plan = get_exercise_plan(&store, "user-1", Some("p1"))
            .expect("lookup should succeed")
            .expect("plan should exist");
        assert_eq!(plan.title, "first");
        assert_eq!(
            get_exercise_plan(&store, "user-1", Some("missing")).expect("lookup"),
            None
        );
    }

    #[test]
    fn generated_plan_ids_sort_in_creation_order() {
        let store = InMemoryStore::new();
        let context = RequestContext::new("t0");
        let first = save_generated_diet_plan(&store, "user-1", &json!({"title": "A"}), &context)
            .expect("first save");
        let second = save_generated_diet_plan(&store, "user-1", &json!({"title": "B"}), &context)
            .expect("second save");

        assert!(second.plan_id > first.plan_id);
        let latest = get_diet_plan(&store, "user-1", None)
            .expect("lookup should succeed")
            .expect("plan should exist");
        assert_eq!(latest.plan_id, second.plan_id);
    }

    #[test]
    fn user_plans_collect_both_tables() {
        let store = InMemoryStore::new();
        let context = RequestContext::new("t0");
        save_generated_exercise_plan(&store, "user-1", &json!({}), &context).expect("exercise");
        save_generated_diet_plan(&store, "user-1", &json!({}), &context).expect("diet 1");
        save_generated_diet_plan(&store, "user-1", &json!({}), &context).expect("diet 2");

        let plans = get_user_plans(&store, "user-1").expect("query should succeed");

        assert_eq!(plans.exercise_plans.len(), 1);
        assert_eq!(plans.diet_plans.len(), 2);
        assert!(get_user_plans(&store, "user-9")
            .expect("query should succeed")
            .exercise_plans
            .is_empty());
    }
}
