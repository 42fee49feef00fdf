use fitplan_core::error::StoreError;
use fitplan_core::records::{DietPlan, ExercisePlan, QuizResponse, UserProfile};
use fitplan_core::update_expression::FieldUpdate;

pub trait ProfileStore {
    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Writes a new profile. Fails with `StoreError::ConditionFailed` when
    /// a profile with the same `userId` already exists.
    fn create_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    /// Applies `update` to an existing profile and returns the stored result.
    /// Fails with `StoreError::ConditionFailed` when the profile is absent.
    fn update_profile(&self, user_id: &str, update: &FieldUpdate)
        -> Result<UserProfile, StoreError>;

    fn query_quiz_responses(&self, user_id: &str) -> Result<Vec<QuizResponse>, StoreError>;

    fn put_quiz_response(&self, response: &QuizResponse) -> Result<(), StoreError>;
}

/// Plan tables keyed by (`userId`, `planId`). `latest_*` returns the plan
/// with the greatest `planId` for the user.
pub trait PlanStore {
    fn get_exercise_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> Result<Option<ExercisePlan>, StoreError>;

    fn latest_exercise_plan(&self, user_id: &str) -> Result<Option<ExercisePlan>, StoreError>;

    fn query_exercise_plans(&self, user_id: &str) -> Result<Vec<ExercisePlan>, StoreError>;

    fn put_exercise_plan(&self, plan: &ExercisePlan) -> Result<(), StoreError>;

    fn get_diet_plan(&self, user_id: &str, plan_id: &str) -> Result<Option<DietPlan>, StoreError>;

    fn latest_diet_plan(&self, user_id: &str) -> Result<Option<DietPlan>, StoreError>;

    fn query_diet_plans(&self, user_id: &str) -> Result<Vec<DietPlan>, StoreError>;

    fn put_diet_plan(&self, plan: &DietPlan) -> Result<(), StoreError>;
}
