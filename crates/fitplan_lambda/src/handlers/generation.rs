use std::time::Instant;

use fitplan_core::contract::{GeneratePlansInput, GeneratedPlans};
use fitplan_core::error::ServiceError;
use fitplan_core::events::{Notification, UserPlansReady};
use fitplan_core::extraction::extract_json_object;
use fitplan_core::prompts::PromptContext;
use fitplan_core::records::PlanKind;
use serde_json::Value;
use tracing::{error, info};

use super::plans::{save_generated_diet_plan, save_generated_exercise_plan};
use super::profiles::{get_quiz_responses, require_user_id};
use super::{Backends, RequestContext};

/// Generates and stores the requested plan types for one user.
///
/// Plan types run one after another and each plan is persisted as soon as it
/// is extracted. A failure aborts the request but keeps plans already saved.
pub fn generate_user_plans(
    input: GeneratePlansInput,
    context: &RequestContext,
    backends: &Backends<'_>,
) -> Result<GeneratedPlans, ServiceError> {
    let started_at = Instant::now();
    let user_id = require_user_id(&input.user_id)?;
    info!(
        component = "generation",
        event = "generation_started",
        user_id = %user_id,
        plan_type = ?input.plan_type
    );

    let result = generate_and_store(&input, context, backends);
    match &result {
        Ok(generated) => info!(
            component = "generation",
            event = "generation_completed",
            user_id = %user_id,
            exercise_plan_id = generated.exercise_plan.as_ref().map(|p| p.plan_id.as_str()),
            diet_plan_id = generated.diet_plan.as_ref().map(|p| p.plan_id.as_str()),
            duration_ms = started_at.elapsed().as_millis() as u64
        ),
        Err(failure) => error!(
            component = "generation",
            event = "generation_failed",
            user_id = %user_id,
            error_type = failure.error_type(),
            error = %failure,
            duration_ms = started_at.elapsed().as_millis() as u64
        ),
    }
    result
}

fn generate_and_store(
    input: &GeneratePlansInput,
    context: &RequestContext,
    backends: &Backends<'_>,
) -> Result<GeneratedPlans, ServiceError> {
    let profile = backends
        .profiles
        .get_profile(&input.user_id)?
        .ok_or_else(|| ServiceError::NotFound {
            entity: "UserProfile",
            key: format!("userId={}", input.user_id),
        })?;
    let responses = get_quiz_responses(backends.profiles, &input.user_id)?;
    let prompt_context = PromptContext::new(&profile, &responses, input.preferences.as_deref());

    let exercise_plan = if input.plan_type.includes_exercise() {
        let body = request_plan_body(PlanKind::Exercise, &prompt_context, backends)?;
        Some(save_generated_exercise_plan(
            backends.plans,
            &input.user_id,
            &body,
            context,
        )?)
    } else {
        None
    };

    let diet_plan = if input.plan_type.includes_diet() {
        let body = request_plan_body(PlanKind::Diet, &prompt_context, backends)?;
        Some(save_generated_diet_plan(
            backends.plans,
            &input.user_id,
            &body,
            context,
        )?)
    } else {
        None
    };

    let ready = UserPlansReady {
        connection_id: input.connection_id.clone(),
        user_id: input.user_id.clone(),
        exercise_plan_id: exercise_plan.as_ref().map(|plan| plan.plan_id.clone()),
        diet_plan_id: diet_plan.as_ref().map(|plan| plan.plan_id.clone()),
    };
    let notification = Notification::user_plans_ready(&ready)
        .map_err(|error| ServiceError::Publish(error.to_string()))?;
    backends
        .publisher
        .publish(&notification)
        .map_err(ServiceError::Publish)?;

    Ok(GeneratedPlans {
        user_id: input.user_id.clone(),
        exercise_plan,
        diet_plan,
    })
}

fn request_plan_body(
    kind: PlanKind,
    prompt_context: &PromptContext,
    backends: &Backends<'_>,
) -> Result<Value, ServiceError> {
    let prompt = backends.prompts.render(kind, prompt_context)?;
    let reply = backends.model.generate(&prompt).map_err(ServiceError::Model)?;
    extract_json_object(&reply).map_err(|failure| {
        ServiceError::Extraction(format!("{} reply: {failure}", kind.entity_name()))
    })
}
