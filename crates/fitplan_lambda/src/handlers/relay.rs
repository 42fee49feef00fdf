use aws_lambda_events::eventbridge::EventBridgeEvent;
use fitplan_core::error::ServiceError;
use fitplan_core::events::{PlansGeneratedDetail, RelayOutcome, PLANS_GENERATED_DETAIL_TYPE};
use serde_json::Value;
use tracing::{info, warn};

use super::plans::{save_generated_diet_plan, save_generated_exercise_plan};
use super::RequestContext;
use crate::adapters::record_store::PlanStore;

/// Persists the plans carried by a `PlansGenerated` notification.
///
/// Other detail types are ignored. A matching notification without a user id
/// or without both plan objects yields `RelayOutcome::Invalid` and writes
/// nothing.
pub fn handle_plan_event(
    envelope: EventBridgeEvent<Value>,
    context: &RequestContext,
    plans: &dyn PlanStore,
) -> Result<RelayOutcome, ServiceError> {
    if envelope.detail_type != PLANS_GENERATED_DETAIL_TYPE {
        info!(
            component = "relay",
            event = "notification_ignored",
            source = %envelope.source,
            detail_type = %envelope.detail_type
        );
        return Ok(RelayOutcome::Ignored);
    }

    let detail: PlansGeneratedDetail = match serde_json::from_value(envelope.detail) {
        Ok(value) => value,
        Err(error) => return Ok(invalid(format!("malformed detail: {error}"))),
    };

    let Some(user_id) = detail.user_id.filter(|id| !id.trim().is_empty()) else {
        return Ok(invalid("detail.userId is required".to_string()));
    };

    let (Some(exercise_body @ Value::Object(_)), Some(diet_body @ Value::Object(_))) =
        (detail.exercise_plan, detail.diet_plan)
    else {
        return Ok(invalid(
            "detail must include exercisePlan and dietPlan objects".to_string(),
        ));
    };

    let exercise_plan = save_generated_exercise_plan(plans, &user_id, &exercise_body, context)?;
    let diet_plan = save_generated_diet_plan(plans, &user_id, &diet_body, context)?;

    info!(
        component = "relay",
        event = "plans_relayed",
        user_id = %user_id,
        exercise_plan_id = %exercise_plan.plan_id,
        diet_plan_id = %diet_plan.plan_id
    );

    Ok(RelayOutcome::Success {
        user_id,
        connection_id: detail.connection_id,
        exercise_plan_id: exercise_plan.plan_id,
        diet_plan_id: diet_plan.plan_id,
    })
}

fn invalid(message: String) -> RelayOutcome {
    warn!(component = "relay", event = "notification_invalid", message = %message);
    RelayOutcome::Invalid { message }
}
