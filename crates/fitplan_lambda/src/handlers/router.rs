use fitplan_core::contract::{
    CreateUserProfileInput, GeneratePlansInput, InputArgs, PlanLookupArgs, SaveQuizResponseInput,
    UpdateUserProfileInput, UserIdArgs,
};
use fitplan_core::error::ServiceError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use super::{generation, plans, profiles, Backends, RequestContext};

/// Every GraphQL field served by the resolver Lambda.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetUserProfile,
    GetQuizResponses,
    GetExercisePlan,
    GetDietPlan,
    GetUserPlans,
    CreateUserProfile,
    UpdateUserProfile,
    SaveQuizResponse,
    GenerateUserPlansWithFlow,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Self::GetUserProfile,
        Self::GetQuizResponses,
        Self::GetExercisePlan,
        Self::GetDietPlan,
        Self::GetUserPlans,
        Self::CreateUserProfile,
        Self::UpdateUserProfile,
        Self::SaveQuizResponse,
        Self::GenerateUserPlansWithFlow,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            Self::GetUserProfile => "getUserProfile",
            Self::GetQuizResponses => "getQuizResponses",
            Self::GetExercisePlan => "getExercisePlan",
            Self::GetDietPlan => "getDietPlan",
            Self::GetUserPlans => "getUserPlans",
            Self::CreateUserProfile => "createUserProfile",
            Self::UpdateUserProfile => "updateUserProfile",
            Self::SaveQuizResponse => "saveQuizResponse",
            Self::GenerateUserPlansWithFlow => "generateUserPlansWithFlow",
        }
    }

    pub fn from_field_name(name: &str) -> Result<Self, ServiceError> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.field_name() == name)
            .ok_or_else(|| ServiceError::UnrecognizedOperation(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverRequest {
    pub operation: String,
    pub arguments: Value,
}

/// Inbound resolver event. AppSync direct resolvers name the field in
/// `info.fieldName`; other callers send `operation`.
#[derive(Debug, Deserialize)]
struct ResolverEvent {
    #[serde(default)]
    operation: Option<String>,
    #[serde(default)]
    info: Option<ResolverInfo>,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolverInfo {
    #[serde(default)]
    field_name: Option<String>,
}

/// Accepts `{operation, arguments}` as well as the AppSync direct resolver
/// shape `{info: {fieldName}, arguments}`. `info.fieldName` wins when both
/// are present.
pub fn normalize_resolver_event(event: Value) -> Result<ResolverRequest, ServiceError> {
    let event: ResolverEvent = serde_json::from_value(event).map_err(|error| {
        ServiceError::InvalidPayload(format!("malformed resolver event: {error}"))
    })?;

    let operation = event
        .info
        .and_then(|info| info.field_name)
        .or(event.operation)
        .ok_or_else(|| {
            ServiceError::InvalidPayload("resolver event must name an operation".to_string())
        })?;

    Ok(ResolverRequest {
        operation,
        arguments: event.arguments.unwrap_or_else(|| json!({})),
    })
}

pub fn route_request(
    event: Value,
    context: &RequestContext,
    backends: &Backends<'_>,
) -> Result<Value, ServiceError> {
    let request = normalize_resolver_event(event)?;
    let operation = Operation::from_field_name(&request.operation).inspect_err(|failure| {
        error!(component = "resolver", event = "operation_rejected", error = %failure);
    })?;

    info!(
        component = "resolver",
        event = "operation_started",
        operation = operation.field_name()
    );
    dispatch(operation, request.arguments, context, backends).inspect_err(|failure| {
        error!(
            component = "resolver",
            event = "operation_failed",
            operation = operation.field_name(),
            error_type = failure.error_type(),
            error = %failure
        );
    })
}

pub fn dispatch(
    operation: Operation,
    arguments: Value,
    context: &RequestContext,
    backends: &Backends<'_>,
) -> Result<Value, ServiceError> {
    match operation {
        Operation::GetUserProfile => {
            let args: UserIdArgs = parse_arguments(operation, arguments)?;
            to_output(profiles::get_profile(backends.profiles, &args.user_id)?)
        }
        Operation::GetQuizResponses => {
            let args: UserIdArgs = parse_arguments(operation, arguments)?;
            to_output(profiles::get_quiz_responses(backends.profiles, &args.user_id)?)
        }
        Operation::GetExercisePlan => {
            let args: PlanLookupArgs = parse_arguments(operation, arguments)?;
            to_output(plans::get_exercise_plan(
                backends.plans,
                &args.user_id,
                args.plan_id.as_deref(),
            )?)
        }
        Operation::GetDietPlan => {
            let args: PlanLookupArgs = parse_arguments(operation, arguments)?;
            to_output(plans::get_diet_plan(
                backends.plans,
                &args.user_id,
                args.plan_id.as_deref(),
            )?)
        }
        Operation::GetUserPlans => {
            let args: UserIdArgs = parse_arguments(operation, arguments)?;
            to_output(plans::get_user_plans(backends.plans, &args.user_id)?)
        }
        Operation::CreateUserProfile => {
            let args: InputArgs<CreateUserProfileInput> = parse_arguments(operation, arguments)?;
            to_output(profiles::create_profile(backends.profiles, args.input, context)?)
        }
        Operation::UpdateUserProfile => {
            let args: InputArgs<UpdateUserProfileInput> = parse_arguments(operation, arguments)?;
            to_output(profiles::update_profile(backends.profiles, args.input, context)?)
        }
        Operation::SaveQuizResponse => {
            let args: InputArgs<SaveQuizResponseInput> = parse_arguments(operation, arguments)?;
            to_output(profiles::save_quiz_response(backends.profiles, args.input, context)?)
        }
        Operation::GenerateUserPlansWithFlow => {
            let args: InputArgs<GeneratePlansInput> = parse_arguments(operation, arguments)?;
            to_output(generation::generate_user_plans(args.input, context, backends)?)
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    operation: Operation,
    arguments: Value,
) -> Result<T, ServiceError> {
    serde_json::from_value(arguments).map_err(|error| {
        ServiceError::InvalidArguments(format!("{}: {error}", operation.field_name()))
    })
}

fn to_output(value: impl Serialize) -> Result<Value, ServiceError> {
    serde_json::to_value(value).map_err(|error| ServiceError::Serialization(error.to_string()))
}
