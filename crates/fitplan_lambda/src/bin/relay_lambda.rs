use aws_config::BehaviorVersion;
use aws_lambda_events::eventbridge::EventBridgeEvent;
use fitplan_core::config::ServiceConfig;
use fitplan_lambda::adapters::dynamo::DynamoPlanStore;
use fitplan_lambda::handlers::relay::handle_plan_event;
use fitplan_lambda::handlers::RequestContext;
use fitplan_lambda::logging::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    config: ServiceConfig,
    dynamo_client: aws_sdk_dynamodb::Client,
}

async fn handle_request(
    event: LambdaEvent<EventBridgeEvent<Value>>,
    deps: &RuntimeDependencies,
) -> Result<Value, Error> {
    let plans = DynamoPlanStore::new(&deps.dynamo_client, &deps.config);
    let outcome = handle_plan_event(event.payload, &RequestContext::now(), &plans)?;

    serde_json::to_value(outcome)
        .map_err(|error| Error::from(format!("failed to serialize relay outcome: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config: ServiceConfig::from_env(),
        dynamo_client: aws_sdk_dynamodb::Client::new(&aws_config),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
