use aws_config::BehaviorVersion;
use fitplan_core::config::ServiceConfig;
use fitplan_core::prompts::PromptRenderer;
use fitplan_lambda::adapters::bedrock::BedrockTextModel;
use fitplan_lambda::adapters::dynamo::{DynamoPlanStore, DynamoProfileStore};
use fitplan_lambda::adapters::eventbridge::EventBridgePublisher;
use fitplan_lambda::adapters::notify::{NoopPublisher, NotificationPublisher};
use fitplan_lambda::handlers::router::route_request;
use fitplan_lambda::handlers::{Backends, RequestContext};
use fitplan_lambda::logging::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

struct RuntimeDependencies {
    config: ServiceConfig,
    dynamo_client: aws_sdk_dynamodb::Client,
    bedrock_client: aws_sdk_bedrockruntime::Client,
    eventbridge_client: aws_sdk_eventbridge::Client,
    prompts: PromptRenderer,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<Value, Error> {
    info!(request_id = %event.context.request_id, "resolver_invoked");

    let profiles = DynamoProfileStore::new(&deps.dynamo_client, &deps.config);
    let plans = DynamoPlanStore::new(&deps.dynamo_client, &deps.config);
    let model = BedrockTextModel::new(&deps.bedrock_client, &deps.config);
    let event_bridge = deps
        .config
        .event_bus()
        .map(|bus| EventBridgePublisher::new(&deps.eventbridge_client, bus));
    let noop_publisher = NoopPublisher;

    let backends = Backends {
        profiles: &profiles,
        plans: &plans,
        model: &model,
        publisher: event_bridge
            .as_ref()
            .map(|value| value as &dyn NotificationPublisher)
            .unwrap_or(&noop_publisher),
        prompts: &deps.prompts,
    };

    Ok(route_request(event.payload, &RequestContext::now(), &backends)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config: ServiceConfig::from_env(),
        dynamo_client: aws_sdk_dynamodb::Client::new(&aws_config),
        bedrock_client: aws_sdk_bedrockruntime::Client::new(&aws_config),
        eventbridge_client: aws_sdk_eventbridge::Client::new(&aws_config),
        prompts: PromptRenderer::new()?,
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
