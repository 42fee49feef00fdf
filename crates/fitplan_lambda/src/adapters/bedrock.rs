use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message,
};
use fitplan_core::config::{require, ServiceConfig, MODEL_ID_VAR};
use fitplan_core::extraction::join_response_chunks;
use tracing::info;

use super::model::TextModel;

const MAX_OUTPUT_TOKENS: i32 = 4096;
const TEMPERATURE: f32 = 0.7;

/// Bedrock Runtime `Converse` client. The model id is checked when a prompt
/// is sent, so resolvers that never generate plans work without it.
pub struct BedrockTextModel {
    client: aws_sdk_bedrockruntime::Client,
    model_id: String,
}

impl BedrockTextModel {
    pub fn new(client: &aws_sdk_bedrockruntime::Client, config: &ServiceConfig) -> Self {
        Self {
            client: client.clone(),
            model_id: config.model_id.clone(),
        }
    }
}

impl TextModel for BedrockTextModel {
    fn generate(&self, prompt: &str) -> Result<String, String> {
        let model_id = require(&self.model_id, MODEL_ID_VAR)
            .map_err(|error| error.to_string())?
            .to_string();
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|error| format!("failed to build model message: {error}"))?;
        let client = self.client.clone();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .converse()
                    .model_id(model_id)
                    .messages(message)
                    .inference_config(
                        InferenceConfiguration::builder()
                            .max_tokens(MAX_OUTPUT_TOKENS)
                            .temperature(TEMPERATURE)
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|error| {
                        format!("failed to invoke model: {}", DisplayErrorContext(error))
                    })
            })
        })?;

        if let Some(usage) = output.usage() {
            info!(
                input_tokens = usage.input_tokens(),
                output_tokens = usage.output_tokens(),
                stop_reason = %output.stop_reason().as_str(),
                "model_invoked"
            );
        }

        let message = output
            .output()
            .and_then(|body| body.as_message().ok())
            .ok_or_else(|| "model returned no message".to_string())?;

        Ok(join_response_chunks(
            message
                .content()
                .iter()
                .filter_map(|block| block.as_text().ok())
                .map(String::as_str),
        ))
    }
}
