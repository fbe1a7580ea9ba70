use crate::ai::gateway::{
    ContentPart, GatewayError, GatewayMessage, GatewayRequest, MessageRole, ModelGateway,
    OutputSchema,
};
use async_trait::async_trait;
use openrouter_api::{
    api::request::ResponseFormatConfig,
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    models::structured::{JsonSchemaConfig, JsonSchemaDefinition},
    types::chat::{ChatCompletionRequest, Message},
};
use serde::Serialize;
use serde_json::{Map, Value, json};

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    config: ModelConfig,
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Model => "assistant",
    }
}

/// Converts a gateway message into the chat-completions wire shape. Text-only
/// messages use the plain constructor; messages with images are built from
/// their JSON form with `image_url` data URLs.
fn to_openrouter_message(message: &GatewayMessage) -> Result<Message, GatewayError> {
    let role = role_name(message.role);
    let has_image = message
        .parts
        .iter()
        .any(|p| matches!(p, ContentPart::Image(_)));

    if !has_image {
        let text = message
            .parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.as_str()),
                ContentPart::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        return Ok(Message::text(role, &text));
    }

    let parts: Vec<serde_json::Value> = message
        .parts
        .iter()
        .map(|p| match p {
            ContentPart::Text(text) => json!({ "type": "text", "text": text }),
            ContentPart::Image(image) => json!({
                "type": "image_url",
                "image_url": { "url": image.data_url() }
            }),
        })
        .collect();

    serde_json::from_value(json!({ "role": role, "content": parts }))
        .map_err(|e| GatewayError::Request(format!("multimodal message: {}", e)))
}

/// Structured outputs need an object at the top level, so array schemas are
/// wrapped in a single required property named after the schema.
fn to_response_format(output: &OutputSchema) -> ResponseFormatConfig {
    let object_schema = match output.schema.get("type").and_then(Value::as_str) {
        Some("object") => output.schema.clone(),
        _ => json!({
            "type": "object",
            "properties": { output.name.as_str(): output.schema },
            "required": [output.name],
        }),
    };

    let properties = object_schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    let required = object_schema.get("required").and_then(Value::as_array).map(|names| {
        names
            .iter()
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect()
    });

    ResponseFormatConfig {
        format_type: "json_schema".to_string(),
        json_schema: JsonSchemaConfig {
            name: output.name.clone(),
            strict: false,
            schema: JsonSchemaDefinition {
                schema_type: "object".to_string(),
                properties,
                required,
                additional_properties: Some(false),
            },
        },
    }
}

impl OpenRouterClient {
    /// Reads `OPENROUTER_API_KEY` from the environment.
    pub fn new(config: ModelConfig) -> Result<Self, GatewayError> {
        let client = openrouter_api::OpenRouterClient::quick()
            .map_err(|e| GatewayError::Client(format!("OpenRouter: {}", e)))?;

        Ok(Self { client, config })
    }

    fn build_request(&self, request: &GatewayRequest) -> Result<ChatCompletionRequest, GatewayError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(instruction) = &request.system_instruction {
            messages.push(Message::text("system", instruction));
        }
        for message in &request.messages {
            messages.push(to_openrouter_message(message)?);
        }

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        Ok(ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            provider: Some(provider),
            stream: None,
            response_format: request.output_schema.as_ref().map(to_response_format),
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        })
    }
}

#[async_trait]
impl ModelGateway for OpenRouterClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: GatewayRequest) -> Result<String, GatewayError> {
        let chat_request = self.build_request(&request)?;
        log::debug!(
            "OpenRouter request: {} messages, image: {}",
            chat_request.messages.len(),
            request.has_image()
        );

        let response = self
            .client
            .chat()
            .map_err(|e| GatewayError::Client(e.to_string()))?
            .chat_completion(chat_request)
            .await
            .map_err(|e| GatewayError::Transport(format!("OpenRouter API error: {}", e)))?;

        let choice = response.choices.first().ok_or(GatewayError::EmptyResponse)?;
        let text = match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => text.clone(),
            openrouter_api::MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| {
                    if let openrouter_api::ContentPart::Text(tc) = p {
                        Some(tc.text.clone())
                    } else {
                        None
                    }
                })
                .collect::<Vec<String>>()
                .join("\n"),
        };

        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}
