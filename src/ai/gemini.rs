//! Direct REST client for the Gemini `generateContent` endpoint.

use crate::ai::gateway::{
    ContentPart, GatewayError, GatewayMessage, GatewayRequest, MessageRole, ModelGateway,
};
use crate::models::ImageData;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_body(&self, request: &GatewayRequest) -> GenerateContentRequest {
        let contents = request.messages.iter().map(to_content).collect();

        let system_instruction = request.system_instruction.as_ref().map(|text| Content {
            role: None,
            parts: vec![Part::Text { text: text.clone() }],
        });

        let response_schema = request
            .output_schema
            .as_ref()
            .map(|schema| to_gemini_schema(&schema.schema));
        let generation_config = if response_schema.is_some() || self.temperature.is_some() {
            Some(GenerationConfig {
                response_mime_type: response_schema
                    .is_some()
                    .then(|| "application/json".to_string()),
                response_schema,
                temperature: self.temperature,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Gemini's `responseSchema` is an OpenAPI subset with upper-case type
/// names (`ARRAY`, `OBJECT`, `STRING`).
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(kind)) => Value::String(kind.to_uppercase()),
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect::<Map<String, Value>>(),
                        ),
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

fn to_content(message: &GatewayMessage) -> Content {
    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Model => "model",
    };
    let parts = message
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => Part::Text { text: text.clone() },
            ContentPart::Image(image) => Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: ImageData::MIME_TYPE.to_string(),
                    data: image.base64.clone(),
                },
            },
        })
        .collect();

    Content {
        role: Some(role.to_string()),
        parts,
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: GatewayRequest) -> Result<String, GatewayError> {
        let body = self.build_body(&request);
        let url = format!("{}/{}:generateContent", BASE_URL, self.model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("Gemini API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            let message = serde_json::from_str::<ErrorWrapper>(&body_text)
                .ok()
                .and_then(|w| w.error.message)
                .unwrap_or(body_text);
            return Err(GatewayError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidOutput(format!("Gemini response: {}", e)))?;

        extract_text_response(parsed)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, GatewayError> {
    let text = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(GatewayError::EmptyResponse)
    } else {
        Ok(text)
    }
}
