use crate::models::{ImageData, Sender, Turn};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to create model client: {0}")]
    Client(String),
    #[error("could not build model request: {0}")]
    Request(String),
    #[error("request to model failed: {0}")]
    Transport(String),
    #[error("model service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("model returned no content")]
    EmptyResponse,
    #[error("could not parse model output: {0}")]
    InvalidOutput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Model,
}

impl From<Sender> for MessageRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => MessageRole::User,
            Sender::Assistant => MessageRole::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Image(ImageData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayMessage {
    pub role: MessageRole,
    pub parts: Vec<ContentPart>,
}

impl GatewayMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    /// Empty text is skipped so that image-only turns carry just the image.
    pub fn from_turn(turn: &Turn) -> Self {
        let mut parts = Vec::new();
        if !turn.text.is_empty() {
            parts.push(ContentPart::Text(turn.text.clone()));
        }
        if let Some(image) = &turn.image {
            parts.push(ContentPart::Image(image.clone()));
        }
        Self {
            role: turn.sender.into(),
            parts,
        }
    }
}

/// Declared shape of a JSON reply. `schema` is a JSON Schema document with
/// lowercase type names; each client converts it to its wire dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

/// One call to the model: optional system instruction plus ordered messages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GatewayRequest {
    pub system_instruction: Option<String>,
    pub messages: Vec<GatewayMessage>,
    /// Set when the reply must be JSON matching this schema.
    pub output_schema: Option<OutputSchema>,
}

impl GatewayRequest {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            messages: vec![GatewayMessage::user_text(text)],
            ..Default::default()
        }
    }

    pub fn prompt_with_image(text: impl Into<String>, image: Option<ImageData>) -> Self {
        let mut message = GatewayMessage::user_text(text);
        if let Some(image) = image {
            message.parts.push(ContentPart::Image(image));
        }
        Self {
            messages: vec![message],
            ..Default::default()
        }
    }

    pub fn conversation(system_instruction: impl Into<String>, turns: &[Turn]) -> Self {
        Self {
            system_instruction: Some(system_instruction.into()),
            messages: turns.iter().map(GatewayMessage::from_turn).collect(),
            output_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn has_image(&self) -> bool {
        self.messages
            .iter()
            .flat_map(|m| &m.parts)
            .any(|p| matches!(p, ContentPart::Image(_)))
    }
}

/// The single call-and-await boundary to the hosted model.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: GatewayRequest) -> Result<String, GatewayError>;
}
