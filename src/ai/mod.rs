pub mod client;
pub mod gateway;
pub mod gemini;
pub mod quiz_parser;

// Public API exports
pub use client::{ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use gateway::{
    ContentPart, GatewayError, GatewayMessage, GatewayRequest, MessageRole, ModelGateway,
    OutputSchema,
};
pub use gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};
pub use quiz_parser::{clean_json_response, parse_quiz, quiz_schema};
