use crate::ai::{
    DEFAULT_GEMINI_MODEL, DEFAULT_MODEL, GeminiClient, ModelConfig, ModelGateway,
    OpenRouterClient,
};
use crate::ai::client::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOG_FILE: &str = "tutor_debug.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown TUTOR_PROVIDER '{0}' (expected 'openrouter' or 'gemini')")]
    UnknownProvider(String),
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("{0} is not set")]
    MissingCredential(&'static str),
    #[error(transparent)]
    Gateway(#[from] crate::ai::GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    Gemini,
}

impl Provider {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "gemini" => Ok(Provider::Gemini),
            _ => Err(ConfigError::UnknownProvider(value.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OpenRouter",
            Provider::Gemini => "Gemini",
        }
    }

    fn credential_var(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenRouter => DEFAULT_MODEL,
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
        }
    }
}

/// Runtime settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: Provider,
    pub model: ModelConfig,
    pub feedback_delay: Duration,
    pub log_file: String,
    pub log_level: log::LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: Provider::OpenRouter,
            model: ModelConfig::default(),
            feedback_delay: Duration::from_millis(DEFAULT_FEEDBACK_DELAY_MS),
            log_file: DEFAULT_LOG_FILE.to_string(),
            log_level: log::LevelFilter::Info,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        _ => Ok(None),
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let provider = match lookup("TUTOR_PROVIDER") {
            Some(value) if !value.trim().is_empty() => Provider::parse(&value)?,
            _ if lookup("OPENROUTER_API_KEY").is_none() && lookup("GEMINI_API_KEY").is_some() => {
                Provider::Gemini
            }
            _ => Provider::OpenRouter,
        };

        let model_name = lookup("TUTOR_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let temperature = parse_var::<f32>(&lookup, "TUTOR_TEMPERATURE")?
            .unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                name: "TUTOR_TEMPERATURE",
                value: temperature.to_string(),
            });
        }
        let max_tokens =
            parse_var::<u32>(&lookup, "TUTOR_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
        let delay_ms = parse_var::<u64>(&lookup, "TUTOR_FEEDBACK_DELAY_MS")?
            .unwrap_or(DEFAULT_FEEDBACK_DELAY_MS);
        let log_level = parse_var::<log::LevelFilter>(&lookup, "TUTOR_LOG_LEVEL")?
            .unwrap_or(log::LevelFilter::Info);
        let log_file = lookup("TUTOR_LOG_FILE")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            provider,
            model: ModelConfig {
                model: model_name,
                temperature: Some(temperature),
                max_tokens: Some(max_tokens),
            },
            feedback_delay: Duration::from_millis(delay_ms),
            log_file,
            log_level,
        })
    }

    /// Builds the gateway for the configured provider.
    pub fn build_gateway(&self) -> Result<Box<dyn ModelGateway>, ConfigError> {
        let var = self.provider.credential_var();
        let key = std::env::var(var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingCredential(var))?;

        match self.provider {
            Provider::OpenRouter => Ok(Box::new(OpenRouterClient::new(self.model.clone())?)),
            Provider::Gemini => Ok(Box::new(
                GeminiClient::new(key, self.model.model.clone())
                    .with_temperature(self.model.temperature),
            )),
        }
    }
}
