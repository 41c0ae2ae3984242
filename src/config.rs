//! Configuration System
//!
//! One explicit configuration struct built at startup and handed to the
//! orchestrator and HTTP layer. Values are layered by [`ConfigLoader`]:
//! built-in defaults, the global config file, an explicit `--config` file,
//! `LESSONPLAN__*` environment overrides, and finally the provider credential
//! variables (`OPENAI_API_KEY`, `GROQ_API_KEY`, `DEEPSEEK_API_KEY`,
//! `GEMINI_API_KEY`).

use crate::backend::BackendKind;
use crate::logging::LoggingConfig;
use crate::provider::ProviderHttpSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Lesson generation policy
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Provider HTTP settings
    #[serde(default)]
    pub providers: ProviderSettings,

    /// Per-backend overrides keyed by backend name (openai, groq, deepseek, gemini)
    #[serde(default)]
    pub backends: HashMap<String, BackendOverride>,

    /// Provider credentials
    #[serde(default)]
    pub credentials: Credentials,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Lesson count used when a request omits `totalLessons`
    #[serde(default = "default_lessons")]
    pub default_lessons: usize,

    /// Largest lesson count a request may ask for
    #[serde(default = "default_max_lessons")]
    pub max_lessons: usize,

    /// Synthesize a plan locally when every provider fails
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,

    /// Require provider output to match the lesson schema and count
    #[serde(default = "default_true")]
    pub strict_validation: bool,
}

fn default_lessons() -> usize {
    20
}

fn default_max_lessons() -> usize {
    365
}

fn default_true() -> bool {
    true
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_lessons: default_lessons(),
            max_lessons: default_max_lessons(),
            fallback_enabled: true,
            strict_validation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ProviderSettings {
    pub fn http_settings(&self) -> ProviderHttpSettings {
        ProviderHttpSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Optional per-backend adjustments. Priority order is never configurable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendOverride {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    /// Replaces the built-in model variant list
    pub models: Option<Vec<String>>,
}

/// Provider credentials. `Debug` never prints key material.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Credentials {
    /// Credential for a backend, ignoring blank values.
    pub fn for_backend(&self, kind: BackendKind) -> Option<&str> {
        let value = match kind {
            BackendKind::OpenAI => &self.openai_api_key,
            BackendKind::Groq => &self.groq_api_key,
            BackendKind::DeepSeek => &self.deepseek_api_key,
            BackendKind::Gemini => &self.gemini_api_key,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Copy with every present key replaced by a marker.
    pub fn redacted(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "<redacted>".to_string());
        Self {
            openai_api_key: mask(&self.openai_api_key),
            groq_api_key: mask(&self.groq_api_key),
            deepseek_api_key: mask(&self.deepseek_api_key),
            gemini_api_key: mask(&self.gemini_api_key),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = |v: &Option<String>| if v.is_some() { "set" } else { "unset" };
        f.debug_struct("Credentials")
            .field("openai_api_key", &present(&self.openai_api_key))
            .field("groq_api_key", &present(&self.groq_api_key))
            .field("deepseek_api_key", &present(&self.deepseek_api_key))
            .field("gemini_api_key", &present(&self.gemini_api_key))
            .finish()
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Server(String),
    Generation(String),
    Providers(String),
    Backend(String, String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Server(msg) => write!(f, "Server: {}", msg),
            ValidationError::Generation(msg) => write!(f, "Generation: {}", msg),
            ValidationError::Providers(msg) => write!(f, "Providers: {}", msg),
            ValidationError::Backend(name, msg) => write!(f, "Backend '{}': {}", name, msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl PlannerConfig {
    /// Validate the entire configuration, reporting every problem found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.server.bind.trim().is_empty() {
            errors.push(ValidationError::Server("bind address cannot be empty".to_string()));
        }

        let generation = &self.generation;
        if generation.max_lessons == 0 {
            errors.push(ValidationError::Generation(
                "max_lessons must be at least 1".to_string(),
            ));
        }
        if generation.default_lessons == 0 || generation.default_lessons > generation.max_lessons {
            errors.push(ValidationError::Generation(format!(
                "default_lessons must be between 1 and max_lessons ({})",
                generation.max_lessons
            )));
        }

        if self.providers.connect_timeout_secs == 0 || self.providers.request_timeout_secs == 0 {
            errors.push(ValidationError::Providers(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        for (name, overrides) in &self.backends {
            if !BackendKind::PRIORITY.iter().any(|k| k.config_key() == name) {
                errors.push(ValidationError::Backend(
                    name.clone(),
                    "unknown backend".to_string(),
                ));
                continue;
            }
            if let Some(url) = &overrides.base_url {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    errors.push(ValidationError::Backend(
                        name.clone(),
                        format!("base_url must be an http(s) URL: {}", url),
                    ));
                }
            }
            if overrides.models.as_ref().is_some_and(|m| m.is_empty()) {
                errors.push(ValidationError::Backend(
                    name.clone(),
                    "models cannot be an empty list".to_string(),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Copy safe to print or log.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.credentials = self.credentials.redacted();
        copy
    }
}
