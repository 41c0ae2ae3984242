//! Lesson Backends
//!
//! A backend is one text-generation provider as seen by the orchestrator: a
//! name, an availability check on its credential, an ordered list of model
//! variants, and an `invoke` that turns a generation request into raw
//! completion text. The built-in catalog covers OpenAI, Groq, DeepSeek and
//! Gemini, in that priority order.

use crate::config::{BackendOverride, PlannerConfig};
use crate::error::ApiError;
use crate::provider::{
    ChatMessage, CompletionOptions, ModelProvider, ModelProviderClient, ProviderFactory,
};
use crate::types::GenerationRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Field list every prompt asks for.
const LESSON_SCHEMA_HINT: &str = "Each lesson object must have: dayNumber (integer, starting at 1), \
topicTitle (string), fiveMinuteSummary (string), kidFriendlyExamples (array of strings), \
and quiz (object with a questions array; each question has question, options (4 strings) \
and correctAnswer, which must be one of the options).";

const JSON_OBJECT_HINT: &str =
    "\n\nReturn a JSON object with a single key \"lessons\" whose value is the array.";

/// A lesson-generation capability the orchestrator can try.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Display name used in logs and failure details.
    fn name(&self) -> &str;

    /// Whether the backend has a well-formed credential and is enabled.
    fn is_available(&self) -> bool;

    /// Model variants in the order they are tried.
    fn variants(&self) -> Vec<String>;

    /// Run one variant and return the raw completion text.
    async fn invoke(&self, variant: &str, request: &GenerationRequest) -> Result<String, ApiError>;
}

/// Built-in providers, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    OpenAI,
    Groq,
    DeepSeek,
    Gemini,
}

impl BackendKind {
    pub const PRIORITY: [BackendKind; 4] = [
        BackendKind::OpenAI,
        BackendKind::Groq,
        BackendKind::DeepSeek,
        BackendKind::Gemini,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            BackendKind::OpenAI => "OpenAI",
            BackendKind::Groq => "Groq",
            BackendKind::DeepSeek => "DeepSeek",
            BackendKind::Gemini => "Gemini",
        }
    }

    /// Key used for `[backends.<key>]` overrides.
    pub fn config_key(self) -> &'static str {
        match self {
            BackendKind::OpenAI => "openai",
            BackendKind::Groq => "groq",
            BackendKind::DeepSeek => "deepseek",
            BackendKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Format check applied to a credential before a backend is considered available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRule {
    NonEmpty,
    Prefix(&'static str),
}

impl CredentialRule {
    pub fn accepts(self, credential: &str) -> bool {
        let trimmed = credential.trim();
        match self {
            CredentialRule::NonEmpty => !trimmed.is_empty(),
            CredentialRule::Prefix(prefix) => trimmed.starts_with(prefix),
        }
    }
}

/// Wire protocol a backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    OpenAICompatible,
    Gemini,
}

/// Static description of one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    pub kind: BackendKind,
    pub protocol: Protocol,
    pub credential_rule: CredentialRule,
    pub base_url: String,
    pub variants: Vec<String>,
    /// Maximum syllabus characters embedded in the prompt.
    pub input_budget: usize,
    pub json_response: bool,
    pub enabled: bool,
}

impl BackendProfile {
    pub fn builtin(kind: BackendKind) -> Self {
        match kind {
            BackendKind::OpenAI => Self {
                kind,
                protocol: Protocol::OpenAICompatible,
                credential_rule: CredentialRule::Prefix("sk-"),
                base_url: "https://api.openai.com/v1".to_string(),
                variants: vec!["gpt-4o-mini".to_string()],
                input_budget: 30_000,
                json_response: true,
                enabled: true,
            },
            BackendKind::Groq => Self {
                kind,
                protocol: Protocol::OpenAICompatible,
                credential_rule: CredentialRule::NonEmpty,
                base_url: "https://api.groq.com/openai/v1".to_string(),
                variants: vec!["llama-3.3-70b-versatile".to_string()],
                input_budget: 15_000,
                json_response: true,
                enabled: true,
            },
            BackendKind::DeepSeek => Self {
                kind,
                protocol: Protocol::OpenAICompatible,
                credential_rule: CredentialRule::Prefix("sk-"),
                base_url: "https://api.deepseek.com".to_string(),
                variants: vec!["deepseek-chat".to_string()],
                input_budget: 30_000,
                json_response: true,
                enabled: true,
            },
            BackendKind::Gemini => Self {
                kind,
                protocol: Protocol::Gemini,
                credential_rule: CredentialRule::NonEmpty,
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                variants: vec![
                    "gemini-1.5-flash-latest".to_string(),
                    "gemini-1.5-flash".to_string(),
                    "gemini-1.5-pro-latest".to_string(),
                ],
                input_budget: 20_000,
                json_response: false,
                enabled: true,
            },
        }
    }

    /// Apply a `[backends.<name>]` override.
    pub fn with_override(mut self, overrides: &BackendOverride) -> Self {
        if let Some(enabled) = overrides.enabled {
            self.enabled = enabled;
        }
        if let Some(base_url) = &overrides.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(models) = &overrides.models {
            self.variants = models.clone();
        }
        self
    }

    /// Chat messages for one request, with the syllabus cut to this backend's budget.
    pub fn build_messages(&self, request: &GenerationRequest) -> Vec<ChatMessage> {
        let count = request.lesson_count();
        let syllabus = truncate_chars(request.syllabus_text(), self.input_budget);

        let mut messages = match self.kind {
            BackendKind::OpenAI => vec![
                ChatMessage::system(
                    "You are an expert UK English Teacher. Output only a JSON array of lesson objects.",
                ),
                ChatMessage::user(format!(
                    "Generate a JSON array of exactly {} lesson objects for this syllabus. {}\n\nSyllabus: {}",
                    count, LESSON_SCHEMA_HINT, syllabus
                )),
            ],
            BackendKind::Groq => vec![
                ChatMessage::system("You are an expert UK English Teacher. Output ONLY valid JSON."),
                ChatMessage::user(format!(
                    "Generate a {}-day lesson plan in JSON array format. {}\n\nSyllabus: {}",
                    count, LESSON_SCHEMA_HINT, syllabus
                )),
            ],
            BackendKind::DeepSeek => vec![
                ChatMessage::system("You are a helpful assistant that outputs only JSON."),
                ChatMessage::user(format!(
                    "Generate a {}-day lesson plan in JSON. {}\n\nText: {}",
                    count, LESSON_SCHEMA_HINT, syllabus
                )),
            ],
            BackendKind::Gemini => vec![ChatMessage::user(format!(
                "Output only a JSON array of exactly {} lesson objects based on this syllabus. {}\n\nSyllabus: {}",
                count, LESSON_SCHEMA_HINT, syllabus
            ))],
        };

        // JSON object mode cannot return a bare array
        if self.json_response {
            if let Some(last) = messages.last_mut() {
                last.content.push_str(JSON_OBJECT_HINT);
            }
        }
        messages
    }

    fn model_provider(&self, variant: &str, api_key: &str) -> ModelProvider {
        match self.protocol {
            Protocol::OpenAICompatible => ModelProvider::OpenAICompatible {
                provider_name: self.kind.config_key().to_string(),
                model: variant.to_string(),
                api_key: api_key.to_string(),
                base_url: self.base_url.clone(),
            },
            Protocol::Gemini => ModelProvider::Gemini {
                model: variant.to_string(),
                api_key: api_key.to_string(),
                base_url: self.base_url.clone(),
            },
        }
    }
}

/// Cut `text` to at most `budget` characters without splitting a character.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Creates provider clients for a backend.
pub trait ProviderClientResolver: Send + Sync {
    fn create_provider_client(&self, provider: &ModelProvider) -> Box<dyn ModelProviderClient>;
}

impl ProviderClientResolver for ProviderFactory {
    fn create_provider_client(&self, provider: &ModelProvider) -> Box<dyn ModelProviderClient> {
        self.create_client(provider)
    }
}

/// Backend backed by a real provider API.
pub struct ProviderBackend {
    profile: BackendProfile,
    credential: Option<String>,
    resolver: Arc<dyn ProviderClientResolver>,
}

impl ProviderBackend {
    pub fn new(
        profile: BackendProfile,
        credential: Option<String>,
        resolver: Arc<dyn ProviderClientResolver>,
    ) -> Self {
        let credential = credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self {
            profile,
            credential,
            resolver,
        }
    }
}

#[async_trait]
impl Backend for ProviderBackend {
    fn name(&self) -> &str {
        self.profile.kind.display_name()
    }

    fn is_available(&self) -> bool {
        self.profile.enabled
            && !self.profile.variants.is_empty()
            && self
                .credential
                .as_deref()
                .is_some_and(|c| self.profile.credential_rule.accepts(c))
    }

    fn variants(&self) -> Vec<String> {
        self.profile.variants.clone()
    }

    async fn invoke(&self, variant: &str, request: &GenerationRequest) -> Result<String, ApiError> {
        let api_key = self.credential.as_deref().ok_or_else(|| {
            ApiError::ProviderNotConfigured(format!("{} has no credential", self.name()))
        })?;

        let provider = self.profile.model_provider(variant, api_key);
        let client = self.resolver.create_provider_client(&provider);
        let options = CompletionOptions {
            json_response: self.profile.json_response,
            ..CompletionOptions::default()
        };

        debug!(
            backend = self.name(),
            variant,
            budget = self.profile.input_budget,
            "Invoking provider"
        );
        let response = client
            .complete(self.profile.build_messages(request), options)
            .await?;
        debug!(
            backend = self.name(),
            variant,
            total_tokens = response.usage.total_tokens,
            "Provider responded"
        );
        Ok(response.content)
    }
}

/// Build the backend list from configuration, in priority order.
///
/// Unavailable backends are included; the orchestrator filters them.
pub fn backends_from_config(
    config: &PlannerConfig,
    resolver: Arc<dyn ProviderClientResolver>,
) -> Vec<Arc<dyn Backend>> {
    BackendKind::PRIORITY
        .iter()
        .map(|&kind| {
            let mut profile = BackendProfile::builtin(kind);
            if let Some(overrides) = config.backends.get(kind.config_key()) {
                profile = profile.with_override(overrides);
            }
            let credential = config.credentials.for_backend(kind).map(str::to_string);
            Arc::new(ProviderBackend::new(profile, credential, resolver.clone())) as Arc<dyn Backend>
        })
        .collect()
}
