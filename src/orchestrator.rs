//! Lesson Generation Orchestrator
//!
//! Tries each available backend in priority order, and each backend's model
//! variants in order, returning the first response that normalizes into a
//! usable lesson array. Failed attempts are collected into a diagnostic log.
//! When nothing succeeds the deterministic fallback plan is returned, or, with
//! fallback disabled, `ApiError::ProvidersExhausted` carrying that log.

use crate::backend::{backends_from_config, Backend, ProviderClientResolver};
use crate::config::PlannerConfig;
use crate::error::{ApiError, AttemptFailure};
use crate::fallback::generate_fallback_lessons;
use crate::normalize::normalize_response;
use crate::provider::ProviderFactory;
use crate::types::{GenerationRequest, LessonPayload, PlanSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one orchestrated generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub lessons: LessonPayload,
    pub source: PlanSource,
    /// Attempts that failed before `source` produced the plan
    pub failures: Vec<AttemptFailure>,
}

/// Sequential fallback chain over a fixed backend list.
pub struct LessonOrchestrator {
    backends: Vec<Arc<dyn Backend>>,
    fallback_enabled: bool,
    strict_validation: bool,
}

impl LessonOrchestrator {
    /// Backends must already be in priority order.
    pub fn new(backends: Vec<Arc<dyn Backend>>, fallback_enabled: bool, strict_validation: bool) -> Self {
        Self {
            backends,
            fallback_enabled,
            strict_validation,
        }
    }

    /// Build the built-in backend catalog from configuration.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, ApiError> {
        let factory = ProviderFactory::new(&config.providers.http_settings())?;
        let resolver: Arc<dyn ProviderClientResolver> = Arc::new(factory);
        Ok(Self::new(
            backends_from_config(config, resolver),
            config.generation.fallback_enabled,
            config.generation.strict_validation,
        ))
    }

    /// Names of backends that would be attempted, in order.
    pub fn available_backend_names(&self) -> Vec<String> {
        self.backends
            .iter()
            .filter(|b| b.is_available())
            .map(|b| b.name().to_string())
            .collect()
    }

    /// Produce a lesson plan for the request.
    ///
    /// Only fails when fallback is disabled and every attempt failed.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome, ApiError> {
        let available: Vec<&Arc<dyn Backend>> =
            self.backends.iter().filter(|b| b.is_available()).collect();
        let expected = request.lesson_count();

        info!(
            lesson_count = expected,
            text_len = request.syllabus_text().len(),
            available_backends = available.len(),
            "Generating lesson plan"
        );

        let mut failures = Vec::new();
        for backend in available {
            for variant in backend.variants() {
                debug!(backend = backend.name(), variant = %variant, "Attempting backend");

                let attempt = match backend.invoke(&variant, request).await {
                    Ok(raw) => normalize_response(&raw, expected, self.strict_validation),
                    Err(err) => Err(err),
                };

                match attempt {
                    Ok(lessons) => {
                        let source = PlanSource::Backend {
                            backend: backend.name().to_string(),
                            variant,
                        };
                        info!(
                            source = %source,
                            lessons = lessons.len(),
                            failed_attempts = failures.len(),
                            "Lesson plan generated"
                        );
                        return Ok(GenerationOutcome {
                            lessons,
                            source,
                            failures,
                        });
                    }
                    Err(err) => {
                        warn!(backend = backend.name(), variant = %variant, error = %err, "Backend attempt failed");
                        failures.push(AttemptFailure::new(backend.name(), variant, &err));
                    }
                }
            }
        }

        if !self.fallback_enabled {
            warn!(failed_attempts = failures.len(), "All backends failed, fallback disabled");
            return Err(ApiError::ProvidersExhausted {
                details: failures.iter().map(ToString::to_string).collect(),
            });
        }

        warn!(failed_attempts = failures.len(), "Falling back to deterministic lesson plan");
        Ok(Self::fallback_outcome(request, failures))
    }

    /// The deterministic plan, without consulting any backend.
    pub fn generate_fallback(request: &GenerationRequest) -> GenerationOutcome {
        Self::fallback_outcome(request, Vec::new())
    }

    fn fallback_outcome(request: &GenerationRequest, failures: Vec<AttemptFailure>) -> GenerationOutcome {
        GenerationOutcome {
            lessons: LessonPayload::Validated(generate_fallback_lessons(
                request.syllabus_text(),
                request.lesson_count(),
            )),
            source: PlanSource::Fallback,
            failures,
        }
    }
}
