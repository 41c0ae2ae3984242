//! CLI route: single route table and run context.

use crate::api::{run_serve, AppState};
use crate::cli::output::format_plan_json;
use crate::cli::parse::Commands;
use crate::config::PlannerConfig;
use crate::error::ApiError;
use crate::orchestrator::LessonOrchestrator;
use crate::types::GenerationRequest;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Runtime context for CLI execution, built from an already loaded configuration.
pub struct RunContext {
    config: PlannerConfig,
}

impl RunContext {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Execute a command and return the text to print on stdout.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Serve { bind, port } => {
                self.handle_serve(bind.as_deref(), *port)?;
                Ok(String::new())
            }
            Commands::Generate {
                file,
                lessons,
                fallback_only,
            } => self.handle_generate(file, *lessons, *fallback_only),
            Commands::ShowConfig => self.handle_show_config(),
        }
    }

    fn runtime() -> Result<tokio::runtime::Runtime, ApiError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create async runtime: {}", e)))
    }

    fn handle_serve(&self, bind: Option<&str>, port: Option<u16>) -> Result<(), ApiError> {
        let mut server = self.config.server.clone();
        if let Some(bind) = bind {
            server.bind = bind.to_string();
        }
        if let Some(port) = port {
            server.port = port;
        }

        let orchestrator = LessonOrchestrator::from_config(&self.config)?;
        info!(
            backends = ?orchestrator.available_backend_names(),
            fallback_enabled = self.config.generation.fallback_enabled,
            "Starting server"
        );
        let state = AppState {
            orchestrator: Arc::new(orchestrator),
            generation: self.config.generation.clone(),
        };
        Self::runtime()?.block_on(run_serve(&server, state))
    }

    fn handle_generate(
        &self,
        file: &Path,
        lessons: Option<usize>,
        fallback_only: bool,
    ) -> Result<String, ApiError> {
        let count = lessons.unwrap_or(self.config.generation.default_lessons);
        if count > self.config.generation.max_lessons {
            return Err(ApiError::InvalidRequest(format!(
                "lesson count must not exceed {}",
                self.config.generation.max_lessons
            )));
        }

        let text = std::fs::read_to_string(file)?;
        let request = GenerationRequest::new(text, count)?;

        let outcome = if fallback_only {
            LessonOrchestrator::generate_fallback(&request)
        } else {
            let orchestrator = LessonOrchestrator::from_config(&self.config)?;
            Self::runtime()?.block_on(orchestrator.generate(&request))?
        };
        info!(source = %outcome.source, lessons = outcome.lessons.len(), "Plan ready");

        format_plan_json(&outcome.lessons)
    }

    fn handle_show_config(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(&self.config.redacted())
            .map_err(|e| ApiError::SerializationError(e.to_string()))
    }
}
