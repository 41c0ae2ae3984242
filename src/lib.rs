//! Lessonplan: Syllabus-to-Lesson-Plan Generation
//!
//! Turns extracted syllabus text into a multi-day lesson plan by asking a
//! fixed, prioritized chain of text-generation providers and normalizing their
//! output, with a deterministic local plan when every provider fails.

pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod normalize;
pub mod orchestrator;
pub mod provider;
pub mod types;

pub use error::{ApiError, AttemptFailure};
pub use orchestrator::{GenerationOutcome, LessonOrchestrator};
pub use types::{GenerationRequest, LessonModule, LessonPayload, PlanSource};
