//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key; tables merge rather than replace.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 8888)?
        .set_default("generation.default_lessons", 20)?
        .set_default("generation.max_lessons", 365)?
        .set_default("generation.fallback_enabled", true)?
        .set_default("generation.strict_validation", true)?
        .set_default("providers.connect_timeout_secs", 10)?
        .set_default("providers.request_timeout_secs", 60)
}
