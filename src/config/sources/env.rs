//! Environment sources: `LESSONPLAN__SECTION__KEY` overrides and provider credential variables.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for structured overrides, e.g. `LESSONPLAN__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "LESSONPLAN";

/// Conventional credential variables and the config keys they fill.
pub const CREDENTIAL_VARS: [(&str, &str); 4] = [
    ("OPENAI_API_KEY", "credentials.openai_api_key"),
    ("GROQ_API_KEY", "credentials.groq_api_key"),
    ("DEEPSEEK_API_KEY", "credentials.deepseek_api_key"),
    ("GEMINI_API_KEY", "credentials.gemini_api_key"),
];

/// Add `LESSONPLAN__*` overrides to the builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    ))
}

/// Apply credential variables as overrides. Unset variables leave earlier layers intact.
pub fn apply_credentials(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, key) in CREDENTIAL_VARS {
        let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(key, value)?;
    }
    Ok(builder)
}
