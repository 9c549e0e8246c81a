use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env};
use service_core::error::AppError;

/// Port the gateway listens on unless `ADVICE__PORT` says otherwise.
pub const DEFAULT_PORT: u16 = 5000;

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 120;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:8000,http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct AdviceConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub cors: CorsSettings,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    /// Base URL up to and including the API version segment.
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    /// Origins allowed to call `/api/*`.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ObservabilitySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl AdviceConfig {
    /// Load once at startup. A missing `GEMINI_API_KEY` is fatal.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load("ADVICE", DEFAULT_PORT)?;

        let timeout_secs = get_env(
            "GEMINI_TIMEOUT_SECS",
            Some(&DEFAULT_GEMINI_TIMEOUT_SECS.to_string()),
        )?
        .parse()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("GEMINI_TIMEOUT_SECS is not a number: {}", e))
        })?;

        Ok(AdviceConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None)?),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL))?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?,
                timeout_secs,
            },
            cors: CorsSettings {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGINS),
                )?),
            },
            observability: ObservabilitySettings {
                log_level: get_env("LOG_LEVEL", Some("info"))?,
                otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            },
        })
    }
}

impl CorsSettings {
    /// The two local frontend origins.
    pub fn local_frontend() -> Self {
        Self {
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
