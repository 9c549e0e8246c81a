use service_core::config::{self as core_config, get_env, get_optional_env};
use service_core::error::AppError;
use std::path::PathBuf;

/// Port the static server listens on unless `FRONTEND__PORT` says otherwise.
pub const DEFAULT_PORT: u16 = 8000;

/// Relative to the workspace root, where the launcher is normally started.
pub const DEFAULT_STATIC_DIR: &str = "frontend-service/static";

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub common: core_config::Config,
    pub static_dir: PathBuf,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone)]
pub struct ObservabilitySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl FrontendConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load("FRONTEND", DEFAULT_PORT)?;

        Ok(FrontendConfig {
            common,
            static_dir: PathBuf::from(get_env("FRONTEND__STATIC_DIR", Some(DEFAULT_STATIC_DIR))?),
            observability: ObservabilitySettings {
                log_level: get_env("LOG_LEVEL", Some("info"))?,
                otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            },
        })
    }
}
