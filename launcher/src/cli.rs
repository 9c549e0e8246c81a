use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "launcher")]
#[command(version, about = "Run the advice gateway and the frontend server together", long_about = None)]
pub struct LaunchArgs {
    /// Gateway binary. Defaults to `advice-service` next to this executable.
    #[arg(long)]
    pub backend_bin: Option<PathBuf>,

    /// Static server binary. Defaults to `frontend-service` next to this executable.
    #[arg(long)]
    pub frontend_bin: Option<PathBuf>,

    #[arg(long, default_value_t = 5000)]
    pub backend_port: u16,

    #[arg(long, default_value_t = 8000)]
    pub frontend_port: u16,

    /// Directory the frontend serves. Passed through as `FRONTEND__STATIC_DIR`.
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// How long each server gets to start accepting connections.
    #[arg(long, default_value_t = 5000)]
    pub startup_timeout_ms: u64,
}
