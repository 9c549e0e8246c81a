//! Child process lifecycle: pre-flight port checks, spawn, readiness,
//! then wait for Ctrl+C or an unexpected exit.

use crate::cli::LaunchArgs;
use crate::ports::{port_in_use, wait_for_port, POLL_INTERVAL};
use service_core::shutdown::shutdown_signal;
use std::env::consts::EXE_SUFFIX;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

pub const BACKEND_NAME: &str = "advice-service";
pub const FRONTEND_NAME: &str = "frontend-service";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Port {port} is already in use, cannot start {service}")]
    PortInUse { service: &'static str, port: u16 },

    #[error("Failed to start {service} from {}: {source}", .path.display())]
    Spawn {
        service: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{service} did not start listening on port {port} within {timeout_ms} ms")]
    NotReady {
        service: &'static str,
        port: u16,
        timeout_ms: u128,
    },

    #[error("{service} exited unexpectedly ({status})")]
    ChildExited { service: &'static str, status: String },

    #[error("Cannot locate the launcher executable: {0}")]
    CurrentExe(#[source] io::Error),
}

/// One server the launcher is responsible for.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: &'static str,
    pub bin: PathBuf,
    pub port: u16,
    /// Extra environment on top of the launcher's own.
    pub env: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub backend: ServiceSpec,
    pub frontend: ServiceSpec,
    pub startup_timeout: Duration,
}

impl LaunchPlan {
    pub fn from_args(args: &LaunchArgs) -> Result<Self, LaunchError> {
        let backend_bin = match &args.backend_bin {
            Some(path) => path.clone(),
            None => sibling_binary(BACKEND_NAME)?,
        };
        let frontend_bin = match &args.frontend_bin {
            Some(path) => path.clone(),
            None => sibling_binary(FRONTEND_NAME)?,
        };

        let mut frontend_env = vec![(
            "FRONTEND__PORT".to_string(),
            args.frontend_port.to_string(),
        )];
        if let Some(dir) = &args.static_dir {
            frontend_env.push((
                "FRONTEND__STATIC_DIR".to_string(),
                dir.display().to_string(),
            ));
        }

        Ok(Self {
            backend: ServiceSpec {
                name: BACKEND_NAME,
                bin: backend_bin,
                port: args.backend_port,
                env: vec![("ADVICE__PORT".to_string(), args.backend_port.to_string())],
            },
            frontend: ServiceSpec {
                name: FRONTEND_NAME,
                bin: frontend_bin,
                port: args.frontend_port,
                env: frontend_env,
            },
            startup_timeout: Duration::from_millis(args.startup_timeout_ms),
        })
    }
}

/// `name` in the same directory as the running executable. Cargo puts all
/// workspace binaries side by side in `target/<profile>/`.
fn sibling_binary(name: &str) -> Result<PathBuf, LaunchError> {
    let exe = std::env::current_exe().map_err(LaunchError::CurrentExe)?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(format!("{name}{EXE_SUFFIX}")))
}

fn spawn(spec: &ServiceSpec) -> Result<Child, LaunchError> {
    let mut command = Command::new(&spec.bin);
    command
        .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    // Own process group, so a terminal Ctrl+C reaches only the launcher.
    #[cfg(unix)]
    command.process_group(0);

    let child = command.spawn().map_err(|source| LaunchError::Spawn {
        service: spec.name,
        path: spec.bin.clone(),
        source,
    })?;

    info!(service = spec.name, pid = ?child.id(), port = spec.port, "Started child process");
    Ok(child)
}

async fn stop(name: &str, child: &mut Child) {
    if let Ok(Some(_)) = child.try_wait() {
        return;
    }
    match child.kill().await {
        Ok(()) => info!(service = name, "Stopped child process"),
        Err(e) => warn!(service = name, error = %e, "Failed to stop child process"),
    }
}

fn describe(status: io::Result<ExitStatus>) -> String {
    match status {
        Ok(status) => status.to_string(),
        Err(e) => format!("wait failed: {e}"),
    }
}

enum Outcome {
    Shutdown,
    Exited(&'static str, io::Result<ExitStatus>),
}

/// Run both servers until Ctrl+C/SIGTERM (`Ok`) or until either fails to
/// start or exits on its own (`Err`). Children never outlive this call.
pub async fn launch(plan: LaunchPlan) -> Result<(), LaunchError> {
    for spec in [&plan.backend, &plan.frontend] {
        if port_in_use(spec.port).await {
            return Err(LaunchError::PortInUse {
                service: spec.name,
                port: spec.port,
            });
        }
    }

    let mut backend = spawn(&plan.backend)?;
    let mut frontend = match spawn(&plan.frontend) {
        Ok(child) => child,
        Err(e) => {
            stop(plan.backend.name, &mut backend).await;
            return Err(e);
        }
    };

    for spec in [&plan.backend, &plan.frontend] {
        if !wait_for_port(spec.port, plan.startup_timeout, POLL_INTERVAL).await {
            stop(plan.backend.name, &mut backend).await;
            stop(plan.frontend.name, &mut frontend).await;
            return Err(LaunchError::NotReady {
                service: spec.name,
                port: spec.port,
                timeout_ms: plan.startup_timeout.as_millis(),
            });
        }
    }

    println!("Servers started successfully!");
    println!("Frontend: http://localhost:{}", plan.frontend.port);
    println!("Backend: http://localhost:{}", plan.backend.port);
    println!("Press Ctrl+C to stop");

    let outcome = tokio::select! {
        biased;
        _ = shutdown_signal() => Outcome::Shutdown,
        status = backend.wait() => Outcome::Exited(plan.backend.name, status),
        status = frontend.wait() => Outcome::Exited(plan.frontend.name, status),
    };

    stop(plan.backend.name, &mut backend).await;
    stop(plan.frontend.name, &mut frontend).await;

    match outcome {
        Outcome::Shutdown => {
            info!("Shutdown requested, servers stopped");
            Ok(())
        }
        Outcome::Exited(service, status) => {
            let status = describe(status);
            error!(service, %status, "Child process exited unexpectedly");
            Err(LaunchError::ChildExited { service, status })
        }
    }
}
