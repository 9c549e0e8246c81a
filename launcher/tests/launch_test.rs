use launcher::cli::LaunchArgs;
use launcher::supervisor::{launch, LaunchError, LaunchPlan, BACKEND_NAME, FRONTEND_NAME};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use tokio::net::TcpListener;

async fn free_port() -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

fn args(backend_port: u16, frontend_port: u16) -> LaunchArgs {
    LaunchArgs {
        backend_bin: Some(PathBuf::from("/nonexistent/advice-service")),
        frontend_bin: Some(PathBuf::from("/nonexistent/frontend-service")),
        backend_port,
        frontend_port,
        static_dir: Some(PathBuf::from("/srv/static")),
        startup_timeout_ms: 200,
    }
}

#[test]
fn plan_passes_ports_through_environment() {
    let plan = LaunchPlan::from_args(&args(5001, 8001)).unwrap();

    assert_eq!(plan.backend.name, BACKEND_NAME);
    assert!(plan
        .backend
        .env
        .contains(&("ADVICE__PORT".to_string(), "5001".to_string())));
    assert!(plan
        .frontend
        .env
        .contains(&("FRONTEND__PORT".to_string(), "8001".to_string())));
    assert!(plan
        .frontend
        .env
        .contains(&("FRONTEND__STATIC_DIR".to_string(), "/srv/static".to_string())));
    assert_eq!(plan.startup_timeout.as_millis(), 200);
}

#[test]
fn default_binaries_sit_next_to_the_launcher() {
    let mut launch_args = args(5001, 8001);
    launch_args.backend_bin = None;
    launch_args.frontend_bin = None;

    let plan = LaunchPlan::from_args(&launch_args).unwrap();
    let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();

    assert_eq!(plan.backend.bin.parent().unwrap(), exe_dir);
    assert!(plan
        .frontend
        .bin
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with(FRONTEND_NAME));
}

#[tokio::test]
async fn occupied_backend_port_aborts_before_spawning() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let busy = listener.local_addr().unwrap().port();
    let plan = LaunchPlan::from_args(&args(busy, free_port().await)).unwrap();

    let err = launch(plan).await.unwrap_err();

    match err {
        LaunchError::PortInUse { service, port } => {
            assert_eq!(service, BACKEND_NAME);
            assert_eq!(port, busy);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn occupied_frontend_port_aborts_before_spawning() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let busy = listener.local_addr().unwrap().port();
    let plan = LaunchPlan::from_args(&args(free_port().await, busy)).unwrap();

    let err = launch(plan).await.unwrap_err();

    assert!(matches!(
        err,
        LaunchError::PortInUse { service, .. } if service == FRONTEND_NAME
    ));
}

#[tokio::test]
async fn missing_binary_is_a_spawn_error() {
    let plan = LaunchPlan::from_args(&args(free_port().await, free_port().await)).unwrap();

    let err = launch(plan).await.unwrap_err();

    match err {
        LaunchError::Spawn { service, path, .. } => {
            assert_eq!(service, BACKEND_NAME);
            assert_eq!(path, PathBuf::from("/nonexistent/advice-service"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A binary that starts fine and exits at once without listening.
#[cfg(unix)]
const EXITS_IMMEDIATELY: &str = "/bin/true";

#[cfg(unix)]
fn plan_with_short_lived_children(
    backend_port: u16,
    frontend_port: u16,
    timeout_ms: u64,
) -> LaunchPlan {
    let mut launch_args = args(backend_port, frontend_port);
    launch_args.backend_bin = Some(PathBuf::from(EXITS_IMMEDIATELY));
    launch_args.frontend_bin = Some(PathBuf::from(EXITS_IMMEDIATELY));
    launch_args.startup_timeout_ms = timeout_ms;
    LaunchPlan::from_args(&launch_args).unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn server_that_never_listens_is_not_ready() {
    let backend_port = free_port().await;
    let plan = plan_with_short_lived_children(backend_port, free_port().await, 300);

    let err = launch(plan).await.unwrap_err();

    match err {
        LaunchError::NotReady {
            service,
            port,
            timeout_ms,
        } => {
            assert_eq!(service, BACKEND_NAME);
            assert_eq!(port, backend_port);
            assert_eq!(timeout_ms, 300);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn child_exiting_after_startup_is_reported() {
    let backend_port = free_port().await;
    let frontend_port = free_port().await;
    let plan = plan_with_short_lived_children(backend_port, frontend_port, 3000);

    // Someone else answers on both ports once the pre-flight check has passed,
    // so readiness succeeds while the children have already exited.
    let listeners = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        let backend = TcpListener::bind((Ipv4Addr::LOCALHOST, backend_port)).await.unwrap();
        let frontend = TcpListener::bind((Ipv4Addr::LOCALHOST, frontend_port)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        drop((backend, frontend));
    });

    let err = launch(plan).await.unwrap_err();
    listeners.abort();

    assert!(matches!(err, LaunchError::ChildExited { .. }), "unexpected error: {err}");
}
