//! TCP readiness probes against the loopback interface.

use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};
use tracing::debug;

/// Per-attempt connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_millis(250);

/// Default delay between readiness polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// True if something on 127.0.0.1 accepts connections on `port`.
pub async fn port_in_use(port: u16) -> bool {
    matches!(
        timeout(
            CONNECT_TIMEOUT,
            TcpStream::connect((Ipv4Addr::LOCALHOST, port))
        )
        .await,
        Ok(Ok(_))
    )
}

/// Poll `port` every `interval` until it accepts a connection or `limit`
/// elapses. Returns whether the port came up.
pub async fn wait_for_port(port: u16, limit: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + limit;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        if port_in_use(port).await {
            debug!(port, attempt, "Port is accepting connections");
            return true;
        }
        if Instant::now() >= deadline {
            debug!(port, attempt, "Gave up waiting for port");
            return false;
        }
        sleep(interval).await;
    }
}
