//! Shared mock services for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use healthcheck::config::ProbeConfig;
use healthcheck::net::{host_interfaces, select_address};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Probe settings aimed at `addr` on the loopback interface.
pub fn probe_config(addr: SocketAddr, uri: &str, timeout: Duration) -> ProbeConfig {
    ProbeConfig {
        uri: uri.to_string(),
        port: addr.port().to_string(),
        timeout,
        ..ProbeConfig::default()
    }
}

/// The address the binary will pick on this host, if any.
///
/// Tests that need it print a note and return early when the host has no
/// non-loopback IPv4 address (e.g. a sandbox with only `lo`).
pub fn host_probe_address() -> Option<IpAddr> {
    let interfaces = host_interfaces().ok()?;
    let selected = select_address(&interfaces).map(|target| target.ip);
    if selected.is_none() {
        eprintln!("skipping: no non-loopback IPv4 address on this host");
    }
    selected
}

/// Serve `app` on an ephemeral loopback port.
pub async fn start_router(app: Router) -> SocketAddr {
    start_router_on(LOCALHOST, app).await
}

/// Serve `app` on an ephemeral port of `ip`.
pub async fn start_router_on(ip: IpAddr, app: Router) -> SocketAddr {
    let listener = TcpListener::bind(SocketAddr::new(ip, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start a programmable backend; `f` picks the status and body per request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;

                let (status, body) = f().await;
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    503 => "Service Unavailable",
                    _ => "Unknown",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

/// Accept connections and drop them without answering.
pub async fn start_hangup_backend() -> SocketAddr {
    start_hangup_backend_on(LOCALHOST).await
}

pub async fn start_hangup_backend_on(ip: IpAddr) -> SocketAddr {
    let listener = TcpListener::bind(SocketAddr::new(ip, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            drop(socket);
        }
    });
    addr
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    closed_port_on(LOCALHOST).await
}

pub async fn closed_port_on(ip: IpAddr) -> SocketAddr {
    let listener = TcpListener::bind(SocketAddr::new(ip, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
