//! Probe engine: one check against one address.
//!
//! # Responsibilities
//! - Connection probe: dial `address:port`, close immediately
//! - HTTP probe: GET `http://address:port/uri`, drain the body, expect 200
//! - Classify every failure into a [`ProbeError`]
//!
//! # Design Decisions
//! - The per-attempt timeout bounds the whole attempt, body draining included
//! - Timeouts are reported separately from refusals
//! - No retry inside an attempt; retries belong to the poll loop
//! - Idle HTTP connections are never pooled, every check dials fresh

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Incoming};
use hyper::header::USER_AGENT;
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use url::Url;

use crate::config::{NetworkKind, ProbeConfig};
use crate::health::error::{ProbeError, ProbeResult};
use crate::net::{host_literal, select_address, services::resolve_port, InterfaceAddrs};

const USER_AGENT_VALUE: &str = concat!("healthcheck/", env!("CARGO_PKG_VERSION"));

/// Opens a transport connection and closes it again.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Connect to `address` over `network`; the connection is dropped on success.
    async fn dial(&self, network: NetworkKind, address: &str) -> io::Result<()>;
}

/// Dials through the host socket layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostDialer;

#[async_trait]
impl Dialer for HostDialer {
    async fn dial(&self, network: NetworkKind, address: &str) -> io::Result<()> {
        match network {
            NetworkKind::Tcp | NetworkKind::Tcp4 | NetworkKind::Tcp6 => {
                TcpStream::connect(address).await.map(drop)
            }
            NetworkKind::Unix => dial_unix(address).await,
        }
    }
}

#[cfg(unix)]
async fn dial_unix(path: &str) -> io::Result<()> {
    tokio::net::UnixStream::connect(path).await.map(drop)
}

#[cfg(not(unix))]
async fn dial_unix(_path: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix sockets are not supported on this platform",
    ))
}

/// Runs checks for one [`ProbeConfig`].
pub struct Prober<D = HostDialer> {
    config: ProbeConfig,
    dialer: D,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl Prober<HostDialer> {
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_dialer(config, HostDialer)
    }
}

impl<D: Dialer> Prober<D> {
    /// Create a prober whose connection probe goes through `dialer`.
    pub fn with_dialer(config: ProbeConfig, dialer: D) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(HttpConnector::new());

        Self {
            config,
            dialer,
            client,
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Select the probe address from `interfaces`, then check it.
    pub async fn check_interfaces<I: InterfaceAddrs + Sync>(&self, interfaces: &[I]) -> ProbeResult {
        let Some(target) = select_address(interfaces) else {
            tracing::debug!("No non-loopback IPv4 address on any interface");
            return Err(ProbeError::NoSuitableInterface);
        };

        tracing::debug!(interface = %target.interface, ip = %target.ip, "Selected probe address");
        self.check(target.ip).await
    }

    /// Check a single address with whichever probe the config selects.
    pub async fn check(&self, ip: IpAddr) -> ProbeResult {
        if self.config.is_http() {
            self.http_check(ip).await
        } else {
            self.port_check(ip).await
        }
    }

    /// Connection probe.
    pub async fn port_check(&self, ip: IpAddr) -> ProbeResult {
        let network = self.config.network;
        let address = format!("{}:{}", host_literal(&ip), self.config.port);
        let describe = |detail: &dyn fmt::Display| format!("dial {} {}: {}", network, address, detail);

        let target = match network {
            NetworkKind::Unix => address.clone(),
            _ => {
                if !accepts_family(network, &ip) {
                    return Err(ProbeError::Connection(describe(&"address family mismatch")));
                }
                match resolve_port(&self.config.port) {
                    Some(port) => SocketAddr::new(ip, port).to_string(),
                    None => return Err(ProbeError::Connection(describe(&"unknown port"))),
                }
            }
        };

        tracing::debug!(network = %network, address = %target, timeout = ?self.config.timeout, "Connection probe");

        match time::timeout(self.config.timeout, self.dialer.dial(network, &target)).await {
            Ok(Ok(())) => {
                tracing::debug!(address = %target, "Connection probe succeeded");
                Ok(())
            }
            Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => {
                Err(ProbeError::ConnectionTimeout(describe(&e)))
            }
            Ok(Err(e)) => Err(ProbeError::Connection(describe(&e))),
            Err(_elapsed) => Err(ProbeError::ConnectionTimeout(describe(&"i/o timeout"))),
        }
    }

    /// HTTP probe.
    pub async fn http_check(&self, ip: IpAddr) -> ProbeResult {
        let url = target_url(&ip, &self.config.port, &self.config.uri)?;
        let uri = url
            .as_str()
            .parse::<Uri>()
            .map_err(|e| ProbeError::UrlConstruction(e.to_string()))?;
        let describe = |detail: &dyn fmt::Display| format!("Get \"{}\": {}", url, detail);

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .body(Empty::<Bytes>::new())
            .map_err(|e| ProbeError::Unknown(format!("failed to build request: {}", e)))?;

        tracing::debug!(url = %url, timeout = ?self.config.timeout, "HTTP probe");

        let deadline = Instant::now() + self.config.timeout;
        let response = match time::timeout_at(deadline, self.client.request(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if is_timeout(&e) => {
                return Err(ProbeError::HttpTimeout(describe(&ErrorChain(&e))));
            }
            Ok(Err(e)) => return Err(ProbeError::HttpRequest(describe(&ErrorChain(&e)))),
            Err(_elapsed) => {
                let detail = format!("no response within {:?}", self.config.timeout);
                return Err(ProbeError::HttpTimeout(describe(&detail)));
            }
        };

        let status = response.status();
        match time::timeout_at(deadline, drain(response.into_body())).await {
            Ok(Ok(bytes)) => tracing::trace!(bytes, "Response body drained"),
            Ok(Err(e)) => tracing::debug!(error = %e, "Response body not fully drained"),
            Err(_elapsed) => tracing::debug!("Deadline reached while draining response body"),
        }

        if status == StatusCode::OK {
            tracing::debug!(url = %url, "HTTP probe succeeded");
            Ok(())
        } else {
            tracing::debug!(url = %url, status = %status, "HTTP probe got non-200 status");
            Err(ProbeError::HttpStatus(status.as_u16()))
        }
    }
}

/// Build `http://<address>:<port><uri>`.
pub fn target_url(ip: &IpAddr, port: &str, uri: &str) -> Result<Url, ProbeError> {
    let authority = format!("{}:{}", host_literal(ip), port);
    let raw = format!("http://{}{}", trim_empty_port(&authority), uri);
    Url::parse(&raw).map_err(|e| ProbeError::UrlConstruction(e.to_string()))
}

/// Drop a bare trailing `:` unless it sits inside an IPv6 bracket literal.
pub fn trim_empty_port(authority: &str) -> &str {
    match (authority.rfind(':'), authority.rfind(']')) {
        (Some(colon), Some(bracket)) if colon < bracket => authority,
        _ => authority.strip_suffix(':').unwrap_or(authority),
    }
}

fn accepts_family(network: NetworkKind, ip: &IpAddr) -> bool {
    match network {
        NetworkKind::Tcp4 => ip.is_ipv4(),
        NetworkKind::Tcp6 => ip.is_ipv6(),
        NetworkKind::Tcp | NetworkKind::Unix => true,
    }
}

/// Read and discard the body; returns the number of bytes consumed.
async fn drain(mut body: Incoming) -> Result<usize, hyper::Error> {
    let mut consumed = 0;
    while let Some(frame) = body.frame().await {
        if let Some(data) = frame?.data_ref() {
            consumed += data.len();
        }
    }
    Ok(consumed)
}

/// True when the client error was caused by an OS-level timeout.
fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            if io.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = e.source();
    }
    false
}

/// Displays an error followed by each of its sources.
struct ErrorChain<'a>(&'a (dyn StdError + 'static));

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(e) = source {
            write!(f, ": {}", e)?;
            source = e.source();
        }
        Ok(())
    }
}
