//! Protocol reachability probes and the retry loop that waits for a service
//! to come up.

use servicewait_core::{Protocol, Service};
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpStream, UnixStream};
use tokio::time::{timeout, Instant};

/// Why a single probe attempt failed. Surfaced in debug logs only; callers
/// see a boolean per attempt.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection refused")]
    Refused,
    #[error("unexpected http status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// Result of polling one service until it became reachable or the attempt
/// budget ran out.
#[derive(Debug, Clone, Copy)]
pub struct WaitOutcome {
    pub available: bool,
    pub elapsed: Duration,
    pub attempts: u32,
}

/// Perform exactly one reachability probe for the service.
pub async fn probe(service: &Service) -> Result<(), ProbeError> {
    match service.protocol {
        Protocol::Tcp => probe_tcp(service).await,
        Protocol::Http | Protocol::Https => probe_http(service).await,
        Protocol::Unix => probe_unix(service).await,
    }
}

/// One probe attempt collapsed to the boolean reachability contract, with
/// the classified failure logged at debug level.
pub async fn check(service: &Service) -> bool {
    match probe(service).await {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(
                service = %service.name,
                target = %service.target(),
                %err,
                "probe attempt failed"
            );
            false
        }
    }
}

/// Poll the service until it is reachable or `max_retries` attempts are
/// spent. Stops on the first success; sleeps `retry_delay` after every
/// failed attempt, the last one included.
pub async fn wait_for(service: &Service) -> WaitOutcome {
    let start = Instant::now();
    for attempt in 1..=service.max_retries {
        if check(service).await {
            return WaitOutcome {
                available: true,
                elapsed: start.elapsed(),
                attempts: attempt,
            };
        }
        tokio::time::sleep(service.retry_delay).await;
    }
    WaitOutcome {
        available: false,
        elapsed: start.elapsed(),
        attempts: service.max_retries,
    }
}

async fn probe_tcp(service: &Service) -> Result<(), ProbeError> {
    let addr = format!("{}:{}", service.host, service.port);
    match timeout(service.timeout, TcpStream::connect(addr.as_str())).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => Err(classify_io(e)),
        Err(_) => Err(ProbeError::Timeout(service.timeout)),
    }
}

async fn probe_http(service: &Service) -> Result<(), ProbeError> {
    let client = reqwest::Client::builder()
        .timeout(service.timeout)
        .build()
        .map_err(|e| ProbeError::Network(e.to_string()))?;

    let resp = client.get(service.url()).send().await.map_err(|e| {
        if e.is_timeout() {
            ProbeError::Timeout(service.timeout)
        } else if e.is_connect() {
            ProbeError::Refused
        } else {
            ProbeError::Network(e.to_string())
        }
    })?;

    let status = resp.status();
    // Drain the body so the connection is released on every path.
    let _ = resp.bytes().await;

    if status.is_success() {
        Ok(())
    } else {
        Err(ProbeError::HttpStatus(status.as_u16()))
    }
}

async fn probe_unix(service: &Service) -> Result<(), ProbeError> {
    // The socket path is always `host/port`, matching the descriptor
    // convention of directory in the host field and file name in the port
    // field.
    let path = format!("{}/{}", service.host, service.port);
    match timeout(service.timeout, UnixStream::connect(&path)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => Err(classify_io(e)),
        Err(_) => Err(ProbeError::Timeout(service.timeout)),
    }
}

fn classify_io(e: std::io::Error) -> ProbeError {
    match e.kind() {
        std::io::ErrorKind::ConnectionRefused => ProbeError::Refused,
        _ => ProbeError::Network(e.to_string()),
    }
}
