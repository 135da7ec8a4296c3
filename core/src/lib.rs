//! Shared types for the service dependency waiter: descriptors, protocol
//! variants, and report formatting helpers.

use std::time::Duration;

/// Per-attempt probe timeout applied to every protocol.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
/// Sleep after each unsuccessful probe attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Probe attempts per service before it is declared unavailable.
pub const DEFAULT_MAX_RETRIES: u32 = 30;

/// Reachability check protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Http,
    Https,
    Unix,
}

impl Protocol {
    /// Case-insensitive parse; anything outside the known set maps to `Tcp`.
    pub fn parse(s: &str) -> Protocol {
        match s.to_ascii_lowercase().as_str() {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            "unix" => Protocol::Unix,
            _ => Protocol::Tcp,
        }
    }
}

/// One service dependency to wait for, parsed from a colon-delimited
/// descriptor string. Immutable after parsing.
#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub host: String,
    pub port: String,
    pub protocol: Protocol,
    pub endpoint: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Service {
    /// Parse a `name:host[:port][:protocol][:endpoint]` descriptor.
    ///
    /// Parsing is total: trailing fields are optional and fields past the
    /// fifth are ignored. A string with fewer than two fields yields a
    /// descriptor with empty name and host, which never reports as
    /// reachable.
    pub fn parse(config: &str) -> Service {
        let mut service = Service {
            name: String::new(),
            host: String::new(),
            port: String::new(),
            protocol: Protocol::Tcp,
            endpoint: String::new(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        };

        let parts: Vec<&str> = config.split(':').collect();
        if parts.len() >= 2 {
            service.name = parts[0].to_string();
            service.host = parts[1].to_string();
            if let Some(p) = parts.get(2) {
                service.port = p.to_string();
            }
            if let Some(p) = parts.get(3) {
                service.protocol = Protocol::parse(p);
            }
            if let Some(e) = parts.get(4) {
                service.endpoint = e.to_string();
            }
        }

        service
    }

    /// `host:port` display form used in report lines.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL used by the HTTP reachability check.
    ///
    /// The scheme comes from a substring match on the host text, not from
    /// the protocol field: `api:example.com:443:https` probes over plain
    /// http, while any host containing `https` probes over https.
    pub fn url(&self) -> String {
        let scheme = if self.host.contains("https") { "https" } else { "http" };
        let endpoint = if self.endpoint.is_empty() { "/" } else { self.endpoint.as_str() };
        format!("{}://{}:{}{}", scheme, self.host, self.port, endpoint)
    }
}

/// Render an elapsed duration as whole milliseconds under one second, whole
/// truncated seconds otherwise.
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        format!("{}ms", d.as_millis())
    } else {
        format!("{}s", d.as_secs())
    }
}
