use anyhow::Context;
use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

/// Defines a geo-proximity service endpoint with a `hostname` and an optional `port`.
///
/// The hostname is either resolved directly or, with discovery enabled,
/// looked up as a service name inside the discovery zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// The hostname, IP literal or service name.
    hostname: String,
    /// The service port, if the endpoint names one.
    port: Option<u16>,
}

impl ServiceDefinition {
    /// Create a [`ServiceDefinition`] from a valid `hostname` and `port`.
    ///
    /// This function will fail if the `hostname` is neither an IP address nor
    /// a valid domain name.
    pub fn from_parts<T: ToString>(hostname: T, port: Option<u16>) -> Result<Self, anyhow::Error> {
        let hostname = hostname.to_string();

        if hostname.is_empty() {
            anyhow::bail!("no endpoint given");
        }

        if hostname.parse::<IpAddr>().is_err() {
            hickory_resolver::Name::from_ascii(&hostname)
                .map_err(anyhow::Error::from)
                .context("invalid 'hostname'")?;
        }

        Ok(Self { hostname, port })
    }

    /// Get the `hostname` part of a `ServiceDefinition`.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Get the `port` part of a `ServiceDefinition`.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The hostname as an IP address, if it is a literal one.
    pub fn ip_literal(&self) -> Option<IpAddr> {
        self.hostname.parse().ok()
    }

    /// The address to dial directly, if the hostname is an IP literal and a port is given.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        Some(SocketAddr::new(self.ip_literal()?, self.port?))
    }
}

/// Parses `host`, `host:port` or `[v6]:port`.
///
/// ```
/// let sd: geocolo::ServiceDefinition = "geo.example.com:5000".parse().unwrap();
/// assert_eq!(sd.hostname(), "geo.example.com");
/// assert_eq!(sd.port(), Some(5000));
///
/// let sd: geocolo::ServiceDefinition = "[::1]:5000".parse().unwrap();
/// assert_eq!(sd.hostname(), "::1");
/// ```
impl FromStr for ServiceDefinition {
    type Err = anyhow::Error;

    fn from_str(endpoint: &str) -> Result<Self, Self::Err> {
        if endpoint.is_empty() {
            anyhow::bail!("no endpoint given");
        }

        let authority = http::uri::Authority::from_str(endpoint)
            .with_context(|| format!("invalid endpoint '{endpoint}'"))?;
        let hostname = authority.host().trim_start_matches('[').trim_end_matches(']');

        Self::from_parts(hostname, authority.port_u16())
    }
}
