//! Endpoint discovery through a naming service.
//!
//! A discovery setup is made of two URIs: the *discovery URI* names the
//! cluster zone that services are registered in, and the *boot URI* lists
//! the nameservers used to reach that zone. Services are looked up with SRV
//! records, so an endpoint like `geocolo` inside the `geo.prod.internal`
//! zone resolves through `_geocolo._tcp.geo.prod.internal`.

use crate::{LookupService, ServiceDefinition};
use anyhow::Context;
use hickory_resolver::{
    config::{NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts},
    error::ResolveErrorKind,
    system_conf, Name, TokioAsyncResolver,
};
use std::{
    cmp::Reverse,
    net::{IpAddr, SocketAddr},
};

const DISCOVERY_SCHEME: &str = "dns";
const DEFAULT_NAMESERVER_PORT: u16 = 53;

/// Where and how to discover service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    zone: String,
    nameservers: Vec<SocketAddr>,
}

impl DiscoveryConfig {
    /// Build a [`DiscoveryConfig`] from a boot URI and a discovery URI.
    ///
    /// `uri` is `dns://<zone>` or a bare `<zone>`. `boot_uri` is a comma
    /// separated list of `dns://<ip>[:port]` or `<ip>[:port]`; when empty the
    /// system resolver configuration is used instead.
    ///
    /// ```
    /// let config = geocolo::DiscoveryConfig::new("dns://10.0.0.2", "dns://geo.prod.internal").unwrap();
    /// assert_eq!(config.zone(), "geo.prod.internal");
    /// assert_eq!(config.nameservers(), &["10.0.0.2:53".parse::<std::net::SocketAddr>().unwrap()]);
    /// ```
    pub fn new(boot_uri: &str, uri: &str) -> Result<Self, anyhow::Error> {
        Ok(Self {
            zone: parse_zone(uri)?,
            nameservers: parse_nameservers(boot_uri)?,
        })
    }

    /// The cluster zone that service names are looked up in.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// The bootstrap nameservers. Empty means the system configuration.
    pub fn nameservers(&self) -> &[SocketAddr] {
        &self.nameservers
    }
}

fn strip_scheme(uri: &str) -> Result<&str, anyhow::Error> {
    match uri.split_once("://") {
        Some((DISCOVERY_SCHEME, rest)) => Ok(rest.trim_matches('/')),
        Some((scheme, _)) => anyhow::bail!("unsupported discovery scheme '{scheme}'"),
        None => Ok(uri),
    }
}

fn parse_zone(uri: &str) -> Result<String, anyhow::Error> {
    let zone = strip_scheme(uri)?.trim_end_matches('.');
    if zone.is_empty() {
        anyhow::bail!("discovery URI '{uri}' does not name a zone");
    }

    Name::from_ascii(zone)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("invalid discovery zone '{zone}'"))?;

    Ok(zone.to_owned())
}

fn parse_nameservers(boot_uri: &str) -> Result<Vec<SocketAddr>, anyhow::Error> {
    if boot_uri.is_empty() {
        return Ok(Vec::new());
    }

    boot_uri
        .split(',')
        .map(|entry| {
            let address = strip_scheme(entry)?;
            if let Ok(socket_addr) = address.parse::<SocketAddr>() {
                return Ok(socket_addr);
            }
            address
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .map(|ip_addr| SocketAddr::new(ip_addr, DEFAULT_NAMESERVER_PORT))
                .with_context(|| {
                    format!("bootstrap nameserver '{entry}' must be an IP address")
                })
        })
        .collect()
}

/// Implements [`LookupService`] by resolving service names inside the
/// discovery zone of a [`DiscoveryConfig`].
pub struct DiscoveryResolver {
    dns: TokioAsyncResolver,
    zone: String,
}

impl DiscoveryResolver {
    /// Construct a [`DiscoveryResolver`] talking to the bootstrap nameservers of `config`.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, anyhow::Error> {
        let (resolver_config, mut opts) = if config.nameservers.is_empty() {
            system_conf::read_system_conf()
                .context("failed to read dns services from system configuration")?
        } else {
            let name_servers: Vec<NameServerConfig> = config
                .nameservers
                .iter()
                .flat_map(|socket_addr| {
                    [
                        NameServerConfig::new(*socket_addr, Protocol::Udp),
                        NameServerConfig::new(*socket_addr, Protocol::Tcp),
                    ]
                })
                .collect();
            (
                ResolverConfig::from_parts(None, vec![], NameServerConfigGroup::from(name_servers)),
                ResolverOpts::default(),
            )
        };

        // Registrations change, do not hold on to stale answers.
        opts.cache_size = 0;

        tracing::debug!(
            zone = %config.zone,
            nameservers = ?config.nameservers,
            "discovery initialized"
        );

        Ok(Self {
            dns: TokioAsyncResolver::tokio(resolver_config, opts),
            zone: config.zone.clone(),
        })
    }

    fn srv_name(&self, definition: &ServiceDefinition) -> String {
        format!("_{}._tcp.{}.", definition.hostname(), self.zone)
    }

    fn host_name(&self, definition: &ServiceDefinition) -> String {
        format!("{}.{}.", definition.hostname(), self.zone)
    }
}

#[async_trait::async_trait]
impl LookupService for DiscoveryResolver {
    /// Addresses come back ordered by SRV priority, then by descending weight.
    /// A target that does not resolve is skipped.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn resolve_service_endpoints(
        &self,
        definition: &ServiceDefinition,
    ) -> Result<Vec<SocketAddr>, anyhow::Error> {
        let srv_name = self.srv_name(definition);
        let mut endpoints = Vec::new();

        match self.dns.srv_lookup(srv_name.as_str()).await {
            Ok(lookup) => {
                let mut records: Vec<_> = lookup.iter().collect();
                records.sort_by_key(|record| (record.priority(), Reverse(record.weight())));

                for record in records {
                    let target = record.target();
                    match self.dns.lookup_ip(target.clone()).await {
                        Ok(addresses) => {
                            for ip_addr in addresses.iter() {
                                tracing::debug!("result: ip {} port {}", ip_addr, record.port());
                                let address = SocketAddr::new(ip_addr, record.port());
                                if !endpoints.contains(&address) {
                                    endpoints.push(address);
                                }
                            }
                        }
                        Err(err) => {
                            tracing::warn!("skipping SRV target '{}': {}", target, err);
                        }
                    }
                }
            }
            Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                tracing::debug!("no SRV records for {}", srv_name);

                let port = definition.port().with_context(|| {
                    format!("no SRV records for '{srv_name}' and the endpoint has no port")
                })?;
                let host_name = self.host_name(definition);
                let lookup = self
                    .dns
                    .lookup_ip(host_name.as_str())
                    .await
                    .with_context(|| format!("failed to resolve '{host_name}'"))?;
                endpoints.extend(lookup.iter().map(|ip_addr| SocketAddr::new(ip_addr, port)));
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to look up '{srv_name}'"));
            }
        }

        Ok(endpoints)
    }
}
