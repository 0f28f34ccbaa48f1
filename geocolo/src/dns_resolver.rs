//! Implements [`LookupService`] for endpoints given directly as `host:port`.

use crate::{LookupService, ServiceDefinition};
use anyhow::Context;
use hickory_resolver::{system_conf, TokioAsyncResolver};
use std::net::SocketAddr;

/// Implements [`LookupService`] by using DNS queries to lookup [`ServiceDefinition::hostname`].
pub struct DnsResolver {
    /// The hickory resolver which contacts the dns service directly such
    /// that we bypass os-specific dns caching.
    dns: TokioAsyncResolver,
}

impl DnsResolver {
    /// Construct a new [`DnsResolver`] from env and system configuration, e.g `resolv.conf`.
    pub fn from_system_config() -> Result<Self, anyhow::Error> {
        let (config, mut opts) = system_conf::read_system_conf()
            .context("failed to read dns services from system configuration")?;

        // We do not want any caching on our side.
        opts.cache_size = 0;

        Ok(Self {
            dns: TokioAsyncResolver::tokio(config, opts),
        })
    }
}

#[async_trait::async_trait]
impl LookupService for DnsResolver {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn resolve_service_endpoints(
        &self,
        definition: &ServiceDefinition,
    ) -> Result<Vec<SocketAddr>, anyhow::Error> {
        let port = definition
            .port()
            .with_context(|| format!("endpoint '{}' has no port", definition.hostname()))?;

        if let Some(ip_addr) = definition.ip_literal() {
            return Ok(vec![SocketAddr::new(ip_addr, port)]);
        }

        let lookup = self
            .dns
            .lookup_ip(definition.hostname())
            .await
            .with_context(|| format!("failed to resolve '{}'", definition.hostname()))?;
        tracing::debug!("dns query expires in: {:?}", lookup.valid_until());

        let mut endpoints: Vec<SocketAddr> = lookup
            .iter()
            .map(|ip_addr| {
                tracing::debug!("result: ip {}", ip_addr);
                SocketAddr::new(ip_addr, port)
            })
            .collect();
        // Plain address records carry no preference, keep the dial order stable.
        endpoints.sort();
        endpoints.dedup();

        Ok(endpoints)
    }
}
