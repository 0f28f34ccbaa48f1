//! Provides the builder and implementation of [`GrpcService`] for a channel
//! connected to one resolved endpoint of the geo-proximity service.

use crate::{DnsResolver, LookupService, ServiceDefinition};
use anyhow::Context as _;
use http::Request;
use std::{
    net::SocketAddr,
    task::{Context, Poll},
};
use tokio::time::Duration;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{body::BoxBody, client::GrpcService};
use tower_service::Service;

// How long we wait for the endpoint lookup before giving up,
// unless the builder is told otherwise.
const DEFAULT_RESOLUTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Implements tonic [`GrpcService`] for a [`Channel`] that is already connected
/// to the geo-proximity service.
///
/// ```rust,no_run
/// #[tokio::main]
/// async fn main() {
///     use geocolo::{GrpcProximityService, ProximityChannel};
///
///     let channel = ProximityChannel::builder("geo.example.com:5000".parse().unwrap())
///         .channel()
///         .await
///         .expect("failed to connect");
///
///     let service = GrpcProximityService::new(channel);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProximityChannel(Channel);

impl ProximityChannel {
    /// Start configuring a `ProximityChannel` for the given [`ServiceDefinition`],
    /// resolved with a [`DnsResolver`] unless another [`LookupService`] is set.
    pub fn builder(service_definition: ServiceDefinition) -> ProximityChannelBuilder<DnsResolver> {
        ProximityChannelBuilder::new_with_service(service_definition)
    }
}

impl Service<http::Request<BoxBody>> for ProximityChannel {
    type Response = http::Response<<Channel as GrpcService<BoxBody>>::ResponseBody>;
    type Error = <Channel as GrpcService<BoxBody>>::Error;
    type Future = <Channel as GrpcService<BoxBody>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        GrpcService::poll_ready(&mut self.0, cx)
    }

    fn call(&mut self, request: Request<BoxBody>) -> Self::Future {
        GrpcService::call(&mut self.0, request)
    }
}

/// Builder to configure and create a [`ProximityChannel`].
pub struct ProximityChannelBuilder<T> {
    service_definition: ServiceDefinition,
    resolution_timeout: Duration,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    tls_config: Option<ClientTlsConfig>,
    tls_domain_name: Option<String>,
    lookup_service: Option<T>,
}

impl ProximityChannelBuilder<DnsResolver> {
    /// Set the [`ServiceDefinition`] of the geo-proximity service.
    pub fn new_with_service(service_definition: ServiceDefinition) -> Self {
        Self {
            service_definition,
            resolution_timeout: DEFAULT_RESOLUTION_TIMEOUT,
            timeout: None,
            connect_timeout: None,
            tls_config: None,
            tls_domain_name: None,
            lookup_service: None,
        }
    }

    /// Set a custom [`LookupService`], e.g. a
    /// [`DiscoveryResolver`](crate::DiscoveryResolver).
    pub fn lookup_service<T: LookupService + Send + Sync + 'static>(
        self,
        lookup_service: T,
    ) -> ProximityChannelBuilder<T> {
        ProximityChannelBuilder {
            lookup_service: Some(lookup_service),
            service_definition: self.service_definition,
            resolution_timeout: self.resolution_timeout,
            tls_config: self.tls_config,
            tls_domain_name: self.tls_domain_name,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
        }
    }
}

impl<T: LookupService + Send + Sync + 'static> ProximityChannelBuilder<T> {
    /// Set how long the endpoint lookup may take. Defaults to 10 seconds.
    pub fn resolution_timeout(self, timeout: Duration) -> ProximityChannelBuilder<T> {
        Self {
            resolution_timeout: timeout,
            ..self
        }
    }

    /// Set a request timeout that will be applied to the `Endpoint`.
    pub fn timeout(self, timeout: Duration) -> ProximityChannelBuilder<T> {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Set a connection timeout that will be applied to the `Endpoint`.
    ///
    /// Defaults to the overall request `timeout` if not set.
    pub fn connect_timeout(self, connection_timeout: Duration) -> ProximityChannelBuilder<T> {
        Self {
            connect_timeout: Some(connection_timeout),
            ..self
        }
    }

    /// Configure the channel to use tls.
    pub fn with_tls(self, tls_config: ClientTlsConfig) -> ProximityChannelBuilder<T> {
        Self {
            tls_config: Some(tls_config),
            ..self
        }
    }

    /// Override the name the server certificate is checked against.
    ///
    /// Defaults to [`ServiceDefinition::hostname`].
    pub fn tls_domain_name(self, domain_name: impl Into<String>) -> ProximityChannelBuilder<T> {
        Self {
            tls_domain_name: Some(domain_name.into()),
            ..self
        }
    }

    /// Resolve the service endpoints once and connect to the first one that answers,
    /// in the order the [`LookupService`] returned them.
    ///
    /// An endpoint given as an IP address is dialed without any lookup.
    pub async fn channel(mut self) -> Result<ProximityChannel, anyhow::Error> {
        if let Some(address) = self.service_definition.socket_addr() {
            return self.connect_any(vec![address]).await;
        }

        let addresses = match self.lookup_service.take() {
            Some(lookup_service) => self.resolve(lookup_service).await?,
            None => self.resolve(DnsResolver::from_system_config()?).await?,
        };
        self.connect_any(addresses).await
    }

    async fn resolve<U>(&self, lookup_service: U) -> Result<Vec<SocketAddr>, anyhow::Error>
    where
        U: LookupService + Send + Sync + 'static,
    {
        let addresses = tokio::time::timeout(
            self.resolution_timeout,
            lookup_service.resolve_service_endpoints(&self.service_definition),
        )
        .await
        .context("timed out while attempting to resolve IPs")?
        .context("failed to resolve IPs")?;

        if addresses.is_empty() {
            anyhow::bail!(
                "no endpoints found for '{}'",
                self.service_definition.hostname()
            );
        }

        Ok(addresses)
    }

    /// The name the server certificate must match.
    fn certificate_domain(&self) -> &str {
        self.tls_domain_name
            .as_deref()
            .unwrap_or_else(|| self.service_definition.hostname())
    }

    async fn connect_any(
        self,
        addresses: Vec<SocketAddr>,
    ) -> Result<ProximityChannel, anyhow::Error> {
        let domain_name = self.certificate_domain().to_owned();
        let tls_config = self.tls_config.map(|tls_config| {
            // Since we resolve the hostname to an IP, which is not a valid DNS name,
            // we have to set the hostname explicitly on the tls config,
            // otherwise the IP will be set as the domain name and tls handshake will fail.
            tls_config.domain_name(domain_name)
        });

        let mut last_error = None;
        for address in addresses {
            let endpoint = build_endpoint(
                address,
                tls_config.clone(),
                self.timeout,
                self.connect_timeout.or(self.timeout),
            )?;

            match endpoint.connect().await {
                Ok(channel) => {
                    tracing::debug!("connected to {}", address);
                    return Ok(ProximityChannel(channel));
                }
                Err(err) => {
                    tracing::warn!("failed to connect to {}: {}", address, err);
                    last_error = Some(
                        anyhow::Error::new(err).context(format!("failed to connect to {address}")),
                    );
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("no endpoint could be dialed")))
    }
}

fn build_endpoint(
    address: SocketAddr,
    tls_config: Option<ClientTlsConfig>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
) -> Result<Endpoint, anyhow::Error> {
    let scheme = if tls_config.is_some() { "https" } else { "http" };
    let mut endpoint = Endpoint::from_shared(format!("{scheme}://{address}"))
        .context("failed to build endpoint uri")?;

    if let Some(tls_config) = tls_config {
        endpoint = endpoint
            .tls_config(tls_config)
            .context("failed to apply tls config")?;
    }
    if let Some(timeout) = timeout {
        endpoint = endpoint.timeout(timeout);
    }
    if let Some(connect_timeout) = connect_timeout {
        endpoint = endpoint.connect_timeout(connect_timeout);
    }

    Ok(endpoint)
}

const _: () = {
    const fn assert_is_send<T: Send>() {}
    assert_is_send::<ProximityChannelBuilder<DnsResolver>>();
    assert_is_send::<ProximityChannel>();
};
