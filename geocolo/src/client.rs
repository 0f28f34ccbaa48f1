//! Drives one proximity query from configuration to printed result.

use crate::{
    CountryDistance, CountryProximityResponse, DiscoveryConfig, DiscoveryResolver, Error,
    GrpcProximityService, IpDistance, IpProximityResponse, LookupService, ProximityChannel,
    ProximityChannelBuilder, ProximityService, Query, QueryConfig, ServiceDefinition,
};
use std::io::Write;

const GET_PROXIMITY: &str = "GeoProximityService.GetProximity";
const GET_PROXIMITY_BY_IP: &str = "GeoProximityService.GetProximityByIP";

/// Run one query end-to-end: discovery, connection, call and rendering.
///
/// Result lines are written to `out`. An unknown mode returns before any
/// network activity.
pub async fn run<W: Write>(config: &QueryConfig, out: &mut W) -> Result<(), Error> {
    let query = match Query::from_config(config)? {
        Some(query) => query,
        None => return Ok(()),
    };

    let client = ProximityQueryClient::connect(config).await?;
    client.execute(query, out).await
}

/// Sends a [`Query`] to a [`ProximityService`] and renders the answer.
pub struct ProximityQueryClient<S> {
    service: S,
}

impl ProximityQueryClient<GrpcProximityService> {
    /// Set up discovery if `config.discovery_uri` is set, then resolve and
    /// dial `config.endpoint`.
    #[tracing::instrument(level = "debug", skip(config), fields(endpoint = %config.endpoint))]
    pub async fn connect(config: &QueryConfig) -> Result<Self, Error> {
        let discovery = if config.discovery_uri.is_empty() {
            None
        } else {
            let resolver = DiscoveryConfig::new(&config.discovery_boot_uri, &config.discovery_uri)
                .and_then(|discovery| DiscoveryResolver::new(&discovery))
                .map_err(|source| Error::Discovery {
                    uri: config.discovery_uri.clone(),
                    source,
                })?;
            Some(resolver)
        };

        let connect_error = |source| Error::Connect {
            endpoint: config.endpoint.clone(),
            source,
        };

        let service_definition = config
            .endpoint
            .parse::<ServiceDefinition>()
            .map_err(connect_error)?;
        let builder = ProximityChannel::builder(service_definition);

        let channel = match discovery {
            Some(resolver) => {
                configure(builder.lookup_service(resolver), config)
                    .channel()
                    .await
            }
            None => configure(builder, config).channel().await,
        }
        .map_err(connect_error)?;

        Ok(Self::new(GrpcProximityService::new(channel)))
    }
}

fn configure<T>(
    mut builder: ProximityChannelBuilder<T>,
    config: &QueryConfig,
) -> ProximityChannelBuilder<T>
where
    T: LookupService + Send + Sync + 'static,
{
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(tls) = config.tls.clone() {
        builder = builder.with_tls(tls);
    }
    if let Some(domain_name) = config.tls_domain_name.clone() {
        builder = builder.tls_domain_name(domain_name);
    }
    builder
}

impl<S: ProximityService> ProximityQueryClient<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Send `query` and write the result lines to `out`.
    pub async fn execute<W: Write>(&self, query: Query, out: &mut W) -> Result<(), Error> {
        match query {
            Query::Country(request) => {
                let response = self
                    .service
                    .get_proximity(request)
                    .await
                    .map_err(|source| Error::Call {
                        method: GET_PROXIMITY,
                        source,
                    })?;
                render_country(&response, out)
            }
            Query::Ip(request) => {
                let response = self
                    .service
                    .get_proximity_by_ip(request)
                    .await
                    .map_err(|source| Error::Call {
                        method: GET_PROXIMITY_BY_IP,
                        source,
                    })?;
                render_ip(&response, out)
            }
        }
    }
}

/// Write the closest country and the detail entries that are complete.
///
/// A response without a closest country is an error, whatever the detail
/// entries hold. Incomplete entries are logged and skipped.
pub fn render_country<W: Write>(
    response: &CountryProximityResponse,
    out: &mut W,
) -> Result<(), Error> {
    let closest = response
        .closest
        .as_deref()
        .ok_or(Error::NoClosestCountry)?;
    writeln!(out, "Closest country: {closest}")?;

    for detail in &response.full_map {
        match detail {
            None => tracing::error!("detail entry is missing"),
            Some(CountryDistance {
                country: Some(country),
                distance: Some(distance),
            }) => writeln!(out, "Country {country}: distance {distance:.6}")?,
            Some(CountryDistance {
                country: None,
                distance,
            }) => {
                tracing::error!("country is missing from detail entry");
                if let Some(distance) = distance {
                    tracing::error!("(distance was {:.6})", distance);
                }
            }
            Some(CountryDistance {
                country: Some(country),
                distance: None,
            }) => {
                tracing::error!("distance is missing from detail entry");
                tracing::error!("(country was {})", country);
            }
        }
    }

    Ok(())
}

/// Write the closest addresses and the detail entries that are complete.
pub fn render_ip<W: Write>(response: &IpProximityResponse, out: &mut W) -> Result<(), Error> {
    for address in &response.closest {
        writeln!(out, "Close IP: {address}")?;
    }

    for detail in &response.full_map {
        match detail {
            None => tracing::error!("detail entry is missing"),
            Some(IpDistance {
                ip: Some(ip),
                distance: Some(distance),
            }) => writeln!(out, "IP: {ip}, distance: {distance:.6}")?,
            Some(IpDistance { ip: None, distance }) => {
                tracing::error!("ip is missing from detail entry");
                if let Some(distance) = distance {
                    tracing::error!("(distance was {:.6})", distance);
                }
            }
            Some(IpDistance {
                ip: Some(ip),
                distance: None,
            }) => {
                tracing::error!("distance is missing from detail entry");
                tracing::error!("(ip was {})", ip);
            }
        }
    }

    Ok(())
}
