//! Turns the client configuration into one of the two proximity queries.

use crate::{split_country_candidates, split_ip_candidates, Error};
use crate::{CountryProximityRequest, IpProximityRequest};
use std::{convert::Infallible, fmt, str::FromStr, time::Duration};
use tonic::transport::ClientTlsConfig;

/// Which remote method a query goes to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// `GeoProximityService.GetProximity`.
    #[default]
    Country,
    /// `GeoProximityService.GetProximityByIP`.
    Ip,
    /// Anything else. Kept verbatim so it can be reported.
    Other(String),
}

impl FromStr for Mode {
    type Err = Infallible;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        Ok(match mode {
            "country" => Mode::Country,
            "ip" => Mode::Ip,
            other => Mode::Other(other.to_owned()),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Country => f.write_str("country"),
            Mode::Ip => f.write_str("ip"),
            Mode::Other(other) => f.write_str(other),
        }
    }
}

/// Everything one run of the client needs, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    /// `host[:port]` of the service, or its name inside the discovery zone.
    pub endpoint: String,
    /// Enables discovery when non-empty.
    pub discovery_uri: String,
    /// Bootstrap nameservers for the discovery zone.
    pub discovery_boot_uri: String,
    pub origin: String,
    /// Comma separated candidates.
    pub candidates: String,
    pub mode: Mode,
    /// Only used by IP queries.
    pub max_distance: f64,
    pub detailed: bool,
    /// Fail on an unknown [`Mode`] instead of doing nothing.
    pub reject_unknown_mode: bool,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub tls: Option<ClientTlsConfig>,
    pub tls_domain_name: Option<String>,
}

/// A proximity query, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Country(CountryProximityRequest),
    Ip(IpProximityRequest),
}

impl Query {
    /// Build the query selected by `config.mode`.
    ///
    /// An unknown mode yields `Ok(None)`, or [`Error::UnknownMode`] when
    /// `config.reject_unknown_mode` is set.
    ///
    /// ```
    /// use geocolo::{Query, QueryConfig};
    ///
    /// let config = QueryConfig {
    ///     mode: "ip".parse().unwrap(),
    ///     origin: "1.2.3.4".into(),
    ///     ..Default::default()
    /// };
    /// match Query::from_config(&config).unwrap() {
    ///     Some(Query::Ip(request)) => assert_eq!(request.candidates, vec![""]),
    ///     other => panic!("unexpected query {other:?}"),
    /// }
    /// ```
    pub fn from_config(config: &QueryConfig) -> Result<Option<Self>, Error> {
        match &config.mode {
            Mode::Country => Ok(Some(Query::Country(CountryProximityRequest {
                origin: config.origin.clone(),
                candidates: split_country_candidates(&config.candidates),
                detailed: config.detailed,
            }))),
            Mode::Ip => Ok(Some(Query::Ip(IpProximityRequest {
                origin: config.origin.clone(),
                candidates: split_ip_candidates(&config.candidates),
                max_distance: config.max_distance,
                detailed: config.detailed,
            }))),
            Mode::Other(mode) if config.reject_unknown_mode => {
                Err(Error::UnknownMode(mode.clone()))
            }
            Mode::Other(mode) => {
                tracing::warn!("unknown mode '{}', nothing to do", mode);
                Ok(None)
            }
        }
    }
}
