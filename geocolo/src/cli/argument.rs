use anyhow::Context;
use clap::{ArgAction, Parser};
use geocolo::{Mode, QueryConfig};
use std::{path::PathBuf, time::Duration};
use tonic::transport::{Certificate, ClientTlsConfig};

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds).map_err(|err| err.to_string())
}

/// Look up the country, or the IP addresses, closest to an origin.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The service endpoint to connect to, `host:port`. With discovery, the
    /// service name inside the discovery zone.
    #[arg(long, default_value = "")]
    pub endpoint: String,

    /// Discovery URI naming the cluster zone, e.g. `dns://geo.prod.internal`.
    #[arg(
        long = "doozer-uri",
        visible_alias = "discovery-uri",
        env = "DOOZER_URI",
        default_value = ""
    )]
    pub discovery_uri: String,

    /// Bootstrap nameservers used to reach the discovery zone, `ip[:port]`,
    /// comma separated.
    #[arg(
        long = "doozer-boot-uri",
        visible_alias = "discovery-boot-uri",
        env = "DOOZER_BOOT_URI",
        default_value = ""
    )]
    pub discovery_boot_uri: String,

    /// Country or address which we're looking for close candidates for.
    #[arg(long, default_value = "")]
    pub origin: String,

    /// Comma separated list of candidates to consider.
    #[arg(long, default_value = "")]
    pub candidates: String,

    /// Method to contact (country or ip).
    #[arg(long, default_value = "country")]
    pub mode: Mode,

    /// Maximum distance from the closest IP to consider.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub max_distance: f64,

    /// Whether to give a detailed response.
    #[arg(
        long,
        default_value_t = false,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub detailed: bool,

    /// Request timeout in seconds.
    #[arg(long, value_parser = parse_seconds)]
    pub timeout: Option<Duration>,

    /// Connection timeout in seconds. Defaults to `--timeout`.
    #[arg(long, value_parser = parse_seconds)]
    pub connect_timeout: Option<Duration>,

    /// PEM file with the CA certificate of the service. Enables TLS.
    #[arg(long, help_heading = "TLS")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Name to check the server certificate against. Defaults to the endpoint host.
    #[arg(long, help_heading = "TLS", requires = "tls_ca_cert")]
    pub tls_domain: Option<String>,

    /// Fail on an unknown mode instead of exiting without doing anything.
    #[arg(long)]
    pub reject_unknown_mode: bool,

    /// Log filter, e.g. `debug` or `geocolo=trace`.
    #[arg(long = "log", env = "RUST_LOG", default_value = "warn")]
    pub log_filter: String,
}

impl Cli {
    /// Resolve the parsed arguments into a [`QueryConfig`].
    pub fn into_config(self) -> anyhow::Result<QueryConfig> {
        let tls = match &self.tls_ca_cert {
            Some(path) => {
                let pem = std::fs::read(path)
                    .with_context(|| format!("failed to read CA certificate {}", path.display()))?;
                Some(ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem)))
            }
            None => None,
        };

        Ok(QueryConfig {
            endpoint: self.endpoint,
            discovery_uri: self.discovery_uri,
            discovery_boot_uri: self.discovery_boot_uri,
            origin: self.origin,
            candidates: self.candidates,
            mode: self.mode,
            max_distance: self.max_distance,
            detailed: self.detailed,
            reject_unknown_mode: self.reject_unknown_mode,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            tls,
            tls_domain_name: self.tls_domain,
        })
    }
}
