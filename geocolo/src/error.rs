//! Errors that end a proximity query.

/// A failure of one step of [`ProximityQueryClient::execute`](crate::ProximityQueryClient::execute).
///
/// None of these are retried. Absent fields inside a detail entry are not
/// errors, they are logged and rendering carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The discovery configuration could not be set up.
    #[error("failed to initialize discovery for '{uri}'")]
    Discovery {
        uri: String,
        #[source]
        source: anyhow::Error,
    },
    /// The endpoint could not be resolved or dialed.
    #[error("failed to connect to '{endpoint}'")]
    Connect {
        endpoint: String,
        #[source]
        source: anyhow::Error,
    },
    /// The remote call failed in transport or on the remote side.
    #[error("failed to send proximity request to {method}")]
    Call {
        method: &'static str,
        #[source]
        source: anyhow::Error,
    },
    /// The service answered a country query without a closest country.
    #[error("failed to fetch closest country")]
    NoClosestCountry,
    /// The configured mode is neither `country` nor `ip`.
    #[error("unknown mode '{0}', expected 'country' or 'ip'")]
    UnknownMode(String),
    /// Writing a result line failed.
    #[error("failed to write result")]
    Output(#[from] std::io::Error),
}
