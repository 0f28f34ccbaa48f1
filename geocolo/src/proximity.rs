//! Transport-independent request and response types of a proximity query.
//!
//! Every distance and name carried in a response is optional: `None` means
//! the service did not send the value, which is not the same thing as an
//! empty string or a zero distance.

use crate::pb;

/// Split the `candidates` input of a country query.
///
/// An empty input yields no candidates, which asks the service to consider
/// every country it knows about.
///
/// ```
/// assert!(geocolo::split_country_candidates("").is_empty());
/// assert_eq!(geocolo::split_country_candidates("CA,MX"), vec!["CA", "MX"]);
/// ```
pub fn split_country_candidates(candidates: &str) -> Vec<String> {
    if candidates.is_empty() {
        return Vec::new();
    }
    candidates.split(',').map(str::to_owned).collect()
}

/// Split the `candidates` input of an IP query.
///
/// The input is always split, so an empty input yields a single empty
/// candidate.
///
/// ```
/// assert_eq!(geocolo::split_ip_candidates(""), vec![""]);
/// ```
pub fn split_ip_candidates(candidates: &str) -> Vec<String> {
    candidates.split(',').map(str::to_owned).collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryProximityRequest {
    /// Country code to measure from. Empty means no origin was given.
    pub origin: String,
    /// Countries to rank. Empty means all known countries.
    pub candidates: Vec<String>,
    /// Ask for the full per-candidate map, not only the closest country.
    pub detailed: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryDistance {
    pub country: Option<String>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryProximityResponse {
    /// `None` when the service found no closest country.
    pub closest: Option<String>,
    /// Only populated for detailed requests. An entry is `None` when the
    /// transport delivered an empty slot.
    pub full_map: Vec<Option<CountryDistance>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IpProximityRequest {
    /// Address or location token to measure from.
    pub origin: String,
    pub candidates: Vec<String>,
    /// Upper bound on the distance of a candidate. Sent as-is; what a bound
    /// of `0` means is up to the service.
    pub max_distance: f64,
    pub detailed: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IpDistance {
    pub ip: Option<String>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IpProximityResponse {
    pub closest: Vec<String>,
    pub full_map: Vec<Option<IpDistance>>,
}

impl From<CountryProximityRequest> for pb::CountryProximityRequest {
    fn from(request: CountryProximityRequest) -> Self {
        Self {
            origin: Some(request.origin),
            candidates: request.candidates,
            detailed_response: Some(request.detailed),
        }
    }
}

impl From<pb::CountryProximityRequest> for CountryProximityRequest {
    fn from(request: pb::CountryProximityRequest) -> Self {
        Self {
            origin: request.origin.unwrap_or_default(),
            candidates: request.candidates,
            detailed: request.detailed_response.unwrap_or_default(),
        }
    }
}

impl From<pb::CountryProximityResponse> for CountryProximityResponse {
    fn from(response: pb::CountryProximityResponse) -> Self {
        Self {
            closest: response.closest,
            full_map: response
                .full_map
                .into_iter()
                .map(|detail| {
                    Some(CountryDistance {
                        country: detail.country,
                        distance: detail.distance,
                    })
                })
                .collect(),
        }
    }
}

impl From<CountryProximityResponse> for pb::CountryProximityResponse {
    fn from(response: CountryProximityResponse) -> Self {
        Self {
            closest: response.closest,
            full_map: response
                .full_map
                .into_iter()
                .map(|detail| {
                    let detail = detail.unwrap_or_default();
                    pb::CountryDistance {
                        country: detail.country,
                        distance: detail.distance,
                    }
                })
                .collect(),
        }
    }
}

impl From<IpProximityRequest> for pb::IpProximityRequest {
    fn from(request: IpProximityRequest) -> Self {
        Self {
            origin: Some(request.origin),
            candidates: request.candidates,
            detailed_response: Some(request.detailed),
            max_distance: Some(request.max_distance),
        }
    }
}

impl From<pb::IpProximityRequest> for IpProximityRequest {
    fn from(request: pb::IpProximityRequest) -> Self {
        Self {
            origin: request.origin.unwrap_or_default(),
            candidates: request.candidates,
            max_distance: request.max_distance.unwrap_or_default(),
            detailed: request.detailed_response.unwrap_or_default(),
        }
    }
}

impl From<pb::IpProximityResponse> for IpProximityResponse {
    fn from(response: pb::IpProximityResponse) -> Self {
        Self {
            closest: response.closest,
            full_map: response
                .full_map
                .into_iter()
                .map(|detail| {
                    Some(IpDistance {
                        ip: detail.ip,
                        distance: detail.distance,
                    })
                })
                .collect(),
        }
    }
}

impl From<IpProximityResponse> for pb::IpProximityResponse {
    fn from(response: IpProximityResponse) -> Self {
        Self {
            closest: response.closest,
            full_map: response
                .full_map
                .into_iter()
                .map(|detail| {
                    let detail = detail.unwrap_or_default();
                    pb::IpDistance {
                        ip: detail.ip,
                        distance: detail.distance,
                    }
                })
                .collect(),
        }
    }
}
