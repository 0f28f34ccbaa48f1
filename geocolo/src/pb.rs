//! Wire messages of the `geocolo.GeoProximityService` gRPC service.
//!
//! Fields use explicit presence (proto2 `optional`), so an absent value is
//! `None` rather than an empty string or zero.

/// Asks for the country closest to `origin` among `candidates`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CountryProximityRequest {
    #[prost(string, optional, tag = "1")]
    pub origin: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, repeated, tag = "2")]
    pub candidates: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(bool, optional, tag = "3")]
    pub detailed_response: ::core::option::Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CountryDistance {
    #[prost(string, optional, tag = "1")]
    pub country: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(double, optional, tag = "2")]
    pub distance: ::core::option::Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CountryProximityResponse {
    #[prost(string, optional, tag = "1")]
    pub closest: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "2")]
    pub full_map: ::prost::alloc::vec::Vec<CountryDistance>,
}

/// Asks for the addresses among `candidates` closest to `origin`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IpProximityRequest {
    #[prost(string, optional, tag = "1")]
    pub origin: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, repeated, tag = "2")]
    pub candidates: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(bool, optional, tag = "3")]
    pub detailed_response: ::core::option::Option<bool>,
    #[prost(double, optional, tag = "4")]
    pub max_distance: ::core::option::Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IpDistance {
    #[prost(string, optional, tag = "1")]
    pub ip: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(double, optional, tag = "2")]
    pub distance: ::core::option::Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IpProximityResponse {
    #[prost(string, repeated, tag = "1")]
    pub closest: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "2")]
    pub full_map: ::prost::alloc::vec::Vec<IpDistance>,
}

// Generated by `build.rs`: `geo_proximity_service_client` and
// `geo_proximity_service_server`.
include!(concat!(env!("OUT_DIR"), "/geocolo.GeoProximityService.rs"));
