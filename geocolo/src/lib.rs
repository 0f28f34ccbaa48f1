//! `geocolo` is a client for a geo-proximity service: it asks which country,
//! or which IP addresses, are closest to an origin and renders the answer.
//!
//! The service is reached over gRPC, either directly or after looking its
//! endpoint up in a discovery zone.
//!
//! # Simple example
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() {
//!     use geocolo::{Mode, QueryConfig};
//!
//!     let config = QueryConfig {
//!         endpoint: "geo.example.com:5000".into(),
//!         mode: Mode::Country,
//!         origin: "US".into(),
//!         candidates: "CA,MX".into(),
//!         detailed: true,
//!         ..Default::default()
//!     };
//!
//!     geocolo::run(&config, &mut std::io::stdout())
//!         .await
//!         .expect("proximity query failed");
//! }
//! ```
//!
//! With discovery, the endpoint is a service name inside the discovery zone.
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() {
//!     use geocolo::QueryConfig;
//!
//!     let config = QueryConfig {
//!         endpoint: "geocolo".into(),
//!         discovery_uri: "dns://geo.prod.internal".into(),
//!         discovery_boot_uri: "10.0.0.2:53".into(),
//!         origin: "DE".into(),
//!         ..Default::default()
//!     };
//!
//!     geocolo::run(&config, &mut std::io::stdout())
//!         .await
//!         .expect("proximity query failed");
//! }
//! ```
//!
//! [`ProximityQueryClient`] works with any [`ProximityService`], which keeps
//! the query and rendering logic independent of the transport.
//!
//! ```rust
//! use geocolo::{
//!     CountryProximityRequest, CountryProximityResponse, IpProximityRequest,
//!     IpProximityResponse, ProximityQueryClient, ProximityService, Query,
//! };
//!
//! // Always answers "FR".
//! struct FixedService;
//!
//! #[async_trait::async_trait]
//! impl ProximityService for FixedService {
//!     async fn get_proximity(
//!         &self,
//!         _request: CountryProximityRequest,
//!     ) -> Result<CountryProximityResponse, anyhow::Error> {
//!         Ok(CountryProximityResponse {
//!             closest: Some("FR".into()),
//!             full_map: vec![],
//!         })
//!     }
//!
//!     async fn get_proximity_by_ip(
//!         &self,
//!         _request: IpProximityRequest,
//!     ) -> Result<IpProximityResponse, anyhow::Error> {
//!         Ok(IpProximityResponse::default())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ProximityQueryClient::new(FixedService);
//!     let mut out = Vec::new();
//!
//!     client
//!         .execute(Query::Country(CountryProximityRequest::default()), &mut out)
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(out, b"Closest country: FR\n");
//! }
//! ```

mod channel;
mod client;
mod discovery;
mod dns_resolver;
mod error;
mod grpc_service;
mod lookup_service;
pub mod pb;
mod proximity;
mod proximity_service;
mod query;
mod service_definition;

pub use channel::*;
pub use client::*;
pub use discovery::*;
pub use dns_resolver::*;
pub use error::*;
pub use grpc_service::*;
pub use lookup_service::*;
pub use proximity::*;
pub use proximity_service::*;
pub use query::*;
pub use service_definition::*;
