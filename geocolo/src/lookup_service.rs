//! Defines the interface that [`ProximityChannel`](crate::ProximityChannel) requires in order
//! to resolve all the IP adresses of the geo-proximity service.

use std::net::SocketAddr;

use crate::ServiceDefinition;

/// Interface that provides functionality to
/// acquire a list of socket addresses given a service endpoint.
#[async_trait::async_trait]
pub trait LookupService {
    /// Return the [`SocketAddr`]s associated with the provided
    /// [`ServiceDefinition`](crate::ServiceDefinition), in the order they
    /// should be dialed.
    /// If no addresses were resolved, an empty Vec is returned.
    async fn resolve_service_endpoints(
        &self,
        definition: &ServiceDefinition,
    ) -> Result<Vec<SocketAddr>, anyhow::Error>;
}
