//! Defines the interface that [`ProximityQueryClient`](crate::ProximityQueryClient)
//! requires in order to reach a geo-proximity service.

use crate::{
    CountryProximityRequest, CountryProximityResponse, IpProximityRequest, IpProximityResponse,
};

/// The two methods of the remote `GeoProximityService`.
///
/// Implementations own the transport. An error from either method ends the
/// query, there are no retries on top of what the transport does itself.
#[async_trait::async_trait]
pub trait ProximityService {
    /// `GeoProximityService.GetProximity`.
    async fn get_proximity(
        &self,
        request: CountryProximityRequest,
    ) -> Result<CountryProximityResponse, anyhow::Error>;

    /// `GeoProximityService.GetProximityByIP`.
    async fn get_proximity_by_ip(
        &self,
        request: IpProximityRequest,
    ) -> Result<IpProximityResponse, anyhow::Error>;
}
