//! Implements [`ProximityService`] over gRPC.

use crate::{
    pb::{self, geo_proximity_service_client::GeoProximityServiceClient},
    CountryProximityRequest, CountryProximityResponse, IpProximityRequest, IpProximityResponse,
    ProximityChannel, ProximityService,
};
use anyhow::Context;

/// A [`ProximityService`] backed by the generated tonic client.
///
/// Building one does not touch the network; errors surface on the calls.
#[derive(Debug, Clone)]
pub struct GrpcProximityService {
    client: GeoProximityServiceClient<ProximityChannel>,
}

impl GrpcProximityService {
    pub fn new(channel: ProximityChannel) -> Self {
        Self {
            client: GeoProximityServiceClient::new(channel),
        }
    }
}

#[async_trait::async_trait]
impl ProximityService for GrpcProximityService {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_proximity(
        &self,
        request: CountryProximityRequest,
    ) -> Result<CountryProximityResponse, anyhow::Error> {
        // The generated client needs `&mut self`; clones share the channel.
        let mut client = self.client.clone();
        let response = client
            .get_proximity(tonic::Request::new(pb::CountryProximityRequest::from(request)))
            .await
            .context("GeoProximityService.GetProximity returned an error")?;

        Ok(response.into_inner().into())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_proximity_by_ip(
        &self,
        request: IpProximityRequest,
    ) -> Result<IpProximityResponse, anyhow::Error> {
        let mut client = self.client.clone();
        let response = client
            .get_proximity_by_ip(tonic::Request::new(pb::IpProximityRequest::from(request)))
            .await
            .context("GeoProximityService.GetProximityByIP returned an error")?;

        Ok(response.into_inner().into())
    }
}
