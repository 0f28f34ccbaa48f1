use geocolo::pb::{
    self,
    geo_proximity_service_server::{GeoProximityService, GeoProximityServiceServer},
};
use geocolo::{CountryProximityResponse, IpProximityResponse};
use std::sync::{Arc, Mutex};
use tonic::{Request, Response, Status};

/// A geo-proximity service answering with scripted responses.
///
/// Clones share their state, so a test can keep one handle and hand
/// another to the [`TestServer`](crate::test_server::TestServer).
#[derive(Clone, Default)]
pub struct FakeGeoProximity {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    country_response: pb::CountryProximityResponse,
    ip_response: pb::IpProximityResponse,
    failure: Option<String>,
    country_requests: Vec<pb::CountryProximityRequest>,
    ip_requests: Vec<pb::IpProximityRequest>,
}

impl FakeGeoProximity {
    /// Answer country queries with `response`.
    pub fn with_country_response(self, response: impl Into<pb::CountryProximityResponse>) -> Self {
        self.state.lock().unwrap().country_response = response.into();
        self
    }

    /// Answer IP queries with `response`.
    pub fn with_ip_response(self, response: impl Into<pb::IpProximityResponse>) -> Self {
        self.state.lock().unwrap().ip_response = response.into();
        self
    }

    /// Fail every call with an `UNAVAILABLE` status carrying `message`.
    pub fn failing(self, message: &str) -> Self {
        self.state.lock().unwrap().failure = Some(message.to_owned());
        self
    }

    /// The country requests received so far.
    pub fn country_requests(&self) -> Vec<pb::CountryProximityRequest> {
        self.state.lock().unwrap().country_requests.clone()
    }

    /// The IP requests received so far.
    pub fn ip_requests(&self) -> Vec<pb::IpProximityRequest> {
        self.state.lock().unwrap().ip_requests.clone()
    }

    /// Wrap a handle in the generated tonic server.
    pub fn server(&self) -> GeoProximityServiceServer<Self> {
        GeoProximityServiceServer::new(self.clone())
    }
}

impl From<CountryProximityResponse> for FakeGeoProximity {
    fn from(response: CountryProximityResponse) -> Self {
        Self::default().with_country_response(response)
    }
}

impl From<IpProximityResponse> for FakeGeoProximity {
    fn from(response: IpProximityResponse) -> Self {
        Self::default().with_ip_response(response)
    }
}

#[tonic::async_trait]
impl GeoProximityService for FakeGeoProximity {
    async fn get_proximity(
        &self,
        request: Request<pb::CountryProximityRequest>,
    ) -> Result<Response<pb::CountryProximityResponse>, Status> {
        let mut state = self.state.lock().unwrap();
        state.country_requests.push(request.into_inner());
        match &state.failure {
            Some(message) => Err(Status::unavailable(message.clone())),
            None => Ok(Response::new(state.country_response.clone())),
        }
    }

    async fn get_proximity_by_ip(
        &self,
        request: Request<pb::IpProximityRequest>,
    ) -> Result<Response<pb::IpProximityResponse>, Status> {
        let mut state = self.state.lock().unwrap();
        state.ip_requests.push(request.into_inner());
        match &state.failure {
            Some(message) => Err(Status::unavailable(message.clone())),
            None => Ok(Response::new(state.ip_response.clone())),
        }
    }
}
