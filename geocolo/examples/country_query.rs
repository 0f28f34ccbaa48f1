use anyhow::Context;
use geocolo::{
    CountryProximityRequest, GrpcProximityService, ProximityChannel, ProximityQueryClient, Query,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The endpoint is resolved once and dialed before the client is built,
    // so a missing server fails here rather than on the call.
    let channel = ProximityChannel::builder("localhost:5000".parse()?)
        .resolution_timeout(Duration::from_secs(20))
        .timeout(Duration::from_secs(10))
        .channel()
        .await
        .context("failed to connect to the geo-proximity service")?;

    let client = ProximityQueryClient::new(GrpcProximityService::new(channel));

    let query = Query::Country(CountryProximityRequest {
        origin: "US".into(),
        candidates: vec!["CA".into(), "MX".into()],
        detailed: true,
    });

    client.execute(query, &mut std::io::stdout()).await?;

    Ok(())
}
