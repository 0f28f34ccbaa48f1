//! Generate the client and server stubs for the `geocolo.GeoProximityService`
//! gRPC service. The message types are hand-written prost structs in
//! `src/pb.rs`, so no `protoc` is needed.

use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic::codec::ProstCodec";

fn main() {
    let service = Service::builder()
        .name("GeoProximityService")
        .package("geocolo")
        .method(
            Method::builder()
                .name("get_proximity")
                .route_name("GetProximity")
                .input_type("crate::pb::CountryProximityRequest")
                .output_type("crate::pb::CountryProximityResponse")
                .codec_path(CODEC)
                .build(),
        )
        .method(
            Method::builder()
                .name("get_proximity_by_ip")
                .route_name("GetProximityByIP")
                .input_type("crate::pb::IpProximityRequest")
                .output_type("crate::pb::IpProximityResponse")
                .codec_path(CODEC)
                .build(),
        )
        .build();

    Builder::new()
        .build_client(true)
        .build_server(true)
        .compile(&[service]);
}
