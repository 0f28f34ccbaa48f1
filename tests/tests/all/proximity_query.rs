use geocolo::{
    pb, CountryDistance, CountryProximityResponse, Error, IpDistance, IpProximityResponse, Mode,
    QueryConfig,
};
use std::time::Duration;
use tests::fake_service::FakeGeoProximity;
use tests::test_server::TestServer;

async fn run(config: &QueryConfig) -> (Result<(), Error>, String) {
    let mut out = Vec::new();
    let result = geocolo::run(config, &mut out).await;
    (result, String::from_utf8(out).expect("output is not utf-8"))
}

#[tokio::test]
async fn detailed_country_query_over_grpc() {
    // Arrange
    let service = FakeGeoProximity::from(CountryProximityResponse {
        closest: Some("CA".into()),
        full_map: vec![
            Some(CountryDistance {
                country: Some("CA".into()),
                distance: Some(500.0),
            }),
            Some(CountryDistance {
                country: Some("MX".into()),
                distance: Some(1500.0),
            }),
        ],
    });
    let server = TestServer::start(service.server()).await;
    let config = QueryConfig {
        endpoint: server.address(),
        mode: Mode::Country,
        origin: "US".into(),
        candidates: "CA,MX".into(),
        detailed: true,
        ..Default::default()
    };

    // Act
    let (result, output) = run(&config).await;

    // Assert
    result.expect("query failed");
    assert_eq!(
        output,
        "Closest country: CA\nCountry CA: distance 500.000000\nCountry MX: distance 1500.000000\n"
    );
    assert_eq!(
        service.country_requests(),
        vec![pb::CountryProximityRequest {
            origin: Some("US".into()),
            candidates: vec!["CA".into(), "MX".into()],
            detailed_response: Some(true),
        }]
    );
    assert!(service.ip_requests().is_empty());

    server.shutdown_sync().await;
}

#[tokio::test]
async fn ip_query_over_grpc() {
    // Arrange
    let service = FakeGeoProximity::from(IpProximityResponse {
        closest: vec!["5.6.7.8".into()],
        full_map: vec![Some(IpDistance {
            ip: Some("5.6.7.8".into()),
            distance: Some(12.5),
        })],
    });
    let server = TestServer::start(service.server()).await;
    let config = QueryConfig {
        endpoint: server.address(),
        mode: Mode::Ip,
        origin: "1.2.3.4".into(),
        candidates: "5.6.7.8".into(),
        ..Default::default()
    };

    // Act
    let (result, output) = run(&config).await;

    // Assert
    result.expect("query failed");
    assert_eq!(output, "Close IP: 5.6.7.8\nIP: 5.6.7.8, distance: 12.500000\n");
    assert_eq!(
        service.ip_requests(),
        vec![pb::IpProximityRequest {
            origin: Some("1.2.3.4".into()),
            candidates: vec!["5.6.7.8".into()],
            detailed_response: Some(false),
            max_distance: Some(0.0),
        }]
    );
    assert!(service.country_requests().is_empty());
}

#[tokio::test]
async fn ip_query_without_candidates_sends_one_empty_candidate() {
    let service = FakeGeoProximity::from(IpProximityResponse::default());
    let server = TestServer::start(service.server()).await;
    let config = QueryConfig {
        endpoint: server.address(),
        mode: Mode::Ip,
        ..Default::default()
    };

    let (result, output) = run(&config).await;

    result.expect("query failed");
    assert!(output.is_empty());
    assert_eq!(service.ip_requests()[0].candidates, vec![String::new()]);
}

#[tokio::test]
async fn partial_entries_on_the_wire_are_skipped() {
    let service = FakeGeoProximity::default().with_country_response(pb::CountryProximityResponse {
        closest: Some("CA".into()),
        full_map: vec![
            pb::CountryDistance {
                country: None,
                distance: Some(10.0),
            },
            pb::CountryDistance {
                country: Some("MX".into()),
                distance: None,
            },
            pb::CountryDistance {
                country: Some("CA".into()),
                distance: Some(0.5),
            },
        ],
    });
    let server = TestServer::start(service.server()).await;
    let config = QueryConfig {
        endpoint: server.address(),
        detailed: true,
        ..Default::default()
    };

    let (result, output) = run(&config).await;

    result.expect("query failed");
    assert_eq!(output, "Closest country: CA\nCountry CA: distance 0.500000\n");
}

#[tokio::test]
async fn missing_closest_country_is_fatal() {
    let service = FakeGeoProximity::from(CountryProximityResponse {
        closest: None,
        full_map: vec![Some(CountryDistance {
            country: Some("CA".into()),
            distance: Some(500.0),
        })],
    });
    let server = TestServer::start(service.server()).await;
    let config = QueryConfig {
        endpoint: server.address(),
        detailed: true,
        ..Default::default()
    };

    let (result, output) = run(&config).await;

    assert!(matches!(result, Err(Error::NoClosestCountry)));
    assert!(output.is_empty());
}

#[tokio::test]
async fn remote_errors_are_fatal() {
    let service = FakeGeoProximity::default().failing("overloaded");
    let server = TestServer::start(service.server()).await;
    let config = QueryConfig {
        endpoint: server.address(),
        ..Default::default()
    };

    let (result, output) = run(&config).await;

    assert!(matches!(result, Err(Error::Call { .. })));
    assert!(output.is_empty());
    assert_eq!(service.country_requests().len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_connect_error() {
    // Bind and release a port so nothing is listening on it.
    let address = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind tcplistener");
        listener.local_addr().expect("no local address")
    };
    let config = QueryConfig {
        endpoint: address.to_string(),
        connect_timeout: Some(Duration::from_millis(500)),
        ..Default::default()
    };

    let (result, output) = run(&config).await;

    assert!(matches!(result, Err(Error::Connect { .. })));
    assert!(output.is_empty());
}

#[tokio::test]
async fn unknown_mode_sends_nothing() {
    let service = FakeGeoProximity::default();
    let server = TestServer::start(service.server()).await;
    let config = QueryConfig {
        endpoint: server.address(),
        mode: "region".parse().unwrap(),
        ..Default::default()
    };

    let (result, output) = run(&config).await;

    result.expect("an unknown mode is not an error by default");
    assert!(output.is_empty());
    assert!(service.country_requests().is_empty());
    assert!(service.ip_requests().is_empty());
}

#[tokio::test]
async fn unknown_mode_can_be_rejected() {
    let config = QueryConfig {
        endpoint: "127.0.0.1:1".into(),
        mode: "region".parse().unwrap(),
        reject_unknown_mode: true,
        ..Default::default()
    };

    let (result, _) = run(&config).await;

    assert!(matches!(result, Err(Error::UnknownMode(mode)) if mode == "region"));
}
