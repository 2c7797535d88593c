mod common;

use common::*;
use public_data_aggregator::{
    AccessMode, DataOrigin, FetchError, MockReason, QueryOptions, NOTICE_NO_CREDENTIAL,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn mode_selection_follows_access_policy() {
    let mock = orchestrator(mock_access(), fast_config());
    assert_eq!(mock.select_mode(), AccessMode::Mock);

    let direct = orchestrator(direct_access("http://localhost:1", "real-key"), fast_config());
    assert_eq!(direct.select_mode(), AccessMode::Direct);

    let placeholder = orchestrator(
        direct_access("http://localhost:1", "YOUR_API_KEY_HERE"),
        fast_config(),
    );
    assert_eq!(placeholder.select_mode(), AccessMode::Mock);

    // The proxy wins even when a key is configured.
    let proxied = orchestrator(
        AccessConfig {
            api_key: Some("real-key".to_string()),
            ..proxy_access("http://localhost:1")
        },
        fast_config(),
    );
    assert_eq!(proxied.select_mode(), AccessMode::Proxy);

    let production = orchestrator(
        AccessConfig {
            mode: ExecutionMode::Production,
            ..AccessConfig::default()
        },
        fast_config(),
    );
    assert_eq!(production.select_mode(), AccessMode::Proxy);
}

#[tokio::test]
async fn mock_mode_returns_canned_data_with_notice() {
    init_tracing();
    let orchestrator = orchestrator(mock_access(), fast_config());

    let first = orchestrator
        .fetch("LIBRARY", &QueryOptions::default())
        .await
        .expect("mock mode never fails");
    let second = orchestrator
        .fetch("LIBRARY", &QueryOptions::default().page(3))
        .await
        .expect("mock mode never fails");

    assert_eq!(first.origin, DataOrigin::Mock(MockReason::NoCredential));
    assert_eq!(first.envelope.notice.as_deref(), Some(NOTICE_NO_CREDENTIAL));
    assert_eq!(first.envelope.items.len(), 2);
    assert_eq!(first, second, "mock data is deterministic");
}

#[tokio::test]
async fn unknown_source_fails_fast() {
    let orchestrator = orchestrator(mock_access(), fast_config());
    let err = orchestrator
        .fetch("HOSPITAL", &QueryOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::UnknownSource { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn proxy_success_returns_served_envelope() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARKING_PROXY_PATH))
        .and(query_param("page", "2"))
        .and(query_param("perPage", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_json(&["칠성 주차장", "산격 주차장"])))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(proxy_access(&server.uri()), fast_config());
    let fetched = orchestrator
        .fetch("PARKING", &QueryOptions::default().page(2))
        .await
        .expect("proxy call succeeds");

    assert_eq!(fetched.origin, DataOrigin::Proxy);
    assert_eq!(fetched.envelope.current_count, 2);
    assert_eq!(fetched.envelope.items[0]["주차장명"].to_string(), "칠성 주차장");
    assert_eq!(fetched.envelope.notice, None);
}

#[tokio::test]
async fn proxy_notice_is_preserved() {
    let server = MockServer::start().await;
    let mut body = envelope_json(&["데모 주차장"]);
    body["_notice"] = json!("API 키가 설정되지 않아 모의 데이터를 사용합니다.");
    Mock::given(method("GET"))
        .and(path(PARKING_PROXY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(proxy_access(&server.uri()), fast_config());
    let fetched = orchestrator.fetch("PARKING", &QueryOptions::default()).await.unwrap();
    assert_eq!(fetched.origin, DataOrigin::Proxy);
    assert_eq!(
        fetched.envelope.notice.as_deref(),
        Some("API 키가 설정되지 않아 모의 데이터를 사용합니다.")
    );
}

#[tokio::test]
async fn proxy_http_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARKING_PROXY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(proxy_access(&server.uri()), fast_config());
    let err = orchestrator
        .fetch("PARKING", &QueryOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus { status: 500 }), "got {err:?}");
}

#[tokio::test]
async fn proxy_error_payload_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARKING_PROXY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": true, "message": "quota exceeded" })),
        )
        .mount(&server)
        .await;

    let orchestrator = orchestrator(proxy_access(&server.uri()), fast_config());
    let err = orchestrator
        .fetch("PARKING", &QueryOptions::default())
        .await
        .unwrap_err();
    match err {
        FetchError::UpstreamApi(message) => assert_eq!(message, "quota exceeded"),
        other => panic!("expected UpstreamApi, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_bodies_are_parse_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARKING_PROXY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    // currentCount disagrees with the item list
    let mut inconsistent = envelope_json(&["하나"]);
    inconsistent["currentCount"] = json!(3);
    Mock::given(method("GET"))
        .and(path(LIBRARY_PROXY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(inconsistent))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(proxy_access(&server.uri()), fast_config());
    for source in ["PARKING", "LIBRARY"] {
        let err = orchestrator
            .fetch(source, &QueryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::JsonParse(_)), "{source}: got {err:?}");
    }
}

#[tokio::test]
async fn unreachable_proxy_is_a_network_error() {
    let orchestrator = orchestrator(proxy_access("http://127.0.0.1:1"), fast_config());
    let err = orchestrator
        .fetch("PARK", &QueryOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn direct_mode_injects_service_key() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARKING_DIRECT_PATH))
        .and(query_param("serviceKey", "real-key"))
        .and(query_param("returnType", "json"))
        .and(query_param("page", "1"))
        .and(query_param("perPage", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_json(&["태전 주차장"])))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(direct_access(&server.uri(), "real-key"), fast_config());
    let fetched = orchestrator
        .fetch("PARKING", &QueryOptions::default().per_page(5))
        .await
        .expect("direct call succeeds");

    assert_eq!(fetched.origin, DataOrigin::Direct);
    assert_eq!(fetched.envelope.items.len(), 1);
}

#[tokio::test]
async fn direct_mode_current_count_wins_over_error_code() {
    let server = MockServer::start().await;
    let mut body = envelope_json(&["칠성 주차장"]);
    body["errorCode"] = json!(-4);
    Mock::given(method("GET"))
        .and(path(PARKING_DIRECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(direct_access(&server.uri(), "real-key"), fast_config());
    let fetched = orchestrator.fetch("PARKING", &QueryOptions::default()).await;
    assert!(fetched.is_ok(), "got {fetched:?}");
}

#[tokio::test]
async fn direct_mode_error_code_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARKING_DIRECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": -4,
            "errorMessage": "등록되지 않은 인증키"
        })))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(direct_access(&server.uri(), "real-key"), fast_config());
    let err = orchestrator
        .fetch("PARKING", &QueryOptions::default())
        .await
        .unwrap_err();
    match &err {
        FetchError::UpstreamApi(message) => {
            assert_eq!(message, "API 오류: 등록되지 않은 인증키 (코드: -4)")
        }
        other => panic!("expected UpstreamApi, got {other:?}"),
    }
    assert_eq!(err.fallback_notice(), "API 오류: 등록되지 않은 인증키 (코드: -4)");
}

#[tokio::test]
async fn direct_mode_http_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARKING_DIRECT_PATH))
        .and(query_param("serviceKey", "real-key"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(direct_access(&server.uri(), "real-key"), fast_config());
    let err = orchestrator
        .fetch("PARKING", &QueryOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus { status: 500 }), "got {err:?}");
    assert!(err.is_transient());
}
