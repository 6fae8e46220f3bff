use std::collections::BTreeSet;
use std::time::Duration;

use futures::future::join_all;
use rabbitmq_admin_api::{
    ApiClient, ApiError, AuthMethod, CallOptions, ClientConfig, PostResponse, TlsVerification,
};
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, bearer_token, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    let address = server.address();
    ClientConfig::new(
        address.ip().to_string(),
        address.port(),
        AuthMethod::basic("guest", "guest"),
    )
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(config_for(server)).unwrap()
}

#[tokio::test]
async fn test_get_overview() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .and(basic_auth("guest", "guest"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "management_version": "3.8"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let overview: Value = client
        .get("/api/overview", &CallOptions::default())
        .await
        .unwrap();

    assert_eq!(overview, json!({"management_version": "3.8"}));
}

#[tokio::test]
async fn test_get_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"error":"Object Not Found"}"#),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get::<Value>("/api/overview", &CallOptions::default())
        .await
        .unwrap_err();

    match &err {
        ApiError::Status { status, body } => {
            assert_eq!(*status, 404);
            assert_eq!(body, r#"{"error":"Object Not Found"}"#);
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_status_to_error_mapping() {
    let mock_server = MockServer::start().await;
    let codes = [200u16, 201, 202, 204, 299, 301, 304, 400, 401, 403, 404, 409, 500, 503];

    for code in codes {
        Mock::given(method("PUT"))
            .and(path(format!("/status/{code}")))
            .respond_with(ResponseTemplate::new(code))
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    for code in codes {
        let result = client
            .put::<Value>(&format!("/status/{code}"), None, &CallOptions::default())
            .await;

        if (200..300).contains(&code) {
            assert!(result.is_ok(), "status {code} should succeed: {result:?}");
        } else {
            let err = result.unwrap_err();
            assert_eq!(err.status(), Some(code), "status {code} should fail");
        }
    }
}

#[tokio::test]
async fn test_get_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get::<Value>("/api/nodes", &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_get_with_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes/rabbit@localhost"))
        .and(query_param("memory", "true"))
        .and(query_param("binary", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "rabbit@localhost"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = CallOptions::new()
        .with_query("memory", true)
        .with_query("binary", false);
    let node: Value = client
        .get("/api/nodes/rabbit@localhost", &options)
        .await
        .unwrap();

    assert_eq!(node["name"], "rabbit@localhost");
}

#[tokio::test]
async fn test_put_sends_encoded_body() {
    let mock_server = MockServer::start().await;
    let body = json!({
        "type": "direct",
        "auto_delete": false,
        "durable": false,
        "internal": false,
        "arguments": {}
    });

    Mock::given(method("PUT"))
        .and(path("/api/exchanges/%2F/myexchange"))
        .and(header("content-type", "application/json"))
        .and(body_string(serde_json::to_string(&body).unwrap()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .put("/api/exchanges/%2F/myexchange", Some(&body), &CallOptions::default())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, serde_json::to_vec(&body).unwrap());
}

#[tokio::test]
async fn test_put_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/vhosts/test"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .put::<Value>("/api/vhosts/test", None, &CallOptions::default())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_post_empty_body_is_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/definitions"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response: PostResponse<Value> = client
        .post("/api/definitions", Some(&json!({"users": []})), &CallOptions::default())
        .await
        .unwrap();

    assert_eq!(response, PostResponse::NoContent);
}

#[tokio::test]
async fn test_post_empty_object_is_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/definitions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response: PostResponse<Value> = client
        .post::<Value, Value>("/api/definitions", None, &CallOptions::default())
        .await
        .unwrap();

    assert_eq!(response, PostResponse::Body(json!({})));
}

#[tokio::test]
async fn test_post_decodes_body() {
    let mock_server = MockServer::start().await;
    let messages = json!([{
        "payload": "Test Message",
        "payload_bytes": 12,
        "redelivered": false,
        "exchange": "",
        "routing_key": "test_queue",
        "message_count": 0,
        "properties": []
    }]);
    let request = json!({"count": 1, "ackmode": "ack_requeue_true", "encoding": "auto"});

    Mock::given(method("POST"))
        .and(path("/api/queues/%2F/test_queue/get"))
        .and(body_string(serde_json::to_string(&request).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages.clone()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response: PostResponse<Value> = client
        .post("/api/queues/%2F/test_queue/get", Some(&request), &CallOptions::default())
        .await
        .unwrap();

    assert_eq!(response.into_body(), Some(messages));
}

#[tokio::test]
async fn test_post_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/definitions"))
        .respond_with(ResponseTemplate::new(201).set_body_string("{\"users\": ["))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .post::<Value, Value>("/api/definitions", None, &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_post_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/definitions"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"bad_request"}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .post::<Value, Value>("/api/definitions", Some(&json!({})), &CallOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.body(), Some(r#"{"error":"bad_request"}"#));
}

#[tokio::test]
async fn test_delete_percent_encoded_vhost() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/vhosts/%2Fmyvhost"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let vhost = urlencoding::encode("/myvhost");
    client
        .delete(&format!("/api/vhosts/{vhost}"), &CallOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/connections/not-a-connection"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"Object Not Found"}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .delete("/api/connections/not-a-connection", &CallOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_caller_header_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/raw"))
        .and(header("content-type", "text/plain"))
        .and(header("x-reason", "maintenance"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = CallOptions::new()
        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .with_header(
            HeaderName::from_static("x-reason"),
            HeaderValue::from_static("maintenance"),
        );
    client.put("/api/raw", Some("raw"), &options).await.unwrap();

    assert_eq!(
        client.config().default_headers()[CONTENT_TYPE],
        "application/json"
    );
}

#[tokio::test]
async fn test_concurrent_calls_keep_headers_isolated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/whoami"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "guest"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let calls = (0..8).map(|i| {
        let client = client.clone();
        async move {
            let options = CallOptions::new().with_header(
                HeaderName::from_static("x-call"),
                HeaderValue::from_str(&i.to_string()).unwrap(),
            );
            client.get::<Value>("/api/whoami", &options).await
        }
    });

    for result in join_all(calls).await {
        assert_eq!(result.unwrap()["name"], "guest");
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 8);

    let mut seen = BTreeSet::new();
    for request in &requests {
        let values: Vec<_> = request.headers.get_all("x-call").iter().collect();
        assert_eq!(values.len(), 1);
        seen.insert(values[0].to_str().unwrap().parse::<u32>().unwrap());
        assert_eq!(request.headers.get("content-type").unwrap(), "application/json");
    }
    assert_eq!(seen, (0..8).collect());
    assert!(client.config().default_headers().get("x-call").is_none());
}

#[tokio::test]
async fn test_default_timeout_applies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server).with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(config).unwrap();
    let err = client
        .get::<Value>("/api/overview", &CallOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_timeout_override_wins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server).with_timeout(Duration::from_millis(50));
    let client = ApiClient::new(config).unwrap();

    let options = CallOptions::new().with_timeout(Duration::from_secs(5));
    let overview: Value = client.get("/api/overview", &options).await.unwrap();
    assert_eq!(overview["ok"], true);

    let err = client
        .get::<Value>("/api/overview", &CallOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ClientConfig::new("127.0.0.1", port, AuthMethod::basic("guest", "guest"));
    let client = ApiClient::new(config).unwrap();
    let err = client
        .get::<Value>("/api/overview", &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_status_kept_when_error_body_is_cut_off() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request: Vec<u8> = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = socket.read(&mut buf).await.unwrap();
            if read == 0 {
                return;
            }
            request.extend_from_slice(&buf[..read]);
        }
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\n{\"error\"")
            .await
            .unwrap();
    });

    let config = ClientConfig::new("127.0.0.1", port, AuthMethod::basic("guest", "guest"));
    let client = ApiClient::new(config).unwrap();
    let err = client
        .get::<Value>("/api/overview", &CallOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.body(), Some(""));
}

#[tokio::test]
async fn test_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/whoami"))
        .and(bearer_token("oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "svc"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let address = mock_server.address();
    let config = ClientConfig::new(
        address.ip().to_string(),
        address.port(),
        AuthMethod::bearer("oauth-token"),
    );
    let client = ApiClient::new(config).unwrap();
    let whoami: Value = client
        .get("/api/whoami", &CallOptions::default())
        .await
        .unwrap();

    assert_eq!(whoami["name"], "svc");
}

#[tokio::test]
async fn test_tls_override_is_applied_per_call() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let options = CallOptions::new().with_tls_verification(TlsVerification::CaBundle(
        "/nonexistent/ca.pem".into(),
    ));
    let err = client
        .get::<Value>("/api/overview", &options)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::CaBundle { .. }));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
