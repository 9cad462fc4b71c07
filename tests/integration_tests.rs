//! Integration tests for routewise against mocked remote services
//!
//! The directions and language-model endpoints are served by wiremock, so
//! these run offline and exercise the real HTTP clients end to end.

use routewise::{
    DirectionsProvider, Error, GoogleDirections, GroqChat, LanguageModel, RouteForm, SessionSlot,
};
use serde_json::{json, Value};
use wiremock::matchers::{bearer_token, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const CHAT_PATH: &str = "/openai/v1/chat/completions";

fn leg(from: &str, to: &str, index: usize, meters: u64, seconds: u64) -> Value {
    let lat = 50.0 + index as f64 / 100.0;
    json!({
        "distance": {"text": format!("{meters} m"), "value": meters},
        "duration": {"text": format!("{seconds} s"), "value": seconds},
        "start_address": from,
        "end_address": to,
        "start_location": {"lat": lat, "lng": 4.35},
        "end_location": {"lat": lat + 0.01, "lng": 4.35},
        "steps": []
    })
}

/// Directions body visiting `points` in order with fixed-size legs
fn directions_body(points: &[&str], meters: u64, seconds: u64, order: Option<Vec<usize>>) -> Value {
    let legs: Vec<Value> = points
        .windows(2)
        .enumerate()
        .map(|(i, pair)| leg(pair[0], pair[1], i, meters, seconds))
        .collect();
    let mut route = json!({"summary": "R0", "legs": legs});
    if let Some(order) = order {
        route["waypoint_order"] = json!(order);
    }
    json!({"status": "OK", "geocoded_waypoints": [], "routes": [route]})
}

fn stops(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

async fn mount_baseline(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .and(query_param("waypoints", "A|B|C"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_optimized(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .and(query_param("waypoints", "optimize:true|A|B|C"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_submit_compares_baseline_and_optimized() {
    let server = MockServer::start().await;
    mount_baseline(
        &server,
        directions_body(&["Depot (resolved)", "A", "B", "C", "Home (resolved)"], 2000, 600, Some(vec![0, 1, 2])),
    )
    .await;
    mount_optimized(
        &server,
        ResponseTemplate::new(200).set_body_json(directions_body(
            &["Depot (resolved)", "C", "A", "B", "Home (resolved)"],
            1500,
            420,
            Some(vec![2, 0, 1]),
        )),
    )
    .await;

    let provider = GoogleDirections::with_base_url("test-key", server.uri()).unwrap();
    let form = RouteForm::new("Depot", "Home", stops(&["A", "B", "C"]));
    let slot = SessionSlot::new();

    let session = routewise::submit(&provider, &form, &slot).await.unwrap();
    let cmp = &session.comparison;

    assert_eq!(
        cmp.baseline.ordered_addresses,
        vec!["Depot (resolved)", "A", "B", "C", "Home (resolved)"]
    );
    assert_eq!(
        cmp.optimized.ordered_addresses,
        vec!["Depot (resolved)", "C", "A", "B", "Home (resolved)"]
    );
    assert!((cmp.baseline.total_distance_km - 8.0).abs() < 1e-9);
    assert!((cmp.optimized.total_distance_km - 6.0).abs() < 1e-9);
    assert!((cmp.distance_delta_km - 2.0).abs() < 1e-9);
    assert_eq!(cmp.baseline.total_duration.to_string(), "0h 40m");
    assert_eq!(cmp.optimized.total_duration.to_string(), "0h 28m");
    assert_eq!(cmp.duration_delta_secs, 720);
    assert_eq!(cmp.optimized.coordinates.len(), 5);

    // The raw answers are kept alongside the comparison
    assert_eq!(session.baseline_raw.legs.len(), 4);
    assert_eq!(session.baseline_raw.waypoint_order, None);
    assert_eq!(session.optimized_raw.waypoint_order, Some(vec![2, 0, 1]));
    assert_eq!(slot.get().unwrap().stops, stops(&["A", "B", "C"]));
}

#[tokio::test]
async fn test_second_call_failure_leaves_slot_empty() {
    let server = MockServer::start().await;
    mount_baseline(
        &server,
        directions_body(&["Depot", "A", "B", "C", "Home"], 1000, 60, None),
    )
    .await;
    mount_optimized(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "You have exceeded your daily request quota for this API.",
            "routes": []
        })),
    )
    .await;

    let provider = GoogleDirections::with_base_url("test-key", server.uri()).unwrap();
    let form = RouteForm::new("Depot", "Home", stops(&["A", "B", "C"]));
    let slot = SessionSlot::new();

    let err = routewise::submit(&provider, &form, &slot).await.unwrap_err();
    match err {
        Error::ProviderError(msg) => assert!(msg.starts_with("OVER_QUERY_LIMIT")),
        other => panic!("Expected provider error, got {other:?}"),
    }
    assert!(slot.is_empty());
}

#[tokio::test]
async fn test_request_denied_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "routes": []
        })))
        .mount(&server)
        .await;

    let provider = GoogleDirections::with_base_url("bad-key", server.uri()).unwrap();
    let err = provider
        .fetch("Depot", "Home", &stops(&["A"]), false)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Provider error: REQUEST_DENIED: The provided API key is invalid."
    );
}

#[tokio::test]
async fn test_http_error_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let provider = GoogleDirections::with_base_url("test-key", server.uri()).unwrap();
    let err = provider
        .fetch("Depot", "Home", &stops(&["A"]), true)
        .await
        .unwrap_err();

    match err {
        Error::ProviderError(msg) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("upstream unavailable"));
        }
        other => panic!("Expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let provider = GoogleDirections::with_base_url("test-key", server.uri()).unwrap();
    let err = provider
        .fetch("Depot", "Home", &stops(&["A"]), false)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_optimized_order_out_of_range_is_malformed() {
    let server = MockServer::start().await;
    mount_baseline(
        &server,
        directions_body(&["Depot", "A", "B", "C", "Home"], 1000, 60, None),
    )
    .await;
    mount_optimized(
        &server,
        ResponseTemplate::new(200).set_body_json(directions_body(
            &["Depot", "A", "B", "C", "Home"],
            900,
            50,
            Some(vec![0, 1, 7]),
        )),
    )
    .await;

    let provider = GoogleDirections::with_base_url("test-key", server.uri()).unwrap();
    let form = RouteForm::new("Depot", "Home", stops(&["A", "B", "C"]));
    let slot = SessionSlot::new();

    let err = routewise::submit(&provider, &form, &slot).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
    assert!(slot.is_empty());
}

#[tokio::test]
async fn test_groq_chat_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(bearer_token("groq-key"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({"model": "llama3-8b-8192"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "  About 28 minutes.\n"},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = GroqChat::with_base_url("groq-key", "llama3-8b-8192", server.uri()).unwrap();
    let answer = model.answer("How long?").await.unwrap();
    assert_eq!(answer, "About 28 minutes.");
}

#[tokio::test]
async fn test_groq_error_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API Key", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let model = GroqChat::with_base_url("wrong", "llama3-8b-8192", server.uri()).unwrap();
    let err = model.answer("hello").await.unwrap_err();

    match err {
        Error::ProviderError(msg) => assert!(msg.contains("Invalid API Key")),
        other => panic!("Expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ask_about_optimized_route_end_to_end() {
    let server = MockServer::start().await;
    mount_baseline(
        &server,
        directions_body(&["Depot", "A", "B", "C", "Home"], 1000, 60, None),
    )
    .await;
    mount_optimized(
        &server,
        ResponseTemplate::new(200).set_body_json(directions_body(
            &["Depot", "B", "C", "A", "Home"],
            900,
            50,
            Some(vec![1, 2, 0]),
        )),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": "Route:\nDepot\nB\nC\nA\nHome\n\nQ: Which stop is last?\nA:"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GoogleDirections::with_base_url("test-key", server.uri()).unwrap();
    let model = GroqChat::with_base_url("groq-key", "llama3-8b-8192", server.uri()).unwrap();
    let slot = SessionSlot::new();
    let form = RouteForm::new("Depot", "Home", stops(&["A", "B", "C"]));

    let session = routewise::submit(&provider, &form, &slot).await.unwrap();
    let answer =
        routewise::ask_about_route(&model, &session.comparison.optimized, "Which stop is last?")
            .await
            .unwrap();
    assert_eq!(answer, "A");
}

#[tokio::test]
async fn test_workbook_upload_end_to_end() {
    let bytes = std::fs::read(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/stops.xlsx")).unwrap();
    let uploaded = routewise::parse_stops_upload(Some("stops.xlsx"), &bytes).unwrap();
    assert_eq!(uploaded, stops(&["12 Rue Haute", "4 Place Sainte-Croix", "Gare Centrale"]));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .and(query_param("waypoints", "12 Rue Haute|4 Place Sainte-Croix|Gare Centrale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(directions_body(
            &["Depot", "12 Rue Haute", "4 Place Sainte-Croix", "Gare Centrale", "Home"],
            1000,
            60,
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .and(query_param(
            "waypoints",
            "optimize:true|12 Rue Haute|4 Place Sainte-Croix|Gare Centrale",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(directions_body(
            &["Depot", "Gare Centrale", "12 Rue Haute", "4 Place Sainte-Croix", "Home"],
            800,
            50,
            Some(vec![2, 0, 1]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GoogleDirections::with_base_url("test-key", server.uri()).unwrap();
    let form = RouteForm::new("Depot", "Home", uploaded);
    let slot = SessionSlot::new();

    let session = routewise::submit(&provider, &form, &slot).await.unwrap();
    assert_eq!(
        session.comparison.optimized.stop_addresses(),
        ["Gare Centrale", "12 Rue Haute", "4 Place Sainte-Croix"]
    );
}

#[test]
fn test_parse_uploaded_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = dir.path().join("stops.csv");
    std::fs::write(&sheet, "Address,Notes\n12 Rue Haute,ring twice\n\n4 Place Sainte-Croix,\n").unwrap();

    let parsed = routewise::parse_stops(std::fs::File::open(&sheet).unwrap()).unwrap();
    assert_eq!(parsed, stops(&["12 Rue Haute", "4 Place Sainte-Croix"]));
}
