//! Integration tests for the HTTP client, system reads and lookups.

mod common;

use cupi_api::{ApiOutcome, Listing, NewCallHandler, Oid, Projection, Resource, Summary};
use cupi_core::error::CuError;
use serde_json::json;
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

// ---- connectivity ----

#[tokio::test]
async fn online_test_returns_raw_status() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/cluster"))
        .and(basic_auth(common::USERNAME, common::PASSWORD))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Server": []})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.online_test().await.unwrap(), 200);
}

#[tokio::test]
async fn online_test_reports_rejected_credentials() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/cluster"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert_eq!(client.online_test().await.unwrap(), 401);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = common::client_for("http://127.0.0.1:1");
    let err = client.online_test().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
    assert!(matches!(err, CuError::Http(_) | CuError::Timeout(_)));
}

#[tokio::test]
async fn malformed_json_is_a_serialization_error() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/languagemap"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client.language_map().await.unwrap_err();
    assert!(matches!(err, CuError::Serialization(_)));
}

// ---- lookups ----

#[tokio::test]
async fn owner_location_oid_from_single_location() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/locations/connectionlocations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@total": "1",
            "ConnectionLocation": {"DisplayName": "cuc1", "ObjectId": "loc-1"}
        })))
        .mount(&server)
        .await;

    let oid = client.owner_location_oid().await.unwrap();
    assert_eq!(oid, ApiOutcome::Success(Oid::from("loc-1")));
}

#[tokio::test]
async fn user_templates_single_item_mini_view() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/usertemplates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@total": "1",
            "UserTemplate": {"Alias": "voicemailusertemplate", "ObjectId": "tmpl-1"}
        })))
        .mount(&server)
        .await;

    let listing = client.user_templates(Projection::Mini).await.unwrap();
    assert_eq!(
        listing,
        ApiOutcome::Success(Listing::Mini(vec![Summary {
            name: "voicemailusertemplate".into(),
            oid: Oid::from("tmpl-1"),
        }]))
    );
}

#[tokio::test]
async fn empty_listing_has_no_items() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@total": "0"})))
        .mount(&server)
        .await;

    let listing = client.call_handlers(Projection::Mini).await.unwrap();
    assert_eq!(listing, ApiOutcome::Success(Listing::Mini(Vec::new())));
}

#[tokio::test]
async fn full_projection_returns_envelope() {
    let (server, client) = common::start().await;
    let envelope = json!({
        "@total": "1",
        "Callhandler": {"DisplayName": "Opening Greeting", "ObjectId": "h-1"}
    });

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope.clone()))
        .mount(&server)
        .await;

    let listing = client.call_handlers(Projection::Full).await.unwrap();
    assert_eq!(listing, ApiOutcome::Success(Listing::Full(envelope)));
}

#[tokio::test]
async fn missing_call_handler_template_is_not_found() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/callhandlertemplates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@total": "0"})))
        .mount(&server)
        .await;

    let oid = client.call_handler_template_oid().await.unwrap();
    assert_eq!(oid, ApiOutcome::NotFound(Resource::CallHandlerTemplate));
}

// ---- call handlers ----

#[tokio::test]
async fn add_call_handler_passes_template_in_query() {
    let (server, client) = common::start().await;
    let oid = common::fake_oid();

    Mock::given(method("POST"))
        .and(path("/vmrest/handlers/callhandlers"))
        .and(query_param("templateObjectId", "tmpl-1"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string(common::location_body("handlers/callhandlers", &oid)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client
        .add_call_handler(&NewCallHandler::new("Main AA", Oid::from("tmpl-1")))
        .await
        .unwrap();
    let created = outcome.success().unwrap();
    assert_eq!(created.oid, oid);
    assert_eq!(created.message, "Call handler added");
}

#[tokio::test]
async fn call_handler_by_oid() {
    let (server, client) = common::start().await;

    Mock::given(method("GET"))
        .and(path("/vmrest/handlers/callhandlers/h-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DisplayName": "Opening Greeting",
            "ObjectId": "h-1"
        })))
        .mount(&server)
        .await;

    let handler = client.call_handler(&Oid::from("h-1")).await.unwrap().success().unwrap();
    assert_eq!(handler["ObjectId"], "h-1");
}
