//! Client record API integration tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use practice_api::api::ApiState;
use practice_api::seed::seed_store;
use practice_api::store::ClientStore;

const JANE: &str = "client-jane-doe";
const OMAR: &str = "client-omar-haddad";

async fn setup_test_app() -> axum::Router {
    let store = ClientStore::new();
    seed_store(&store).await;
    practice_api::app(ApiState::new(store))
}

async fn json_response(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("request failed");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let value: Value = serde_json::from_slice(&body).expect("invalid json");
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;
    let (status, body) = json_response(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "practice-api");
}

#[tokio::test]
async fn test_list_clients() {
    let app = setup_test_app().await;
    let (status, body) = json_response(&app, get("/api/clients")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let clients = body["data"].as_array().unwrap();
    assert_eq!(clients.len(), 3);
    let omar = clients.iter().find(|c| c["id"] == OMAR).unwrap();
    assert_eq!(omar["locked_field_count"], 2);
}

#[tokio::test]
async fn test_get_client_happy_path() {
    let app = setup_test_app().await;
    let (status, body) = json_response(&app, get(&format!("/api/clients/{JANE}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["first_name"], "Jane");
    assert_eq!(body["data"]["filing_status"], "married_filing_jointly");
    assert_eq!(body["data"]["spouse"]["first_name"], "John");
    assert_eq!(body["data"]["display_name"], "Jane Doe");
}

#[tokio::test]
async fn test_get_client_not_found() {
    let app = setup_test_app().await;
    let (status, body) = json_response(&app, get("/api/clients/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn test_patch_updates_record() {
    let app = setup_test_app().await;
    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/api/clients/{JANE}"),
            json!({"first_name": "Janet", "phone": "555-0199", "tags": ["VIP", "vip", "Audit"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["first_name"], "Janet");
    assert_eq!(body["data"]["phone"], "555-0199");
    assert_eq!(body["data"]["display_name"], "Janet Doe");
    assert_eq!(body["data"]["tags"], json!(["VIP", "Audit"]));
    assert_eq!(body["data"]["locked_fields"], json!([]));

    let (_, reloaded) = json_response(&app, get(&format!("/api/clients/{JANE}"))).await;
    assert_eq!(reloaded["data"]["first_name"], "Janet");
}

#[tokio::test]
async fn test_patch_locked_field_conflict() {
    let app = setup_test_app().await;
    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/api/clients/{OMAR}"),
            json!({"city": "Salem", "phone": "555-0000", "email": "o@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"]["locked_fields"], json!(["email", "phone"]));

    let (_, reloaded) = json_response(&app, get(&format!("/api/clients/{OMAR}"))).await;
    assert_eq!(reloaded["data"]["city"], "Portland");
}

#[tokio::test]
async fn test_patch_validation_errors() {
    let app = setup_test_app().await;
    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/api/clients/{JANE}"),
            json!({"email": "nope", "last_name": " ", "dependents": 99}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["last_name"].is_array());
    assert!(body["errors"]["dependents"].is_array());
    assert!(body["errors"].get("locked_fields").is_none());
}

#[tokio::test]
async fn test_patch_unknown_field_rejected() {
    let app = setup_test_app().await;
    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/api/clients/{JANE}"),
            json!({"display_name": "Someone Else"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["unknown_fields"].is_array());
}

#[tokio::test]
async fn test_patch_bad_filing_status() {
    let app = setup_test_app().await;
    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/api/clients/{JANE}"),
            json!({"filing_status": "widowed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["request"].is_array());
}

#[tokio::test]
async fn test_patch_missing_client() {
    let app = setup_test_app().await;
    let (status, _) = json_response(
        &app,
        json_request("PATCH", "/api/clients/nobody", json!({"city": "Salem"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_locked_fields() {
    let app = setup_test_app().await;
    let uri = format!("/api/clients/{JANE}/locked-fields");
    let (status, body) = json_response(
        &app,
        json_request("PUT", &uri, json!({"locked_fields": ["phone_number", "tags"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["locked_fields"], json!(["phone", "tags"]));

    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/api/clients/{JANE}"),
            json!({"tags": []}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errors"]["locked_fields"], json!(["tags"]));
}

#[tokio::test]
async fn test_set_locked_fields_unknown_name() {
    let app = setup_test_app().await;
    let (status, body) = json_response(
        &app,
        json_request(
            "PUT",
            &format!("/api/clients/{JANE}/locked-fields"),
            json!({"locked_fields": ["ssn"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["names"].is_array());
}
