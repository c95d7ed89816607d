use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, TEST_PASSWORD, TEST_USERNAME};
use serde_json::Value;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";
const JANE_BASIC: &str = "Basic amFuZUBleGFtcGxlLmNvbTpodW50ZXIy";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(uri: &str, authorization: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, FORM);
    if let Some(authorization) = authorization {
        builder = builder.header(http::header::AUTHORIZATION, authorization);
    }
    builder.body(body.to_string()).unwrap()
}

/// Run a credential exchange on `app` and return the issued token.
async fn exchange(app: &Router) -> String {
    let username = TEST_USERNAME.replace('@', "%40");
    let body = format!("fs_username={username}&fs_password={TEST_PASSWORD}&method=POST");
    let resp = app
        .clone()
        .oneshot(form_request("/v1/authexchange.json", None, &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    json["credentials"]["oauth_token"].as_str().unwrap().to_string()
}

fn oauth_header(token: &str) -> String {
    format!(r#"OAuth oauth_consumer_key="key", oauth_nonce="n", oauth_token="{token}", oauth_version="1.0""#)
}

// --- auth exchange ---

#[tokio::test]
async fn auth_exchange_issues_token() {
    let app = app();
    let token = exchange(&app).await;
    assert_eq!(token.len(), 32);
}

#[tokio::test]
async fn auth_exchange_rejects_bad_password() {
    let resp = app()
        .oneshot(form_request(
            "/v1/authexchange.json",
            None,
            "fs_username=jane%40example.com&fs_password=wrong",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert!(json["unauthorized"].is_string());
}

// --- venues ---

#[tokio::test]
async fn venues_are_grouped() {
    let resp = app()
        .oneshot(get("/v1/venues.json?geolat=37.77&geolong=-122.41&q=&l="))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let groups = json["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["type"], "Favorites");
    assert_eq!(groups[1]["venues"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn venues_filters_by_query_and_limit() {
    let resp = app()
        .oneshot(get("/v1/venues.json?geolat=37.77&geolong=-122.41&q=tartine&l=5"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    let nearby = json["groups"][1]["venues"].as_array().unwrap();
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0]["name"], "Tartine Bakery");

    let resp = app()
        .oneshot(get("/v1/venues.json?geolat=37.77&geolong=-122.41&l=2"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["groups"][1]["venues"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn venues_without_location_is_param_error() {
    let resp = app().oneshot(get("/v1/venues.json?geolat=&geolong=")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"]["type"], "param_error");
}

// --- venue ---

#[tokio::test]
async fn venue_details_include_tips() {
    let resp = app().oneshot(get("/v1/venue.json?vid=100")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["venue"]["name"], "Blue Bottle Coffee");
    assert_eq!(json["venue"]["tips"][0]["id"], "500");
}

#[tokio::test]
async fn unknown_venue_returns_error_object() {
    let resp = app().oneshot(get("/v1/venue.json?vid=999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"]["message"], "no venue with that id");
}

// --- categories ---

#[tokio::test]
async fn categories_nest() {
    let resp = app().oneshot(get("/v1/categories.json")).await.unwrap();
    let json = body_json(resp).await;
    let food = &json["categories"][0];
    assert_eq!(food["nodename"], "Food");
    assert_eq!(food["categories"][1]["categories"][0]["nodename"], "Donuts");
}

// --- flag closed ---

#[tokio::test]
async fn flag_closed_acknowledges_with_bare_true() {
    let resp = app()
        .oneshot(form_request("/v1/venue/flagclosed.json", Some(JANE_BASIC), "vid=101&method=POST"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"true");
}

#[tokio::test]
async fn flag_closed_unknown_venue_is_404() {
    let resp = app()
        .oneshot(form_request("/v1/venue/flagclosed.json", Some(JANE_BASIC), "vid=999"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn flag_closed_requires_credentials() {
    let resp = app()
        .oneshot(form_request("/v1/venue/flagclosed.json", None, "vid=101"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- todos ---

#[tokio::test]
async fn mark_todo_updates_tip_status() {
    let app = app();
    let token = exchange(&app).await;
    let resp = app
        .clone()
        .oneshot(form_request("/v1/mark/todo.json", Some(&oauth_header(&token)), "tid=500&method=POST"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["todo"]["tip"]["status"], "todo");
    assert_eq!(json["todo"]["tip"]["venue"]["id"], "100");

    let resp = app.oneshot(get("/v1/venue.json?vid=100")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["venue"]["tips"][0]["status"], "todo");
}

#[tokio::test]
async fn mark_todo_rejects_basic_auth() {
    let resp = app()
        .oneshot(form_request("/v1/mark/todo.json", Some(JANE_BASIC), "tid=500"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mark_todo_unknown_tip_uses_error_code_shape() {
    let app = app();
    let token = exchange(&app).await;
    let resp = app
        .oneshot(form_request("/v1/mark/todo.json", Some(&oauth_header(&token)), "tid=1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error_code"], 404);
    assert_eq!(json["error_msg"], "no tip with that id");
}

// --- photo upload ---

fn upload_request(authorization: &str, content_type: &str) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(b"--0xKhTmLbOuNdArY\r\n");
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"image,jpeg\"; filename=\"image.jpeg\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xD9]);
    body.extend_from_slice(b"\r\n--0xKhTmLbOuNdArY--\r\n");
    Request::builder()
        .method("POST")
        .uri("/v1/user/update.json")
        .header(http::header::AUTHORIZATION, authorization)
        .header(http::header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn user_update_stores_photo() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(upload_request(JANE_BASIC, "multipart/form-data; boundary=0xKhTmLbOuNdArY"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let photo = json["user"]["photo"].as_str().unwrap().to_string();
    assert!(photo.ends_with(".jpg"));

    let resp = app
        .oneshot(Request::builder()
            .uri("/v1/user.json")
            .header(http::header::AUTHORIZATION, JANE_BASIC)
            .body(String::new())
            .unwrap())
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["user"]["photo"], photo.as_str());
}

#[tokio::test]
async fn user_update_requires_multipart() {
    let resp = app()
        .oneshot(upload_request(JANE_BASIC, FORM))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_update_rejects_oauth_header() {
    let resp = app()
        .oneshot(upload_request(
            &oauth_header("whatever"),
            "multipart/form-data; boundary=0xKhTmLbOuNdArY",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_requires_known_account() {
    let resp = app()
        .oneshot(Request::builder()
            .uri("/v1/user.json")
            .header(http::header::AUTHORIZATION, "Basic amFuZTpwdw==")
            .body(String::new())
            .unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
