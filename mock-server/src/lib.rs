//! In-memory stand-in for the Foursquare v1 API.
//!
//! Serves the subset of endpoints the client's integration tests drive, with
//! the same body shapes the real service used: single-key envelopes, grouped
//! venue lists, bare `true` acknowledgements and the legacy error objects.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const TEST_USERNAME: &str = "jane@example.com";
pub const TEST_PASSWORD: &str = "hunter2";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub geolat: f64,
    pub geolong: f64,
    #[serde(skip)]
    pub closed_flags: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tip {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip)]
    pub venue_id: String,
}

#[derive(Clone, Debug)]
pub struct Account {
    pub id: String,
    pub first_name: String,
    pub password: String,
    pub photo: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub accounts: HashMap<String, Account>,
    pub tokens: HashMap<String, String>,
    pub venues: BTreeMap<String, Venue>,
    pub tips: BTreeMap<String, Tip>,
}

impl Store {
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.accounts.insert(
            TEST_USERNAME.to_string(),
            Account {
                id: "1".to_string(),
                first_name: "Jane".to_string(),
                password: TEST_PASSWORD.to_string(),
                photo: None,
            },
        );
        for (id, name, address, geolat, geolong) in [
            ("100", "Blue Bottle Coffee", "66 Mint St", 37.7825, -122.4073),
            ("101", "Dolores Park", "Dolores St & 19th St", 37.7596, -122.4269),
            ("102", "Tartine Bakery", "600 Guerrero St", 37.7614, -122.4241),
        ] {
            store.venues.insert(
                id.to_string(),
                Venue {
                    id: id.to_string(),
                    name: name.to_string(),
                    address: address.to_string(),
                    geolat,
                    geolong,
                    closed_flags: 0,
                },
            );
        }
        store.tips.insert(
            "500".to_string(),
            Tip {
                id: "500".to_string(),
                text: "Get the New Orleans iced coffee".to_string(),
                status: None,
                venue_id: "100".to_string(),
            },
        );
        store
    }

    fn account_for_token(&self, token: &str) -> Option<&Account> {
        let username = self.tokens.get(token)?;
        self.accounts.get(username)
    }

    fn venue_json(&self, venue: &Venue) -> Value {
        let tips: Vec<&Tip> = self.tips.values().filter(|t| t.venue_id == venue.id).collect();
        json!({
            "id": venue.id,
            "name": venue.name,
            "address": venue.address,
            "geolat": venue.geolat,
            "geolong": venue.geolong,
            "primarycategory": {"id": "79", "fullpathname": "Food:Café", "nodename": "Café"},
            "stats": {"herenow": "0", "beenhere": {"me": false, "friends": true}},
            "tips": tips,
        })
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/v1/authexchange.json", post(auth_exchange))
        .route("/v1/user.json", get(user))
        .route("/v1/user/update.json", post(user_update))
        .route("/v1/venues.json", get(venues))
        .route("/v1/venue.json", get(venue))
        .route("/v1/venue/flagclosed.json", post(flag_closed))
        .route("/v1/categories.json", get(categories))
        .route("/v1/mark/todo.json", post(mark_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn unauthorized(reason: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "unauthorized": reason })))
}

fn param_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "message": message, "type": "param_error" } })),
    )
}

/// The `oauth_token` value from an `Authorization: OAuth ...` header.
fn oauth_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let params = value.strip_prefix("OAuth ")?;
    params.split(", ").find_map(|pair| {
        let (name, quoted) = pair.split_once('=')?;
        (name == "oauth_token").then(|| quoted.trim_matches('"').to_string())
    })
}

/// Username and password from an `Authorization: Basic ...` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

async fn authenticated(db: &Db, headers: &HeaderMap) -> ApiResult<Account> {
    let store = db.read().await;
    if let Some(token) = oauth_token(headers) {
        return store
            .account_for_token(&token)
            .cloned()
            .ok_or_else(|| unauthorized("unknown oauth token"));
    }
    if let Some((username, password)) = basic_credentials(headers) {
        return match store.accounts.get(&username) {
            Some(account) if account.password == password => Ok(account.clone()),
            _ => Err(unauthorized("invalid username or password")),
        };
    }
    Err(unauthorized("authentication required"))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
pub struct AuthExchangeForm {
    pub fs_username: String,
    pub fs_password: String,
}

async fn auth_exchange(State(db): State<Db>, Form(form): Form<AuthExchangeForm>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    match store.accounts.get(&form.fs_username) {
        Some(account) if account.password == form.fs_password => {}
        _ => {
            tracing::info!(user = %form.fs_username, "rejected credential exchange");
            return Err(unauthorized("invalid username or password"));
        }
    }
    let token = Uuid::new_v4().simple().to_string();
    let secret = Uuid::new_v4().simple().to_string();
    store.tokens.insert(token.clone(), form.fs_username.clone());
    tracing::info!(user = %form.fs_username, "issued oauth token");
    Ok(Json(json!({
        "credentials": { "oauth_token": token, "oauth_token_secret": secret }
    })))
}

async fn user(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let account = authenticated(&db, &headers).await?;
    Ok(Json(json!({
        "user": { "id": account.id, "firstname": account.first_name, "photo": account.photo }
    })))
}

/// Multipart photo upload; authenticated with Basic credentials only.
async fn user_update(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> ApiResult<Json<Value>> {
    let Some((username, password)) = basic_credentials(&headers) else {
        return Err(unauthorized("photo upload requires basic credentials"));
    };
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data; boundary="));
    if !is_multipart {
        return Err(param_error("expected a multipart/form-data body"));
    }
    if !body.windows(17).any(|w| w == b"name=\"image,jpeg\"") {
        return Err(param_error("missing image part"));
    }

    let mut store = db.write().await;
    let account = match store.accounts.get_mut(&username) {
        Some(account) if account.password == password => account,
        _ => return Err(unauthorized("invalid username or password")),
    };
    let photo = format!("https://playfoursquare.s3.amazonaws.com/userpix/{}.jpg", Uuid::new_v4().simple());
    account.photo = Some(photo.clone());
    tracing::info!(user = %username, bytes = body.len(), "stored profile photo");
    Ok(Json(json!({
        "user": { "id": account.id, "firstname": account.first_name, "photo": photo }
    })))
}

#[derive(Deserialize)]
pub struct VenuesQuery {
    pub geolat: Option<String>,
    pub geolong: Option<String>,
    pub q: Option<String>,
    pub l: Option<String>,
}

async fn venues(State(db): State<Db>, Query(query): Query<VenuesQuery>) -> ApiResult<Json<Value>> {
    if non_empty(&query.geolat).is_none() || non_empty(&query.geolong).is_none() {
        return Err(param_error("geolat and geolong are required"));
    }
    let needle = non_empty(&query.q).map(str::to_lowercase);
    let limit = non_empty(&query.l).and_then(|l| l.parse::<usize>().ok()).unwrap_or(usize::MAX);

    let store = db.read().await;
    let nearby: Vec<Value> = store
        .venues
        .values()
        .filter(|v| needle.as_deref().map_or(true, |n| v.name.to_lowercase().contains(n)))
        .take(limit)
        .map(|v| store.venue_json(v))
        .collect();
    Ok(Json(json!({
        "groups": [
            { "type": "Favorites", "venues": [] },
            { "type": "Nearby", "venues": nearby }
        ]
    })))
}

#[derive(Deserialize)]
pub struct VenueQuery {
    pub vid: Option<String>,
}

async fn venue(State(db): State<Db>, Query(query): Query<VenueQuery>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let venue = non_empty(&query.vid)
        .and_then(|vid| store.venues.get(vid))
        .ok_or_else(|| param_error("no venue with that id"))?;
    Ok(Json(json!({ "venue": store.venue_json(venue) })))
}

#[derive(Deserialize)]
pub struct VenueForm {
    pub vid: String,
}

async fn flag_closed(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<VenueForm>,
) -> ApiResult<&'static str> {
    authenticated(&db, &headers).await?;
    let mut store = db.write().await;
    let venue = store
        .venues
        .get_mut(&form.vid)
        .ok_or((StatusCode::NOT_FOUND, Json(Value::Null)))?;
    venue.closed_flags += 1;
    tracing::info!(vid = %form.vid, flags = venue.closed_flags, "venue flagged closed");
    Ok("true")
}

async fn categories() -> Json<Value> {
    Json(json!({
        "categories": [
            {
                "id": "1",
                "fullpathname": "Food",
                "nodename": "Food",
                "iconurl": "http://foursquare.com/img/categories/food.png",
                "categories": [
                    {
                        "id": "79",
                        "fullpathname": "Food:Café",
                        "nodename": "Café",
                        "iconurl": "http://foursquare.com/img/categories/food/cafe.png"
                    },
                    {
                        "id": "80",
                        "fullpathname": "Food:Bakery",
                        "nodename": "Bakery",
                        "categories": [
                            {"id": "81", "fullpathname": "Food:Bakery:Donuts", "nodename": "Donuts"}
                        ]
                    }
                ]
            },
            {
                "id": "2",
                "fullpathname": "Parks & Outdoors",
                "nodename": "Parks & Outdoors",
                "categories": []
            }
        ]
    }))
}

#[derive(Deserialize)]
pub struct TipForm {
    pub tid: String,
}

/// OAuth only: a Basic header is refused here.
async fn mark_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<TipForm>,
) -> ApiResult<Json<Value>> {
    let Some(token) = oauth_token(&headers) else {
        return Err(unauthorized("oauth token required"));
    };
    let mut store = db.write().await;
    if store.account_for_token(&token).is_none() {
        return Err(unauthorized("unknown oauth token"));
    }
    let Some(tip) = store.tips.get_mut(&form.tid) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error_code": 404, "error_msg": "no tip with that id" })),
        ));
    };
    tip.status = Some("todo".to_string());
    let tip = tip.clone();
    let venue = store.venues.get(&tip.venue_id).map(|v| json!({ "id": v.id, "name": v.name }));
    Ok(Json(json!({
        "todo": {
            "id": format!("todo-{}", tip.id),
            "created": "Sat, 16 Oct 10 12:00:00 +0000",
            "tip": {
                "id": tip.id,
                "text": tip.text,
                "status": tip.status,
                "venue": venue
            }
        }
    })))
}
