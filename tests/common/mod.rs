//! In-process stand-in for the CookSetu backend.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use cooksetu::api::ApiClient;
use cooksetu::config::HttpConfig;

pub const ADMIN_TOKEN: &str = "tok-admin";
pub const COOK_TOKEN: &str = "tok-cook";
pub const PASSWORD: &str = "secret";

/// A request as the stub saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Value,
}

#[derive(Default)]
pub struct StubState {
    pub requests: Mutex<Vec<Recorded>>,
    pub cooks: Mutex<Vec<Value>>,
    /// Listing returned by `/api/cooks/me`; `None` answers 404
    pub my_cook: Mutex<Option<Value>>,
    /// Answer `/api/cooks/me` with a JSON `null` instead of 404
    pub my_cook_null: Mutex<bool>,
    /// When set, status updates fail with this code
    pub fail_status_update: Mutex<Option<StatusCode>>,
}

impl StubState {
    fn record(&self, method: Method, path: &str, headers: &HeaderMap, query: HashMap<String, String>, body: Value) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push(Recorded {
            method,
            path: path.to_string(),
            authorization,
            query,
            body,
        });
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

pub struct StubBackend {
    pub state: Arc<StubState>,
    pub base_url: String,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        *state.cooks.lock() = sample_cooks();

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/signup", post(signup))
            .route("/api/users/location", put(update_location))
            .route("/api/cooks", get(list_cooks).post(create_cook).put(update_cook))
            .route("/api/cooks/nearby", get(nearby_cooks))
            .route("/api/cooks/me", get(my_cook))
            .route("/api/cooks/admin", get(admin_cooks))
            .route("/api/cooks/:id/status", patch(update_status))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, &HttpConfig::default()).unwrap()
    }
}

pub fn user_json(id: &str, name: &str, role: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": role,
        "phoneNum": "9876543210",
    })
}

pub fn cook_json(id: &str, city: &str, coordinates: Option<[f64; 2]>, status: &str) -> Value {
    json!({
        "_id": id,
        "user": {"_id": format!("owner-{}", id), "name": format!("Cook {}", id), "role": "cook"},
        "locationString": city,
        "location": coordinates.map(|c| json!({"type": "Point", "coordinates": c})),
        "cuisines": ["North Indian", "Biryani"],
        "experience": 5,
        "price": 250,
        "availability": true,
        "phoneNum": "9123456780",
        "status": status,
    })
}

fn sample_cooks() -> Vec<Value> {
    vec![
        cook_json("c1", "Bengaluru", Some([77.6, 12.9]), "pending"),
        cook_json("c2", "Delhi", Some([77.2, 28.6]), "approved"),
        cook_json("c3", "Mumbai", None, "rejected"),
    ]
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

type Reply = (StatusCode, Json<Value>);

async fn login(State(state): State<Arc<StubState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record(Method::POST, "/api/auth/login", &headers, HashMap::new(), body.clone());

    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let (user, token) = match body["email"].as_str() {
        Some("admin@example.com") => (user_json("a1", "Admin", "admin"), ADMIN_TOKEN),
        Some("cook@example.com") => (user_json("k1", "Lakshmi", "cook"), COOK_TOKEN),
        _ => (user_json("u1", "Akhil", "user"), "tok-user"),
    };
    (StatusCode::OK, Json(json!({ "user": user, "token": token })))
}

async fn signup(State(state): State<Arc<StubState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record(Method::POST, "/api/auth/signup", &headers, HashMap::new(), body.clone());

    if body["email"] == "taken@example.com" {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    let user = json!({
        "_id": "n1",
        "name": body["name"],
        "email": body["email"],
        "role": body["role"],
        "phoneNum": body["phoneNum"],
        "locationString": body["locationString"],
    });
    (StatusCode::CREATED, Json(json!({ "user": user, "token": "tok-signup" })))
}

async fn update_location(State(state): State<Arc<StubState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record(Method::PUT, "/api/users/location", &headers, HashMap::new(), body);
    if bearer(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "No token");
    }
    (StatusCode::OK, Json(json!({ "message": "Location updated" })))
}

async fn list_cooks(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    state.record(Method::GET, "/api/cooks", &headers, HashMap::new(), Value::Null);
    let cooks = state.cooks.lock().clone();
    (StatusCode::OK, Json(Value::Array(cooks)))
}

async fn nearby_cooks(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    state.record(Method::GET, "/api/cooks/nearby", &headers, query, Value::Null);
    let cooks = state.cooks.lock().clone();
    (StatusCode::OK, Json(Value::Array(cooks)))
}

async fn my_cook(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    state.record(Method::GET, "/api/cooks/me", &headers, HashMap::new(), Value::Null);
    if bearer(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "No token");
    }
    if *state.my_cook_null.lock() {
        return (StatusCode::OK, Json(Value::Null));
    }
    match state.my_cook.lock().clone() {
        Some(cook) => (StatusCode::OK, Json(cook)),
        None => error(StatusCode::NOT_FOUND, "Cook profile not found"),
    }
}

async fn admin_cooks(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    state.record(Method::GET, "/api/cooks/admin", &headers, HashMap::new(), Value::Null);
    if bearer(&headers).as_deref() != Some(ADMIN_TOKEN) {
        return error(StatusCode::FORBIDDEN, "Admins only");
    }
    let cooks = state.cooks.lock().clone();
    (StatusCode::OK, Json(Value::Array(cooks)))
}

fn saved_listing(id: &str, body: &Value) -> Value {
    let mut listing = body.clone();
    listing["_id"] = json!(id);
    listing["status"] = json!("pending");
    listing["user"] = json!({"_id": "k1", "name": "Lakshmi"});
    listing
}

async fn create_cook(State(state): State<Arc<StubState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record(Method::POST, "/api/cooks", &headers, HashMap::new(), body.clone());
    if bearer(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "No token");
    }
    let listing = saved_listing("new-cook", &body);
    *state.my_cook.lock() = Some(listing.clone());
    (StatusCode::CREATED, Json(listing))
}

async fn update_cook(State(state): State<Arc<StubState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record(Method::PUT, "/api/cooks", &headers, HashMap::new(), body.clone());
    if bearer(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "No token");
    }
    let id = state
        .my_cook
        .lock()
        .as_ref()
        .and_then(|c| c["_id"].as_str().map(str::to_string))
        .unwrap_or_else(|| "new-cook".to_string());
    let listing = saved_listing(&id, &body);
    *state.my_cook.lock() = Some(listing.clone());
    (StatusCode::OK, Json(listing))
}

async fn update_status(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let path = format!("/api/cooks/{}/status", id);
    state.record(Method::PATCH, &path, &headers, HashMap::new(), body.clone());

    if bearer(&headers).as_deref() != Some(ADMIN_TOKEN) {
        return error(StatusCode::FORBIDDEN, "Admins only");
    }
    if let Some(status) = *state.fail_status_update.lock() {
        return error(status, "Failed to update cook status");
    }

    let mut cooks = state.cooks.lock();
    match cooks.iter_mut().find(|c| c["_id"] == id.as_str()) {
        Some(cook) => {
            cook["status"] = body["status"].clone();
            (StatusCode::OK, Json(cook.clone()))
        }
        None => error(StatusCode::NOT_FOUND, "Cook not found"),
    }
}
