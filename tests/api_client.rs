//! Integration tests driving `ApiClient` against a loopback stub backend.
//!
//! The stub implements the same endpoints the real backend exposes and
//! records what it sees: bearer headers, query strings, and how many times
//! the refresh endpoint was hit. Each test configures which access token
//! the protected routes accept and which one the refresh endpoint issues.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use opportunet_client::models::{Category, LoginRequest, NewOpportunity, Profile, RegisterRequest};
use opportunet_client::{ApiClient, ApiError, DataSource, SessionStore};

#[derive(Default)]
struct Stub {
    refresh_calls: AtomicUsize,
    profile_calls: AtomicUsize,
    fail_refresh: AtomicBool,
    public_unauthorized: AtomicBool,
    garbled_profile: AtomicBool,
    empty_listing: AtomicBool,
    /// Access token the protected routes accept.
    accepts: Mutex<String>,
    /// Access token the refresh endpoint issues on success.
    issues: Mutex<String>,
    /// Authorization header seen on the most recent listing call.
    last_list_auth: Mutex<Option<String>>,
    /// Query string seen on the most recent listing call.
    last_list_query: Mutex<Option<String>>,
    /// Body of the most recent profile PUT.
    last_profile_update: Mutex<Option<Value>>,
}

impl Stub {
    fn accepts_bearer(&self, headers: &HeaderMap) -> bool {
        bearer(headers).as_deref() == Some(self.accepts.lock().unwrap().as_str())
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn opportunity_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": "Google STEP Internship 2026",
        "description": "Summer internship program.",
        "category": "internship",
        "deadline": "2099-08-12",
        "country": "USA",
        "city": "Mountain View",
        "trust_status": "official",
        "moderation_status": "approved",
        "created_by": 1,
        "created_at": "2026-07-01T09:30:00Z"
    })
}

async fn login(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "a@b.com" && body["password"] == "x" {
        *stub.accepts.lock().unwrap() = "A1".to_string();
        (StatusCode::OK, Json(json!({"access": "A1", "refresh": "R1"})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({"id": 7, "email": body["email"], "username": body["username"]})),
    )
}

async fn refresh(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    stub.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if stub.fail_refresh.load(Ordering::SeqCst) || body["refresh"].as_str().is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        );
    }
    let access = stub.issues.lock().unwrap().clone();
    (
        StatusCode::OK,
        Json(json!({"access": access, "refresh": body["refresh"]})),
    )
}

async fn get_profile(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    stub.profile_calls.fetch_add(1, Ordering::SeqCst);
    if stub.garbled_profile.load(Ordering::SeqCst) {
        // Well-formed JSON of the wrong shape
        return (StatusCode::OK, Json(json!([1, 2, 3])));
    }
    if stub.accepts_bearer(&headers) {
        (
            StatusCode::OK,
            Json(json!({"full_name": "John Doe", "country": "USA", "level": "bachelor"})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        )
    }
}

async fn put_profile(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if stub.accepts_bearer(&headers) {
        *stub.last_profile_update.lock().unwrap() = Some(body.clone());
        (StatusCode::OK, Json(body))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({})))
    }
}

async fn list_opportunities(
    State(stub): State<Arc<Stub>>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    *stub.last_list_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *stub.last_list_query.lock().unwrap() = uri.query().map(str::to_string);

    if stub.public_unauthorized.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        );
    }
    if stub.empty_listing.load(Ordering::SeqCst) {
        return (StatusCode::OK, Json(json!([])));
    }
    (StatusCode::OK, Json(json!([opportunity_json(42)])))
}

async fn create_opportunity(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if stub.accepts_bearer(&headers) {
        (StatusCode::CREATED, Json(opportunity_json(43)))
    } else {
        // No detail field; clients fall back to the generic message
        (StatusCode::UNAUTHORIZED, Json(json!({})))
    }
}

async fn get_opportunity(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == 42 {
        (StatusCode::OK, Json(opportunity_json(42)))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})))
    }
}

/// Bind the stub on a random loopback port and return a client/stub pair.
/// The session starts empty; tests seed it as needed.
async fn start() -> (ApiClient, Arc<Stub>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let stub = Arc::new(Stub::default());
    let app = Router::new()
        .route("/api/auth/login/", post(login))
        .route("/api/auth/register/", post(register))
        .route("/api/auth/refresh/", post(refresh))
        .route("/api/auth/me/profile", get(get_profile).put(put_profile))
        .route("/api/opportunities/", get(list_opportunities).post(create_opportunity))
        .route("/api/opportunities/:id/", get(get_opportunity))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server died");
    });

    let client = ApiClient::new(format!("http://{}/api", addr), SessionStore::in_memory())
        .expect("Failed to build client");
    (client, stub)
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "a@b.com".to_string(),
        password: "x".to_string(),
    }
}

#[tokio::test]
async fn login_persists_tokens_and_sends_bearer_header() {
    let (client, stub) = start().await;

    let tokens = client.login(&credentials()).await.expect("Login failed");
    assert_eq!(tokens.access, "A1");
    assert_eq!(tokens.refresh, "R1");
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().access_token().as_deref(), Some("A1"));

    client.get_opportunities(None).await.expect("Listing failed");
    assert_eq!(
        stub.last_list_auth.lock().unwrap().as_deref(),
        Some("Bearer A1"),
        "authenticated call must carry a correctly formatted bearer header"
    );
}

#[tokio::test]
async fn rejected_login_surfaces_server_detail() {
    let (client, _stub) = start().await;

    let err = client
        .login(&LoginRequest {
            email: "a@b.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("Login should fail");
    match err {
        ApiError::Http { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "No active account found with the given credentials");
        }
        other => panic!("expected Http error, got {:?}", other),
    }
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn register_returns_account_without_starting_a_session() {
    let (client, _stub) = start().await;

    let user = client
        .register(&RegisterRequest {
            email: "new@b.com".to_string(),
            username: "new".to_string(),
            password: "x".to_string(),
        })
        .await
        .expect("Register failed");
    assert_eq!(user.id, 7);
    assert_eq!(user.username, "new");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn expired_access_token_refreshes_once_and_retries_once() {
    let (client, stub) = start().await;
    client.session().set_tokens("stale", "R1");
    *stub.accepts.lock().unwrap() = "A2".to_string();
    *stub.issues.lock().unwrap() = "A2".to_string();

    let profile = client.get_profile().await.expect("Profile fetch failed");
    assert_eq!(profile.full_name.as_deref(), Some("John Doe"));

    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1, "exactly one refresh call");
    assert_eq!(stub.profile_calls.load(Ordering::SeqCst), 2, "original call plus one retry");
    assert_eq!(client.session().access_token().as_deref(), Some("A2"));
    // The refresh endpoint does not rotate the refresh token
    assert_eq!(client.session().refresh_token().as_deref(), Some("R1"));
}

#[tokio::test]
async fn second_401_after_refresh_is_a_hard_failure() {
    let (client, stub) = start().await;
    client.session().set_tokens("stale", "R1");
    // Refresh succeeds but the issued token is still not accepted
    *stub.accepts.lock().unwrap() = "never-valid".to_string();
    *stub.issues.lock().unwrap() = "A2".to_string();

    let err = client.get_profile().await.expect_err("Profile fetch should fail");
    assert_eq!(err.status(), Some(401), "retry's status is carried: {:?}", err);

    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1, "no recursive refresh");
    assert_eq!(stub.profile_calls.load(Ordering::SeqCst), 2, "at most one retry");
}

#[tokio::test]
async fn failed_refresh_clears_both_tokens() {
    let (client, stub) = start().await;
    client.session().set_tokens("stale", "R-dead");
    stub.fail_refresh.store(true, Ordering::SeqCst);

    let err = client.get_profile().await.expect_err("Profile fetch should fail");
    assert!(matches!(err, ApiError::AuthExpired), "got {:?}", err);

    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(!client.session().is_authenticated());
    assert_eq!(client.session().access_token(), None);
    assert_eq!(client.session().refresh_token(), None);
}

#[tokio::test]
async fn public_endpoint_never_triggers_refresh() {
    let (client, stub) = start().await;
    client.session().set_tokens("stale", "R1");
    stub.public_unauthorized.store(true, Ordering::SeqCst);

    let err = client
        .get_opportunities(None)
        .await
        .expect_err("Listing should fail");
    assert_eq!(err.status(), Some(401));
    assert_eq!(
        stub.refresh_calls.load(Ordering::SeqCst),
        0,
        "public-allowed calls must not run the refresh protocol"
    );
    // The failed public call did not touch the session
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn protected_401_without_refresh_token_fails_plainly() {
    let (client, stub) = start().await;

    let err = client
        .create_opportunity(&NewOpportunity {
            title: Some("HackMIT 2026".to_string()),
            category: Some(Category::Hackathon),
            ..Default::default()
        })
        .await
        .expect_err("Create should fail without a session");
    match err {
        ApiError::Http { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "API Error: 401", "no detail field falls back to the generic message");
        }
        other => panic!("expected Http error, got {:?}", other),
    }
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn logout_clears_tokens_and_drops_the_bearer_header() {
    let (client, stub) = start().await;
    client.login(&credentials()).await.expect("Login failed");

    client.logout();
    assert!(!client.session().is_authenticated());

    client.get_opportunities(None).await.expect("Listing failed");
    assert_eq!(
        *stub.last_list_auth.lock().unwrap(),
        None,
        "protected header must be absent after logout"
    );
}

#[tokio::test]
async fn category_filter_builds_the_query_string() {
    let (client, stub) = start().await;

    client
        .get_opportunities(Some(Category::Internship))
        .await
        .expect("Listing failed");
    assert_eq!(
        stub.last_list_query.lock().unwrap().as_deref(),
        Some("category=internship")
    );

    client.get_opportunities(None).await.expect("Listing failed");
    assert_eq!(*stub.last_list_query.lock().unwrap(), None, "no category, no query string");
}

#[tokio::test]
async fn wrong_shape_payload_is_a_validation_error() {
    let (client, stub) = start().await;
    client.session().set_tokens("A1", "R1");
    *stub.accepts.lock().unwrap() = "A1".to_string();
    stub.garbled_profile.store(true, Ordering::SeqCst);

    let err = client.get_profile().await.expect_err("Parse should fail");
    assert!(matches!(err, ApiError::Validation(_)), "got {:?}", err);
}

#[tokio::test]
async fn missing_opportunity_carries_the_server_detail() {
    let (client, _stub) = start().await;

    let err = client.get_opportunity(999).await.expect_err("Fetch should fail");
    match err {
        ApiError::Http { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "Not found.");
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn partial_profile_update_sends_only_supplied_fields() {
    let (client, stub) = start().await;
    client.login(&credentials()).await.expect("Login failed");

    let updated = client
        .update_profile(&Profile {
            university: Some("MIT".to_string()),
            ..Default::default()
        })
        .await
        .expect("Update failed");
    assert_eq!(updated.university.as_deref(), Some("MIT"));
    assert_eq!(
        *stub.last_profile_update.lock().unwrap(),
        Some(json!({"university": "MIT"})),
        "unset fields must not be sent"
    );
}

#[tokio::test]
async fn concurrent_401s_each_recover_without_a_single_flight_guarantee() {
    let (client, stub) = start().await;
    client.session().set_tokens("stale", "R1");
    *stub.accepts.lock().unwrap() = "A2".to_string();
    *stub.issues.lock().unwrap() = "A2".to_string();

    // Two in-flight calls hitting 401 may each run their own refresh; the
    // client makes no de-duplication promise, only that both calls land.
    let results = futures::future::join_all(vec![client.get_profile(), client.get_profile()]).await;
    for result in results {
        result.expect("Concurrent profile fetch failed");
    }
    let refreshes = stub.refresh_calls.load(Ordering::SeqCst);
    assert!((1..=2).contains(&refreshes), "observed {} refresh calls", refreshes);
}

#[tokio::test]
async fn data_source_serves_fixtures_when_the_backend_is_unreachable() {
    // Nothing listens on port 9; connections fail immediately
    let client = ApiClient::new("http://127.0.0.1:9/api", SessionStore::in_memory())
        .expect("Failed to build client");
    let source = DataSource::remote(client);

    let listings = source.opportunities(None).await;
    assert_eq!(listings.len(), 3, "unreachable backend falls back to samples");
    assert!(source.opportunity(1).await.is_some());
    assert!(!source.profile().await.needs_onboarding());
}

#[tokio::test]
async fn data_source_treats_an_empty_listing_as_no_data_yet() {
    let (client, stub) = start().await;
    stub.empty_listing.store(true, Ordering::SeqCst);

    let source = DataSource::remote(client);
    let listings = source.opportunities(Some(Category::Grant)).await;
    assert_eq!(listings.len(), 1, "empty listing falls back to matching samples");
    assert_eq!(listings[0].title, "Chevening Scholarship");
}

#[tokio::test]
async fn data_source_passes_live_listings_through() {
    let (client, stub) = start().await;

    let source = DataSource::remote(client);
    let listings = source.opportunities(None).await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, 42);
    assert!(stub.last_list_query.lock().unwrap().is_none());
}
