#![allow(dead_code)]

//! In-process mock of the dashboard API and the identity service.
//!
//! Every test starts its own backend on a free port so state never leaks
//! between tests. Dashboard routes require a valid session cookie, just like
//! the real backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use revoice_dashboard::api::models::{
    AccessGrantBody, AccessListUser, CustomLevelIdBody, GameUserBody, HistoryDetails, HistoryEntry, LevelDetails,
    LevelSummary, LevelType, MainLevelIdBody, NewLevel, Recipient, RecipientDetails, Stage, StageOutcome,
    StreakSummary,
};
use revoice_dashboard::config::{ApiConfig, PaginationConfig, SessionConfig};
use revoice_dashboard::resource::MemoryNotifier;
use revoice_dashboard::session::{SessionContext, SessionCookie, SessionUser};
use revoice_dashboard::views::ViewContext;
use revoice_dashboard::FetchClient;

pub const COOKIE_NAME: &str = "better-auth.session_token";
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
enum Failure {
    Status(u16),
    Rejected(String),
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Custom,
    Main,
}

#[derive(Default)]
pub struct Store {
    pub recipients: Vec<Recipient>,
    pub streaks: HashMap<String, StreakSummary>,
    pub custom_levels: Vec<LevelDetails>,
    pub main_levels: Vec<LevelDetails>,
    /// custom level id -> recipient ids, in grant order
    pub access: HashMap<String, Vec<String>>,
    /// game id -> play sessions, newest last
    pub history: HashMap<String, Vec<HistoryDetails>>,
    /// email -> (password, user)
    pub users: HashMap<String, (String, SessionUser)>,
    /// session token -> email
    pub sessions: HashMap<String, String>,
    pub requests: Vec<RecordedRequest>,
    failures: HashMap<String, Failure>,
    delays: HashMap<(String, usize), Duration>,
    next_id: u64,
}

impl Store {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn levels_mut(&mut self, catalog: Catalog) -> &mut Vec<LevelDetails> {
        match catalog {
            Catalog::Custom => &mut self.custom_levels,
            Catalog::Main => &mut self.main_levels,
        }
    }
}

type Shared = Arc<Mutex<Store>>;

fn lock(state: &Shared) -> MutexGuard<'_, Store> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn recipient(game_user_id: &str) -> Recipient {
    Recipient {
        game_user_id: game_user_id.to_string(),
        name: game_user_id.to_string(),
        image: None,
        first_name: format!("First {}", game_user_id),
        last_name: format!("Last {}", game_user_id),
        title: "Khun".to_string(),
        gender: "unspecified".to_string(),
        birth_date: None,
    }
}

fn summary(level: &LevelDetails) -> LevelSummary {
    LevelSummary {
        id: level.id.clone(),
        level_type: level.level_type,
        subtype: level.subtype.clone(),
        name: level.name.clone(),
        description: level.description.clone(),
    }
}

// ---------------------------------------------------------------------------
// Request plumbing
// ---------------------------------------------------------------------------

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value.to_string())
}

fn page_of(query: &HashMap<String, String>) -> (usize, usize) {
    let page = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1usize).max(1);
    let limit = query
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .max(1);
    (page, limit)
}

fn paginate<T: Clone>(items: &[T], query: &HashMap<String, String>) -> Vec<T> {
    let (page, limit) = page_of(query);
    items.iter().skip((page - 1) * limit).take(limit).cloned().collect()
}

/// Record the call, check the cookie, apply injected failures and delays.
/// `Err` carries the response to send instead of running the handler.
async fn begin(
    state: &Shared,
    path: &str,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
    body: Option<&Value>,
) -> Result<(), Response> {
    let (failure, delay) = {
        let mut store = lock(state);
        store.requests.push(RecordedRequest {
            path: path.to_string(),
            query: query.clone(),
            body: body.cloned(),
        });

        let authorized = session_token(headers).map_or(false, |t| store.sessions.contains_key(&t));
        if !authorized {
            return Err(error(StatusCode::UNAUTHORIZED, "Unauthorized"));
        }

        let (page, _) = page_of(query);
        let failure = store.failures.remove(path);
        let delay = store.delays.get(&(path.to_string(), page)).copied();
        (failure, delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match failure {
        None => Ok(()),
        Some(Failure::Status(status)) => Err(error(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "injected failure",
        )),
        Some(Failure::Rejected(message)) => Err(Json(json!({ "error": message })).into_response()),
        Some(Failure::Malformed) => Err(Json(json!({ "unexpected": true })).into_response()),
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, Response> {
    serde_json::from_value(body).map_err(|e| error(StatusCode::BAD_REQUEST, &e.to_string()))
}

type Params = Query<HashMap<String, String>>;
type Reply = Result<Json<Value>, Response>;

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

const RECIPIENT_COUNT: &str = "/dashboard/recipient/count";
const RECIPIENT_LIST: &str = "/dashboard/recipient/list";
const RECIPIENT_BY_ID: &str = "/dashboard/recipient/by-id";
const RECIPIENT_HISTORY_LIST: &str = "/dashboard/recipient/history-list";
const RECIPIENT_HISTORY: &str = "/dashboard/recipient/history";
const RECIPIENT_ADD: &str = "/dashboard/recipient/add";
const RECIPIENT_REMOVE: &str = "/dashboard/recipient/remove";

async fn recipient_count(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, RECIPIENT_COUNT, &headers, &q, None).await?;
    let store = lock(&state);
    Ok(Json(json!({ "count": store.recipients.len() })))
}

async fn recipient_list(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, RECIPIENT_LIST, &headers, &q, None).await?;
    let store = lock(&state);
    Ok(Json(json!({
        "recipients": paginate(&store.recipients, &q),
        "rowCount": store.recipients.len(),
    })))
}

async fn recipient_by_id(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, RECIPIENT_BY_ID, &headers, &q, None).await?;
    let store = lock(&state);
    let game_id = q.get("gameId").cloned().unwrap_or_default();
    let recipient = store
        .recipients
        .iter()
        .find(|r| r.game_user_id == game_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Recipient not found"))?;

    let details = RecipientDetails {
        game_id: recipient.game_user_id.clone(),
        name: recipient.name.clone(),
        image: recipient.image.clone(),
        first_name: recipient.first_name.clone(),
        last_name: recipient.last_name.clone(),
        title: recipient.title.clone(),
        gender: recipient.gender.clone(),
        birth_date: recipient.birth_date.clone(),
        streak: store.streaks.get(&game_id).cloned().unwrap_or(StreakSummary {
            current_streak: 0,
            longest_streak: 0,
            streak_start_date: None,
            last_activity_date: None,
            total_days_played: 0,
        }),
    };
    Ok(Json(json!(details)))
}

async fn recipient_history_list(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, RECIPIENT_HISTORY_LIST, &headers, &q, None).await?;
    let store = lock(&state);
    let game_id = q.get("gameId").cloned().unwrap_or_default();
    let entries: Vec<HistoryEntry> = store
        .history
        .get(&game_id)
        .map(|h| h.iter().map(|d| d.entry.clone()).collect())
        .unwrap_or_default();
    Ok(Json(json!({
        "history": paginate(&entries, &q),
        "rowCount": entries.len(),
    })))
}

async fn recipient_history(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, RECIPIENT_HISTORY, &headers, &q, None).await?;
    let store = lock(&state);
    let game_id = q.get("gameId").cloned().unwrap_or_default();
    let history_id = q.get("historyId").cloned().unwrap_or_default();
    let details = store
        .history
        .get(&game_id)
        .and_then(|h| h.iter().find(|d| d.entry.id == history_id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "History not found"))?;
    Ok(Json(json!({ "history": details })))
}

async fn recipient_add(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, RECIPIENT_ADD, &headers, &HashMap::new(), Some(&body)).await?;
    let body: GameUserBody = parse_body(body)?;
    let mut store = lock(&state);
    if store.recipients.iter().any(|r| r.game_user_id == body.game_user_id) {
        return Ok(Json(json!({ "error": "Recipient already added" })));
    }
    store.recipients.push(recipient(&body.game_user_id));
    Ok(Json(json!({ "message": "Recipient added" })))
}

async fn recipient_remove(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, RECIPIENT_REMOVE, &headers, &HashMap::new(), Some(&body)).await?;
    let body: GameUserBody = parse_body(body)?;
    let mut store = lock(&state);
    let before = store.recipients.len();
    store.recipients.retain(|r| r.game_user_id != body.game_user_id);
    if store.recipients.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Recipient not found"));
    }
    for holders in store.access.values_mut() {
        holders.retain(|id| *id != body.game_user_id);
    }
    Ok(Json(json!({ "message": "Recipient removed" })))
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

const CUSTOM_LIST: &str = "/dashboard/custom-level/list";
const CUSTOM_BY_ID: &str = "/dashboard/custom-level/by-id";
const CUSTOM_CREATE: &str = "/dashboard/custom-level/create";
const CUSTOM_DELETE: &str = "/dashboard/custom-level/delete";
const CUSTOM_ACCESS_LIST: &str = "/dashboard/custom-level/access-list";
const CUSTOM_ADD_ACCESS: &str = "/dashboard/custom-level/add-access";
const CUSTOM_REMOVE_ACCESS: &str = "/dashboard/custom-level/remove-access";
const MAIN_LIST: &str = "/dashboard/main-level/list";
const MAIN_BY_ID: &str = "/dashboard/main-level/by-id";
const MAIN_CREATE: &str = "/dashboard/main-level/create";
const MAIN_DELETE: &str = "/dashboard/main-level/delete";

fn level_list(state: &Shared, catalog: Catalog, q: &HashMap<String, String>) -> Value {
    let mut store = lock(state);
    let levels: Vec<LevelSummary> = store.levels_mut(catalog).iter().map(summary).collect();
    let key = match catalog {
        Catalog::Custom => "customLevels",
        Catalog::Main => "mainLevels",
    };
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), json!(paginate(&levels, q)));
    body.insert("rowCount".to_string(), json!(levels.len()));
    Value::Object(body)
}

fn level_by_id(state: &Shared, catalog: Catalog, id: &str) -> Reply {
    let mut store = lock(state);
    store
        .levels_mut(catalog)
        .iter()
        .find(|l| l.id == id)
        .map(|l| Json(json!(l)))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Level not found"))
}

fn level_create(state: &Shared, catalog: Catalog, body: Value) -> Reply {
    let level: NewLevel = parse_body(body)?;
    let mut store = lock(state);
    let id = store.next_id(match catalog {
        Catalog::Custom => "custom",
        Catalog::Main => "main",
    });
    store.levels_mut(catalog).push(LevelDetails {
        id,
        level_type: level.level_type,
        subtype: Some(level.subtype),
        name: level.name,
        description: level.description,
        stage: level.stage,
    });
    Ok(Json(json!({ "message": "Level created" })))
}

fn level_delete(state: &Shared, catalog: Catalog, id: &str) -> Reply {
    let mut store = lock(state);
    let levels = store.levels_mut(catalog);
    let before = levels.len();
    levels.retain(|l| l.id != id);
    if levels.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Level not found"));
    }
    store.access.remove(id);
    Ok(Json(json!({ "message": "Level deleted" })))
}

async fn custom_list(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, CUSTOM_LIST, &headers, &q, None).await?;
    Ok(Json(level_list(&state, Catalog::Custom, &q)))
}

async fn custom_by_id(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, CUSTOM_BY_ID, &headers, &q, None).await?;
    level_by_id(&state, Catalog::Custom, q.get("customLevelId").map_or("", String::as_str))
}

async fn custom_create(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, CUSTOM_CREATE, &headers, &HashMap::new(), Some(&body)).await?;
    level_create(&state, Catalog::Custom, body)
}

async fn custom_delete(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, CUSTOM_DELETE, &headers, &HashMap::new(), Some(&body)).await?;
    let body: CustomLevelIdBody = parse_body(body)?;
    level_delete(&state, Catalog::Custom, &body.custom_level_id)
}

async fn main_list(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, MAIN_LIST, &headers, &q, None).await?;
    Ok(Json(level_list(&state, Catalog::Main, &q)))
}

async fn main_by_id(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, MAIN_BY_ID, &headers, &q, None).await?;
    level_by_id(&state, Catalog::Main, q.get("mainLevelId").map_or("", String::as_str))
}

async fn main_create(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, MAIN_CREATE, &headers, &HashMap::new(), Some(&body)).await?;
    level_create(&state, Catalog::Main, body)
}

async fn main_delete(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, MAIN_DELETE, &headers, &HashMap::new(), Some(&body)).await?;
    let body: MainLevelIdBody = parse_body(body)?;
    level_delete(&state, Catalog::Main, &body.main_level_id)
}

// ---------------------------------------------------------------------------
// Access grants
// ---------------------------------------------------------------------------

async fn access_list(State(state): State<Shared>, headers: HeaderMap, Query(q): Params) -> Reply {
    begin(&state, CUSTOM_ACCESS_LIST, &headers, &q, None).await?;
    let store = lock(&state);
    let level_id = q.get("customLevelId").cloned().unwrap_or_default();
    if !store.custom_levels.iter().any(|l| l.id == level_id) {
        return Err(error(StatusCode::NOT_FOUND, "Level not found"));
    }
    let users: Vec<AccessListUser> = store
        .access
        .get(&level_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| store.recipients.iter().find(|r| r.game_user_id == *id))
                .map(|r| AccessListUser {
                    game_user_id: r.game_user_id.clone(),
                    name: r.name.clone(),
                    image: r.image.clone(),
                    first_name: r.first_name.clone(),
                    last_name: r.last_name.clone(),
                    title: r.title.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(json!({
        "accessList": paginate(&users, &q),
        "rowCount": users.len(),
    })))
}

async fn add_access(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, CUSTOM_ADD_ACCESS, &headers, &HashMap::new(), Some(&body)).await?;
    let grant: AccessGrantBody = parse_body(body)?;
    let mut store = lock(&state);
    if !store.recipients.iter().any(|r| r.game_user_id == grant.recipient_user_id) {
        return Err(error(StatusCode::NOT_FOUND, "Recipient not found"));
    }
    let holders = store.access.entry(grant.custom_level_id).or_default();
    if holders.contains(&grant.recipient_user_id) {
        return Ok(Json(json!({ "error": "Recipient already has access" })));
    }
    holders.push(grant.recipient_user_id);
    Ok(Json(json!({ "message": "Access granted" })))
}

async fn remove_access(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    begin(&state, CUSTOM_REMOVE_ACCESS, &headers, &HashMap::new(), Some(&body)).await?;
    let grant: AccessGrantBody = parse_body(body)?;
    let mut store = lock(&state);
    let holders = store.access.entry(grant.custom_level_id).or_default();
    holders.retain(|id| *id != grant.recipient_user_id);
    Ok(Json(json!({ "message": "Access removed" })))
}

// ---------------------------------------------------------------------------
// Identity service
// ---------------------------------------------------------------------------

fn with_session_cookie(token: &str, body: Value) -> Response {
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            format!("{}={}; Path=/; HttpOnly; SameSite=Lax", COOKIE_NAME, token),
        )],
        Json(body),
    )
        .into_response()
}

async fn sign_in(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    let mut store = lock(&state);
    let user = match store.users.get(&email) {
        Some((expected, user)) if expected == password => user.clone(),
        _ => return error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };
    let token = uuid::Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), email);
    with_session_cookie(&token, json!({ "redirect": false, "token": token, "user": user }))
}

async fn sign_up(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let mut store = lock(&state);
    if store.users.contains_key(&email) {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "User already exists");
    }
    let user = session_user(&store.next_id("user"), &name, &email, None);
    store.users.insert(email.clone(), (password, user.clone()));
    let token = uuid::Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), email);
    with_session_cookie(&token, json!({ "token": token, "user": user }))
}

async fn sign_out(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        lock(&state).sessions.remove(&token);
    }
    Json(json!({ "success": true })).into_response()
}

async fn get_session(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = lock(&state);
    let active = session_token(&headers).and_then(|token| {
        let email = store.sessions.get(&token)?;
        let (_, user) = store.users.get(email)?;
        Some(json!({
            "session": { "id": format!("session-{}", token), "expiresAt": "2030-01-01T00:00:00.000Z", "token": token },
            "user": user,
        }))
    });
    Json(active.unwrap_or(Value::Null)).into_response()
}

pub fn session_user(id: &str, name: &str, email: &str, role: Option<&str>) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        email_verified: true,
        image: None,
        created_at: Some("2025-01-15T08:00:00.000Z".to_string()),
        role: role.map(str::to_string),
        first_name: None,
        last_name: None,
        title: None,
        gender: None,
        birth_date: None,
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route(RECIPIENT_COUNT, get(recipient_count))
        .route(RECIPIENT_LIST, get(recipient_list))
        .route(RECIPIENT_BY_ID, get(recipient_by_id))
        .route(RECIPIENT_HISTORY_LIST, get(recipient_history_list))
        .route(RECIPIENT_HISTORY, get(recipient_history))
        .route(RECIPIENT_ADD, post(recipient_add))
        .route(RECIPIENT_REMOVE, post(recipient_remove))
        .route(CUSTOM_LIST, get(custom_list))
        .route(CUSTOM_BY_ID, get(custom_by_id))
        .route(CUSTOM_CREATE, post(custom_create))
        .route(CUSTOM_DELETE, post(custom_delete))
        .route(CUSTOM_ACCESS_LIST, get(access_list))
        .route(CUSTOM_ADD_ACCESS, post(add_access))
        .route(CUSTOM_REMOVE_ACCESS, post(remove_access))
        .route(MAIN_LIST, get(main_list))
        .route(MAIN_BY_ID, get(main_by_id))
        .route(MAIN_CREATE, post(main_create))
        .route(MAIN_DELETE, post(main_delete))
        .route("/auth/api/sign-in/email", post(sign_in))
        .route("/auth/api/sign-up/email", post(sign_up))
        .route("/auth/api/sign-out", post(sign_out))
        .route("/auth/api/get-session", get(get_session))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Test-facing handle
// ---------------------------------------------------------------------------

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with_test_writer()
            .try_init();

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;

        let state: Shared = Arc::new(Mutex::new(Store::default()));
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}/", port),
            state,
        })
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    pub fn store(&self) -> MutexGuard<'_, Store> {
        lock(&self.state)
    }

    /// A session context holding a cookie the backend accepts
    pub fn signed_in_session(&self) -> SessionContext {
        let token = uuid::Uuid::new_v4().to_string();
        let user = session_user("admin-1", "Admin", "admin@example.com", Some("admin"));
        {
            let mut store = self.store();
            store
                .users
                .insert(user.email.clone(), ("password123".to_string(), user.clone()));
            store.sessions.insert(token.clone(), user.email.clone());
        }

        let session = SessionContext::in_memory(&SessionConfig::default());
        session
            .establish(SessionCookie::new(COOKIE_NAME, token), Some(user))
            .expect("in-memory session store never fails");
        session
    }

    pub fn client(&self, session: &SessionContext) -> FetchClient {
        FetchClient::new(&self.api_config(), session.clone()).expect("mock base url is valid")
    }

    pub fn add_user(&self, email: &str, password: &str, role: Option<&str>) -> SessionUser {
        let mut store = self.store();
        let id = store.next_id("user");
        let user = session_user(&id, email.split('@').next().unwrap_or(email), email, role);
        store
            .users
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    pub fn seed_recipients(&self, count: usize) -> Vec<String> {
        let mut store = self.store();
        let start = store.recipients.len();
        (start..start + count)
            .map(|i| {
                let id = format!("r-{:03}", i + 1);
                store.recipients.push(recipient(&id));
                id
            })
            .collect()
    }

    pub fn add_recipient(&self, recipient: Recipient) {
        self.store().recipients.push(recipient);
    }

    pub fn seed_level(&self, catalog: Catalog, name: &str, targets: &[&str]) -> String {
        let mut store = self.store();
        let id = store.next_id(match catalog {
            Catalog::Custom => "custom",
            Catalog::Main => "main",
        });
        let level = LevelDetails {
            id: id.clone(),
            level_type: LevelType::FacialDetection,
            subtype: Some("smile".to_string()),
            name: name.to_string(),
            description: format!("{} description", name),
            stage: targets
                .iter()
                .enumerate()
                .map(|(i, target)| Stage {
                    number: i as u32,
                    target: target.to_string(),
                    description: String::new(),
                    image: String::new(),
                })
                .collect(),
        };
        store.levels_mut(catalog).push(level);
        id
    }

    pub fn grant(&self, level_id: &str, recipient_id: &str) {
        self.store()
            .access
            .entry(level_id.to_string())
            .or_default()
            .push(recipient_id.to_string());
    }

    pub fn access_holders(&self, level_id: &str) -> Vec<String> {
        self.store().access.get(level_id).cloned().unwrap_or_default()
    }

    pub fn seed_history(&self, game_id: &str, count: usize) -> Vec<String> {
        let mut store = self.store();
        let mut ids = Vec::new();
        for i in 0..count {
            let id = store.next_id("history");
            let entry = HistoryEntry {
                id: id.clone(),
                session_id: format!("session-{}", i),
                level_id: "main-level".to_string(),
                level_type: "phoneme_practice".to_string(),
                subtype: Some("plosive".to_string()),
                is_custom: i % 2 == 1,
                name: format!("Session {}", i + 1),
                description: String::new(),
                start_time: Some(format!("2025-02-{:02}T10:00:00.000Z", (i % 28) + 1)),
                end_time: None,
                score: 50.0 + i as f64,
            };
            let stages = vec![
                StageOutcome {
                    number: 0,
                    target: "pa".to_string(),
                    description: String::new(),
                    image: String::new(),
                    attempts: Some(2),
                    attempt_values: Some(vec!["ba".to_string(), "pa".to_string()]),
                    passed: Some(true),
                },
                StageOutcome {
                    number: 1,
                    target: "ta".to_string(),
                    description: String::new(),
                    image: String::new(),
                    attempts: Some(3),
                    attempt_values: None,
                    passed: Some(false),
                },
            ];
            store
                .history
                .entry(game_id.to_string())
                .or_default()
                .push(HistoryDetails {
                    entry,
                    stage_info: Some(stages),
                });
            ids.push(id);
        }
        store.streaks.insert(
            game_id.to_string(),
            StreakSummary {
                current_streak: 3,
                longest_streak: 7,
                streak_start_date: Some("2025-02-01".to_string()),
                last_activity_date: Some("2025-02-03".to_string()),
                total_days_played: count as u32,
            },
        );
        ids
    }

    pub fn add_history(&self, game_id: &str, details: HistoryDetails) {
        self.store()
            .history
            .entry(game_id.to_string())
            .or_default()
            .push(details);
    }

    /// Next call to `path` answers with `status`
    pub fn fail_next(&self, path: &str, status: u16) {
        self.store().failures.insert(path.to_string(), Failure::Status(status));
    }

    /// Next call to `path` answers 200 with an `error` envelope
    pub fn reject_next(&self, path: &str, message: &str) {
        self.store()
            .failures
            .insert(path.to_string(), Failure::Rejected(message.to_string()));
    }

    /// Next call to `path` answers 200 with a body that fits no contract
    pub fn malformed_next(&self, path: &str) {
        self.store().failures.insert(path.to_string(), Failure::Malformed);
    }

    /// Hold responses for `page` (1-based) of `path`
    pub fn delay_page(&self, path: &str, page: usize, delay: Duration) {
        self.store().delays.insert((path.to_string(), page), delay);
    }

    pub fn requests(&self, path: &str) -> Vec<RecordedRequest> {
        self.store()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

/// Backend, signed-in session, notifier and view context in one place
pub struct Harness {
    pub backend: MockBackend,
    pub session: SessionContext,
    pub notifier: MemoryNotifier,
    pub views: ViewContext,
}

impl Harness {
    pub async fn signed_in() -> Result<Self> {
        Self::with_pagination(PaginationConfig::default()).await
    }

    pub async fn with_pagination(pagination: PaginationConfig) -> Result<Self> {
        let backend = MockBackend::start().await?;
        let session = backend.signed_in_session();
        let notifier = MemoryNotifier::new();
        let views = ViewContext::new(backend.client(&session), Arc::new(notifier.clone()), pagination);
        Ok(Self {
            backend,
            session,
            notifier,
            views,
        })
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.views.pagination.default_page_size = size;
        self
    }
}
