//! HTTP routes over a shared session

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post, put}, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::core::paths::{routes, PRODUCT_NAME, PROJECT_URL};
use crate::error::Error;
use crate::poller::refresh_now;
use crate::rpc::{Balance, BalanceSource};
use crate::session::{self, SessionSnapshot, SharedSession};
use crate::wallet::Wallet;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    /// Without a source, balances are never fetched
    pub source: Option<Arc<dyn BalanceSource>>,
    pub app_name: String,
}

impl AppState {
    pub fn new(session: SharedSession, app_name: impl Into<String>) -> Self {
        Self { session, source: None, app_name: app_name.into() }
    }

    pub fn with_source(mut self, source: Arc<dyn BalanceSource>) -> Self {
        self.source = Some(source);
        self
    }
}

#[derive(Deserialize)]
struct PhraseRequest { phrase: String }

#[derive(Serialize)]
struct PhraseResponse { phrase: String, words: usize }

#[derive(Deserialize)]
struct SelectRequest { index: usize }

#[derive(Deserialize)]
struct FormRequest { open: bool }

#[derive(Deserialize)]
struct LimitRequest { limit: Option<u64> }

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletListResponse { wallets: Vec<Wallet>, selected_index: usize, count: usize }

#[derive(Serialize)]
struct CreateResponse { wallet: Wallet, balance: Option<Balance> }

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health))
        .route(routes::ABOUT, get(about))
        .route(routes::STATE, get(state_snapshot))
        .route(routes::PHRASE, post(generate_phrase).put(import_phrase))
        .route(routes::WALLETS, get(list_wallets).post(create_wallet))
        .route(routes::SELECTED, put(select_wallet))
        .route(routes::BALANCE, get(balance))
        .route(routes::TRANSACTION_FORM, put(set_transaction_form))
        .route(routes::LIMIT, put(set_limit))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn reject(e: Error) -> (StatusCode, String) {
    let status = match e {
        Error::InvalidPhrase(_) | Error::InvalidEntropy(_) | Error::WalletIndex { .. } => StatusCode::BAD_REQUEST,
        Error::NoSeedPhrase => StatusCode::CONFLICT,
        Error::Http(_) | Error::Rpc { .. } | Error::Quantity(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

async fn health(State(s): State<AppState>) -> impl IntoResponse {
    Json(json!({"status": "ok", "service": s.app_name}))
}

async fn about() -> impl IntoResponse {
    Json(json!({"name": PRODUCT_NAME, "github": PROJECT_URL}))
}

async fn state_snapshot(State(s): State<AppState>) -> ApiResult<SessionSnapshot> {
    let guard = session::read(&s.session).map_err(reject)?;
    Ok(Json(guard.snapshot()))
}

async fn generate_phrase(State(s): State<AppState>) -> ApiResult<PhraseResponse> {
    let mut guard = session::write(&s.session).map_err(reject)?;
    let phrase = guard.generate_seed_phrase().map_err(reject)?;
    Ok(Json(PhraseResponse { words: phrase.split_whitespace().count(), phrase }))
}

async fn import_phrase(State(s): State<AppState>, Json(req): Json<PhraseRequest>) -> ApiResult<PhraseResponse> {
    let mut guard = session::write(&s.session).map_err(reject)?;
    let phrase = guard.set_seed_phrase(&req.phrase).map_err(reject)?;
    Ok(Json(PhraseResponse { words: phrase.split_whitespace().count(), phrase }))
}

async fn list_wallets(State(s): State<AppState>) -> ApiResult<WalletListResponse> {
    let guard = session::read(&s.session).map_err(reject)?;
    let wallets = guard.wallets().to_vec();
    Ok(Json(WalletListResponse { count: wallets.len(), selected_index: guard.selected_index(), wallets }))
}

/// Create, then fetch the new account's balance right away.
///
/// Derivation (PBKDF2 seed stretching) and the file write run on the blocking pool.
async fn create_wallet(State(s): State<AppState>) -> Result<(StatusCode, Json<CreateResponse>), (StatusCode, String)> {
    let shared = s.session.clone();
    let created = tokio::task::spawn_blocking(move || -> crate::error::Result<Option<Wallet>> {
        let mut guard = session::write(&shared)?;
        guard.create_wallet_from_seed()
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("wallet task failed: {e}")))?;
    let wallet = created.map_err(reject)?.ok_or_else(|| reject(Error::NoSeedPhrase))?;

    let balance = match s.source.as_deref() {
        Some(source) => refresh_now(&s.session, source).await.unwrap_or_else(|e| {
            warn!(error = %e, "Error fetching balance");
            None
        }),
        None => None,
    };
    Ok((StatusCode::CREATED, Json(CreateResponse { wallet, balance })))
}

async fn select_wallet(State(s): State<AppState>, Json(req): Json<SelectRequest>) -> ApiResult<Wallet> {
    let mut guard = session::write(&s.session).map_err(reject)?;
    let wallet = guard.select_wallet(req.index).map_err(reject)?.clone();
    Ok(Json(wallet))
}

async fn balance(State(s): State<AppState>) -> ApiResult<Balance> {
    let guard = session::read(&s.session).map_err(reject)?;
    guard
        .balance()
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "no balance fetched yet".into()))
}

async fn set_transaction_form(State(s): State<AppState>, Json(req): Json<FormRequest>) -> ApiResult<serde_json::Value> {
    let mut guard = session::write(&s.session).map_err(reject)?;
    guard.set_transaction_form(req.open);
    Ok(Json(json!({"transactionFormOpen": guard.transaction_form_open()})))
}

async fn set_limit(State(s): State<AppState>, Json(req): Json<LimitRequest>) -> ApiResult<serde_json::Value> {
    let mut guard = session::write(&s.session).map_err(reject)?;
    guard.set_limit(req.limit);
    Ok(Json(json!({"limit": guard.limit()})))
}
