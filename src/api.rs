//! HTTP surface: check news, read history, aggregate statistics.
//!
//! Caller identity arrives as an opaque `x-user-id` header set by whatever
//! authenticates users upstream. The cross-user reads (`/all`, `/statistics`)
//! additionally require `x-user-role: admin` from the same upstream.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{request::Parts, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::analyze::{AnalysisRequest, CredibilityService};
use crate::error::ApiError;
use crate::history::{CheckRecord, CheckStats, CheckStore, InMemoryCheckStore, NewCheck};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";
pub const ANALYZER_HEADER: &str = "x-analyzer";
const ADMIN_ROLE: &str = "admin";
const MISSING_FIELDS: &str = "Title and description are required";

#[derive(Clone)]
pub struct AppState {
    pub service: CredibilityService,
    pub store: Arc<dyn CheckStore>,
}

impl AppState {
    pub fn new(service: CredibilityService) -> Self {
        Self {
            service,
            store: Arc::new(InMemoryCheckStore::default()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn CheckStore>) -> Self {
        self.store = store;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/news/check", post(check_news))
        .route("/api/news/history", get(history))
        .route("/api/news/all", get(all_checks))
        .route("/api/news/statistics", get(statistics))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Opaque caller identity from `x-user-id`.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Access denied".to_string()))?;
        Ok(UserId(value.to_string()))
    }
}

/// Caller whose upstream role is `admin`. Missing identity is 401, any
/// other role 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub String);

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let UserId(user) = UserId::from_request_parts(parts, state).await?;
        let is_admin = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|r| r.trim().eq_ignore_ascii_case(ADMIN_ROLE));
        if !is_admin {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

#[derive(Debug, Deserialize)]
struct CheckReq {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

async fn check_news(
    State(state): State<AppState>,
    UserId(user): UserId,
    body: Result<Json<CheckReq>, JsonRejection>,
) -> Result<Response, ApiError> {
    // Wrong content type, bad JSON and wrong field types all read as missing fields.
    let Json(body) = body.map_err(|e| {
        debug!(rejection = %e, "unparseable check body");
        ApiError::Validation(MISSING_FIELDS.to_string())
    })?;
    if body.title.trim().is_empty() || body.description.trim().is_empty() {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    }

    let req = AnalysisRequest::new(body.title, body.description);
    let checked = state.service.check_news(&req).await;
    state
        .store
        .append(NewCheck::from_result(user, &checked.result));

    let mut resp = Json(checked.result).into_response();
    resp.headers_mut()
        .insert(ANALYZER_HEADER, HeaderValue::from_static(checked.analyzer));
    Ok(resp)
}

async fn history(State(state): State<AppState>, UserId(user): UserId) -> Json<Vec<CheckRecord>> {
    Json(state.store.for_user(&user))
}

async fn all_checks(State(state): State<AppState>, _: AdminUser) -> Json<Vec<CheckRecord>> {
    Json(state.store.all())
}

async fn statistics(State(state): State<AppState>, _: AdminUser) -> Json<CheckStats> {
    Json(state.store.statistics())
}
