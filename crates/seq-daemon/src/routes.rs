//! Axum router and all HTTP handlers for seq-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use seq_schemas::SeqError;

use crate::{
    api_types::{
        ErrorResponse, HealthResponse, IssueBatchRequest, IssueRequest, ResetRequest,
        ResetResponse, UpdateConfigRequest,
    },
    state::AppState,
};

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/v1/health", get(health_check))
        .route("/v1/issue", post(issue))
        .route("/v1/issue-batch", post(issue_batch))
        .route("/v1/status/:prefix", get(status))
        .route("/v1/reset/:prefix", post(reset))
        .route("/v1/config/:prefix", get(get_config))
        .route("/v1/config/:prefix", put(update_config))
        .with_state(state)
}

/// Maps a `SeqError` onto its prescribed HTTP status code, plus a
/// machine-readable `kind` clients can match on without parsing the
/// message.
fn error_response(err: SeqError) -> Response {
    let (status, kind) = match &err {
        SeqError::UnknownPrefix(_) => (StatusCode::NOT_FOUND, "unknown_prefix"),
        SeqError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        SeqError::UnsafeReset { .. } => (StatusCode::CONFLICT, "unsafe_reset"),
        SeqError::Transient(_) => (StatusCode::SERVICE_UNAVAILABLE, "transient"),
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            kind: kind.to_string(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /healthz, /readyz
// ---------------------------------------------------------------------------

pub(crate) async fn healthz(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

/// Readiness additionally checks the audit store, unlike the liveness probe.
pub(crate) async fn readyz(State(st): State<Arc<AppState>>) -> Response {
    match seq_db::status(&st.pool).await {
        Ok(s) if s.ok && s.has_seq_config_table => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                service: st.build.service,
                version: st.build.version,
            }),
        )
            .into_response(),
        Ok(_) => error_response(SeqError::transient("audit store reachable but not migrated")),
        Err(e) => error_response(SeqError::transient(e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

/// `HealthCheck()`: component-level breakdown across counter store, audit
/// store, and queue, unlike `/readyz`'s single audit-store check.
pub(crate) async fn health_check(State(st): State<Arc<AppState>>) -> Response {
    match seq_issuer::health_check(&st.pool, st.counter.as_ref()).await {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/issue
// ---------------------------------------------------------------------------

pub(crate) async fn issue(
    State(st): State<Arc<AppState>>,
    Json(body): Json<IssueRequest>,
) -> Response {
    match st
        .issuer
        .issue(&body.prefix, &body.client_id, &body.generated_by, body.correlation_id)
        .await
    {
        Ok(issued) => (StatusCode::OK, Json(issued)).into_response(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/issue-batch
// ---------------------------------------------------------------------------

pub(crate) async fn issue_batch(
    State(st): State<Arc<AppState>>,
    Json(body): Json<IssueBatchRequest>,
) -> Response {
    if body.count == 0 || body.count > seq_schemas::MAX_BATCH {
        return error_response(SeqError::invalid(format!(
            "count must be in [1, {}]",
            seq_schemas::MAX_BATCH
        )));
    }
    match st
        .issuer
        .issue_batch(
            &body.prefix,
            body.count,
            &body.client_id,
            &body.generated_by,
            body.correlation_id,
        )
        .await
    {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/status/:prefix
// ---------------------------------------------------------------------------

pub(crate) async fn status(State(st): State<Arc<AppState>>, Path(prefix): Path<String>) -> Response {
    match seq_issuer::status(&st.pool, st.counter.as_ref(), &prefix).await {
        Ok(snap) => (StatusCode::OK, Json(snap)).into_response(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/reset/:prefix
// ---------------------------------------------------------------------------

pub(crate) async fn reset(
    State(st): State<Arc<AppState>>,
    Path(prefix): Path<String>,
    Json(body): Json<ResetRequest>,
) -> Response {
    match seq_issuer::reset(
        &st.pool,
        st.counter.as_ref(),
        &prefix,
        body.set_to,
        &body.reason,
        &body.admin_user,
        body.force,
    )
    .await
    {
        Ok((outcome, reset_id)) => (
            StatusCode::OK,
            Json(ResetResponse {
                old: outcome.old,
                new: outcome.new,
                reset_id,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/config/:prefix
// ---------------------------------------------------------------------------

pub(crate) async fn get_config(
    State(st): State<Arc<AppState>>,
    Path(prefix): Path<String>,
) -> Response {
    match seq_db::get_config(&st.pool, &prefix).await {
        Ok(Some(cfg)) => (StatusCode::OK, Json(cfg)).into_response(),
        Ok(None) => error_response(SeqError::UnknownPrefix(prefix)),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// PUT /v1/config/:prefix
// ---------------------------------------------------------------------------

pub(crate) async fn update_config(
    State(st): State<Arc<AppState>>,
    Path(prefix): Path<String>,
    Json(body): Json<UpdateConfigRequest>,
) -> Response {
    let patch = seq_db::ConfigPatch {
        padding_length: body.padding_length,
        format_template: body.format_template,
        reset_rule: body.reset_rule,
    };
    match seq_db::update_config(&st.pool, &prefix, patch, &body.admin_user, body.create_if_missing).await {
        Ok(cfg) => {
            st.issuer.invalidate_config(&prefix).await;
            (StatusCode::OK, Json(cfg)).into_response()
        }
        Err(e) => error_response(e),
    }
}
