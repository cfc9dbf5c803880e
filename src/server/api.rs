use crate::models::ask::AskRequest;
use axum::{
    extract::State,
    http::StatusCode,
    response::{ IntoResponse, Response },
    routing::post,
    Json,
    Router,
};
use governor::{ DefaultDirectRateLimiter, Quota, RateLimiter };
use log::{ error, info, warn };
use serde_json::{ json, Value };
use std::num::NonZeroU32;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::ServeDir;

pub const NOT_CONFIGURED_ERROR: &str = "Answering service is not configured.";
pub const UPSTREAM_ERROR: &str = "Internal server error. Check the answering service settings.";

#[derive(Clone)]
pub struct AppState {
    http: reqwest::Client,
    answer_url: Option<String>,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl AppState {
    pub fn new(answer_url: Option<String>, ask_rate_per_second: u32) -> Self {
        let rate = NonZeroU32::new(ask_rate_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            http: reqwest::Client::new(),
            answer_url: answer_url
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate))),
        }
    }
}

pub fn router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ask", post(ask_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

fn error_body(error: &str, detail: impl Into<String>) -> Json<Value> {
    Json(json!({ "error": error, "detail": detail.into() }))
}

/// Relays the widget's request upstream and hands back whatever JSON comes
/// back. Failures are reported in the widget's `{ error, detail }` shape.
async fn ask_handler(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Response {
    if state.limiter.check().is_err() {
        warn!("/ask rate limit exceeded");
        return (StatusCode::TOO_MANY_REQUESTS, Json(json!({ "error": "Too many requests" }))).into_response();
    }

    info!("Received query: {}", req.query);

    let Some(base) = state.answer_url.as_deref() else {
        warn!("/ask called but no answering service is configured");
        return (StatusCode::OK, error_body(NOT_CONFIGURED_ERROR, "ANSWER_URL is not set")).into_response();
    };

    let upstream = match state.http.post(format!("{}/ask", base)).json(&req).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Answering service request failed: {}", e);
            return (StatusCode::OK, error_body(UPSTREAM_ERROR, e.to_string())).into_response();
        }
    };

    let status = upstream.status();
    match upstream.json::<Value>().await {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => {
            error!("Answering service returned an unreadable body ({}): {}", status, e);
            (StatusCode::OK, error_body(UPSTREAM_ERROR, e.to_string())).into_response()
        }
    }
}
