use crate::extract::{self, Reply, PARSE_FAILURE};
use crate::gemini::{GeminiClient, UpstreamError};
use crate::prompt;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub const NO_QUERY: &str = "No query provided";

#[derive(Clone)]
pub struct AppState {
    pub gemini: GeminiClient,
    pub validate_cards: bool,
}

/// Router with CORS and request tracing applied; what `main` serves.
pub fn app(state: AppState) -> Router {
    // Preflights are answered by the CORS layer with an empty 200. The two
    // overriding layers put the allow-lists on every response, comma-space
    // separated.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    routes(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // the relay answers on any path; OPTIONS is handled by the CORS layer
        .route("/", post(recommend))
        .route("/*path", post(recommend))
        .with_state(Arc::new(state))
}

// -------------------------------------------------------------------
// Recommend

async fn recommend(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let req: RecommendRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting unreadable request body");
        ApiError::bad_request(NO_QUERY)
    })?;

    let query = req.query.unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::bad_request(NO_QUERY));
    }
    let anchor = req.anchor.unwrap_or_default();
    let prefs = req.prefs.unwrap_or_default();

    tracing::info!(
        query_len = query.len(),
        has_anchor = !anchor.is_empty(),
        prefs = prefs.len(),
        "building recommendations"
    );

    let prompt = prompt::build_prompt(&query, &anchor, &prefs);
    let upstream = state.gemini.generate(&prompt).await?;

    let reply = extract::unwrap_reply(upstream.status, upstream.body, state.validate_cards);
    let response = match reply {
        Reply::Cards(value) => {
            tracing::info!("returning card deck");
            (StatusCode::OK, Json(value)).into_response()
        }
        Reply::Unparseable(raw) => {
            tracing::warn!(raw_len = raw.len(), "returning parse-failure envelope");
            let body = json!({ "error": PARSE_FAILURE, "raw": raw });
            (StatusCode::OK, Json(body)).into_response()
        }
        Reply::Passthrough { status, body } => {
            tracing::warn!(%status, "upstream reply had no generated text, passing through");
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        }
    };
    Ok(response)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// -------------------------------------------------------------------
// DTOs & errors

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: Option<String>,
    pub anchor: Option<String>,
    pub prefs: Option<Vec<String>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
    fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }
    fn internal(e: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        tracing::warn!(error = %err, "upstream call failed");
        ApiError::internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody { error: self.message });
        (self.status, body).into_response()
    }
}
