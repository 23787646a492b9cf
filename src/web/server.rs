use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::editor::RuleChange;
use crate::catalog::store::{CatalogError, KnowledgeBase};
use crate::cli::ServeArgs;
use crate::core::types::Threshold;
use crate::matching::diagnosis::DiagnosisError;
use crate::utils::validation::{
    check_field_length, collect_symptom_ids, normalize_name, normalize_symptom_id, MAX_SELECTION,
};

/// Request body limit; every payload here is a handful of short strings
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared application state
pub struct AppState {
    pub kb: Mutex<KnowledgeBase>,
}

impl AppState {
    pub fn new(kb: KnowledgeBase) -> Arc<Self> {
        Arc::new(Self { kb: Mutex::new(kb) })
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

#[derive(Deserialize)]
pub struct AddSymptomRequest {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct SaveRuleRequest {
    pub name: String,
    pub symptom_ids: Vec<String>,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Deserialize)]
pub struct DiagnoseRequest {
    pub symptom_ids: Vec<String>,
    pub threshold: Option<f64>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, message, None)),
    )
        .into_response()
}

/// Map a knowledge base error onto an HTTP response
fn catalog_error_response(err: &CatalogError) -> Response {
    match err {
        CatalogError::Validation(msg) => error_response(StatusCode::BAD_REQUEST, "validation", msg),
        CatalogError::DuplicateId(_) => {
            error_response(StatusCode::CONFLICT, "duplicate_id", &err.to_string())
        }
        CatalogError::NotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "not_found", &err.to_string())
        }
        CatalogError::ReadError { .. }
        | CatalogError::MalformedData { .. }
        | CatalogError::Persistence { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(create_safe_error_response(
                "persistence",
                "The change was applied but could not be saved. Please try again.",
                Some(&err.to_string()),
            )),
        )
            .into_response(),
    }
}

fn diagnosis_error_response(err: &DiagnosisError) -> Response {
    match err {
        DiagnosisError::EmptySelection => {
            error_response(StatusCode::BAD_REQUEST, "empty_selection", &err.to_string())
        }
        DiagnosisError::NoRules => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, "no_rules", &err.to_string())
        }
    }
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the knowledge
/// base cannot be opened, or the server fails to start.
pub fn run(args: ServeArgs, data_dir: PathBuf) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, data_dir).await })
}

/// Create the application router with all routes and middleware configured.
///
/// Per-IP rate limiting needs the peer address and is added in `run_server`.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/symptoms", get(list_symptoms_handler).post(add_symptom_handler))
        .route("/api/symptoms/{id}", delete(delete_symptom_handler))
        .route("/api/rules", get(list_rules_handler).put(save_rule_handler))
        .route("/api/rules/{name}", delete(delete_rule_handler))
        .route("/api/diagnose", post(diagnose_handler))
        .route("/api/warnings", get(warnings_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                // Limit concurrent requests
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

async fn run_server(args: ServeArgs, data_dir: PathBuf) -> anyhow::Result<()> {
    let kb = KnowledgeBase::open(&data_dir)?;
    for warning in kb.warnings() {
        tracing::warn!("{warning}");
    }

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?;

    let app = create_router(AppState::new(kb)).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    });

    let addr = format!("{}:{}", args.address, args.port);
    println!(
        "Starting symptom-solver web server at http://{addr} (data: {})",
        data_dir.display()
    );

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

async fn list_symptoms_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let kb = state.kb.lock().await;
    let symptoms: Vec<serde_json::Value> = kb
        .symptoms()
        .iter()
        .enumerate()
        .map(|(position, s)| {
            serde_json::json!({
                "id": s.id,
                "name": s.name,
                "label": s.display_label(),
                "position": position,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": symptoms.len(),
        "symptoms": symptoms,
    }))
}

async fn add_symptom_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddSymptomRequest>,
) -> Response {
    let id = normalize_symptom_id(&req.id);
    let name = normalize_name(&req.name);
    for (field, value) in [("Symptom id", &id), ("Symptom name", &name)] {
        if let Some(msg) = check_field_length(field, value) {
            return error_response(StatusCode::BAD_REQUEST, "validation", &msg);
        }
    }

    let mut kb = state.kb.lock().await;
    match kb.add_symptom(&id, &name) {
        Ok(symptom) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": symptom.id,
                "name": symptom.name,
                "label": symptom.display_label(),
            })),
        )
            .into_response(),
        Err(e) => catalog_error_response(&e),
    }
}

async fn delete_symptom_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    // Existing ids compare exactly; only new ids are normalized
    let id = id.trim();
    let mut kb = state.kb.lock().await;
    match kb.delete_symptom(id) {
        Ok(removed) => Json(serde_json::json!({ "id": id, "removed": removed })).into_response(),
        Err(e) => catalog_error_response(&e),
    }
}

async fn list_rules_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let kb = state.kb.lock().await;
    let rules: Vec<serde_json::Value> = kb
        .rules()
        .iter()
        .map(|(name, ids)| {
            serde_json::json!({
                "name": name,
                "symptom_ids": ids,
                "symptom_names": kb.rule_symptom_names(name),
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": rules.len(),
        "rules": rules,
    }))
}

async fn save_rule_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRuleRequest>,
) -> Response {
    let name = normalize_name(&req.name);
    if let Some(msg) = check_field_length("Disease name", &name) {
        return error_response(StatusCode::BAD_REQUEST, "validation", &msg);
    }
    if req.symptom_ids.len() > MAX_SELECTION {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation",
            "Too many symptoms in one rule",
        );
    }
    let ids = collect_symptom_ids(req.symptom_ids.iter().map(String::as_str));

    let mut kb = state.kb.lock().await;
    match kb.save_rule(&name, ids, req.is_new) {
        Ok(change) => {
            let status = match change {
                RuleChange::Created => StatusCode::CREATED,
                RuleChange::Updated => StatusCode::OK,
            };
            let symptom_ids = kb.rule(&name).unwrap_or_default();
            (
                status,
                Json(serde_json::json!({
                    "name": name,
                    "symptom_ids": symptom_ids,
                    "created": change == RuleChange::Created,
                })),
            )
                .into_response()
        }
        Err(e) => catalog_error_response(&e),
    }
}

async fn delete_rule_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let mut kb = state.kb.lock().await;
    match kb.delete_disease(&name) {
        Ok(removed) => {
            Json(serde_json::json!({ "name": name, "removed": removed })).into_response()
        }
        Err(e) => catalog_error_response(&e),
    }
}

async fn diagnose_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DiagnoseRequest>,
) -> Response {
    let start_time = std::time::Instant::now();

    if req.symptom_ids.len() > MAX_SELECTION {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation",
            "Too many symptoms selected",
        );
    }
    let selected = collect_symptom_ids(req.symptom_ids.iter().map(String::as_str));
    let threshold = req.threshold.map_or_else(Threshold::default, Threshold::clamped);

    let kb = state.kb.lock().await;
    let diagnosis = match kb.diagnose(&selected, threshold) {
        Ok(diagnosis) => diagnosis,
        Err(e) => return diagnosis_error_response(&e),
    };

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time = start_time.elapsed().as_millis() as u64;

    Json(serde_json::json!({
        "threshold": threshold.value(),
        "selected_count": diagnosis.selected_count,
        "matched_count": diagnosis.matched_count(),
        "outcomes": diagnosis.outcomes,
        "processing_info": {
            "processing_time_ms": processing_time,
        }
    }))
    .into_response()
}

async fn warnings_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let kb = state.kb.lock().await;
    Json(serde_json::json!({ "warnings": kb.warnings() }))
}
