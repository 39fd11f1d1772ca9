// Soil ERP - Web Server
// REST API over the receivable aging and project aggregation core

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use soil_erp::{
    group_by_project, load_config_with_fallback, load_contracts_csv, load_receivables_csv,
    sort_rows, summarize_project, AgingEngine, ClassifiedReceivable, Config, ContractRecord,
    PortfolioTotals, ProjectColumn, ProjectSummary, ReceivableColumn, ReceivableRecord,
    ReceivableStats, SortDirection, SortState,
};

/// Records as last fetched from the exports
#[derive(Default)]
struct Dataset {
    receivables: Vec<ReceivableRecord>,
    contracts: Vec<ContractRecord>,
}

impl Dataset {
    fn load(config: &Config) -> anyhow::Result<Self> {
        Ok(Dataset {
            receivables: load_receivables_csv(&config.receivables_path)?,
            contracts: load_contracts_csv(&config.contracts_path)?,
        })
    }
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    data: Arc<RwLock<Dataset>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn api_error(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
        .into_response()
}

#[derive(Deserialize)]
struct ReceivableQuery {
    as_of: Option<NaiveDate>,
    sort: Option<ReceivableColumn>,
    dir: Option<SortDirection>,
}

#[derive(Deserialize)]
struct ProjectQuery {
    sort: Option<ProjectColumn>,
    dir: Option<SortDirection>,
}

#[derive(Serialize)]
struct ProjectListResponse {
    totals: PortfolioTotals,
    projects: Vec<ProjectSummary>,
}

fn engine_for(state: &AppState, as_of: Option<NaiveDate>) -> AgingEngine {
    AgingEngine::as_of(as_of.unwrap_or_else(|| state.config.reference_date_or_today()))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/receivables - Classified receivables
async fn get_receivables(
    State(state): State<AppState>,
    Query(query): Query<ReceivableQuery>,
) -> Response {
    let engine = engine_for(&state, query.as_of);
    let data = state.data.read().await;

    let mut rows: Vec<ClassifiedReceivable> = engine.classify_all(&data.receivables);
    if let Some(column) = query.sort {
        let direction = query.dir.unwrap_or(SortDirection::Ascending);
        sort_rows(&mut rows, &SortState::by(column, direction));
    }

    ApiResponse::ok(rows)
}

/// GET /api/receivables/stats - Collection totals
async fn get_receivable_stats(
    State(state): State<AppState>,
    Query(query): Query<ReceivableQuery>,
) -> Response {
    let engine = engine_for(&state, query.as_of);
    let data = state.data.read().await;

    let stats: ReceivableStats = engine.stats(&data.receivables);
    ApiResponse::ok(stats)
}

/// GET /api/projects - One summary per project
async fn get_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Response {
    let data = state.data.read().await;
    let groups = group_by_project(&data.contracts);

    let mut projects: Vec<ProjectSummary> = groups
        .groups
        .values()
        .filter_map(|group| summarize_project(group))
        .collect();

    if let Some(column) = query.sort {
        let direction = query.dir.unwrap_or(SortDirection::Ascending);
        sort_rows(&mut projects, &SortState::by(column, direction));
    }

    ApiResponse::ok(ProjectListResponse {
        totals: PortfolioTotals::from_groups(&groups),
        projects,
    })
}

/// GET /api/projects/:key - Single project with its members
///
/// `Path` has already percent-decoded the key; it is used as is.
async fn get_project(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let data = state.data.read().await;
    let groups = group_by_project(&data.contracts);

    match groups.get(key.trim()).and_then(summarize_project) {
        Some(summary) => ApiResponse::ok(summary),
        None => api_error(StatusCode::NOT_FOUND, format!("No project with key {}", key)),
    }
}

/// POST /api/reload - Re-read the CSV exports
async fn reload(State(state): State<AppState>) -> Response {
    match Dataset::load(&state.config) {
        Ok(fresh) => {
            let counts = (fresh.receivables.len(), fresh.contracts.len());
            *state.data.write().await = fresh;
            tracing::info!(receivables = counts.0, contracts = counts.1, "dataset reloaded");
            ApiResponse::ok(serde_json::json!({
                "receivables": counts.0,
                "contracts": counts.1,
            }))
        }
        Err(e) => {
            tracing::error!("reload failed: {:#}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
        }
    }
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/receivables", get(get_receivables))
        .route("/receivables/stats", get(get_receivable_stats))
        .route("/projects", get(get_projects))
        .route("/projects/:key", get(get_project))
        .route("/reload", post(reload))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soil_erp=info,soil_erp_server=info,tower_http=info".into()),
        )
        .init();

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = load_config_with_fallback(config_path.as_deref())?;

    // Start with an empty dataset when the exports are not there yet; POST /api/reload later
    let data = match Dataset::load(&config) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("starting without data: {:#}", e);
            Dataset::default()
        }
    };

    let addr = config.server_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        data: Arc::new(RwLock::new(data)),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server running on http://{}", addr);
    tracing::info!("   API: http://{}/api/receivables", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
