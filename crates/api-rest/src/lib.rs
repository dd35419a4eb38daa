//! # API REST
//!
//! REST API implementation for the mammography triage worklist.
//!
//! Handles:
//! - HTTP endpoints with axum (worklist, case review, intake, archive)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, multipart upload)
//!
//! Domain logic lives in `triage-core`; the outbound call to the
//! report-generation service lives in `report-gateway`.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod health;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use report_gateway::ReportClient;
use triage_core::error::QueueError;
use triage_core::intake::{NewCase, ScanSubmission, SelectedScan};
use triage_core::store::QueueService;

use crate::dto::{
    ArchiveRes, ArchiveScanRes, CaseRes, CompleteCaseRes, ConfirmCaseReq, GenerateReportForm,
    GenerateReportRes, QueueStatsRes, WorklistRes, WorklistRow,
};
use crate::health::{HealthRes, HealthService};

/// Upload ceiling for scan files (the dialog advertises 500 MB).
const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Application state shared across REST API handlers.
///
/// Contains the queue store and the report-service client; both are
/// constructed once at startup and shared via `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<QueueService>,
    pub reports: Arc<ReportClient>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        worklist,
        queue_stats,
        archive,
        get_case,
        complete_case,
        generate_report,
        confirm_case,
    ),
    components(schemas(
        HealthRes,
        WorklistRes,
        WorklistRow,
        QueueStatsRes,
        ArchiveRes,
        ArchiveScanRes,
        CaseRes,
        CompleteCaseRes,
        GenerateReportRes,
        GenerateReportForm,
        ConfirmCaseReq,
    ))
)]
struct ApiDoc;

/// Builds the REST application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/worklist", get(worklist))
        .route("/queue/stats", get(queue_stats))
        .route("/archive", get(archive))
        .route("/cases", post(confirm_case))
        .route("/cases/:id", get(get_case))
        .route("/cases/:id/complete", post(complete_case))
        .route("/reports", post(generate_report))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the REST API on the given address until the process exits.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[derive(Debug, Deserialize)]
struct WorklistQuery {
    search: Option<String>,
    page: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/worklist",
    params(
        ("search" = Option<String>, Query, description = "Case identifier substring filter, case-insensitive"),
        ("page" = Option<usize>, Query, description = "Zero-based page; clamped into range")
    ),
    responses(
        (status = 200, description = "One page of the prioritised worklist", body = WorklistRes)
    )
)]
/// The prioritised worklist
///
/// Returns one page of the queue as presented: ordered by urgency with the
/// single in-progress slot assigned, filtered by the identifier substring,
/// and paginated at a fixed page size. The page is recomputed from the
/// store on every request.
#[axum::debug_handler]
async fn worklist(
    State(state): State<AppState>,
    Query(query): Query<WorklistQuery>,
) -> Json<WorklistRes> {
    let page = triage_core::worklist::page(
        state.queue.list(),
        query.search.as_deref().unwrap_or(""),
        query.page.unwrap_or(0),
    );
    Json(page.into())
}

#[utoipa::path(
    get,
    path = "/queue/stats",
    responses(
        (status = 200, description = "Pending and completed counts", body = QueueStatsRes)
    )
)]
/// Dashboard stat card counts
#[axum::debug_handler]
async fn queue_stats(State(state): State<AppState>) -> Json<QueueStatsRes> {
    Json(state.queue.stats().into())
}

#[utoipa::path(
    get,
    path = "/archive",
    responses(
        (status = 200, description = "All cases carrying a scan image", body = ArchiveRes)
    )
)]
/// The scan archive grid
///
/// Lists every queued case that carries a scan image, in presented order.
#[axum::debug_handler]
async fn archive(State(state): State<AppState>) -> Json<ArchiveRes> {
    let scans = state
        .queue
        .list()
        .into_iter()
        .filter_map(|case| {
            case.image_url.clone().map(|image_url| ArchiveScanRes {
                case_id: case.case_id.to_string(),
                sex: case.sex.clone(),
                age: case.age,
                time_added: case.time_added.clone(),
                image_url,
            })
        })
        .collect();
    Json(ArchiveRes { scans })
}

#[utoipa::path(
    get,
    path = "/cases/{id}",
    params(
        ("id" = String, Path, description = "Case identifier")
    ),
    responses(
        (status = 200, description = "Case detail for review", body = CaseRes),
        (status = 404, description = "Unknown case identifier")
    )
)]
/// Case review detail
///
/// Read-only view of one case as presented: demographics, scan image,
/// urgency assessment and the generated report.
#[axum::debug_handler]
async fn get_case(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<CaseRes>, (StatusCode, String)> {
    match state.queue.get(&id) {
        Some(case) => Ok(Json(CaseRes::from_case(&case))),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("no queued case with identifier '{id}'"),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/cases/{id}/complete",
    params(
        ("id" = String, Path, description = "Case identifier")
    ),
    responses(
        (status = 200, description = "Case marked complete", body = CompleteCaseRes),
        (status = 404, description = "Unknown case identifier")
    )
)]
/// Completes a case review
///
/// Marks the case complete and clears its urgency score. Completing an
/// already-complete case succeeds again (the operation is idempotent).
#[axum::debug_handler]
async fn complete_case(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<CompleteCaseRes>, (StatusCode, String)> {
    match state.queue.mark_complete(&id) {
        Ok(()) => Ok(Json(CompleteCaseRes { success: true })),
        Err(QueueError::CaseNotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            format!("no queued case with identifier '{id}'"),
        )),
        Err(e) => {
            tracing::error!("Mark complete error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/reports",
    request_body(content = GenerateReportForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated report and urgency score", body = GenerateReportRes),
        (status = 400, description = "Missing image part or malformed body"),
        (status = 502, description = "Report service failure, message surfaced from the service")
    )
)]
/// Generates a report for an uploaded scan
///
/// Forwards the scan (and optional clinical notes) to the external
/// report-generation service and returns the generated report text with
/// its urgency score. Nothing is queued until the report is confirmed via
/// `POST /cases`.
#[axum::debug_handler]
async fn generate_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateReportRes>, (StatusCode, String)> {
    let mut scan: Option<SelectedScan> = None;
    let mut notes: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("scan").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("failed to read image part: {e}"))
                })?;
                scan = Some(SelectedScan {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "notes" => {
                let text = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("failed to read notes part: {e}"))
                })?;
                notes = non_blank(Some(text));
            }
            other => {
                tracing::debug!(field = other, "ignoring unexpected multipart field");
            }
        }
    }

    let scan = scan.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "an image part is required".to_string(),
        )
    })?;

    match state.reports.submit(ScanSubmission { scan, notes }).await {
        Ok(draft) => Ok(Json(GenerateReportRes {
            report: draft.report,
            urgency_score: draft.urgency_score,
        })),
        Err(e) => {
            tracing::error!("Report generation error: {:?}", e);
            Err((StatusCode::BAD_GATEWAY, e.surface_message()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/cases",
    request_body = ConfirmCaseReq,
    responses(
        (status = 201, description = "Case queued", body = CaseRes),
        (status = 400, description = "Malformed date of birth"),
        (status = 409, description = "Duplicate case identifier")
    )
)]
/// Confirms a generated report into the queue
///
/// Appends exactly one new pending case: a blank identifier gets a
/// generated placeholder, the age is derived from the date of birth, and
/// the severity band is classified from the score and frozen.
#[axum::debug_handler]
async fn confirm_case(
    State(state): State<AppState>,
    Json(req): Json<ConfirmCaseReq>,
) -> Result<(StatusCode, Json<CaseRes>), (StatusCode, String)> {
    let date_of_birth = match non_blank(req.date_of_birth) {
        Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                "date_of_birth must be an ISO date (YYYY-MM-DD)".to_string(),
            )
        })?),
        None => None,
    };

    let case = NewCase {
        patient_id: non_blank(req.patient_id),
        patient_name: non_blank(req.patient_name),
        date_of_birth,
        report: req.report,
        urgency_score: req.urgency_score,
        image_data_uri: req.image_data_uri,
    }
    .into_case(Local::now());

    let case_id = case.case_id.to_string();
    match state.queue.append(case) {
        Ok(()) => {
            let stored = state.queue.get(&case_id).ok_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            })?;
            Ok((StatusCode::CREATED, Json(CaseRes::from_case(&stored))))
        }
        Err(QueueError::DuplicateCaseId(id)) => Err((
            StatusCode::CONFLICT,
            format!("a case with identifier '{id}' is already queued"),
        )),
        Err(e) => {
            tracing::error!("Queue append error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into()))
        }
    }
}

fn non_blank(input: Option<String>) -> Option<String> {
    input.and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}
