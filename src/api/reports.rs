//! Report download and dashboard endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::report::{DashboardStatistics, EquipmentReportQuery, MaintenanceReportQuery},
};

use super::AuthenticatedUser;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Wrap rendered bytes as a download attachment with a timestamped filename
fn attachment(bytes: Vec<u8>, content_type: &str, stem: &str, extension: &str) -> Response {
    let filename = format!(
        "{}_{}.{}",
        stem,
        Utc::now().format("%Y%m%d_%H%M%S"),
        extension
    );
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Equipment inventory as a spreadsheet
#[utoipa::path(
    get,
    path = "/equipment/excel",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(EquipmentReportQuery),
    responses((status = 200, description = "Spreadsheet download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"))
)]
pub async fn equipment_excel(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentReportQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.equipment_excel(&query).await?;
    Ok(attachment(bytes, XLSX_CONTENT_TYPE, "equipment_report", "xlsx"))
}

/// Equipment inventory as a PDF
#[utoipa::path(
    get,
    path = "/equipment/pdf",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(EquipmentReportQuery),
    responses((status = 200, description = "PDF download", content_type = "application/pdf"))
)]
pub async fn equipment_pdf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentReportQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.equipment_pdf(&query).await?;
    Ok(attachment(bytes, PDF_CONTENT_TYPE, "equipment_report", "pdf"))
}

/// Maintenance history as a spreadsheet
#[utoipa::path(
    get,
    path = "/maintenance/excel",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(MaintenanceReportQuery),
    responses((status = 200, description = "Spreadsheet download", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"))
)]
pub async fn maintenance_excel(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<MaintenanceReportQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.maintenance_excel(&query).await?;
    Ok(attachment(bytes, XLSX_CONTENT_TYPE, "maintenance_report", "xlsx"))
}

/// Maintenance history as a PDF
#[utoipa::path(
    get,
    path = "/maintenance/pdf",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(MaintenanceReportQuery),
    responses((status = 200, description = "PDF download", content_type = "application/pdf"))
)]
pub async fn maintenance_pdf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<MaintenanceReportQuery>,
) -> AppResult<Response> {
    let bytes = state.services.reports.maintenance_pdf(&query).await?;
    Ok(attachment(bytes, PDF_CONTENT_TYPE, "maintenance_report", "pdf"))
}

/// Dashboard aggregates
#[utoipa::path(
    get,
    path = "/dashboard/statistics",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Dashboard statistics", body = DashboardStatistics))
)]
pub async fn dashboard_statistics(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStatistics>> {
    let stats = state.services.reports.dashboard_statistics().await?;
    Ok(Json(stats))
}
