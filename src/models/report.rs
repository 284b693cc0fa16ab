//! Report filters and dashboard statistics types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::equipment::EquipmentStatus;

/// Filters for the equipment inventory exports
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentReportQuery {
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub status: Option<EquipmentStatus>,
}

/// Filters for the maintenance history exports
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct MaintenanceReportQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub equipment_id: Option<i32>,
}

/// One joined row of the equipment inventory export
#[derive(Debug, FromRow)]
pub struct EquipmentReportRow {
    pub asset_code: String,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: String,
    pub building: Option<String>,
    pub department: Option<String>,
    pub assigned_to: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub warranty_end_date: Option<NaiveDate>,
}

/// One joined row of the maintenance history export
#[derive(Debug, FromRow)]
pub struct MaintenanceReportRow {
    pub asset_code: Option<String>,
    pub equipment_name: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub description: String,
    pub technician: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub performed_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub status: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct EquipmentStatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct EquipmentCategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct EquipmentLocationCount {
    pub building: String,
    pub department: Option<String>,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MonthlyMaintenanceCost {
    pub month: String,
    pub total_cost: Decimal,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MaintenanceKindCount {
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i64,
    pub total_cost: Decimal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TopProviderEntry {
    pub name: String,
    pub contracts: i64,
    pub total_amount: Decimal,
}

/// The dashboard aggregate: roughly ten independent queries merged into one
/// response. Any failing query aborts the whole response.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatistics {
    pub total_equipment: i64,
    pub equipment_by_status: Vec<EquipmentStatusCount>,
    pub equipment_by_category: Vec<EquipmentCategoryCount>,
    pub equipment_by_location: Vec<EquipmentLocationCount>,
    pub maintenance_costs_by_month: Vec<MonthlyMaintenanceCost>,
    pub maintenance_by_type: Vec<MaintenanceKindCount>,
    pub upcoming_maintenance_30_days: i64,
    pub overdue_maintenance: i64,
    pub top_providers: Vec<TopProviderEntry>,
}
