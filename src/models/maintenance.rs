//! Maintenance models and read-time schedule classification

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Preventive vs corrective work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    Preventive,
    Corrective,
}

impl MaintenanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Preventive => "preventive",
            MaintenanceKind::Corrective => "corrective",
        }
    }
}

impl std::fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MaintenanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preventive" => Ok(MaintenanceKind::Preventive),
            "corrective" => Ok(MaintenanceKind::Corrective),
            _ => Err(format!("Invalid maintenance type: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for MaintenanceKind {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for MaintenanceKind {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for MaintenanceKind {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Persisted workflow status. "Overdue" and "upcoming" are derived at read
/// time from scheduled_date, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MaintenanceStatus::Scheduled),
            "in_progress" => Ok(MaintenanceStatus::InProgress),
            "completed" => Ok(MaintenanceStatus::Completed),
            "cancelled" => Ok(MaintenanceStatus::Cancelled),
            _ => Err(format!("Invalid maintenance status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for MaintenanceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for MaintenanceStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for MaintenanceStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// A scheduled record whose date has passed without completion
pub fn is_overdue(status: MaintenanceStatus, scheduled_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    status == MaintenanceStatus::Scheduled
        && scheduled_date.map(|d| d < today).unwrap_or(false)
}

/// A scheduled record falling within the next `days` days, today included
pub fn is_upcoming(
    status: MaintenanceStatus,
    scheduled_date: Option<NaiveDate>,
    today: NaiveDate,
    days: u64,
) -> bool {
    let Some(date) = scheduled_date else {
        return false;
    };
    let Some(horizon) = today.checked_add_days(Days::new(days)) else {
        return false;
    };
    status == MaintenanceStatus::Scheduled && date >= today && date <= horizon
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceType {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenanceType {
    #[validate(length(min = 1, message = "Type name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Maintenance {
    pub id: i32,
    /// Weak reference to the equipment service, not enforced as a foreign key
    pub equipment_id: i32,
    pub maintenance_type_id: Option<i32>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    pub scheduled_date: Option<NaiveDate>,
    pub performed_date: Option<NaiveDate>,
    pub technician: Option<String>,
    pub provider_id: Option<i32>,
    pub description: String,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub cost: Option<Decimal>,
    pub status: MaintenanceStatus,
    pub next_maintenance_date: Option<NaiveDate>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenancePart {
    pub id: i32,
    pub maintenance_id: i32,
    pub part_name: String,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenancePart {
    #[validate(length(min = 1, message = "Part name is required"))]
    pub part_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenance {
    pub equipment_id: i32,
    pub maintenance_type_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    pub scheduled_date: Option<NaiveDate>,
    pub performed_date: Option<NaiveDate>,
    pub technician: Option<String>,
    pub provider_id: Option<i32>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub cost: Option<Decimal>,
    pub next_maintenance_date: Option<NaiveDate>,
    #[serde(default)]
    pub parts: Vec<CreateMaintenancePart>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMaintenance {
    pub scheduled_date: Option<NaiveDate>,
    pub performed_date: Option<NaiveDate>,
    pub technician: Option<String>,
    pub description: Option<String>,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub cost: Option<Decimal>,
    pub status: Option<MaintenanceStatus>,
    pub next_maintenance_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct MaintenanceQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub equipment_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<MaintenanceKind>,
    pub status: Option<MaintenanceStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Maintenance record with its resolved type and parts
#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceDetail {
    #[serde(flatten)]
    pub maintenance: Maintenance,
    pub maintenance_type: Option<MaintenanceType>,
    pub parts: Vec<MaintenancePart>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct KindStat {
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    pub count: i64,
    pub total_cost: Decimal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StatusStat {
    pub status: MaintenanceStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MonthlyCost {
    pub month: String,
    pub month_number: i32,
    pub total_cost: Decimal,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct EquipmentFrequency {
    pub equipment_id: i32,
    pub maintenance_count: i64,
    pub total_cost: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overdue_is_scheduled_with_past_date() {
        let today = day(2024, 6, 15);
        assert!(is_overdue(
            MaintenanceStatus::Scheduled,
            Some(day(2024, 6, 14)),
            today
        ));
        // day granularity: today itself is not overdue
        assert!(!is_overdue(
            MaintenanceStatus::Scheduled,
            Some(today),
            today
        ));
        assert!(!is_overdue(
            MaintenanceStatus::Completed,
            Some(day(2024, 6, 1)),
            today
        ));
        assert!(!is_overdue(MaintenanceStatus::Scheduled, None, today));
    }

    #[test]
    fn upcoming_is_scheduled_within_the_window() {
        let today = day(2024, 6, 15);
        assert!(is_upcoming(
            MaintenanceStatus::Scheduled,
            Some(today),
            today,
            30
        ));
        assert!(is_upcoming(
            MaintenanceStatus::Scheduled,
            Some(day(2024, 7, 15)),
            today,
            30
        ));
        assert!(!is_upcoming(
            MaintenanceStatus::Scheduled,
            Some(day(2024, 7, 16)),
            today,
            30
        ));
        assert!(!is_upcoming(
            MaintenanceStatus::Scheduled,
            Some(day(2024, 6, 14)),
            today,
            30
        ));
        assert!(!is_upcoming(
            MaintenanceStatus::Cancelled,
            Some(day(2024, 6, 20)),
            today,
            30
        ));
    }

    #[test]
    fn overdue_and_upcoming_never_overlap() {
        let today = day(2024, 6, 15);
        for offset in -40i64..=40 {
            let date = today
                .checked_add_signed(chrono::Duration::days(offset))
                .unwrap();
            let overdue = is_overdue(MaintenanceStatus::Scheduled, Some(date), today);
            let upcoming = is_upcoming(MaintenanceStatus::Scheduled, Some(date), today, 30);
            assert!(!(overdue && upcoming), "overlap at offset {}", offset);
        }
    }
}
