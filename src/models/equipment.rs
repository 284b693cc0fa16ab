//! Equipment, category and location models

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Equipment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Operational,
    InMaintenance,
    Broken,
    Retired,
    InStorage,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Operational => "operational",
            EquipmentStatus::InMaintenance => "in_maintenance",
            EquipmentStatus::Broken => "broken",
            EquipmentStatus::Retired => "retired",
            EquipmentStatus::InStorage => "in_storage",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operational" => Ok(EquipmentStatus::Operational),
            "in_maintenance" => Ok(EquipmentStatus::InMaintenance),
            "broken" => Ok(EquipmentStatus::Broken),
            "retired" => Ok(EquipmentStatus::Retired),
            "in_storage" => Ok(EquipmentStatus::InStorage),
            _ => Err(format!("Invalid equipment status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for EquipmentStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for EquipmentStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for EquipmentStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Warranty end is fixed at creation from the purchase date; it is never
/// recomputed on update.
pub fn warranty_end_date(purchase_date: Option<NaiveDate>, warranty_months: i32) -> Option<NaiveDate> {
    let months = u32::try_from(warranty_months).ok().filter(|m| *m > 0)?;
    purchase_date?.checked_add_months(Months::new(months))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Location {
    pub id: i32,
    pub building: String,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocation {
    #[validate(length(min = 1, message = "Building is required"))]
    pub building: String,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub asset_code: String,
    pub serial_number: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    /// Weak reference to the provider service, not enforced as a foreign key
    pub provider_id: Option<i32>,
    pub warranty_months: i32,
    pub warranty_end_date: Option<NaiveDate>,
    pub status: EquipmentStatus,
    pub current_location_id: Option<i32>,
    pub assigned_to: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Asset code is required"))]
    pub asset_code: String,
    pub serial_number: Option<String>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub provider_id: Option<i32>,
    #[serde(default = "default_warranty_months")]
    pub warranty_months: i32,
    pub current_location_id: Option<i32>,
    pub assigned_to: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
}

fn default_warranty_months() -> i32 {
    12
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEquipment {
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub assigned_to: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// Reassign equipment to a new location; appends one immutable history entry
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveEquipment {
    pub location_id: i32,
    pub assigned_to: Option<String>,
    pub move_date: NaiveDate,
    pub reason: Option<String>,
    pub moved_by: Option<i32>,
}

/// Equipment list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<EquipmentStatus>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    /// Substring match over name, asset code, serial number, brand and model
    pub search: Option<String>,
}

/// Location history entry joined with its location
#[derive(Debug, Clone, FromRow)]
pub struct LocationHistoryRow {
    pub id: i32,
    pub equipment_id: i32,
    pub assigned_to: Option<String>,
    pub move_date: NaiveDate,
    pub reason: Option<String>,
    pub moved_by: Option<i32>,
    pub location_id: i32,
    pub building: String,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub department: Option<String>,
    pub location_description: Option<String>,
    pub location_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationHistoryEntry {
    pub id: i32,
    pub equipment_id: i32,
    pub location: Location,
    pub assigned_to: Option<String>,
    pub move_date: NaiveDate,
    pub reason: Option<String>,
    pub moved_by: Option<i32>,
}

impl From<LocationHistoryRow> for LocationHistoryEntry {
    fn from(row: LocationHistoryRow) -> Self {
        LocationHistoryEntry {
            id: row.id,
            equipment_id: row.equipment_id,
            location: Location {
                id: row.location_id,
                building: row.building,
                floor: row.floor,
                room: row.room,
                department: row.department,
                description: row.location_description,
                created_at: row.location_created_at,
            },
            assigned_to: row.assigned_to,
            move_date: row.move_date,
            reason: row.reason,
            moved_by: row.moved_by,
        }
    }
}

/// Group-by count entries for the equipment stats endpoints
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: EquipmentStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct LocationCount {
    pub building: String,
    pub department: Option<String>,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warranty_end_adds_calendar_months() {
        let purchase = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            warranty_end_date(Some(purchase), 12),
            NaiveDate::from_ymd_opt(2025, 1, 15),
        );
    }

    #[test]
    fn warranty_end_clamps_to_month_end() {
        // 2024-01-31 + 1 month lands on the last day of February
        let purchase = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            warranty_end_date(Some(purchase), 1),
            NaiveDate::from_ymd_opt(2024, 2, 29),
        );
    }

    #[test]
    fn warranty_end_requires_purchase_date_and_positive_months() {
        assert_eq!(warranty_end_date(None, 12), None);
        let purchase = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(warranty_end_date(Some(purchase), 0), None);
        assert_eq!(warranty_end_date(Some(purchase), -3), None);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            EquipmentStatus::Operational,
            EquipmentStatus::InMaintenance,
            EquipmentStatus::Broken,
            EquipmentStatus::Retired,
            EquipmentStatus::InStorage,
        ] {
            assert_eq!(status.as_str().parse::<EquipmentStatus>().unwrap(), status);
        }
    }
}
