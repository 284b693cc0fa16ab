//! Provider and contract models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Contract lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Expired,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Expired => "expired",
            ContractStatus::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ContractStatus::Active),
            "expired" => Ok(ContractStatus::Expired),
            "terminated" => Ok(ContractStatus::Terminated),
            _ => Err(format!("Invalid contract status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for ContractStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ContractStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ContractStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Provider {
    pub id: i32,
    pub name: String,
    /// Tax/registration identifier, unique when present
    pub ruc: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProvider {
    #[validate(length(min = 1, message = "Provider name is required"))]
    pub name: String,
    pub ruc: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProvider {
    pub name: Option<String>,
    pub ruc: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ProviderQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub is_active: Option<bool>,
    /// Substring match over name, ruc and contact person
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Contract {
    pub id: i32,
    pub provider_id: i32,
    pub contract_number: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub status: ContractStatus,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContract {
    pub provider_id: i32,
    #[validate(length(min = 1, message = "Contract number is required"))]
    pub contract_number: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContract {
    pub description: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub status: Option<ContractStatus>,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ContractQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub provider_id: Option<i32>,
    pub status: Option<ContractStatus>,
}

/// Provider detail including its contracts
#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderWithContracts {
    #[serde(flatten)]
    pub provider: Provider,
    pub contracts: Vec<Contract>,
}

/// Contract roll-up for a single provider
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseHistory {
    pub provider_id: i32,
    pub provider_name: String,
    pub total_contracts: i64,
    pub total_amount: Decimal,
    pub contracts: Vec<Contract>,
}

/// Providers ranked by contract count
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TopProvider {
    pub provider_id: i32,
    pub provider_name: String,
    pub contract_count: i64,
    pub total_amount: Decimal,
}
