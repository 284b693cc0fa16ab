//! Provider and contract domain methods on Repository

use chrono::Utc;
use rust_decimal::Decimal;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::provider::{
        Contract, ContractQuery, CreateContract, CreateProvider, Provider, ProviderQuery,
        TopProvider, UpdateContract, UpdateProvider,
    },
};

impl Repository {
    // Providers

    pub async fn providers_ruc_exists(&self, ruc: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM providers WHERE ruc = $1")
            .bind(ruc)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn providers_create(&self, data: &CreateProvider) -> AppResult<Provider> {
        let row = sqlx::query_as::<_, Provider>(
            r#"
            INSERT INTO providers (name, ruc, contact_person, phone, email, address, website, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.ruc)
        .bind(&data.contact_person)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.address)
        .bind(&data.website)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn providers_list(&self, query: &ProviderQuery) -> AppResult<Vec<Provider>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.is_active.is_some() {
            conditions.push(format!("is_active = ${}", idx));
            idx += 1;
        }
        if query.search.is_some() {
            conditions.push(format!(
                "(name ILIKE ${0} OR ruc ILIKE ${0} OR contact_person ILIKE ${0})",
                idx
            ));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM providers {} ORDER BY id OFFSET ${} LIMIT ${}",
            where_clause,
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, Provider>(&sql);
        if let Some(is_active) = query.is_active {
            builder = builder.bind(is_active);
        }
        if let Some(ref search) = query.search {
            builder = builder.bind(format!("%{}%", search));
        }
        builder = builder
            .bind(query.skip.unwrap_or(0))
            .bind(query.limit.unwrap_or(100));

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn providers_get_by_id(&self, id: i32) -> AppResult<Provider> {
        sqlx::query_as::<_, Provider>("SELECT * FROM providers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))
    }

    pub async fn providers_update(&self, id: i32, data: &UpdateProvider) -> AppResult<Provider> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.ruc, "ruc");
        add_field!(data.contact_person, "contact_person");
        add_field!(data.phone, "phone");
        add_field!(data.email, "email");
        add_field!(data.address, "address");
        add_field!(data.website, "website");
        add_field!(data.is_active, "is_active");

        let query = format!(
            "UPDATE providers SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Provider>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.ruc);
        bind_field!(data.contact_person);
        bind_field!(data.phone);
        bind_field!(data.email);
        bind_field!(data.address);
        bind_field!(data.website);
        bind_field!(data.is_active);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))
    }

    /// Count of active contracts; deletion is refused while any exist
    pub async fn providers_active_contract_count(&self, provider_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contracts WHERE provider_id = $1 AND status = 'active'",
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn providers_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Provider not found".to_string()));
        }
        Ok(())
    }

    // Contracts

    pub async fn contracts_number_exists(&self, contract_number: &str) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE contract_number = $1")
                .bind(contract_number)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    pub async fn contracts_create(&self, data: &CreateContract) -> AppResult<Contract> {
        let row = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts
                (provider_id, contract_number, description, start_date, end_date, amount, attachment_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(data.provider_id)
        .bind(&data.contract_number)
        .bind(&data.description)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.amount)
        .bind(&data.attachment_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn contracts_list(&self, query: &ContractQuery) -> AppResult<Vec<Contract>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.provider_id.is_some() {
            conditions.push(format!("provider_id = ${}", idx));
            idx += 1;
        }
        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM contracts {} ORDER BY start_date DESC OFFSET ${} LIMIT ${}",
            where_clause,
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, Contract>(&sql);
        if let Some(provider_id) = query.provider_id {
            builder = builder.bind(provider_id);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        builder = builder
            .bind(query.skip.unwrap_or(0))
            .bind(query.limit.unwrap_or(100));

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn contracts_get_by_id(&self, id: i32) -> AppResult<Contract> {
        sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))
    }

    pub async fn contracts_for_provider(&self, provider_id: i32) -> AppResult<Vec<Contract>> {
        let rows = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE provider_id = $1 ORDER BY start_date DESC",
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn contracts_update(&self, id: i32, data: &UpdateContract) -> AppResult<Contract> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.description, "description");
        add_field!(data.end_date, "end_date");
        add_field!(data.amount, "amount");
        add_field!(data.status, "status");
        add_field!(data.attachment_url, "attachment_url");

        let query = format!(
            "UPDATE contracts SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Contract>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.description);
        bind_field!(data.end_date);
        bind_field!(data.amount);
        bind_field!(data.status);
        bind_field!(data.attachment_url);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))
    }

    pub async fn contracts_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contract not found".to_string()));
        }
        Ok(())
    }

    /// Sum of all contract amounts for one provider, NULL amounts counting as zero
    pub async fn contracts_total_amount(&self, provider_id: i32) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM contracts WHERE provider_id = $1",
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn providers_top_by_contracts(&self, limit: i64) -> AppResult<Vec<TopProvider>> {
        let rows = sqlx::query_as::<_, TopProvider>(
            r#"
            SELECT
                p.id AS provider_id,
                p.name AS provider_name,
                COUNT(c.id) AS contract_count,
                COALESCE(SUM(c.amount), 0) AS total_amount
            FROM providers p
            JOIN contracts c ON c.provider_id = p.id
            GROUP BY p.id, p.name
            ORDER BY contract_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
