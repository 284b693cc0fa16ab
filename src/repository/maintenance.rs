//! Maintenance domain methods on Repository

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::maintenance::{
        CreateMaintenance, CreateMaintenanceType, EquipmentFrequency, KindStat, Maintenance,
        MaintenancePart, MaintenanceQuery, MaintenanceType, MonthlyCost, StatusStat,
        UpdateMaintenance,
    },
};

impl Repository {
    // Maintenance types

    pub async fn maintenance_types_name_exists(&self, name: &str) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_types WHERE name = $1")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    pub async fn maintenance_types_create(
        &self,
        data: &CreateMaintenanceType,
    ) -> AppResult<MaintenanceType> {
        let row = sqlx::query_as::<_, MaintenanceType>(
            "INSERT INTO maintenance_types (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn maintenance_types_list(&self) -> AppResult<Vec<MaintenanceType>> {
        let rows = sqlx::query_as::<_, MaintenanceType>(
            "SELECT * FROM maintenance_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn maintenance_types_get_by_id(&self, id: i32) -> AppResult<Option<MaintenanceType>> {
        let row =
            sqlx::query_as::<_, MaintenanceType>("SELECT * FROM maintenance_types WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    // Maintenance records

    /// Insert the record and all its parts in one transaction
    pub async fn maintenance_create(&self, data: &CreateMaintenance) -> AppResult<Maintenance> {
        let mut tx = self.pool.begin().await?;

        let maintenance = sqlx::query_as::<_, Maintenance>(
            r#"
            INSERT INTO maintenance (
                equipment_id, maintenance_type_id, type, scheduled_date, performed_date,
                technician, provider_id, description, diagnosis, solution, cost,
                next_maintenance_date, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.maintenance_type_id)
        .bind(data.kind)
        .bind(data.scheduled_date)
        .bind(data.performed_date)
        .bind(&data.technician)
        .bind(data.provider_id)
        .bind(&data.description)
        .bind(&data.diagnosis)
        .bind(&data.solution)
        .bind(data.cost)
        .bind(data.next_maintenance_date)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        for part in &data.parts {
            sqlx::query(
                r#"
                INSERT INTO maintenance_parts (maintenance_id, part_name, quantity, unit_cost, total_cost)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(maintenance.id)
            .bind(&part.part_name)
            .bind(part.quantity)
            .bind(part.unit_cost)
            .bind(part.total_cost)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(maintenance)
    }

    pub async fn maintenance_list(&self, query: &MaintenanceQuery) -> AppResult<Vec<Maintenance>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        macro_rules! add_filter {
            ($field:expr, $clause:expr) => {
                if $field.is_some() {
                    conditions.push(format!($clause, idx));
                    idx += 1;
                }
            };
        }

        add_filter!(query.equipment_id, "equipment_id = ${}");
        add_filter!(query.kind, "type = ${}");
        add_filter!(query.status, "status = ${}");
        add_filter!(query.from_date, "performed_date >= ${}");
        add_filter!(query.to_date, "performed_date <= ${}");

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM maintenance {} ORDER BY scheduled_date DESC NULLS LAST, id DESC OFFSET ${} LIMIT ${}",
            where_clause,
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, Maintenance>(&sql);
        if let Some(equipment_id) = query.equipment_id {
            builder = builder.bind(equipment_id);
        }
        if let Some(kind) = query.kind {
            builder = builder.bind(kind);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(from_date) = query.from_date {
            builder = builder.bind(from_date);
        }
        if let Some(to_date) = query.to_date {
            builder = builder.bind(to_date);
        }
        builder = builder
            .bind(query.skip.unwrap_or(0))
            .bind(query.limit.unwrap_or(100));

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn maintenance_get_by_id(&self, id: i32) -> AppResult<Maintenance> {
        sqlx::query_as::<_, Maintenance>("SELECT * FROM maintenance WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance record not found".to_string()))
    }

    pub async fn maintenance_parts_for(&self, maintenance_id: i32) -> AppResult<Vec<MaintenancePart>> {
        let rows = sqlx::query_as::<_, MaintenancePart>(
            "SELECT * FROM maintenance_parts WHERE maintenance_id = $1 ORDER BY id",
        )
        .bind(maintenance_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn maintenance_update(&self, id: i32, data: &UpdateMaintenance) -> AppResult<Maintenance> {
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

        add_field!(data.scheduled_date, "scheduled_date");
        add_field!(data.performed_date, "performed_date");
        add_field!(data.technician, "technician");
        add_field!(data.description, "description");
        add_field!(data.diagnosis, "diagnosis");
        add_field!(data.solution, "solution");
        add_field!(data.cost, "cost");
        add_field!(data.status, "status");
        add_field!(data.next_maintenance_date, "next_maintenance_date");

        let query = format!(
            "UPDATE maintenance SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Maintenance>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.scheduled_date);
        bind_field!(data.performed_date);
        bind_field!(data.technician);
        bind_field!(data.description);
        bind_field!(data.diagnosis);
        bind_field!(data.solution);
        bind_field!(data.cost);
        bind_field!(data.status);
        bind_field!(data.next_maintenance_date);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance record not found".to_string()))
    }

    pub async fn maintenance_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Maintenance record not found".to_string()));
        }
        Ok(())
    }

    pub async fn maintenance_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<Maintenance>> {
        let rows = sqlx::query_as::<_, Maintenance>(
            "SELECT * FROM maintenance WHERE equipment_id = $1 ORDER BY scheduled_date DESC NULLS LAST, id DESC",
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Earliest scheduled record still in the future for one piece of equipment
    pub async fn maintenance_next_for_equipment(
        &self,
        equipment_id: i32,
        today: NaiveDate,
    ) -> AppResult<Option<Maintenance>> {
        let row = sqlx::query_as::<_, Maintenance>(
            r#"
            SELECT * FROM maintenance
            WHERE equipment_id = $1 AND status = 'scheduled' AND scheduled_date >= $2
            ORDER BY scheduled_date ASC
            LIMIT 1
            "#,
        )
        .bind(equipment_id)
        .bind(today)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// All scheduled records; the service layer classifies them against a date
    pub async fn maintenance_scheduled(&self) -> AppResult<Vec<Maintenance>> {
        let rows = sqlx::query_as::<_, Maintenance>(
            r#"
            SELECT * FROM maintenance
            WHERE status = 'scheduled'
            ORDER BY scheduled_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Statistics

    pub async fn maintenance_stats_by_kind(&self) -> AppResult<Vec<KindStat>> {
        let rows = sqlx::query_as::<_, KindStat>(
            r#"
            SELECT type, COUNT(id) AS count, COALESCE(SUM(cost), 0) AS total_cost
            FROM maintenance
            GROUP BY type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn maintenance_stats_by_status(&self) -> AppResult<Vec<StatusStat>> {
        let rows = sqlx::query_as::<_, StatusStat>(
            "SELECT status, COUNT(id) AS count FROM maintenance GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Completed-work costs grouped by performed month of the given year
    pub async fn maintenance_costs_by_month(&self, year: i32) -> AppResult<Vec<MonthlyCost>> {
        let rows = sqlx::query_as::<_, MonthlyCost>(
            r#"
            SELECT
                TO_CHAR(performed_date, 'YYYY-MM') AS month,
                CAST(EXTRACT(MONTH FROM performed_date) AS INTEGER) AS month_number,
                COALESCE(SUM(cost), 0) AS total_cost,
                COUNT(id) AS count
            FROM maintenance
            WHERE status = 'completed'
              AND performed_date IS NOT NULL
              AND EXTRACT(YEAR FROM performed_date) = $1
            GROUP BY TO_CHAR(performed_date, 'YYYY-MM'), EXTRACT(MONTH FROM performed_date)
            ORDER BY month
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn maintenance_equipment_frequency(&self, limit: i64) -> AppResult<Vec<EquipmentFrequency>> {
        let rows = sqlx::query_as::<_, EquipmentFrequency>(
            r#"
            SELECT
                equipment_id,
                COUNT(id) AS maintenance_count,
                COALESCE(SUM(cost), 0) AS total_cost
            FROM maintenance
            GROUP BY equipment_id
            ORDER BY maintenance_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Total spent across all completed maintenance
    pub async fn maintenance_total_cost(&self) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(cost), 0) FROM maintenance WHERE status = 'completed'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
