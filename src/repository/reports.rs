//! Reporting and dashboard queries on Repository

use chrono::NaiveDate;

use super::Repository;
use crate::{
    error::AppResult,
    models::report::{
        EquipmentCategoryCount, EquipmentLocationCount, EquipmentReportQuery, EquipmentReportRow,
        EquipmentStatusCount, MaintenanceKindCount, MaintenanceReportQuery, MaintenanceReportRow,
        MonthlyMaintenanceCost, TopProviderEntry,
    },
};

impl Repository {
    pub async fn report_equipment_rows(
        &self,
        query: &EquipmentReportQuery,
    ) -> AppResult<Vec<EquipmentReportRow>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.category_id.is_some() {
            conditions.push(format!("e.category_id = ${}", idx));
            idx += 1;
        }
        if query.location_id.is_some() {
            conditions.push(format!("e.current_location_id = ${}", idx));
            idx += 1;
        }
        if query.status.is_some() {
            conditions.push(format!("e.status = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            r#"
            SELECT
                e.asset_code, e.name, c.name AS category, e.brand, e.model,
                e.serial_number, e.status, l.building, l.department, e.assigned_to,
                e.purchase_date, e.purchase_price, e.warranty_end_date
            FROM equipment e
            LEFT JOIN equipment_categories c ON e.category_id = c.id
            LEFT JOIN locations l ON e.current_location_id = l.id
            {}
            ORDER BY e.asset_code
            "#,
            where_clause
        );

        let mut builder = sqlx::query_as::<_, EquipmentReportRow>(&sql);
        if let Some(category_id) = query.category_id {
            builder = builder.bind(category_id);
        }
        if let Some(location_id) = query.location_id {
            builder = builder.bind(location_id);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn report_maintenance_rows(
        &self,
        query: &MaintenanceReportQuery,
    ) -> AppResult<Vec<MaintenanceReportRow>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.from_date.is_some() {
            conditions.push(format!("m.performed_date >= ${}", idx));
            idx += 1;
        }
        if query.to_date.is_some() {
            conditions.push(format!("m.performed_date <= ${}", idx));
            idx += 1;
        }
        if query.equipment_id.is_some() {
            conditions.push(format!("m.equipment_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            r#"
            SELECT
                e.asset_code, e.name AS equipment_name, m.type, m.description,
                m.technician, m.scheduled_date, m.performed_date, m.cost, m.status
            FROM maintenance m
            LEFT JOIN equipment e ON m.equipment_id = e.id
            {}
            ORDER BY m.performed_date DESC NULLS LAST, m.id DESC
            "#,
            where_clause
        );

        let mut builder = sqlx::query_as::<_, MaintenanceReportRow>(&sql);
        if let Some(from_date) = query.from_date {
            builder = builder.bind(from_date);
        }
        if let Some(to_date) = query.to_date {
            builder = builder.bind(to_date);
        }
        if let Some(equipment_id) = query.equipment_id {
            builder = builder.bind(equipment_id);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    // Dashboard aggregates. Each is a separate query; the service layer merges
    // them and any failure aborts the whole response.

    pub async fn dashboard_total_equipment(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn dashboard_equipment_by_status(&self) -> AppResult<Vec<EquipmentStatusCount>> {
        let rows = sqlx::query_as::<_, EquipmentStatusCount>(
            "SELECT status, COUNT(id) AS count FROM equipment GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn dashboard_equipment_by_category(&self) -> AppResult<Vec<EquipmentCategoryCount>> {
        let rows = sqlx::query_as::<_, EquipmentCategoryCount>(
            r#"
            SELECT c.name AS category, COUNT(e.id) AS count
            FROM equipment e
            JOIN equipment_categories c ON e.category_id = c.id
            GROUP BY c.name
            ORDER BY count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn dashboard_equipment_by_location(&self) -> AppResult<Vec<EquipmentLocationCount>> {
        let rows = sqlx::query_as::<_, EquipmentLocationCount>(
            r#"
            SELECT l.building, l.department, COUNT(e.id) AS count
            FROM equipment e
            JOIN locations l ON e.current_location_id = l.id
            GROUP BY l.building, l.department
            ORDER BY count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Completed-work costs per month over the trailing twelve months
    pub async fn dashboard_costs_by_month(&self, since: NaiveDate) -> AppResult<Vec<MonthlyMaintenanceCost>> {
        let rows = sqlx::query_as::<_, MonthlyMaintenanceCost>(
            r#"
            SELECT
                TO_CHAR(performed_date, 'YYYY-MM') AS month,
                COALESCE(SUM(cost), 0) AS total_cost,
                COUNT(id) AS count
            FROM maintenance
            WHERE status = 'completed'
              AND performed_date IS NOT NULL
              AND performed_date >= $1
            GROUP BY TO_CHAR(performed_date, 'YYYY-MM')
            ORDER BY month
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn dashboard_maintenance_by_kind(&self) -> AppResult<Vec<MaintenanceKindCount>> {
        let rows = sqlx::query_as::<_, MaintenanceKindCount>(
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

    pub async fn dashboard_upcoming_count(&self, today: NaiveDate, horizon: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM maintenance
            WHERE status = 'scheduled' AND scheduled_date >= $1 AND scheduled_date <= $2
            "#,
        )
        .bind(today)
        .bind(horizon)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn dashboard_overdue_count(&self, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM maintenance WHERE status = 'scheduled' AND scheduled_date < $1",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn dashboard_top_providers(&self) -> AppResult<Vec<TopProviderEntry>> {
        let rows = sqlx::query_as::<_, TopProviderEntry>(
            r#"
            SELECT p.name, COUNT(c.id) AS contracts, COALESCE(SUM(c.amount), 0) AS total_amount
            FROM providers p
            JOIN contracts c ON c.provider_id = p.id
            WHERE p.is_active = TRUE
            GROUP BY p.name
            ORDER BY contracts DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
