//! Equipment domain methods on Repository

use chrono::Utc;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{
        CategoryCount, CreateCategory, CreateEquipment, CreateLocation, Equipment,
        EquipmentCategory, EquipmentQuery, Location, LocationCount, LocationHistoryEntry,
        LocationHistoryRow, MoveEquipment, StatusCount, UpdateEquipment, warranty_end_date,
    },
};

impl Repository {
    // Categories

    pub async fn categories_create(&self, data: &CreateCategory) -> AppResult<EquipmentCategory> {
        let row = sqlx::query_as::<_, EquipmentCategory>(
            "INSERT INTO equipment_categories (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn categories_list(&self, skip: i64, limit: i64) -> AppResult<Vec<EquipmentCategory>> {
        let rows = sqlx::query_as::<_, EquipmentCategory>(
            "SELECT * FROM equipment_categories ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn categories_get_by_id(&self, id: i32) -> AppResult<EquipmentCategory> {
        sqlx::query_as::<_, EquipmentCategory>("SELECT * FROM equipment_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn categories_name_exists(&self, name: &str) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM equipment_categories WHERE name = $1")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    // Locations

    pub async fn locations_create(&self, data: &CreateLocation) -> AppResult<Location> {
        let row = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (building, floor, room, department, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.building)
        .bind(&data.floor)
        .bind(&data.room)
        .bind(&data.department)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn locations_list(&self, skip: i64, limit: i64) -> AppResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn locations_get_by_id(&self, id: i32) -> AppResult<Location> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Location not found".to_string()))
    }

    // Equipment

    pub async fn equipment_asset_code_exists(&self, asset_code: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment WHERE asset_code = $1")
            .bind(asset_code)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Insert the equipment record; when an initial location is given the
    /// first history entry is written in the same transaction.
    pub async fn equipment_create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let warranty_end = warranty_end_date(data.purchase_date, data.warranty_months);

        let mut tx = self.pool.begin().await?;

        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                asset_code, serial_number, name, description, category_id, brand, model,
                purchase_date, purchase_price, provider_id, warranty_months,
                warranty_end_date, current_location_id, assigned_to, specifications,
                notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&data.asset_code)
        .bind(&data.serial_number)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.category_id)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(data.purchase_date)
        .bind(data.purchase_price)
        .bind(data.provider_id)
        .bind(data.warranty_months)
        .bind(warranty_end)
        .bind(data.current_location_id)
        .bind(&data.assigned_to)
        .bind(&data.specifications)
        .bind(&data.notes)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(location_id) = data.current_location_id {
            sqlx::query(
                r#"
                INSERT INTO equipment_location_history
                    (equipment_id, location_id, assigned_to, move_date, reason, moved_by)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(equipment.id)
            .bind(location_id)
            .bind(&data.assigned_to)
            .bind(Utc::now().date_naive())
            .bind("Initial registration")
            .bind(data.created_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(equipment)
    }

    pub async fn equipment_list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
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

        add_filter!(query.status, "status = ${}");
        add_filter!(query.category_id, "category_id = ${}");
        add_filter!(query.location_id, "current_location_id = ${}");
        add_filter!(
            query.search,
            "(name ILIKE ${0} OR asset_code ILIKE ${0} OR serial_number ILIKE ${0} \
             OR brand ILIKE ${0} OR model ILIKE ${0})"
        );

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM equipment {} ORDER BY id OFFSET ${} LIMIT ${}",
            where_clause,
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&sql);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(category_id) = query.category_id {
            builder = builder.bind(category_id);
        }
        if let Some(location_id) = query.location_id {
            builder = builder.bind(location_id);
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

    pub async fn equipment_get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))
    }

    pub async fn equipment_update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
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

        add_field!(data.serial_number, "serial_number");
        add_field!(data.name, "name");
        add_field!(data.description, "description");
        add_field!(data.category_id, "category_id");
        add_field!(data.brand, "brand");
        add_field!(data.model, "model");
        add_field!(data.status, "status");
        add_field!(data.assigned_to, "assigned_to");
        add_field!(data.specifications, "specifications");
        add_field!(data.notes, "notes");

        let query = format!(
            "UPDATE equipment SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.serial_number);
        bind_field!(data.name);
        bind_field!(data.description);
        bind_field!(data.category_id);
        bind_field!(data.brand);
        bind_field!(data.model);
        bind_field!(data.status);
        bind_field!(data.assigned_to);
        bind_field!(data.specifications);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))
    }

    pub async fn equipment_delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM equipment_location_history WHERE equipment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Equipment not found".to_string()));
        }
        tx.commit().await?;
        Ok(())
    }

    /// Update the current location pointer and append the history entry in a
    /// single transaction: both become visible together or not at all.
    pub async fn equipment_move(&self, id: i32, data: &MoveEquipment) -> AppResult<Equipment> {
        let mut tx = self.pool.begin().await?;

        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET current_location_id = $1, assigned_to = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(data.location_id)
        .bind(&data.assigned_to)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO equipment_location_history
                (equipment_id, location_id, assigned_to, move_date, reason, moved_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(data.location_id)
        .bind(&data.assigned_to)
        .bind(data.move_date)
        .bind(&data.reason)
        .bind(data.moved_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(equipment)
    }

    pub async fn equipment_history(&self, equipment_id: i32) -> AppResult<Vec<LocationHistoryEntry>> {
        let rows = sqlx::query_as::<_, LocationHistoryRow>(
            r#"
            SELECT
                h.id, h.equipment_id, h.assigned_to, h.move_date, h.reason, h.moved_by,
                l.id AS location_id, l.building, l.floor, l.room, l.department,
                l.description AS location_description, l.created_at AS location_created_at
            FROM equipment_location_history h
            JOIN locations l ON l.id = h.location_id
            WHERE h.equipment_id = $1
            ORDER BY h.move_date DESC, h.id DESC
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(LocationHistoryEntry::from).collect())
    }

    // Statistics

    pub async fn equipment_stats_by_status(&self) -> AppResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(id) AS count FROM equipment GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn equipment_stats_by_category(&self) -> AppResult<Vec<CategoryCount>> {
        let rows = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT c.name AS category, COUNT(e.id) AS count
            FROM equipment e
            JOIN equipment_categories c ON e.category_id = c.id
            GROUP BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn equipment_stats_by_location(&self) -> AppResult<Vec<LocationCount>> {
        let rows = sqlx::query_as::<_, LocationCount>(
            r#"
            SELECT l.building, l.department, COUNT(e.id) AS count
            FROM equipment e
            JOIN locations l ON e.current_location_id = l.id
            GROUP BY l.building, l.department
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
