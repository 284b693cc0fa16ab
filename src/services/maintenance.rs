//! Maintenance service

use chrono::{Days, Utc};

use crate::{
    error::{AppError, AppResult},
    models::maintenance::{
        is_overdue, is_upcoming, CreateMaintenance, CreateMaintenanceType, EquipmentFrequency,
        KindStat, Maintenance, MaintenanceDetail, MaintenanceQuery, MaintenanceType, MonthlyCost,
        StatusStat, UpdateMaintenance,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Types

    pub async fn create_type(&self, data: &CreateMaintenanceType) -> AppResult<MaintenanceType> {
        if self
            .repository
            .maintenance_types_name_exists(&data.name)
            .await?
        {
            return Err(AppError::Conflict(
                "Maintenance type already exists".to_string(),
            ));
        }
        self.repository.maintenance_types_create(data).await
    }

    pub async fn list_types(&self) -> AppResult<Vec<MaintenanceType>> {
        self.repository.maintenance_types_list().await
    }

    // Records

    pub async fn create(&self, data: &CreateMaintenance) -> AppResult<Maintenance> {
        self.repository.maintenance_create(data).await
    }

    pub async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<Maintenance>> {
        self.repository.maintenance_list(query).await
    }

    /// Record with its resolved type and parts
    pub async fn get_detail(&self, id: i32) -> AppResult<MaintenanceDetail> {
        let maintenance = self.repository.maintenance_get_by_id(id).await?;
        let maintenance_type = match maintenance.maintenance_type_id {
            Some(type_id) => self.repository.maintenance_types_get_by_id(type_id).await?,
            None => None,
        };
        let parts = self.repository.maintenance_parts_for(id).await?;
        Ok(MaintenanceDetail {
            maintenance,
            maintenance_type,
            parts,
        })
    }

    pub async fn update(&self, id: i32, data: &UpdateMaintenance) -> AppResult<Maintenance> {
        self.repository.maintenance_update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.maintenance_delete(id).await
    }

    pub async fn history_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<Maintenance>> {
        self.repository.maintenance_for_equipment(equipment_id).await
    }

    pub async fn next_for_equipment(&self, equipment_id: i32) -> AppResult<Option<Maintenance>> {
        let today = Utc::now().date_naive();
        self.repository
            .maintenance_next_for_equipment(equipment_id, today)
            .await
    }

    /// Scheduled records within [today, today + days]
    pub async fn upcoming(&self, days: u64) -> AppResult<Vec<Maintenance>> {
        let today = Utc::now().date_naive();
        if today.checked_add_days(Days::new(days)).is_none() {
            return Err(AppError::BadRequest("Window too large".to_string()));
        }
        let scheduled = self.repository.maintenance_scheduled().await?;
        Ok(scheduled
            .into_iter()
            .filter(|r| is_upcoming(r.status, r.scheduled_date, today, days))
            .collect())
    }

    /// Scheduled records whose date has passed
    pub async fn overdue(&self) -> AppResult<Vec<Maintenance>> {
        let today = Utc::now().date_naive();
        let scheduled = self.repository.maintenance_scheduled().await?;
        Ok(scheduled
            .into_iter()
            .filter(|r| is_overdue(r.status, r.scheduled_date, today))
            .collect())
    }

    // Statistics

    pub async fn stats_by_kind(&self) -> AppResult<Vec<KindStat>> {
        self.repository.maintenance_stats_by_kind().await
    }

    pub async fn stats_by_status(&self) -> AppResult<Vec<StatusStat>> {
        self.repository.maintenance_stats_by_status().await
    }

    pub async fn costs_by_month(&self, year: i32) -> AppResult<Vec<MonthlyCost>> {
        self.repository.maintenance_costs_by_month(year).await
    }

    pub async fn equipment_frequency(&self, limit: i64) -> AppResult<Vec<EquipmentFrequency>> {
        self.repository.maintenance_equipment_frequency(limit).await
    }
}
