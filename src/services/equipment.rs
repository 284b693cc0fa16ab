//! Equipment, category and location service

use crate::{
    error::{AppError, AppResult},
    models::equipment::{
        CategoryCount, CreateCategory, CreateEquipment, CreateLocation, Equipment,
        EquipmentCategory, EquipmentQuery, Location, LocationCount, LocationHistoryEntry,
        MoveEquipment, StatusCount, UpdateEquipment,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Categories

    pub async fn create_category(&self, data: &CreateCategory) -> AppResult<EquipmentCategory> {
        if self.repository.categories_name_exists(&data.name).await? {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }
        self.repository.categories_create(data).await
    }

    pub async fn list_categories(&self, skip: i64, limit: i64) -> AppResult<Vec<EquipmentCategory>> {
        self.repository.categories_list(skip, limit).await
    }

    pub async fn get_category(&self, id: i32) -> AppResult<EquipmentCategory> {
        self.repository.categories_get_by_id(id).await
    }

    // Locations

    pub async fn create_location(&self, data: &CreateLocation) -> AppResult<Location> {
        self.repository.locations_create(data).await
    }

    pub async fn list_locations(&self, skip: i64, limit: i64) -> AppResult<Vec<Location>> {
        self.repository.locations_list(skip, limit).await
    }

    pub async fn get_location(&self, id: i32) -> AppResult<Location> {
        self.repository.locations_get_by_id(id).await
    }

    // Equipment

    pub async fn create_equipment(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        if self
            .repository
            .equipment_asset_code_exists(&data.asset_code)
            .await?
        {
            return Err(AppError::Conflict("Asset code already exists".to_string()));
        }
        self.repository.equipment_create(data).await
    }

    pub async fn list_equipment(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment_list(query).await
    }

    pub async fn get_equipment(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment_get_by_id(id).await
    }

    pub async fn update_equipment(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        self.repository.equipment_update(id, data).await
    }

    pub async fn delete_equipment(&self, id: i32) -> AppResult<()> {
        self.repository.equipment_delete(id).await
    }

    /// Relocate equipment; the target location must exist before anything is
    /// written.
    pub async fn move_equipment(&self, id: i32, data: &MoveEquipment) -> AppResult<Equipment> {
        self.repository.locations_get_by_id(data.location_id).await?;
        self.repository.equipment_move(id, data).await
    }

    pub async fn location_history(&self, id: i32) -> AppResult<Vec<LocationHistoryEntry>> {
        self.repository.equipment_get_by_id(id).await?;
        self.repository.equipment_history(id).await
    }

    // Statistics

    pub async fn stats_by_status(&self) -> AppResult<Vec<StatusCount>> {
        self.repository.equipment_stats_by_status().await
    }

    pub async fn stats_by_category(&self) -> AppResult<Vec<CategoryCount>> {
        self.repository.equipment_stats_by_category().await
    }

    pub async fn stats_by_location(&self) -> AppResult<Vec<LocationCount>> {
        self.repository.equipment_stats_by_location().await
    }
}
