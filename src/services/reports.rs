//! Report generation and dashboard statistics service

use chrono::{Days, Months, Utc};

use crate::{
    error::AppResult,
    export::{self, ReportTable},
    models::report::{
        DashboardStatistics, EquipmentReportQuery, EquipmentReportRow, MaintenanceReportQuery,
        MaintenanceReportRow,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

const EQUIPMENT_HEADERS: &[&str] = &[
    "Asset Code",
    "Name",
    "Category",
    "Brand",
    "Model",
    "Serial Number",
    "Status",
    "Building",
    "Department",
    "Assigned To",
    "Purchase Date",
    "Purchase Price",
    "Warranty End",
];

const MAINTENANCE_HEADERS: &[&str] = &[
    "Asset Code",
    "Equipment",
    "Type",
    "Description",
    "Technician",
    "Scheduled",
    "Performed",
    "Cost",
    "Status",
];

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn equipment_excel(&self, query: &EquipmentReportQuery) -> AppResult<Vec<u8>> {
        let table = self.equipment_table(query).await?;
        export::excel::render(&table)
    }

    pub async fn equipment_pdf(&self, query: &EquipmentReportQuery) -> AppResult<Vec<u8>> {
        let table = self.equipment_table(query).await?;
        export::pdf::render(&table)
    }

    pub async fn maintenance_excel(&self, query: &MaintenanceReportQuery) -> AppResult<Vec<u8>> {
        let table = self.maintenance_table(query).await?;
        export::excel::render(&table)
    }

    pub async fn maintenance_pdf(&self, query: &MaintenanceReportQuery) -> AppResult<Vec<u8>> {
        let table = self.maintenance_table(query).await?;
        export::pdf::render(&table)
    }

    async fn equipment_table(&self, query: &EquipmentReportQuery) -> AppResult<ReportTable> {
        let rows = self.repository.report_equipment_rows(query).await?;
        let mut table = ReportTable::new("Equipment Inventory", EQUIPMENT_HEADERS);
        for row in rows {
            table.push_row(equipment_row(row));
        }
        Ok(table)
    }

    async fn maintenance_table(&self, query: &MaintenanceReportQuery) -> AppResult<ReportTable> {
        let rows = self.repository.report_maintenance_rows(query).await?;
        let mut table = ReportTable::new("Maintenance History", MAINTENANCE_HEADERS);
        for row in rows {
            table.push_row(maintenance_row(row));
        }
        Ok(table)
    }

    /// Merge the independent dashboard aggregates into one response; any
    /// failing query aborts the whole thing.
    pub async fn dashboard_statistics(&self) -> AppResult<DashboardStatistics> {
        let today = Utc::now().date_naive();
        let horizon = today
            .checked_add_days(Days::new(30))
            .unwrap_or(today);
        let year_ago = today
            .checked_sub_months(Months::new(12))
            .unwrap_or(today);

        Ok(DashboardStatistics {
            total_equipment: self.repository.dashboard_total_equipment().await?,
            equipment_by_status: self.repository.dashboard_equipment_by_status().await?,
            equipment_by_category: self.repository.dashboard_equipment_by_category().await?,
            equipment_by_location: self.repository.dashboard_equipment_by_location().await?,
            maintenance_costs_by_month: self.repository.dashboard_costs_by_month(year_ago).await?,
            maintenance_by_type: self.repository.dashboard_maintenance_by_kind().await?,
            upcoming_maintenance_30_days: self
                .repository
                .dashboard_upcoming_count(today, horizon)
                .await?,
            overdue_maintenance: self.repository.dashboard_overdue_count(today).await?,
            top_providers: self.repository.dashboard_top_providers().await?,
        })
    }
}

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn equipment_row(row: EquipmentReportRow) -> Vec<String> {
    vec![
        row.asset_code,
        row.name,
        opt(row.category),
        opt(row.brand),
        opt(row.model),
        opt(row.serial_number),
        row.status,
        opt(row.building),
        opt(row.department),
        opt(row.assigned_to),
        opt(row.purchase_date),
        opt(row.purchase_price),
        opt(row.warranty_end_date),
    ]
}

fn maintenance_row(row: MaintenanceReportRow) -> Vec<String> {
    vec![
        opt(row.asset_code),
        opt(row.equipment_name),
        row.kind,
        row.description,
        opt(row.technician),
        opt(row.scheduled_date),
        opt(row.performed_date),
        opt(row.cost),
        row.status,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn equipment_rows_match_the_header_width() {
        let row = EquipmentReportRow {
            asset_code: "EQ-001".into(),
            name: "Laptop".into(),
            category: Some("Computers".into()),
            brand: None,
            model: None,
            serial_number: Some("SN123".into()),
            status: "operational".into(),
            building: Some("Main".into()),
            department: None,
            assigned_to: None,
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            purchase_price: Some(Decimal::new(120000, 2)),
            warranty_end_date: None,
        };
        assert_eq!(equipment_row(row).len(), EQUIPMENT_HEADERS.len());
    }

    #[test]
    fn maintenance_rows_match_the_header_width() {
        let row = MaintenanceReportRow {
            asset_code: None,
            equipment_name: None,
            kind: "preventive".into(),
            description: "Cleaning".into(),
            technician: None,
            scheduled_date: None,
            performed_date: None,
            cost: None,
            status: "completed".into(),
        };
        assert_eq!(maintenance_row(row).len(), MAINTENANCE_HEADERS.len());
    }
}
