//! Spreadsheet rendering with rust_xlsxwriter

use rust_xlsxwriter::{Format, Workbook};

use super::ReportTable;
use crate::error::{AppError, AppResult};

/// Render the table as a single-sheet workbook: bold header row, data rows,
/// auto-sized columns.
pub fn render(table: &ReportTable) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name(&table.title))
        .map_err(|e| AppError::Internal(format!("Failed to build workbook: {}", e)))?;

    let bold = Format::new().set_bold();
    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, header.as_str(), &bold)
            .map_err(|e| AppError::Internal(format!("Failed to build workbook: {}", e)))?;
    }
    for (row, cells) in table.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            worksheet
                .write(row as u32 + 1, col as u16, cell.as_str())
                .map_err(|e| AppError::Internal(format!("Failed to build workbook: {}", e)))?;
        }
    }
    worksheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Internal(format!("Failed to render workbook: {}", e)))
}

/// Sheet names are capped at 31 characters by the format
fn sheet_name(title: &str) -> String {
    title.chars().take(31).collect()
}
