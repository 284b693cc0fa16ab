//! PDF rendering with printpdf

use std::io::BufWriter;

use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::ReportTable;
use crate::error::{AppError, AppResult};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 12.0;
const ROW_HEIGHT: f32 = 6.0;
const BODY_SIZE: f32 = 8.0;

/// Render the table as an A4 document: title, generation timestamp, header
/// row repeated on every page, rows flowing across pages.
pub fn render(table: &ReportTable) -> AppResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        table.title.clone(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(format!("Failed to build document: {}", e)))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Internal(format!("Failed to build document: {}", e)))?;

    let columns = table.headers.len().max(1);
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns as f32;
    // rough per-column character budget at 8pt Helvetica
    let max_chars = (column_width / 1.6) as usize;

    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN - 8.0;

    current.use_text(table.title.as_str(), 14.0, Mm(MARGIN), Mm(y), &font_bold);
    y -= ROW_HEIGHT;
    let generated = format!("Generated {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    current.use_text(generated.as_str(), BODY_SIZE, Mm(MARGIN), Mm(y), &font);
    y -= ROW_HEIGHT * 1.5;

    write_header(&current, table, &font_bold, column_width, max_chars, y);
    y -= ROW_HEIGHT;

    for row in &table.rows {
        if y < MARGIN + ROW_HEIGHT {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - MARGIN - ROW_HEIGHT;
            write_header(&current, table, &font_bold, column_width, max_chars, y);
            y -= ROW_HEIGHT;
        }
        for (col, cell) in row.iter().enumerate().take(columns) {
            let x = MARGIN + col as f32 * column_width;
            current.use_text(clip(cell, max_chars), BODY_SIZE, Mm(x), Mm(y), &font);
        }
        y -= ROW_HEIGHT;
    }

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .map_err(|e| AppError::Internal(format!("Failed to render document: {}", e)))?;
    Ok(bytes)
}

fn write_header(
    layer: &PdfLayerReference,
    table: &ReportTable,
    font_bold: &IndirectFontRef,
    column_width: f32,
    max_chars: usize,
    y: f32,
) {
    for (col, header) in table.headers.iter().enumerate() {
        let x = MARGIN + col as f32 * column_width;
        layer.use_text(clip(header, max_chars), BODY_SIZE, Mm(x), Mm(y), font_bold);
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}
