//! Excel and PDF rendering for report downloads

pub mod excel;
pub mod pdf;

/// A rendered report: a title and a rectangular grid of cells, already
/// stringified. Both renderers consume the same table.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ReportTable {
        let mut table = ReportTable::new("Inventory", &["Code", "Name", "Status"]);
        table.push_row(vec![
            "EQ-001".to_string(),
            "Laptop".to_string(),
            "operational".to_string(),
        ]);
        table.push_row(vec![
            "EQ-002".to_string(),
            "Printer".to_string(),
            "broken".to_string(),
        ]);
        table
    }

    #[test]
    fn excel_output_is_a_zip_container() {
        let bytes = excel::render(&sample_table()).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn excel_renders_empty_tables() {
        let table = ReportTable::new("Empty", &["A", "B"]);
        let bytes = excel::render(&table).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn pdf_output_has_the_magic_prefix() {
        let bytes = pdf::render(&sample_table()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn pdf_paginates_long_tables() {
        let mut table = ReportTable::new("Long", &["Code", "Name"]);
        for i in 0..200 {
            table.push_row(vec![format!("EQ-{:03}", i), format!("Item {}", i)]);
        }
        let bytes = pdf::render(&table).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // a 200-row table cannot fit on a single A4 page
        let single = pdf::render(&sample_table()).unwrap();
        let pages = |b: &[u8]| {
            String::from_utf8_lossy(b).matches("/Type /Page").count()
        };
        assert!(pages(&bytes) > pages(&single));
    }
}
