//! Table extraction and processing
//!
//! This module handles extraction of table data from Word documents,
//! keeping per-cell runs and pictures and detecting whether the first row
//! is a header.

use super::super::models::*;
use super::formatting::extract_paragraph_content;

/// Extract table data from a docx-rs Table
pub(crate) fn extract_table_data(table: &docx_rs::Table) -> Option<TableData> {
    let mut rows: TableRows = Vec::new();

    for table_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = table_child;
        let mut row_cells = Vec::new();

        for row_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            let mut runs: Vec<FormattedRun> = Vec::new();
            let mut image_refs = Vec::new();

            for content in &cell.children {
                if let docx_rs::TableCellContent::Paragraph(para) = content {
                    let paragraph = extract_paragraph_content(para);
                    image_refs.extend(paragraph.image_refs);
                    if paragraph.runs.is_empty() {
                        continue;
                    }
                    // Separate paragraphs within one cell by a space
                    if !runs.is_empty() {
                        runs.push(FormattedRun::plain(" "));
                    }
                    runs.extend(paragraph.runs);
                }
            }

            let runs = FormattedRun::consolidate_runs(runs);
            row_cells.push(TableCell {
                content: runs_text(&runs).trim().to_string(),
                runs,
                image_refs,
            });
        }

        if !row_cells.is_empty() {
            rows.push(row_cells);
        }
    }

    if rows.iter().all(|row| row.iter().all(TableCell::is_empty)) {
        return None;
    }

    let has_header = rows.len() > 1 && appears_to_be_header(&rows[0]);
    Some(TableData { rows, has_header })
}

/// Detect if a row appears to be a header based on heuristics
pub(crate) fn appears_to_be_header(row: &[TableCell]) -> bool {
    if row.is_empty() {
        return false;
    }

    let total_chars: usize = row.iter().map(|cell| cell.content.len()).sum();
    // Headers tend to be shorter and more concise
    if total_chars / row.len() > 50 {
        return false;
    }

    let header_indicators = row
        .iter()
        .filter(|cell| {
            let cell_lower = cell.content.to_lowercase();
            let word_count = cell.content.split_whitespace().count();

            // Bold cells and short phrases (1-3 words) are often headers
            let bold = !cell.runs.is_empty() && cell.runs.iter().all(|run| run.formatting.bold);
            if bold || (word_count <= 3 && !cell.content.trim().is_empty()) {
                return true;
            }

            ["name", "date", "amount", "type", "status", "id", "description", "count"]
                .iter()
                .any(|word| cell_lower.contains(word))
        })
        .count();

    // If more than half the cells look like headers, treat the row as a header
    header_indicators > row.len() / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<TableCell> {
        cells.iter().map(|c| TableCell::new(*c)).collect()
    }

    #[test]
    fn test_short_labels_look_like_header() {
        assert!(appears_to_be_header(&row(&["Name", "Status", "Due date"])));
    }

    #[test]
    fn test_prose_row_is_not_header() {
        let prose = "This cell carries a long sentence that clearly belongs to the body of the table";
        assert!(!appears_to_be_header(&row(&[prose, prose])));
    }

    #[test]
    fn test_extracts_rows_from_docx_table() {
        let table = docx_rs::Table::new(vec![
            docx_rs::TableRow::new(vec![
                docx_rs::TableCell::new().add_paragraph(
                    docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Name")),
                ),
                docx_rs::TableCell::new().add_paragraph(
                    docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Role")),
                ),
            ]),
            docx_rs::TableRow::new(vec![
                docx_rs::TableCell::new().add_paragraph(
                    docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Ada")),
                ),
                docx_rs::TableCell::new().add_paragraph(
                    docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Engineer")),
                ),
            ]),
        ]);

        let data = extract_table_data(&table).unwrap();
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.column_count(), 2);
        assert!(data.has_header);
        assert_eq!(data.rows[1][1].content, "Engineer");
    }
}
