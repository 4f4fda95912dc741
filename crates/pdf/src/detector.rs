use crate::layout::{lines_from_text, TextCell, TextLine};

/// A run of consecutive lines laid out on one header's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    /// Row 0 is the header; every row has one entry per header cell, blank
    /// where the line had nothing under that column.
    pub rows: Vec<Vec<String>>,
    pub start_line: usize,
    pub end_line: usize,
}

/// Finds column-aligned tables in positioned lines.
///
/// A table starts at a line with at least `min_cols` cells; those cells are
/// the column anchors. Following lines are rows while they have at least half
/// as many cells as the header and no more. Each cell lands in the column
/// whose header span it overlaps most, so a missing value leaves its column
/// empty instead of shifting the rest of the row.
#[derive(Debug, Clone)]
pub struct TableDetector {
    min_rows: usize,
    min_cols: usize,
}

impl Default for TableDetector {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_cols: 2,
        }
    }
}

impl TableDetector {
    pub fn new(min_rows: usize, min_cols: usize) -> Self {
        Self { min_rows, min_cols }
    }

    /// Detect tables in plain text, where columns are separated by two or
    /// more spaces, tabs or `|`.
    pub fn detect_tables(&self, text: &str) -> Vec<TableRegion> {
        self.detect_in_lines(&lines_from_text(text))
    }

    pub fn detect_in_lines(&self, lines: &[TextLine]) -> Vec<TableRegion> {
        let mut tables = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if let Some(table) = self.extract_table_at(lines, i) {
                i = table.end_line + 1;
                tables.push(table);
            } else {
                i += 1;
            }
        }

        tables
    }

    fn extract_table_at(&self, lines: &[TextLine], start: usize) -> Option<TableRegion> {
        let header = lines.get(start)?;
        if header.is_rule() || header.cells.len() < self.min_cols {
            return None;
        }

        let anchors = header.cells.as_slice();
        let min_cells = self.min_cols.max(anchors.len().div_ceil(2));
        let mut rows = vec![header.texts()];
        let mut end_line = start;

        for (idx, line) in lines.iter().enumerate().skip(start + 1) {
            if line.is_rule() {
                continue;
            }
            if line.cells.len() < min_cells || line.cells.len() > anchors.len() {
                break;
            }

            let row = assign_columns(anchors, &line.cells);
            // A repeated header opens the next table
            if row == rows[0] {
                break;
            }
            rows.push(row);
            end_line = idx;
        }

        if rows.len() >= self.min_rows {
            tracing::trace!(
                "Table candidate at lines {}..={} with {} rows of {} columns",
                start,
                end_line,
                rows.len(),
                anchors.len()
            );
            Some(TableRegion {
                rows,
                start_line: start,
                end_line,
            })
        } else {
            None
        }
    }
}

fn assign_columns(anchors: &[TextCell], cells: &[TextCell]) -> Vec<String> {
    let mut row = vec![String::new(); anchors.len()];
    for cell in cells {
        let slot = &mut row[column_for(anchors, cell)];
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(&cell.text);
    }
    row
}

fn column_for(anchors: &[TextCell], cell: &TextCell) -> usize {
    let best = anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| (i, anchor.overlap(cell)))
        .fold((0, 0.0_f32), |best, next| if next.1 > best.1 { next } else { best });
    if best.1 > 0.0 {
        return best.0;
    }

    // Nothing overlaps; take the nearest header
    anchors
        .iter()
        .enumerate()
        .min_by(|(_, l), (_, r)| {
            (l.center() - cell.center())
                .abs()
                .total_cmp(&(r.center() - cell.center()).abs())
        })
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lay rows out as fixed-width text, padding each column to its widest
    /// value plus two spaces.
    fn aligned(rows: &[&[&str]]) -> String {
        let cols = rows[0].len();
        let widths: Vec<usize> = (0..cols)
            .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap() + 2)
            .collect();
        rows.iter()
            .map(|r| {
                r.iter()
                    .zip(&widths)
                    .map(|(cell, &w)| format!("{cell:<w$}"))
                    .collect::<String>()
                    + "\n"
            })
            .collect()
    }

    #[test]
    fn test_detects_aligned_table() {
        let text = "Resultado Final\n\
                    Nome    Total    Situacao\n\
                    Ana Maria    15,5    Aprovada\n\
                    Bea    Elimin.    Eliminada\n";

        let tables = TableDetector::default().detect_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 3);
        assert_eq!(tables[0].rows[0], vec!["Nome", "Total", "Situacao"]);
        assert_eq!(tables[0].rows[1][0], "Ana Maria");
        assert_eq!(tables[0].rows[2][1], "Elimin.");
        assert_eq!(tables[0].start_line, 1);
        assert_eq!(tables[0].end_line, 3);
    }

    #[test]
    fn test_blank_cells_keep_their_column() {
        let header = [
            "Clase", "Nome", "NumInsc", "NroFilho", "DataNac", "GEO", "PORT", "EDU",
            "Objetivas", "Discursiva", "Titulos", "Total",
        ];
        let text = aligned(&[
            &header,
            &["A", "Ana", "123", "2", "01/01/1990", "7", "8", "9", "10", "5", "1", "15"],
            &["A", "Bea", "124", "1", "02/02/1990", "6", "7", "8", "9", "", "", "Elimin."],
            &["A", "Caio", "125", "0", "03/03/1991", "5", "6", "7", "8", "4", "2", "13"],
            &["A", "Dani", "126", "3", "04/04/1992", "8", "9", "7", "9", "3", "1", "14"],
        ]);

        let tables = TableDetector::default().detect_tables(&text);
        assert_eq!(tables.len(), 1);
        let rows = &tables[0].rows;
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 12));

        let names: Vec<&str> = rows[1..].iter().map(|r| r[1].as_str()).collect();
        assert_eq!(names, ["Ana", "Bea", "Caio", "Dani"]);
        assert_eq!(rows[2][9], "");
        assert_eq!(rows[2][10], "");
        assert_eq!(rows[2][11], "Elimin.");
    }

    #[test]
    fn test_right_aligned_values_follow_header() {
        let text = "Nome        Total\n\
                    Ana          15,5\n\
                    Bea            8\n";
        let tables = TableDetector::default().detect_tables(text);
        assert_eq!(tables[0].rows[1], vec!["Ana", "15,5"]);
        assert_eq!(tables[0].rows[2], vec!["Bea", "8"]);
    }

    #[test]
    fn test_wider_line_splits_tables() {
        let text = "a  b\n1  2\nx  y  z\n3  4  5\n";
        let tables = TableDetector::default().detect_tables(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[1].rows[0], vec!["x", "y", "z"]);
    }

    #[test]
    fn test_repeated_header_starts_new_table() {
        let text = "Nome  Total\nAna   15\nNome  Total\nBea   14\n";
        let tables = TableDetector::default().detect_tables(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].rows[1], vec!["Bea", "14"]);
    }

    #[test]
    fn test_rules_and_pipes() {
        let text = "| a | b |\n-----\n| 1 | 2 |\n";
        let tables = TableDetector::default().detect_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_min_rows_filters_single_lines() {
        let text = "only  one  row\n\nprose paragraph here\n";
        assert!(TableDetector::new(2, 2).detect_tables(text).is_empty());
        assert_eq!(TableDetector::new(1, 2).detect_tables(text).len(), 1);
    }
}
