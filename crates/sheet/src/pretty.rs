use crate::cell::CellValue;
use crate::sheet::Sheet;
use prettytable::{format, Cell, Row, Table};

impl Sheet {
    /// Render the sheet as a boxed text table, numbers right aligned.
    ///
    /// At most `max_rows` data rows are shown; a trailing line reports how
    /// many were left out.
    #[must_use]
    pub fn to_pretty_string(&self, max_rows: usize) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(Row::new(
            self.column_names().iter().map(|name| Cell::new(name)).collect(),
        ));

        for row in self.rows().take(max_rows) {
            table.add_row(Row::new(row.iter().map(pretty_cell).collect()));
        }

        let mut out = table.to_string();
        let hidden = self.row_count().saturating_sub(max_rows);
        if hidden > 0 {
            out.push_str(&format!("... {hidden} more row(s)"));
        }
        out.trim_end().to_string()
    }
}

fn pretty_cell(value: &CellValue) -> Cell {
    let cell = Cell::new(&value.to_string());
    match value {
        CellValue::Int(_) | CellValue::Float(_) => cell.style_spec("r"),
        _ => cell,
    }
}
