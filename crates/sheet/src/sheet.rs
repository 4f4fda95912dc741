use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Strategy for handling null or empty values during cleaning.
#[derive(Debug, Clone)]
pub enum NullStrategy {
    Keep,
    EmptyToNull,
}

impl Default for NullStrategy {
    fn default() -> Self {
        NullStrategy::Keep
    }
}

/// Options for bulk data cleaning.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub trim: bool,
    pub normalize_whitespace: bool,
    pub null_strategy: NullStrategy,
}

/// A sheet of named columns over row-major cell storage.
///
/// Column names are kept apart from the data, so row 0 is always the first
/// data row. Names need not be unique until [`Sheet::rename_columns`] is used;
/// lookups by name resolve to the first matching column.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    columns: Vec<String>,
    data: Vec<Vec<CellValue>>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            columns: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create an empty sheet with the given column names
    #[must_use]
    pub fn with_columns<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut sheet = Self::new();
        sheet.columns = columns.into_iter().map(Into::into).collect();
        sheet
    }

    /// Create a sheet from column names and data rows.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LengthMismatch` if a row does not have one value
    /// per column.
    pub fn from_rows<S, T>(columns: impl IntoIterator<Item = S>, rows: Vec<Vec<T>>) -> Result<Self>
    where
        S: Into<String>,
        T: Into<CellValue>,
    {
        let mut sheet = Self::with_columns(columns);
        for row in rows {
            sheet.row_append(row)?;
        }
        Ok(sheet)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        if self.columns.is_empty() {
            self.data.first().map_or(0, Vec::len)
        } else {
            self.columns.len()
        }
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get column names
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Get the index of the first column with the given name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Replace all column names positionally.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LengthMismatch` if the number of names differs from
    /// the column count, and `SheetError::DuplicateColumnName` if a name repeats.
    pub fn rename_columns(&mut self, names: &[&str]) -> Result<()> {
        if names.len() != self.col_count() {
            return Err(SheetError::LengthMismatch {
                expected: self.col_count(),
                actual: names.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(*name) {
                return Err(SheetError::DuplicateColumnName {
                    name: (*name).to_string(),
                });
            }
        }

        self.columns = names.iter().map(|n| (*n).to_string()).collect();
        Ok(())
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.col_count(),
            })
    }

    /// Get a cell value by row index and column name
    pub fn get_by_name(&self, row: usize, col_name: &str) -> Result<&CellValue> {
        let col = self.column_index(col_name)?;
        self.get(row, col)
    }

    /// Set a cell value by row and column index (0-based)
    pub fn set<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = (self.row_count(), self.col_count());
        let cell = self
            .data
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            })?;
        *cell = value.into();
        Ok(())
    }

    // ===== Row Operations =====

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::IndexOutOfBounds {
            row: index,
            col: 0,
            rows: self.row_count(),
            cols: self.col_count(),
        })
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Append a row to the end of the sheet
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        let row: Vec<CellValue> = data.into_iter().map(Into::into).collect();

        // Ensure consistent column count
        let expected = self.col_count();
        if (!self.columns.is_empty() || !self.data.is_empty()) && row.len() != expected {
            return Err(SheetError::LengthMismatch {
                expected,
                actual: row.len(),
            });
        }

        self.data.push(row);
        Ok(())
    }

    /// Delete rows matching a predicate.
    /// Returns the number of rows removed.
    pub fn row_delete_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&[CellValue]) -> bool,
    {
        let original_len = self.data.len();
        self.data.retain(|row| !predicate(row));
        original_len - self.data.len()
    }

    /// Delete every row that holds a null in any column.
    /// Returns the number of rows removed.
    pub fn drop_null_rows(&mut self) -> usize {
        self.row_delete_where(|row| row.iter().any(CellValue::is_null))
    }

    /// Remove duplicate rows based on the provided column names, keeping the
    /// first occurrence. An empty slice compares all columns.
    /// Returns the number of rows removed.
    pub fn remove_duplicates_by_columns(&mut self, columns: &[&str]) -> Result<usize> {
        let indices: Vec<usize> = if columns.is_empty() {
            (0..self.col_count()).collect()
        } else {
            columns
                .iter()
                .map(|name| self.column_index(name))
                .collect::<Result<Vec<_>>>()?
        };

        let mut seen = HashSet::new();
        let original_len = self.data.len();

        self.data.retain(|row| {
            let mut key = String::new();
            for &col in &indices {
                let cell = row.get(col).unwrap_or(&CellValue::Null);
                key.push_str(&cell.key());
                key.push('\x1f');
            }
            seen.insert(key)
        });

        Ok(original_len - self.data.len())
    }

    /// Append all rows from another sheet (like SQL UNION ALL).
    ///
    /// Rows are stacked positionally under this sheet's column names; the
    /// other sheet's names are ignored. An empty, unnamed sheet adopts the
    /// other sheet's columns.
    pub fn append(&mut self, other: &Sheet) -> Result<()> {
        if self.is_empty() && self.columns.is_empty() {
            self.columns.clone_from(&other.columns);
            self.data.clone_from(&other.data);
            return Ok(());
        }

        if self.col_count() != other.col_count() {
            return Err(SheetError::ColumnCountMismatch {
                left: self.col_count(),
                right: other.col_count(),
            });
        }

        self.data.extend(other.data.iter().cloned());
        Ok(())
    }

    // ===== Column Operations =====

    /// Get an entire column by name
    pub fn column_by_name(&self, name: &str) -> Result<Vec<CellValue>> {
        let index = self.column_index(name)?;
        Ok(self.data.iter().map(|row| row[index].clone()).collect())
    }

    /// Delete multiple columns by names
    pub fn column_delete_multi_by_name(&mut self, names: &[&str]) -> Result<()> {
        // Get indices in reverse order to maintain positions during deletion
        let mut indices: Vec<usize> = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;

        indices.sort_unstable();
        indices.dedup();
        indices.reverse();

        for index in indices {
            self.columns.remove(index);
            for row in &mut self.data {
                row.remove(index);
            }
        }

        Ok(())
    }

    /// Apply a function to a specific column by name
    pub fn column_map_by_name<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&CellValue) -> CellValue,
    {
        let index = self.column_index(name)?;
        for row in &mut self.data {
            row[index] = f(&row[index]);
        }
        Ok(())
    }

    /// Clean data in-place using the provided options.
    pub fn clean_data(&mut self, options: &CleanOptions) {
        for row in &mut self.data {
            for cell in row {
                *cell = Self::clean_cell(cell, options);
            }
        }
    }

    fn clean_cell(cell: &CellValue, options: &CleanOptions) -> CellValue {
        let CellValue::String(s) = cell else {
            return cell.clone();
        };

        let mut out = if options.trim {
            s.trim().to_string()
        } else {
            s.clone()
        };
        if options.normalize_whitespace {
            out = Self::normalize_whitespace(&out);
        }

        match options.null_strategy {
            NullStrategy::EmptyToNull if out.is_empty() => CellValue::Null,
            _ => CellValue::String(out),
        }
    }

    fn normalize_whitespace(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut last_was_space = false;
        for ch in input.chars() {
            if ch.is_whitespace() {
                if !last_was_space {
                    out.push(' ');
                    last_was_space = true;
                }
            } else {
                out.push(ch);
                last_was_space = false;
            }
        }
        out
    }

    // ===== Conversion =====

    /// Convert to a list of records, one ordered map per row.
    ///
    /// # Example
    /// ```
    /// use notas_sheet::Sheet;
    ///
    /// let sheet = Sheet::from_rows(["name", "age"], vec![vec!["Alice", "30"]]).unwrap();
    /// let records = sheet.to_records();
    /// assert_eq!(records[0]["name"].as_str(), "Alice");
    /// ```
    #[must_use]
    pub fn to_records(&self) -> Vec<IndexMap<String, CellValue>> {
        self.data
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}
