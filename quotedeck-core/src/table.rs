//! User-supplied tabular data and the text grids every panel renders.
//!
//! Uploaded files are parsed with polars' CSV reader; the column schema is
//! whatever the reader infers. A column is *categorical* when it was
//! inferred as a string column.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse delimited text: {0}")]
    Parse(String),

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("column '{column}' is not categorical")]
    NotCategorical { column: String },

    #[error("dataset download failed: {0}")]
    Download(String),
}

/// A rendered table: header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of each column in characters, header included.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }

    /// Plain-text rendering with right-aligned cells, as printed by the CLI.
    pub fn to_plain(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();
        let fmt_row = |cells: &[String], out: &mut String| {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c:>w$}", w = *w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        };
        fmt_row(&self.headers, &mut out);
        for row in &self.rows {
            fmt_row(row, &mut out);
        }
        out
    }
}

/// An uploaded delimited file.
#[derive(Debug, Clone)]
pub struct UploadedTable {
    name: String,
    frame: DataFrame,
}

impl UploadedTable {
    /// Parse delimited text with a header row.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, TableError> {
        let name = name.into();
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| TableError::Parse(e.to_string()))?;

        tracing::info!(
            table = %name,
            rows = frame.height(),
            columns = frame.width(),
            "parsed uploaded table"
        );
        Ok(Self { name, frame })
    }

    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let bytes = std::fs::read(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, bytes)
    }

    /// Display name (file name for uploads).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// All column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    /// Columns holding non-numeric values, in file order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|c| is_categorical_dtype(c.dtype()))
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn is_categorical(&self, column: &str) -> Result<bool, TableError> {
        Ok(is_categorical_dtype(self.series(column)?.dtype()))
    }

    /// Column values rendered as text, nulls as `None`.
    pub fn text_column(&self, column: &str) -> Result<Vec<Option<String>>, TableError> {
        let cast = self
            .series(column)?
            .cast(&DataType::String)
            .map_err(|e| TableError::Parse(e.to_string()))?;
        let values = cast.str().map_err(|e| TableError::Parse(e.to_string()))?;
        Ok(values.into_iter().map(|v| v.map(str::to_owned)).collect())
    }

    /// Column values as numbers; cells that do not parse become `None`.
    pub fn numeric_column(&self, column: &str) -> Result<Vec<Option<f64>>, TableError> {
        let cast = self
            .series(column)?
            .cast(&DataType::Float64)
            .map_err(|e| TableError::Parse(e.to_string()))?;
        let values = cast.f64().map_err(|e| TableError::Parse(e.to_string()))?;
        Ok(values.into_iter().collect())
    }

    /// First `n` rows as a text grid.
    pub fn head(&self, n: usize) -> Result<TextTable, TableError> {
        let columns = self.column_names();
        let take = n.min(self.height());
        let mut cells: Vec<Vec<Option<String>>> = Vec::with_capacity(columns.len());
        for column in &columns {
            let mut values = self.text_column(column)?;
            values.truncate(take);
            cells.push(values);
        }

        let mut table = TextTable::new(columns);
        for row in 0..take {
            table.rows.push(
                cells
                    .iter()
                    .map(|col| col[row].clone().unwrap_or_default())
                    .collect(),
            );
        }
        Ok(table)
    }

    fn series(&self, column: &str) -> Result<&Series, TableError> {
        self.frame
            .column(column)
            .map(|c| c.as_materialized_series())
            .map_err(|_| TableError::UnknownColumn(column.to_owned()))
    }
}

fn is_categorical_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> UploadedTable {
        UploadedTable::from_bytes("mixed.csv", b"A,B,C\n1,x,2.5\n2,y,3.5\n3,x,4.0\n".to_vec()).unwrap()
    }

    #[test]
    fn detects_categorical_columns() {
        let t = mixed();
        assert_eq!(t.column_names(), vec!["A", "B", "C"]);
        assert_eq!(t.categorical_columns(), vec!["B"]);
        assert!(t.is_categorical("B").unwrap());
        assert!(!t.is_categorical("A").unwrap());
    }

    #[test]
    fn head_caps_rows() {
        let t = mixed();
        let head = t.head(2).unwrap();
        assert_eq!(head.headers, vec!["A", "B", "C"]);
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.rows[0][1], "x");
        assert_eq!(t.head(10).unwrap().row_count(), 3);
    }

    #[test]
    fn numeric_column_reads_floats() {
        let t = mixed();
        assert_eq!(t.numeric_column("C").unwrap(), vec![Some(2.5), Some(3.5), Some(4.0)]);
        assert_eq!(t.numeric_column("A").unwrap()[2], Some(3.0));
    }

    #[test]
    fn unknown_column_is_reported() {
        let err = mixed().text_column("Z").unwrap_err();
        assert!(matches!(err, TableError::UnknownColumn(c) if c == "Z"));
    }

    #[test]
    fn empty_input_fails_to_parse() {
        let err = UploadedTable::from_bytes("empty.csv", Vec::new()).unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = UploadedTable::from_path(Path::new("/nonexistent/upload.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn plain_rendering_aligns_columns() {
        let mut t = TextTable::new(vec!["a".into(), "long".into()]);
        t.rows.push(vec!["100".into(), "1".into()]);
        let text = t.to_plain();
        assert_eq!(text, "  a  long\n100     1\n");
    }
}
