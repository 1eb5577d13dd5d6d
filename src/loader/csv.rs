// src/loader/csv.rs
use crate::error::GameError;
use std::path::Path;
use std::str::FromStr;

/// Delimiters and header handling for [`CsvTable`].
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    /// Separates rows
    pub line_delimiter: char,
    /// Separates cells within a row
    pub field_delimiter: char,
    /// Whether the first row holds column names
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            line_delimiter: '\n',
            field_delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvOptions {
    /// Default delimiters, no header row.
    pub fn headerless() -> Self {
        Self {
            has_header: false,
            ..Self::default()
        }
    }
}

/// Table of string cells. No quoting, no type coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    column_names: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn split_fields(line: &str, delim: char) -> Vec<String> {
    let mut fields: Vec<String> = line.split(delim).map(str::to_owned).collect();
    // "a,b," has no third field
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

impl CsvTable {
    /// Parse `text` with the given options.
    pub fn parse(text: &str, options: CsvOptions) -> Self {
        let mut lines = text.split(options.line_delimiter);

        let mut column_names = Vec::new();
        if options.has_header {
            if let Some(first) = lines.next() {
                column_names = split_fields(first, options.field_delimiter);
            }
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for line in lines {
            let row = split_fields(line, options.field_delimiter);
            if row.len() > column_names.len() {
                column_names.resize(row.len(), String::new());
            }
            rows.push(row);
        }

        // artifact of a final line terminator
        if rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }

        Self { column_names, rows }
    }

    /// Read and parse a file.
    pub fn from_file(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        Ok(Self::parse(&text, options))
    }

    /// Width of the widest row (or the header, if longer).
    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_index(&self, name: &str) -> Result<usize, GameError> {
        self.column_names
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| GameError::UnknownColumn(name.to_owned()))
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Result<&str, GameError> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .ok_or(GameError::MissingCell { row, column })
    }

    pub fn cell_named(&self, row: usize, column: &str) -> Result<&str, GameError> {
        let column = self.column_index(column)?;
        self.cell(row, column)
    }

    /// Parse a cell as a number, ignoring surrounding whitespace.
    pub fn parse_cell<T: FromStr>(&self, row: usize, column: usize) -> Result<T, GameError> {
        let text = self.cell(row, column)?;
        text.trim().parse().map_err(|_| GameError::InvalidNumber {
            row,
            column,
            text: text.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_names_columns() {
        let t = CsvTable::parse("name,x\norc,3\n", CsvOptions::default());
        assert_eq!(t.column_names(), ["name", "x"]);
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.cell_named(0, "x").unwrap(), "3");
    }

    #[test]
    fn unknown_column_fails_only_that_lookup() {
        let t = CsvTable::parse("name,x\norc,3\n", CsvOptions::default());
        assert!(matches!(t.cell_named(0, "y"), Err(GameError::UnknownColumn(n)) if n == "y"));
        assert_eq!(t.cell(0, 0).unwrap(), "orc");
    }

    #[test]
    fn headerless_columns_widen_to_widest_row() {
        let t = CsvTable::parse("1,2\n3,4,5\n6\n", CsvOptions::headerless());
        assert_eq!(t.column_count(), 3);
        assert!(t.column_names().iter().all(String::is_empty));
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.row(2).unwrap(), ["6"]);
    }

    #[test]
    fn trailing_empty_row_is_dropped_but_inner_ones_kept() {
        let t = CsvTable::parse("a\n\nb\n", CsvOptions::headerless());
        assert_eq!(t.row_count(), 3);
        assert!(t.row(1).unwrap().is_empty());

        let no_newline = CsvTable::parse("a\nb", CsvOptions::headerless());
        assert_eq!(no_newline.row_count(), 2);
    }

    #[test]
    fn empty_input_has_no_rows() {
        let t = CsvTable::parse("", CsvOptions::headerless());
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_count(), 0);
    }

    #[test]
    fn trailing_empty_field_dropped_inner_kept() {
        let t = CsvTable::parse("a,,b,\n", CsvOptions::headerless());
        assert_eq!(t.row(0).unwrap(), ["a", "", "b"]);
    }

    #[test]
    fn custom_delimiters() {
        let opts = CsvOptions {
            line_delimiter: ';',
            field_delimiter: '|',
            has_header: false,
        };
        let t = CsvTable::parse("1|2;3|4;", opts);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.cell(1, 1).unwrap(), "4");
    }

    #[test]
    fn parse_cell_trims_and_reports_bad_numbers() {
        let t = CsvTable::parse("1, 2,x\n", CsvOptions::headerless());
        assert_eq!(t.parse_cell::<i32>(0, 1).unwrap(), 2);
        let err = t.parse_cell::<i32>(0, 2).unwrap_err();
        assert!(matches!(err, GameError::InvalidNumber { row: 0, column: 2, .. }));
        assert!(matches!(
            t.parse_cell::<i32>(0, 7),
            Err(GameError::MissingCell { row: 0, column: 7 })
        ));
    }
}
