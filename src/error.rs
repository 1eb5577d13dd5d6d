use std::io;
use std::path::PathBuf;

/// Error type for level, layout and config decoding.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// Config file is not valid JSON for [`crate::GameConfig`]
    #[error("Failed to parse config {path}: {source}")]
    Config {
        /// Config file path
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
    /// A named column does not exist in a table
    #[error("Unknown column name: {0}")]
    UnknownColumn(String),
    /// A table row is shorter than the requested column
    #[error("No cell at row {row}, column {column}")]
    MissingCell {
        /// Row index
        row: usize,
        /// Column index
        column: usize,
    },
    /// A cell that must hold a number does not
    #[error("Invalid number {text:?} at row {row}, column {column}")]
    InvalidNumber {
        /// Row index
        row: usize,
        /// Column index
        column: usize,
        /// Offending cell text
        text: String,
    },
    /// Level file is structurally wrong
    #[error("Invalid level: {0}")]
    InvalidLevel(String),
    /// Tile layout is not a rectangular grid
    #[error("Invalid tile layout: {0}")]
    InvalidLayout(String),
    /// A cell coordinate falls outside the grid
    #[error("Cell ({x}, {y}) is outside the {columns}x{rows} grid")]
    CellOutOfBounds {
        /// Cell column
        x: i32,
        /// Cell row
        y: i32,
        /// Grid columns
        columns: usize,
        /// Grid rows
        rows: usize,
    },
}

impl GameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GameError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_cell() {
        let err = GameError::InvalidNumber {
            row: 3,
            column: 1,
            text: "abc".into(),
        };
        assert_eq!(err.to_string(), "Invalid number \"abc\" at row 3, column 1");
    }

    #[test]
    fn out_of_bounds_display() {
        let err = GameError::CellOutOfBounds {
            x: -1,
            y: 4,
            columns: 5,
            rows: 5,
        };
        assert_eq!(err.to_string(), "Cell (-1, 4) is outside the 5x5 grid");
    }
}
