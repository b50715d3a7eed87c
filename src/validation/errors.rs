use thiserror::Error;

/// A structural precondition on an input table was violated.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaValidationError {
    #[error("Schema validation failed for [{table}]: table is empty")]
    EmptyTable {
        table: String
    },
    #[error("Schema validation failed for [{table}]: missing columns {columns:?}")]
    MissingColumns {
        table: String,
        columns: Vec<String>
    },
    #[error("Schema validation failed for [{table}]: [{column}] could not be parsed as a temporal value in {rows} row(s)")]
    UnparseableTemporal {
        table: String,
        column: String,
        rows: usize
    },
    #[error("Schema validation failed for [{table}]: found {rows} negative 'amount' value(s)")]
    NegativeAmount {
        table: String,
        rows: usize
    }
}

impl SchemaValidationError {
    pub fn empty_table(table: &str) -> Self {
        Self::EmptyTable { table: table.to_string() }
    }

    pub fn missing_columns(table: &str, columns: Vec<String>) -> Self {
        Self::MissingColumns { table: table.to_string(), columns }
    }

    pub fn unparseable_temporal(table: &str, column: &str, rows: usize) -> Self {
        Self::UnparseableTemporal {
            table: table.to_string(),
            column: column.to_string(),
            rows
        }
    }

    pub fn negative_amount(table: &str, rows: usize) -> Self {
        Self::NegativeAmount { table: table.to_string(), rows }
    }
}
