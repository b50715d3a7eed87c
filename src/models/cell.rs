use std::fmt;
use std::fmt::{Display, Formatter};

/// A single value of a row, viewed without its static type.
///
/// Used by the report stage, which summarizes whatever columns a table
/// declares.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String)
}

impl Cell {
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Number(value) => value.is_nan(),
            _ => false
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if !value.is_nan() => Some(*value),
            _ => None
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Cell::Null, Cell::Number)
    }

    pub fn from_flag(value: u8) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl Display for Cell {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(value) => write!(formatter, "{value}"),
            Cell::Number(value) if value.is_nan() => Ok(()),
            Cell::Number(value) => write!(formatter, "{value}"),
            Cell::Text(value) => formatter.write_str(value)
        }
    }
}

/// A row that can be read column by column.
pub trait Record {
    /// Returns the value of `column`, or `Cell::Null` for columns the row does not carry.
    fn cell(&self, column: &str) -> Cell;
}
