mod errors;
mod validators;

pub use errors::SchemaValidationError;
pub use validators::{ensure_columns, validate_fx, validate_transactions, FX_REQUIRED_COLUMNS};
