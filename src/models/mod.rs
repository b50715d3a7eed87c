mod cell;
mod enriched;
mod features;
pub(crate) mod fields;
mod fx;
mod table;
#[cfg(test)]
mod tests;
mod transaction;

pub use cell::{Cell, Record};
pub use enriched::{EnrichedTransaction, AMOUNT_USD_COLUMN};
pub use features::{FeatureRow, LastHourFeatures, FEATURE_COLUMNS};
pub use fx::{FxRow, FxTable, FX_DATE_COLUMN};
pub use table::Table;
pub use transaction::{Transaction, TRANSACTION_COLUMNS};
