use crate::models::Transaction;
use crate::types::TransactionId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("Feature building requires columns {columns:?} that the enriched table does not declare")]
    MissingColumns {
        columns: Vec<String>
    },
    #[error("Transaction [{transaction_id}] has no timestamp to derive temporal features from")]
    MissingTimestamp {
        transaction_id: TransactionId
    }
}

impl FeatureError {
    pub fn missing_timestamp(transaction: &Transaction) -> Self {
        Self::MissingTimestamp { transaction_id: transaction.transaction_id.clone() }
    }
}
