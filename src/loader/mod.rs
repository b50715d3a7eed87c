mod data_loader;
mod errors;

pub use data_loader::{load_sources, spawn_transactions_load};
#[cfg(test)]
pub use data_loader::{load_fx, load_transactions};
pub use errors::LoaderError;
