use std::path::PathBuf;

use thiserror::Error;

use crate::validation::SchemaValidationError;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Data file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf
    },
    #[error("Could not open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("Could not read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        source: csv::Error
    },
    #[error(transparent)]
    Schema(#[from] SchemaValidationError)
}

impl LoaderError {
    pub fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        Self::Csv { path: path.to_path_buf(), source }
    }
}
