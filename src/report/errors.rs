use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Could not write report artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("Could not write report table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        source: csv::Error
    }
}

impl ReportError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv { path: path.to_path_buf(), source }
    }
}
