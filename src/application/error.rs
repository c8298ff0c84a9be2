use thiserror::Error;

use crate::domain::ValidationError;
use crate::io::ExportError;
use crate::storage::{AppendError, StorageError};

/// Every failure an expense operation can surface to the user.
/// None of them are fatal and none are retried.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad user input: amount, category or date
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Ledger file unreadable, corrupt or with the wrong columns
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Export destination unwritable or format unsupported
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }

    pub fn is_export(&self) -> bool {
        matches!(self, AppError::Export(_))
    }
}

impl From<AppendError> for AppError {
    fn from(err: AppendError) -> Self {
        match err {
            AppendError::Validation(e) => AppError::Validation(e),
            AppendError::Storage(e) => AppError::Storage(e),
        }
    }
}
