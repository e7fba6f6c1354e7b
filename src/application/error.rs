use serde::Serialize;
use thiserror::Error;

use crate::storage::RepositoryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Voucher already exist.")]
    VoucherAlreadyExists(String),

    #[error("Voucher does not exist.")]
    VoucherNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Business-rule violation: duplicate or missing voucher
    Conflict,
    /// Failure reported by the persistence layer
    Repository,
}

/// Serializable `{ type, message }` form of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::VoucherAlreadyExists(_) | AppError::VoucherNotFound(_) => {
                ErrorKind::Conflict
            }
            AppError::Repository(_) => ErrorKind::Repository,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_messages() {
        let exists = AppError::VoucherAlreadyExists("PROMO".into());
        assert_eq!(exists.kind(), ErrorKind::Conflict);
        assert_eq!(exists.message(), "Voucher already exist.");

        let missing = AppError::VoucherNotFound("PROMO".into());
        assert_eq!(missing.kind(), ErrorKind::Conflict);
        assert_eq!(missing.message(), "Voucher does not exist.");
    }

    #[test]
    fn test_body_serializes_type_and_message() {
        let body = AppError::VoucherNotFound("NOPE".into()).to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "conflict", "message": "Voucher does not exist." })
        );
    }

    #[test]
    fn test_repository_errors_pass_through() {
        let err: AppError = RepositoryError::AlreadyUsed("PROMO".into()).into();
        assert_eq!(err.kind(), ErrorKind::Repository);
        assert!(!err.is_conflict());
        assert_eq!(err.message(), "Voucher already used: PROMO");
    }
}
