use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Voucher not found in storage: {0}")]
    NotFound(String),

    #[error("Voucher code already stored: {0}")]
    Duplicate(String),

    #[error("Voucher already used: {0}")]
    AlreadyUsed(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
