mod error;
mod memory;
mod repository;

pub use error::*;
pub use memory::*;
pub use repository::*;

use async_trait::async_trait;

use crate::domain::{Percent, Voucher};

/// SQL migration for the vouchers table
pub const MIGRATION_001_VOUCHERS: &str = include_str!("migrations/001_vouchers.sql");

/// Persistence contract consumed by the voucher service.
///
/// Implementations own the `used` flag: `use_voucher` is the only place a
/// voucher transitions to used, and it must refuse a voucher that already is
/// (`RepositoryError::AlreadyUsed`).
#[async_trait]
pub trait VoucherRepository: Send + Sync {
    /// Fetch a voucher by its exact (case-sensitive) code.
    async fn get_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, RepositoryError>;

    /// Insert a new, unused voucher.
    async fn create_voucher(
        &self,
        code: &str,
        discount: Percent,
    ) -> Result<Voucher, RepositoryError>;

    /// Mark a voucher used and return the updated record.
    async fn use_voucher(&self, code: &str) -> Result<Voucher, RepositoryError>;

    /// All vouchers, ordered by code.
    async fn list_vouchers(&self) -> Result<Vec<Voucher>, RepositoryError>;
}
