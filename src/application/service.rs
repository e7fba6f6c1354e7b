use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{Amount, Percent, Voucher, discounted_amount, is_eligible};
use crate::storage::{SqliteVoucherRepository, VoucherRepository};

use super::AppError;

/// Application service for creating and redeeming vouchers.
/// This is the primary interface for any client (CLI, API, etc.).
pub struct VoucherService<R = SqliteVoucherRepository> {
    repo: R,
}

/// Outcome of applying a voucher to a purchase.
///
/// `applied: false` is a regular business outcome (the purchase was below the
/// minimum), not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherApplication {
    pub amount: Amount,
    pub discount: Percent,
    pub final_amount: Amount,
    pub applied: bool,
}

impl VoucherService<SqliteVoucherRepository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, anyhow::Error> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = SqliteVoucherRepository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, anyhow::Error> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = SqliteVoucherRepository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }
}

impl<R: VoucherRepository> VoucherService<R> {
    /// Create a new voucher service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Create a new voucher. Fails with a conflict if the code is taken.
    pub async fn create_voucher(
        &self,
        code: &str,
        discount: Percent,
    ) -> Result<Voucher, AppError> {
        if self.repo.get_voucher_by_code(code).await?.is_some() {
            warn!(code, "voucher already exists");
            return Err(AppError::VoucherAlreadyExists(code.to_string()));
        }

        let voucher = self.repo.create_voucher(code, discount).await?;
        info!(code, discount, "voucher created");
        Ok(voucher)
    }

    /// Apply a voucher to a purchase amount.
    ///
    /// Purchases of at least [`MIN_APPLY_AMOUNT`](crate::domain::MIN_APPLY_AMOUNT)
    /// redeem the voucher through the repository and get the discount. Smaller
    /// purchases leave the voucher untouched and pay the full amount.
    pub async fn apply_voucher(
        &self,
        code: &str,
        amount: Amount,
    ) -> Result<VoucherApplication, AppError> {
        let voucher = self.get_voucher(code).await?;

        if !is_eligible(amount) {
            debug!(code, amount, "amount below minimum, voucher not applied");
            return Ok(VoucherApplication {
                amount,
                discount: voucher.discount,
                final_amount: amount,
                applied: false,
            });
        }

        self.repo.use_voucher(code).await?;

        let final_amount = discounted_amount(amount, voucher.discount);
        info!(code, amount, final_amount, "voucher applied");

        Ok(VoucherApplication {
            amount,
            discount: voucher.discount,
            final_amount,
            applied: true,
        })
    }

    /// Get a voucher by code.
    pub async fn get_voucher(&self, code: &str) -> Result<Voucher, AppError> {
        debug!(code, "looking up voucher");
        match self.repo.get_voucher_by_code(code).await? {
            Some(voucher) => Ok(voucher),
            None => {
                warn!(code, "voucher does not exist");
                Err(AppError::VoucherNotFound(code.to_string()))
            }
        }
    }

    /// List vouchers, optionally including the ones already used.
    pub async fn list_vouchers(&self, include_used: bool) -> Result<Vec<Voucher>, AppError> {
        let vouchers = self.repo.list_vouchers().await?;
        Ok(vouchers
            .into_iter()
            .filter(|v| include_used || !v.used)
            .collect())
    }
}
