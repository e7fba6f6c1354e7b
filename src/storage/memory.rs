use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{Percent, Voucher};

use super::{RepositoryError, VoucherRepository};

/// In-process voucher store with the same contract as the SQLite repository.
/// Used as a test double and for ephemeral sessions.
#[derive(Default)]
pub struct InMemoryVoucherRepository {
    vouchers: RwLock<BTreeMap<String, Voucher>>,
}

impl InMemoryVoucherRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_vouchers(vouchers: impl IntoIterator<Item = Voucher>) -> Self {
        let map = vouchers
            .into_iter()
            .map(|v| (v.code.clone(), v))
            .collect();
        Self {
            vouchers: RwLock::new(map),
        }
    }
}

#[async_trait]
impl VoucherRepository for InMemoryVoucherRepository {
    async fn get_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, RepositoryError> {
        Ok(self.vouchers.read().await.get(code).cloned())
    }

    async fn create_voucher(
        &self,
        code: &str,
        discount: Percent,
    ) -> Result<Voucher, RepositoryError> {
        let mut vouchers = self.vouchers.write().await;
        if vouchers.contains_key(code) {
            return Err(RepositoryError::Duplicate(code.to_string()));
        }

        let voucher = Voucher::new(code, discount);
        vouchers.insert(voucher.code.clone(), voucher.clone());
        Ok(voucher)
    }

    async fn use_voucher(&self, code: &str) -> Result<Voucher, RepositoryError> {
        let mut vouchers = self.vouchers.write().await;
        let voucher = vouchers
            .get_mut(code)
            .ok_or_else(|| RepositoryError::NotFound(code.to_string()))?;

        if !voucher.mark_used(Utc::now()) {
            return Err(RepositoryError::AlreadyUsed(code.to_string()));
        }
        Ok(voucher.clone())
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, RepositoryError> {
        Ok(self.vouchers.read().await.values().cloned().collect())
    }
}
