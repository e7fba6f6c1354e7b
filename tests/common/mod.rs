// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;
use vouchers::application::VoucherService;
use vouchers::domain::{Percent, Voucher};
use vouchers::storage::{InMemoryVoucherRepository, RepositoryError, VoucherRepository};

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(VoucherService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = VoucherService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a service over an in-memory store that records calls
pub fn counting_service(vouchers: Vec<Voucher>) -> VoucherService<CountingRepository> {
    let repo = CountingRepository::new(InMemoryVoucherRepository::with_vouchers(vouchers));
    VoucherService::new(repo)
}

/// Repository wrapper counting every call made through the trait.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryVoucherRepository,
    lookups: AtomicUsize,
    creates: AtomicUsize,
    uses: AtomicUsize,
    fail_storage: bool,
}

impl CountingRepository {
    pub fn new(inner: InMemoryVoucherRepository) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// A repository whose every call fails with a storage error.
    pub fn failing() -> Self {
        Self {
            fail_storage: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn uses(&self) -> usize {
        self.uses.load(Ordering::SeqCst)
    }

    fn check_storage(&self) -> Result<(), RepositoryError> {
        if self.fail_storage {
            return Err(anyhow::anyhow!("storage unavailable").into());
        }
        Ok(())
    }
}

#[async_trait]
impl VoucherRepository for CountingRepository {
    async fn get_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_storage()?;
        self.inner.get_voucher_by_code(code).await
    }

    async fn create_voucher(
        &self,
        code: &str,
        discount: Percent,
    ) -> Result<Voucher, RepositoryError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check_storage()?;
        self.inner.create_voucher(code, discount).await
    }

    async fn use_voucher(&self, code: &str) -> Result<Voucher, RepositoryError> {
        self.uses.fetch_add(1, Ordering::SeqCst);
        self.check_storage()?;
        self.inner.use_voucher(code).await
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, RepositoryError> {
        self.check_storage()?;
        self.inner.list_vouchers().await
    }
}

