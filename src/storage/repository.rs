use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Percent, Voucher};

use super::{MIGRATION_001_VOUCHERS, RepositoryError, VoucherRepository};

const VOUCHER_COLUMNS: &str = "code, discount, used, created_at, used_at";

/// SQLite-backed voucher repository.
pub struct SqliteVoucherRepository {
    pool: SqlitePool,
}

impl SqliteVoucherRepository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(MIGRATION_001_VOUCHERS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    fn row_to_voucher(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<Voucher> {
        let created_at_str: String = row.get("created_at");
        let used_at_str: Option<String> = row.get("used_at");

        Ok(Voucher {
            code: row.get("code"),
            discount: row.get("discount"),
            used: row.get::<i32, _>("used") != 0,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            used_at: used_at_str
                .map(|s| DateTime::parse_from_rfc3339(&s))
                .transpose()
                .context("Invalid used_at timestamp")?
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }
}

#[async_trait]
impl VoucherRepository for SqliteVoucherRepository {
    async fn get_voucher_by_code(&self, code: &str) -> Result<Option<Voucher>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM vouchers WHERE code = ?",
            VOUCHER_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch voucher by code")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_voucher(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_voucher(
        &self,
        code: &str,
        discount: Percent,
    ) -> Result<Voucher, RepositoryError> {
        let voucher = Voucher::new(code, discount);

        let result = sqlx::query(
            r#"
            INSERT INTO vouchers (code, discount, used, created_at, used_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&voucher.code)
        .bind(voucher.discount)
        .bind(voucher.used)
        .bind(voucher.created_at.to_rfc3339())
        .bind(voucher.used_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(voucher),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(RepositoryError::Duplicate(voucher.code))
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context("Failed to save voucher")
                .into()),
        }
    }

    async fn use_voucher(&self, code: &str) -> Result<Voucher, RepositoryError> {
        // Only an unused row matches, so two racing redemptions cannot both win
        let row = sqlx::query(&format!(
            "UPDATE vouchers SET used = 1, used_at = ? WHERE code = ? AND used = 0 RETURNING {}",
            VOUCHER_COLUMNS
        ))
        .bind(Utc::now().to_rfc3339())
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to mark voucher used")?;

        if let Some(row) = row {
            return Ok(Self::row_to_voucher(&row)?);
        }

        match self.get_voucher_by_code(code).await? {
            Some(_) => Err(RepositoryError::AlreadyUsed(code.to_string())),
            None => Err(RepositoryError::NotFound(code.to_string())),
        }
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM vouchers ORDER BY code",
            VOUCHER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list vouchers")?;

        Ok(rows
            .iter()
            .map(Self::row_to_voucher)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }
}
