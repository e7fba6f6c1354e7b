use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::VoucherService;
use crate::domain::Voucher;
use crate::storage::VoucherRepository;

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub vouchers: Vec<Voucher>,
}

/// Exporter for converting voucher data to various formats
pub struct Exporter<'a, R> {
    service: &'a VoucherService<R>,
}

impl<'a, R: VoucherRepository> Exporter<'a, R> {
    pub fn new(service: &'a VoucherService<R>) -> Self {
        Self { service }
    }

    /// Export every voucher (used or not) to CSV format
    pub async fn export_vouchers_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let vouchers = self.service.list_vouchers(true).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["code", "discount", "used", "created_at", "used_at"])?;

        let mut count = 0;
        for voucher in &vouchers {
            csv_writer.write_record([
                voucher.code.clone(),
                voucher.discount.to_string(),
                voucher.used.to_string(),
                voucher.created_at.to_rfc3339(),
                voucher
                    .used_at
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export all vouchers as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<VoucherSnapshot> {
        let vouchers = self.service.list_vouchers(true).await?;

        let snapshot = VoucherSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            vouchers,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
