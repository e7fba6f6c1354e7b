use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Percent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    /// Case-sensitive unique code
    pub code: String,
    pub discount: Percent,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl Voucher {
    pub fn new(code: impl Into<String>, discount: Percent) -> Self {
        Self {
            code: code.into(),
            discount,
            used: false,
            created_at: Utc::now(),
            used_at: None,
        }
    }

    /// Mark the voucher as redeemed. Returns false if it already was.
    pub fn mark_used(&mut self, at: DateTime<Utc>) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        self.used_at = Some(at);
        true
    }

    pub fn status(&self) -> &'static str {
        if self.used { "used" } else { "available" }
    }
}
