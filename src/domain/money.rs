use std::fmt;

/// Purchase amounts are expressed in currency units (e.g. 200.0 = 200 EUR).
pub type Amount = f64;

/// Discount as an integer percentage, conventionally within 0..=100.
pub type Percent = i64;

/// Purchases below this amount keep their voucher untouched.
pub const MIN_APPLY_AMOUNT: Amount = 100.0;

/// Returns true if a voucher may be redeemed against `amount`.
pub fn is_eligible(amount: Amount) -> bool {
    amount >= MIN_APPLY_AMOUNT
}

/// Amount left to pay once `discount` percent has been taken off.
/// The percentage is turned into a rate before multiplying, so
/// (100.0, 55) -> 44.99999999999999, not 45.0.
/// Example: (200.0, 20) -> 160.0
pub fn discounted_amount(amount: Amount, discount: Percent) -> Amount {
    amount - amount * (discount as f64 / 100.0)
}

/// Format an amount with two decimals.
/// Example: 160.0 -> "160.00", 12.5 -> "12.50"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Parse a decimal string into a purchase amount. Negative amounts are rejected.
/// Example: "200" -> 200.0, "99.90" -> 99.9
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let amount: Amount = input
        .trim()
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;

    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    if amount < 0.0 {
        return Err(ParseAmountError::Negative);
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    NotFinite,
    Negative,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::NotFinite => write!(f, "amount must be a finite number"),
            ParseAmountError::Negative => write!(f, "amount must not be negative"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
