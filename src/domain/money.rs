use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Largest amount, per label or in the balance, the ledger holds
/// (9_999_999_999_999.99). Up to this bound an amount written to the record
/// as a decimal number reads back to exactly the same cents.
pub const MAX_AMOUNT: Cents = 999_999_999_999_999;

/// Parse a user-typed amount into cents.
///
/// Either `,` or `.` is accepted as the decimal separator: the first step
/// replaces every comma with a period, so "10,50" and "10.50" are the same
/// amount. Only non-negative plain decimals with at most two fractional
/// digits are accepted, up to [`MAX_AMOUNT`].
/// Example: "50" -> 5000, "12,5" -> 1250, ".05" -> 5
pub fn parse_amount(input: &str) -> Result<Cents, ParseAmountError> {
    let normalized = input.trim().replace(',', ".");
    let digits = normalized.strip_prefix('+').unwrap_or(&normalized);

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    if !all_digits(units_str) || !all_digits(decimal_str) {
        return Err(ParseAmountError::InvalidFormat);
    }
    if decimal_str.len() > 2 {
        return Err(ParseAmountError::TooManyDecimals);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseAmountError::OutOfRange)?
    };

    // Pad the fractional part to exactly 2 digits
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => decimal_str.parse::<i64>().unwrap_or_default() * 10,
        _ => decimal_str.parse().unwrap_or_default(),
    };

    units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(decimal_cents))
        .filter(|cents| *cents <= MAX_AMOUNT)
        .ok_or(ParseAmountError::OutOfRange)
}

/// Whether `cents` is within the range the ledger can hold.
pub fn in_range(cents: Cents) -> bool {
    (-MAX_AMOUNT..=MAX_AMOUNT).contains(&cents)
}

/// Convert a decimal number (as stored in the durable record) to cents,
/// rounding to the nearest cent. Returns None for non-finite values and
/// values past [`MAX_AMOUNT`].
pub fn cents_from_f64(value: f64) -> Option<Cents> {
    if !value.is_finite() {
        return None;
    }
    let cents = (value * 100.0).round();
    if cents.abs() > MAX_AMOUNT as f64 {
        return None;
    }
    Some(cents as Cents)
}

/// Convert cents to the decimal number written to the durable record.
pub fn cents_to_f64(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    TooManyDecimals,
    OutOfRange,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::TooManyDecimals => write!(f, "more than two decimal places"),
            ParseAmountError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
