use std::fmt;

/// Money is represented as integer cents to avoid floating-point drift when summing.
/// 1 unit = 100 cents, so 12.50 = 1250 cents.
pub type Cents = i64;

/// Largest accepted magnitude for a single amount: one trillion units.
/// Keeps sums over any realistic ledger inside `i64`.
pub const MAX_AMOUNT_CENTS: Cents = 100_000_000_000_000;

/// Format cents as a decimal string with exactly two fraction digits.
/// Example: 1250 -> "12.50", -5 -> "-0.05"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Example: "12.50" -> 1250, "12.5" -> 1250, "-3" -> -300, ".5" -> 50
///
/// Digits past the cents are only accepted when they are zeros ("1.250");
/// anything finer is rejected rather than rounded away.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !fraction_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::OutOfRange)?
    };

    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        // "5" means 50 cents
        1 => i64::from(fraction_str.as_bytes()[0] - b'0') * 10,
        _ => {
            if fraction_str[2..].bytes().any(|b| b != b'0') {
                return Err(ParseCentsError::TooPrecise);
            }
            fraction_str[..2]
                .parse()
                .map_err(|_| ParseCentsError::InvalidFormat)?
        }
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .filter(|c| *c <= MAX_AMOUNT_CENTS)
        .ok_or(ParseCentsError::OutOfRange)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    OutOfRange,
    TooPrecise,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::OutOfRange => write!(f, "amount is too large"),
            ParseCentsError::TooPrecise => write!(f, "amount has more than two decimal places"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
