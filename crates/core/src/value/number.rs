//! Decimal number text.
//!
//! Numbers are arbitrary-precision `BigDecimal`s throughout; no `f64` is
//! involved in parsing, comparison or rendering, and no digit is ever
//! dropped.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use rust_decimal::Decimal;

use crate::error::ValueError;

/// Past this many zeros between the digits and the decimal point,
/// [`format_number`] switches to exponent form.
const PLAIN_ZEROS_LIMIT: i64 = 20;

/// Parse plain (`"12.50"`, `"-3"`) or scientific (`"1e3"`, `"2.5E-2"`)
/// decimal text exactly.
pub fn parse_number(text: &str) -> Result<BigDecimal, ValueError> {
    BigDecimal::from_str(text.trim()).map_err(|err| ValueError::InvalidNumber {
        text: text.to_string(),
        reason: err.to_string(),
    })
}

/// Canonical text for a number: trailing zeros stripped, and a JSON
/// exponent (`1e30`, `5e-25`) once the zero padding would pass twenty
/// digits.
pub fn format_number(n: &BigDecimal) -> String {
    let (int, scale) = n.normalized().into_bigint_and_exponent();
    let text = int.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.as_str()),
    };
    if digits == "0" {
        return "0".to_string();
    }

    let len = digits.len() as i64;
    if scale <= 0 {
        if -scale > PLAIN_ZEROS_LIMIT {
            return format!("{}{}e{}", sign, digits, -scale);
        }
        return format!("{}{}{}", sign, digits, "0".repeat((-scale) as usize));
    }
    if scale < len {
        let (whole, frac) = digits.split_at((len - scale) as usize);
        return format!("{}{}.{}", sign, whole, frac);
    }
    if scale - len > PLAIN_ZEROS_LIMIT {
        return format!("{}{}e-{}", sign, digits, scale);
    }
    format!("{}0.{}{}", sign, "0".repeat((scale - len) as usize), digits)
}

/// Numeric equality on normalized forms, so `1`, `1.0` and `1e0` agree
/// without rescaling either operand.
pub(crate) fn numbers_equal(a: &BigDecimal, b: &BigDecimal) -> bool {
    a.normalized().into_bigint_and_exponent() == b.normalized().into_bigint_and_exponent()
}

pub(crate) fn from_decimal(d: Decimal) -> BigDecimal {
    BigDecimal::new(BigInt::from(d.mantissa()), i64::from(d.scale()))
}

/// `None` when `n` does not fit a `rust_decimal::Decimal` exactly.
pub(crate) fn to_decimal(n: &BigDecimal) -> Option<Decimal> {
    let n = n.normalized();
    let (_, scale) = n.as_bigint_and_exponent();
    let n = if scale < 0 { n.with_scale(0) } else { n };
    let (mantissa, scale) = n.into_bigint_and_exponent();
    let mantissa = i128::try_from(mantissa).ok()?;
    let scale = u32::try_from(scale).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}
