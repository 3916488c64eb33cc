//! Arbitrary-precision decimal carried as its literal text.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::registry::Builtin;
use crate::{FieldError, Fields, Registrable};

/// A decimal number of any precision.
///
/// The codec does no arithmetic; it keeps the literal exactly as written so
/// trailing zeros and exponents survive a round-trip. Equality is therefore
/// textual: `1.0` and `1.00` are different values.
///
/// Accepted forms: an optional sign, digits with an optional fraction and
/// optional exponent (`-12.50`, `.5`, `1e-7`), or one of `Infinity`, `Inf`,
/// `NaN`, `sNaN` (any case, NaNs with an optional digit payload).
///
/// ```
/// use fastpack::Decimal;
///
/// let price: Decimal = "19.990".parse().unwrap();
/// assert_eq!(price.as_str(), "19.990");
/// assert!(price.is_finite());
/// assert!("1.2.3".parse::<Decimal>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal {0:?}")]
pub struct ParseDecimalError(String);

impl Decimal {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0
            .trim_start_matches(['+', '-'])
            .starts_with(|c: char| c.is_ascii_digit() || c == '.')
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_decimal_literal(s) {
            Ok(Decimal(s.to_owned()))
        } else {
            Err(ParseDecimalError(s.to_owned()))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_decimal_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let lower = unsigned.to_ascii_lowercase();
    if lower == "inf" || lower == "infinity" {
        return true;
    }
    if let Some(payload) = lower.strip_prefix("snan").or_else(|| lower.strip_prefix("nan")) {
        return payload.bytes().all(|b| b.is_ascii_digit());
    }

    let (mantissa, exponent) = match lower.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (lower.as_str(), None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = !(int.is_empty() && frac.is_empty()) && digits(int) && digits(frac);
    let exponent_ok = exponent.map_or(true, |e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && digits(e)
    });
    mantissa_ok && exponent_ok
}

impl Registrable for Decimal {
    fn encode(&self) -> Fields {
        Fields::new().with("value", self.as_str())
    }

    fn decode(mut fields: Fields) -> Result<Self, FieldError> {
        fields
            .take_str("value")?
            .parse()
            .map_err(|err| FieldError::invalid("value", err))
    }
}

impl Builtin for Decimal {
    const TAG: &'static str = "decimal";
}
