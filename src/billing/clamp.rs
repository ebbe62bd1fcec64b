//! Payment input clamp
//!
//! A typed payment amount is read leniently (the leading number of the
//! text counts, trailing junk is ignored) and then forced into
//! `[0, remaining]`. The outcome says what happened so the caller can show
//! the right notice and rewrite the field.

use std::fmt;

use crate::models::Money;

/// Result of clamping one payment input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampOutcome {
    /// Already within `[0, remaining]`
    Accepted(Money),
    /// Not a number, or negative; reset to zero
    Invalid,
    /// Above the remaining amount; lowered to it
    Capped(Money),
    /// A positive amount while nothing remains; reset to zero
    NothingDue,
}

impl ClampOutcome {
    /// The amount the field holds after clamping
    pub fn value(&self) -> Money {
        match self {
            Self::Accepted(m) | Self::Capped(m) => *m,
            Self::Invalid | Self::NothingDue => Money::zero(),
        }
    }

    /// The input was refused and must block submission
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Invalid | Self::NothingDue)
    }

    /// The field text no longer matches the value and must be rewritten
    pub fn is_corrected(&self) -> bool {
        !matches!(self, Self::Accepted(_))
    }

    /// Notice to show the user, if any
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Accepted(_) => None,
            Self::Invalid => Some("Amount must be a non-negative number.".to_string()),
            Self::Capped(m) => Some(format!(
                "Amount capped to {} (remaining balance).",
                m
            )),
            Self::NothingDue => Some("Nothing remains to be paid.".to_string()),
        }
    }
}

impl fmt::Display for ClampOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(msg) => f.write_str(&msg),
            None => write!(f, "{}", self.value()),
        }
    }
}

/// Read the leading decimal number of `raw`
///
/// Leading whitespace is skipped; an optional sign, digits with an optional
/// fraction and exponent, or `Infinity` are read; anything after that is
/// ignored. `None` when no number starts the text.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let negative = bytes.first() == Some(&b'-');

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Clamp an already-parsed amount into `[0, remaining]`
pub fn clamp_amount(amount: Money, remaining: Money) -> Money {
    let remaining = remaining.max(Money::zero());
    amount.max(Money::zero()).min(remaining)
}

/// Clamp raw payment text against the remaining balance
pub fn clamp_payment_input(raw: &str, remaining: Money) -> ClampOutcome {
    let remaining = remaining.max(Money::zero());

    let value = match parse_leading_number(raw) {
        Some(v) if !v.is_nan() && v >= 0.0 => v,
        _ => return ClampOutcome::Invalid,
    };

    let over = !value.is_finite() || Money::from_major(value) > remaining;
    if !over {
        return ClampOutcome::Accepted(Money::from_major(value));
    }

    if remaining.is_zero() {
        ClampOutcome::NothingDue
    } else {
        ClampOutcome::Capped(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(parse_leading_number("450"), Some(450.0));
        assert_eq!(parse_leading_number("  12.5abc"), Some(12.5));
        assert_eq!(parse_leading_number("12."), Some(12.0));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("-3"), Some(-3.0));
        assert_eq!(parse_leading_number("1e2x"), Some(100.0));
        assert_eq!(parse_leading_number("1e"), Some(1.0));
        assert_eq!(parse_leading_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn test_capped_to_remaining() {
        // total 500, paid 200
        let remaining = crate::billing::remaining(m(50000), m(20000));
        let outcome = clamp_payment_input("450", remaining);
        assert_eq!(outcome, ClampOutcome::Capped(m(30000)));
        assert_eq!(outcome.value(), m(30000));
        assert!(!outcome.is_rejected());
        assert!(outcome.message().unwrap().contains("300.00"));
    }

    #[test]
    fn test_accepted_within_range() {
        assert_eq!(clamp_payment_input("120.5", m(30000)), ClampOutcome::Accepted(m(12050)));
        assert_eq!(clamp_payment_input("300", m(30000)), ClampOutcome::Accepted(m(30000)));
        assert_eq!(clamp_payment_input("0", m(30000)), ClampOutcome::Accepted(m(0)));
    }

    #[test]
    fn test_invalid_resets_to_zero() {
        for raw in ["abc", "-5", "", "-Infinity"] {
            let outcome = clamp_payment_input(raw, m(30000));
            assert_eq!(outcome, ClampOutcome::Invalid, "input {raw:?}");
            assert_eq!(outcome.value(), Money::zero());
            assert!(outcome.is_rejected());
        }
    }

    #[test]
    fn test_nothing_due_rejects_positive() {
        // total 100, paid 100
        let remaining = crate::billing::remaining(m(10000), m(10000));
        assert_eq!(remaining, Money::zero());
        for raw in ["1", "0.01", "100", "Infinity"] {
            let outcome = clamp_payment_input(raw, remaining);
            assert_eq!(outcome, ClampOutcome::NothingDue);
            assert_eq!(outcome.value(), Money::zero());
            assert!(outcome.is_rejected());
            assert!(outcome.message().is_some());
        }
    }

    #[test]
    fn test_infinity_caps() {
        assert_eq!(clamp_payment_input("Infinity", m(500)), ClampOutcome::Capped(m(500)));
    }

    #[test]
    fn test_result_always_in_range() {
        let inputs = ["-1", "0", "0.004", "0.005", "12", "299.999", "300", "301", "1e9", "x"];
        for remaining in [0, 1, 2999, 30000] {
            for raw in inputs {
                let v = clamp_payment_input(raw, m(remaining)).value();
                assert!(v >= Money::zero() && v <= m(remaining), "{raw} vs {remaining}");
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = ["-1", "0", "7.25", "299.999", "300", "450", "abc", "Infinity"];
        for remaining in [0, 30000] {
            for raw in inputs {
                let once = clamp_payment_input(raw, m(remaining)).value();
                let twice = clamp_payment_input(&once.to_string(), m(remaining)).value();
                assert_eq!(once, twice, "{raw} vs {remaining}");
                assert_eq!(clamp_amount(clamp_amount(once, m(remaining)), m(remaining)), once);
            }
        }
    }

    #[test]
    fn test_clamp_amount() {
        assert_eq!(clamp_amount(m(-5), m(100)), m(0));
        assert_eq!(clamp_amount(m(150), m(100)), m(100));
        assert_eq!(clamp_amount(m(50), m(100)), m(50));
        assert_eq!(clamp_amount(m(50), m(-100)), m(0));
    }
}
