//! Balance calculator

use crate::models::Money;

/// Amount still payable: `max(0, total - paid)`
///
/// Overpayment never produces a negative balance.
pub fn remaining(total: Money, paid: Money) -> Money {
    total.saturating_sub_floor(paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_payment() {
        let r = remaining(Money::from_cents(50000), Money::from_cents(20000));
        assert_eq!(r, Money::from_cents(30000));
    }

    #[test]
    fn test_remaining_is_difference_when_not_overpaid() {
        for total in (0..=2000).step_by(125) {
            for paid in (0..=total).step_by(75) {
                let r = remaining(Money::from_cents(total), Money::from_cents(paid));
                assert_eq!(r.cents(), total - paid);
            }
        }
    }

    #[test]
    fn test_remaining_never_negative() {
        for total in (0..=1000).step_by(100) {
            for paid in (0..=3000).step_by(250) {
                let r = remaining(Money::from_cents(total), Money::from_cents(paid));
                assert!(!r.is_negative());
            }
        }
        assert_eq!(
            remaining(Money::from_cents(100), Money::from_cents(150)),
            Money::zero()
        );
    }

    #[test]
    fn test_extreme_amounts_do_not_overflow() {
        let r = remaining(Money::from_cents(i64::MAX), Money::from_cents(i64::MIN));
        assert_eq!(r, Money::from_cents(i64::MAX));
        assert_eq!(
            remaining(Money::from_cents(i64::MIN), Money::from_cents(i64::MAX)),
            Money::zero()
        );
    }
}
