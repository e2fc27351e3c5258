use crate::error::AnalyticsError;
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn overflow(metric: &str) -> AnalyticsError {
    AnalyticsError::Overflow(metric.to_string())
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    a.checked_add(b).ok_or_else(|| overflow(metric))
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    a.checked_sub(b).ok_or_else(|| overflow(metric))
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    a.checked_mul(b).ok_or_else(|| overflow(metric))
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal, metric: &str) -> Result<Decimal, AnalyticsError> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = part.checked_div(whole).ok_or_else(|| overflow(metric))?;
    checked_mul(ratio, HUNDRED, metric)
}

/// Percent change of `value` relative to `base`, or zero when `base` is zero.
pub(crate) fn change_percent(value: Decimal, base: Decimal) -> Result<Decimal, AnalyticsError> {
    if base.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = value
        .checked_div(base)
        .ok_or_else(|| overflow("change_percent"))?;
    let change = checked_sub(ratio, Decimal::ONE, "change_percent")?;
    checked_mul(change, HUNDRED, "change_percent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_denominators_yield_zero() {
        assert_eq!(percent_of(dec!(5), Decimal::ZERO, "t"), Ok(Decimal::ZERO));
        assert_eq!(change_percent(dec!(5), Decimal::ZERO), Ok(Decimal::ZERO));
    }

    #[test]
    fn change_is_relative_to_base() {
        assert_eq!(change_percent(dec!(1100), dec!(1000)), Ok(dec!(10)));
        assert_eq!(change_percent(dec!(900), dec!(1000)), Ok(dec!(-10)));
        assert_eq!(change_percent(dec!(1000), dec!(1000)), Ok(Decimal::ZERO));
    }

    #[test]
    fn overflowing_ratios_are_errors() {
        assert!(matches!(
            percent_of(Decimal::MAX, dec!(0.0000000001), "performance"),
            Err(AnalyticsError::Overflow(m)) if m == "performance"
        ));
        assert!(matches!(
            change_percent(Decimal::MAX, dec!(0.5)),
            Err(AnalyticsError::Overflow(_))
        ));
        assert!(checked_add(Decimal::MAX, Decimal::ONE, "total").is_err());
    }
}
