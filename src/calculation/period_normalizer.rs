//! Period normalization.
//!
//! Converts an observation's figures to annual terms in the currency they
//! were published in. No currency conversion happens here.

use rust_decimal::Decimal;

use crate::models::{NormalizedObservation, SalaryObservation, SalaryPeriod};

/// Months per year.
pub const MONTHS_PER_YEAR: i64 = 12;

/// Working hours per year (40 hours × 52 weeks).
pub const HOURS_PER_YEAR: i64 = 2080;

/// Returns the multiplier that annualizes an amount published for `period`.
pub fn annualization_factor(period: SalaryPeriod) -> Decimal {
    match period {
        SalaryPeriod::Yearly => Decimal::ONE,
        SalaryPeriod::Monthly => Decimal::from(MONTHS_PER_YEAR),
        SalaryPeriod::Hourly => Decimal::from(HOURS_PER_YEAR),
    }
}

/// Converts an observation to annual terms.
///
/// # Examples
///
/// ```
/// use market_intel::calculation::{parse_salary, to_annual};
/// use rust_decimal::Decimal;
///
/// let obs = parse_salary("€6,100–€7,900/month").unwrap();
/// let annual = to_annual(&obs);
/// assert_eq!(annual.annual_min, Decimal::from(73_200));
/// assert_eq!(annual.annual_max, Decimal::from(94_800));
/// ```
pub fn to_annual(obs: &SalaryObservation) -> NormalizedObservation {
    let factor = annualization_factor(obs.period);
    NormalizedObservation {
        annual_min: obs.min_amount * factor,
        annual_max: obs.max_amount * factor,
        currency: obs.currency,
        source_period: obs.period,
        raw_text: obs.raw_text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn observation(min: &str, max: &str, period: SalaryPeriod) -> SalaryObservation {
        SalaryObservation::new(dec(min), dec(max), Currency::Eur, period, "test").unwrap()
    }

    #[test]
    fn test_yearly_is_unchanged() {
        let annual = to_annual(&observation("60000", "70000", SalaryPeriod::Yearly));
        assert_eq!(annual.annual_min, dec("60000"));
        assert_eq!(annual.annual_max, dec("70000"));
        assert_eq!(annual.source_period, SalaryPeriod::Yearly);
    }

    #[test]
    fn test_monthly_times_twelve() {
        let annual = to_annual(&observation("5000", "6000", SalaryPeriod::Monthly));
        assert_eq!(annual.annual_min, dec("60000"));
        assert_eq!(annual.annual_max, dec("72000"));
    }

    #[test]
    fn test_hourly_times_2080() {
        let annual = to_annual(&observation("25.50", "30", SalaryPeriod::Hourly));
        assert_eq!(annual.annual_min, dec("53040"));
        assert_eq!(annual.annual_max, dec("62400"));
    }

    #[test]
    fn test_currency_and_raw_text_carry_over() {
        let obs = SalaryObservation::new(
            dec("40"),
            dec("40"),
            Currency::Gbp,
            SalaryPeriod::Hourly,
            "£40/hr",
        )
        .unwrap();
        let annual = to_annual(&obs);
        assert_eq!(annual.currency, Currency::Gbp);
        assert_eq!(annual.raw_text, "£40/hr");
    }
}
