//! Salary observation models.
//!
//! A [`SalaryObservation`] is one compensation mention parsed out of a
//! posting's free text. A [`NormalizedObservation`] is the same mention
//! expressed in annual terms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The closed set of currencies the parser recognizes.
///
/// Amounts are never converted between currencies; each figure stays in the
/// currency it was published in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar.
    Usd,
    /// Euro. The default when nothing in the text or location decides.
    #[default]
    Eur,
    /// Pound sterling.
    Gbp,
}

impl Currency {
    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// Returns the display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

/// The period a published salary figure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryPeriod {
    /// Per year. The default when no period keyword is present.
    Yearly,
    /// Per month.
    Monthly,
    /// Per hour.
    Hourly,
}

/// One parsed compensation mention.
///
/// # Example
///
/// ```
/// use market_intel::models::{Currency, SalaryObservation, SalaryPeriod};
/// use rust_decimal::Decimal;
///
/// let obs = SalaryObservation::new(
///     Decimal::from(150_000),
///     Decimal::from(120_000),
///     Currency::Usd,
///     SalaryPeriod::Yearly,
///     "$120k-$150k",
/// )
/// .unwrap();
/// assert_eq!(obs.min_amount, Decimal::from(120_000));
/// assert_eq!(obs.max_amount, Decimal::from(150_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryObservation {
    /// The lower bound of the published figure.
    pub min_amount: Decimal,
    /// The upper bound of the published figure (equal to `min_amount` for a single figure).
    pub max_amount: Decimal,
    /// The detected currency.
    pub currency: Currency,
    /// The detected period.
    pub period: SalaryPeriod,
    /// The original string, kept for traceability.
    pub raw_text: String,
}

impl SalaryObservation {
    /// Creates an observation, ordering the bounds so that `min_amount <= max_amount`.
    ///
    /// Returns `None` if either amount is not strictly positive; a zero figure is
    /// never a salary signal.
    pub fn new(
        a: Decimal,
        b: Decimal,
        currency: Currency,
        period: SalaryPeriod,
        raw_text: impl Into<String>,
    ) -> Option<Self> {
        if a <= Decimal::ZERO || b <= Decimal::ZERO {
            return None;
        }
        let (min_amount, max_amount) = if a <= b { (a, b) } else { (b, a) };
        Some(Self {
            min_amount,
            max_amount,
            currency,
            period,
            raw_text: raw_text.into(),
        })
    }

    /// Returns true if the observation was a single figure rather than a range.
    pub fn is_single_figure(&self) -> bool {
        self.min_amount == self.max_amount
    }
}

/// A salary observation converted to annual terms in its original currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedObservation {
    /// Annualized lower bound.
    pub annual_min: Decimal,
    /// Annualized upper bound.
    pub annual_max: Decimal,
    /// The currency of both bounds.
    pub currency: Currency,
    /// The period the figure was originally published in.
    pub source_period: SalaryPeriod,
    /// The original string.
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_swaps_inverted_bounds() {
        let obs = SalaryObservation::new(
            Decimal::from(7900),
            Decimal::from(6100),
            Currency::Eur,
            SalaryPeriod::Monthly,
            "€7,900 - €6,100",
        )
        .unwrap();
        assert_eq!(obs.min_amount, Decimal::from(6100));
        assert_eq!(obs.max_amount, Decimal::from(7900));
    }

    #[test]
    fn test_new_rejects_zero_amount() {
        let obs = SalaryObservation::new(
            Decimal::ZERO,
            Decimal::from(50_000),
            Currency::Eur,
            SalaryPeriod::Yearly,
            "0 - 50000",
        );
        assert!(obs.is_none());
    }

    #[test]
    fn test_single_figure_detection() {
        let obs = SalaryObservation::new(
            Decimal::from(85_000),
            Decimal::from(85_000),
            Currency::Eur,
            SalaryPeriod::Yearly,
            "85k",
        )
        .unwrap();
        assert!(obs.is_single_figure());
    }

    #[test]
    fn test_currency_serializes_as_iso_code() {
        assert_eq!(serde_json::to_string(&Currency::Gbp).unwrap(), "\"GBP\"");
        assert_eq!(Currency::Usd.code(), "USD");
        assert_eq!(Currency::default(), Currency::Eur);
    }

    #[test]
    fn test_period_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SalaryPeriod::Monthly).unwrap(),
            "\"monthly\""
        );
    }
}
