//! Monetary types for the commission calculator.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Mul, Sub};

use crate::error::MonetaryError;

/// A monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value (high precision decimal).
    pub value: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Create from a string value.
    pub fn from_str(value: &str, currency: Currency) -> Result<Self, rust_decimal::Error> {
        Ok(Self {
            value: value.trim().parse()?,
            currency,
        })
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            value: Decimal::ZERO,
            currency,
        }
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Clamp negative amounts to zero.
    pub fn non_negative(self) -> Self {
        Self {
            value: self.value.max(Decimal::ZERO),
            currency: self.currency,
        }
    }

    /// Round up (toward positive infinity) to the currency's minor unit.
    ///
    /// Never rounds down: `0.301 EUR` becomes `0.31 EUR`, `99.001 JPY`
    /// becomes `100 JPY`, and values already on the grid are unchanged.
    pub fn round_up(&self) -> Self {
        let places = self.currency.decimal_places();
        Self {
            value: self
                .value
                .round_dp_with_strategy(places, RoundingStrategy::ToPositiveInfinity),
            currency: self.currency.clone(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

impl Sub for Money {
    type Output = Result<Money, MonetaryError>;

    fn sub(self, other: Money) -> Self::Output {
        if self.currency != other.currency {
            return Err(MonetaryError::CurrencyMismatch {
                expected: self.currency,
                actual: other.currency,
            });
        }
        Ok(Money {
            value: self.value - other.value,
            currency: self.currency,
        })
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rate: Decimal) -> Self::Output {
        Money {
            value: self.value * rate,
            currency: self.currency,
        }
    }
}

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Decimal places used when rounding amounts in this currency.
    /// Currencies without a minor unit round to whole units.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" => 0,
            _ => 2,
        }
    }

    /// The fixed currency all thresholds are expressed in.
    pub fn reference() -> Self {
        Self::eur()
    }

    /// Whether this is the reference currency.
    pub fn is_reference(&self) -> bool {
        *self == Self::reference()
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A currency pair for FX lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being converted from.
    pub base: Currency,
    /// Currency being converted to.
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Pair converting `base` into the reference currency.
    pub fn to_reference(base: Currency) -> Self {
        Self::new(base, Currency::reference())
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    /// Whether both sides are the same currency.
    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// FX rate between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxRate {
    /// The currency pair.
    pub pair: CurrencyPair,
    /// Units of the quote currency per one unit of the base currency.
    pub rate: Decimal,
    /// When this rate was quoted.
    pub quoted_at: chrono::DateTime<chrono::Utc>,
    /// When this rate expires.
    pub valid_until: chrono::DateTime<chrono::Utc>,
    /// Rate source.
    pub source: String,
}

impl FxRate {
    /// Create a new FX rate.
    pub fn new(
        pair: CurrencyPair,
        rate: Decimal,
        valid_for_seconds: i64,
        source: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            pair,
            rate,
            quoted_at: now,
            valid_until: now + chrono::Duration::seconds(valid_for_seconds),
            source: source.into(),
        }
    }

    /// The trivial rate of 1 between a currency and itself.
    pub fn identity(currency: Currency) -> Self {
        Self::new(
            CurrencyPair::new(currency.clone(), currency),
            Decimal::ONE,
            i64::from(u32::MAX),
            "IDENTITY",
        )
    }

    /// Check if the rate is still valid.
    pub fn is_valid(&self) -> bool {
        chrono::Utc::now() < self.valid_until
    }

    /// Convert a base-currency amount into the quote currency.
    /// The result is not rounded.
    pub fn convert(&self, amount: &Money) -> Result<Money, MonetaryError> {
        if amount.currency != self.pair.base {
            return Err(MonetaryError::CurrencyMismatch {
                expected: self.pair.base.clone(),
                actual: amount.currency.clone(),
            });
        }

        Ok(Money::new(amount.value * self.rate, self.pair.quote.clone()))
    }

    /// Convert a quote-currency amount back into the base currency with
    /// this same rate. The result is not rounded.
    pub fn convert_back(&self, amount: &Money) -> Result<Money, MonetaryError> {
        if amount.currency != self.pair.quote {
            return Err(MonetaryError::CurrencyMismatch {
                expected: self.pair.quote.clone(),
                actual: amount.currency.clone(),
            });
        }

        let value = amount
            .value
            .checked_div(self.rate)
            .ok_or_else(|| MonetaryError::InvalidRate(self.pair.clone(), self.rate))?;
        Ok(Money::new(value, self.pair.base.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_subtraction() {
        let m1 = Money::from_str("1200.00", Currency::eur()).unwrap();
        let m2 = Money::from_str("1000", Currency::eur()).unwrap();

        let diff = (m1 - m2).unwrap();
        assert_eq!(diff.value, dec!(200));
    }

    #[test]
    fn test_currency_mismatch() {
        let m1 = Money::from_str("100.00", Currency::usd()).unwrap();
        let m2 = Money::from_str("100.00", Currency::eur()).unwrap();

        assert!(matches!(
            m1 - m2,
            Err(MonetaryError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_non_negative() {
        let m = Money::new(dec!(-880), Currency::eur()).non_negative();
        assert!(m.is_zero());
        let m = Money::new(dec!(5), Currency::eur()).non_negative();
        assert_eq!(m.value, dec!(5));
    }

    #[test]
    fn test_round_up_two_places() {
        let round = |v| Money::new(v, Currency::eur()).round_up().value;
        assert_eq!(round(dec!(100.001)), dec!(100.01));
        assert_eq!(round(dec!(100.00)), dec!(100.00));
        assert_eq!(round(dec!(0.301)), dec!(0.31));
        assert_eq!(round(dec!(0.300)), dec!(0.30));
        assert_eq!(round(dec!(0.0000001)), dec!(0.01));
    }

    #[test]
    fn test_round_up_zero_places() {
        let jpy = Money::new(dec!(99.001), Currency::jpy()).round_up();
        assert_eq!(jpy.value, dec!(100));
        let jpy = Money::new(dec!(5), Currency::jpy()).round_up();
        assert_eq!(jpy.value, dec!(5));
    }

    #[test]
    fn test_fx_rate_round_trip() {
        let pair = CurrencyPair::to_reference(Currency::usd());
        let rate = FxRate::new(pair, dec!(0.8), 30, "TEST");

        let usd = Money::from_str("1500.00", Currency::usd()).unwrap();
        let eur = rate.convert(&usd).unwrap();
        assert_eq!(eur.currency, Currency::eur());
        assert_eq!(eur.value, dec!(1200));

        let back = rate.convert_back(&eur).unwrap();
        assert_eq!(back.currency, Currency::usd());
        assert_eq!(back.value, dec!(1500));
    }

    #[test]
    fn test_fx_rate_rejects_wrong_side() {
        let rate = FxRate::new(CurrencyPair::to_reference(Currency::usd()), dec!(0.8), 30, "TEST");
        let jpy = Money::new(dec!(1), Currency::jpy());

        assert!(rate.convert(&jpy).is_err());
        assert!(rate.convert_back(&jpy).is_err());
    }

    #[test]
    fn test_zero_rate_cannot_convert_back() {
        let rate = FxRate::new(CurrencyPair::to_reference(Currency::usd()), Decimal::ZERO, 30, "TEST");
        let eur = Money::new(dec!(1), Currency::eur());

        assert!(matches!(
            rate.convert_back(&eur),
            Err(MonetaryError::InvalidRate(..))
        ));
    }

    #[test]
    fn test_currency_decimal_places() {
        assert_eq!(Currency::usd().decimal_places(), 2);
        assert_eq!(Currency::eur().decimal_places(), 2);
        assert_eq!(Currency::jpy().decimal_places(), 0);
        assert_eq!(Currency::new("jpy"), Currency::jpy());
        assert!(Currency::reference().is_reference());
    }

    #[test]
    fn test_is_reference_follows_reference_currency() {
        assert!(Currency::new(" eur ").is_reference());
        assert!(!Currency::usd().is_reference());
        assert_eq!(Currency::reference(), Currency::eur());
    }

    proptest! {
        #[test]
        fn round_up_never_rounds_down(units in 0i64..10_000_000, scale in 0u32..6) {
            let value = Decimal::new(units, scale);
            let rounded = Money::new(value, Currency::eur()).round_up().value;

            prop_assert!(rounded >= value);
            prop_assert!(rounded - value < dec!(0.01));
            prop_assert_eq!(rounded, rounded.round_dp(2));
        }

        #[test]
        fn round_up_whole_units_for_jpy(units in 0i64..10_000_000, scale in 0u32..6) {
            let value = Decimal::new(units, scale);
            let rounded = Money::new(value, Currency::jpy()).round_up().value;

            prop_assert!(rounded >= value);
            prop_assert!(rounded - value < Decimal::ONE);
            prop_assert_eq!(rounded, rounded.trunc());
        }
    }
}
