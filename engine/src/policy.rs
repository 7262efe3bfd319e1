//! Fee rule table.

use commission_common::{Currency, Money};
use rust_decimal::Decimal;

/// Rates and thresholds applied by the commission calculator.
///
/// `Default` is the standard rule table: 0.03% on deposits, 0.5% on
/// business withdrawals, 0.3% on private withdrawals with the first
/// 1000 EUR of each of the first three withdrawals in a calendar week
/// free of charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeePolicy {
    /// Fraction charged on every deposit.
    pub deposit_rate: Decimal,
    /// Fraction charged on business withdrawals.
    pub business_withdraw_rate: Decimal,
    /// Fraction charged on private withdrawals.
    pub private_withdraw_rate: Decimal,
    /// Amount of a private withdrawal exempt from commission, in the
    /// reference currency.
    pub free_allowance: Money,
    /// Weekly withdrawal count up to which the free allowance applies.
    pub free_withdrawals_per_week: usize,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            deposit_rate: Decimal::new(3, 4),
            business_withdraw_rate: Decimal::new(5, 3),
            private_withdraw_rate: Decimal::new(3, 3),
            free_allowance: Money::new(Decimal::from(1000), Currency::reference()),
            free_withdrawals_per_week: 3,
        }
    }
}

impl FeePolicy {
    /// Validate the policy.
    pub fn validate(&self) -> Result<(), String> {
        let rates = [
            ("deposit rate", self.deposit_rate),
            ("business withdraw rate", self.business_withdraw_rate),
            ("private withdraw rate", self.private_withdraw_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(format!("{name} cannot be negative"));
            }
        }

        if !self.free_allowance.currency.is_reference() {
            return Err(format!(
                "free allowance must be in {}, got {}",
                Currency::reference(),
                self.free_allowance.currency
            ));
        }

        if self.free_allowance.is_negative() {
            return Err("free allowance cannot be negative".to_string());
        }

        Ok(())
    }
}
