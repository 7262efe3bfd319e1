//! Commission rules.

use commission_common::{
    Currency, CurrencyPair, FxRate, Money, Operation, OperationType, UserType,
};
use commission_fx::RateProvider;
use tracing::{debug, instrument};

use crate::error::{CommissionError, Result};
use crate::policy::FeePolicy;
use crate::store::OperationStore;

/// Scale the back-converted fee is trimmed to before rounding up. Division
/// by a rate that has no exact quotient leaves noise in the last digits of
/// a 28 digit decimal.
const CONVERSION_SCALE: u32 = 12;

/// Computes the commission for single operations against a fully built
/// [`OperationStore`]. Never mutates the store.
pub struct CommissionCalculator<'a> {
    store: &'a OperationStore,
    rates: &'a dyn RateProvider,
    policy: &'a FeePolicy,
}

impl<'a> CommissionCalculator<'a> {
    pub fn new(
        store: &'a OperationStore,
        rates: &'a dyn RateProvider,
        policy: &'a FeePolicy,
    ) -> Self {
        Self {
            store,
            rates,
            policy,
        }
    }

    /// Commission for `op`, rounded up to the minor unit of its currency.
    ///
    /// `op` is expected to be recorded in the store already.
    #[instrument(skip(self, op), fields(user_id = %op.user_id, date = %op.date))]
    pub async fn compute_commission(&self, op: &Operation) -> Result<Money> {
        let fee = match (op.operation_type, op.user_type) {
            (OperationType::Deposit, _) => op.amount.clone() * self.policy.deposit_rate,
            (OperationType::Withdraw, UserType::Business) => {
                op.amount.clone() * self.policy.business_withdraw_rate
            }
            (OperationType::Withdraw, UserType::Private) => self.private_withdraw_fee(op).await?,
        };

        let commission = fee.round_up();
        debug!(fee = %fee, commission = %commission, "Computed commission");

        Ok(commission)
    }

    async fn private_withdraw_fee(&self, op: &Operation) -> Result<Money> {
        let rate = self.policy.private_withdraw_rate;
        let withdrawals = self.store.withdrawals_in_week(op.user_id, op.date);

        if withdrawals > self.policy.free_withdrawals_per_week {
            debug!(withdrawals, "Weekly discount used up");
            return Ok(op.amount.clone() * rate);
        }

        // One lookup serves both directions of the conversion.
        let fx = self.reference_rate(op.currency()).await?;
        let in_reference = fx.convert(&op.amount)?;
        let over_allowance = (in_reference - self.policy.free_allowance.clone())?.non_negative();

        // Charge in the reference currency so the single division below is
        // exact whenever the fee itself is.
        let fee_in_reference = over_allowance.clone() * rate;
        let mut fee = fx.convert_back(&fee_in_reference)?;
        fee.value = fee.value.round_dp(CONVERSION_SCALE);

        debug!(
            withdrawals,
            over_allowance = %over_allowance,
            fee_in_reference = %fee_in_reference,
            "Applied free allowance"
        );

        Ok(fee)
    }

    async fn reference_rate(&self, currency: &Currency) -> Result<FxRate> {
        if currency.is_reference() {
            return Ok(FxRate::identity(currency.clone()));
        }

        let pair = CurrencyPair::to_reference(currency.clone());
        self.rates
            .get_rate(&pair)
            .await
            .map_err(|source| CommissionError::RateUnavailable {
                currency: currency.clone(),
                source,
            })
    }
}
