//! Payment ledger: append-only payments against the plan price, with the
//! paid and remaining amounts always derived from the records.

use crate::domain::subscription::{Payment, Subscription};
use crate::domain::types::{Money, PaymentId, PaymentMethodId};
use crate::error::{Result, SubscriptionError};
use chrono::{DateTime, Utc};

impl Subscription {
    /// Record a payment towards this subscription.
    ///
    /// An amount above the remaining balance is rejected outright, never
    /// clamped: clamping would hide a stale remaining-amount read on the
    /// caller's side and misstate revenue. The ledger is unchanged on any
    /// rejection.
    pub fn record_payment(
        &mut self,
        amount: Money,
        payment_method: PaymentMethodId,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        if !amount.is_positive() {
            return Err(SubscriptionError::InvalidAmount { amount });
        }
        if self.is_cancelled {
            return Err(SubscriptionError::SubscriptionCancelled { id: self.id });
        }
        if !amount.same_currency(&self.plan.price) {
            return Err(SubscriptionError::CurrencyMismatch {
                expected: self.plan.price.currency(),
                actual: amount.currency(),
            });
        }

        let remaining = self.remaining_amount();
        if amount.exceeds(&remaining) {
            return Err(SubscriptionError::ExceedsRemaining {
                requested: amount,
                remaining,
            });
        }

        let payment = Payment {
            id: PaymentId::new(),
            subscription_id: self.id,
            amount,
            payment_method,
            created_at: now,
        };
        self.payments.push(payment.clone());

        Ok(payment)
    }

    pub fn is_fully_paid(&self) -> bool {
        self.remaining_amount().is_zero()
    }
}
