//! Freeze policy: how a pause request alters the subscription's effective
//! duration, and how cancelling one returns the unspent days.

use crate::domain::subscription::{FreezeRequest, Subscription};
use crate::domain::types::FreezeRequestId;
use crate::error::{Result, SubscriptionError};
use chrono::{DateTime, Duration, NaiveDate, Utc};

impl Subscription {
    /// Request a freeze of `requested_days` starting at `start_date`.
    ///
    /// Requests are auto-approved: the new freeze immediately occupies the
    /// single active-freeze slot and the end date moves out by the full
    /// granted span, relative to the current end date so that sequential
    /// freezes compound additively.
    pub fn request_freeze(
        &mut self,
        requested_days: u32,
        start_date: NaiveDate,
        today: NaiveDate,
        max_freeze_days: u32,
    ) -> Result<FreezeRequest> {
        if self.is_cancelled {
            return Err(SubscriptionError::SubscriptionCancelled { id: self.id });
        }
        if start_date > self.end_date {
            return Err(SubscriptionError::SubscriptionExpired {
                id: self.id,
                date: start_date,
            });
        }
        if requested_days == 0 || requested_days > max_freeze_days {
            return Err(SubscriptionError::InvalidDuration {
                days: requested_days,
                max_days: max_freeze_days,
            });
        }
        if self.active_freeze(today).is_some() {
            return Err(SubscriptionError::AlreadyFrozen { id: self.id });
        }

        let freeze = FreezeRequest {
            id: FreezeRequestId::new(),
            subscription_id: self.id,
            requested_days,
            start_date,
            is_active: true,
            cancelled_at: None,
        };

        self.end_date = self.end_date + Duration::days(i64::from(requested_days));
        self.freezes.push(freeze.clone());

        Ok(freeze)
    }

    /// Cancel an active freeze, returning the unspent days to the member.
    ///
    /// The reversal is time-aware, not a plain additive inverse: the end
    /// date gives back the full granted span and then keeps only the days
    /// already elapsed between the freeze start and `as_of`. A freeze
    /// cancelled on day one of a 30-day window returns 29 days; one
    /// cancelled after it fully elapsed returns none.
    pub fn cancel_freeze(
        &mut self,
        freeze_id: &FreezeRequestId,
        as_of: DateTime<Utc>,
    ) -> Result<()> {
        let id = self.id;
        let freeze = self
            .freezes
            .iter_mut()
            .find(|f| f.id == *freeze_id && f.is_active)
            .ok_or(SubscriptionError::NoActiveFreeze {
                id,
                freeze_id: *freeze_id,
            })?;

        let granted = freeze.requested_days;
        let elapsed = freeze.elapsed_days(as_of.date_naive());

        freeze.is_active = false;
        freeze.cancelled_at = Some(as_of);

        self.end_date = self.end_date - Duration::days(i64::from(granted))
            + Duration::days(i64::from(elapsed));

        Ok(())
    }
}
