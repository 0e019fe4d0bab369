use crate::domain::status::resolve_status;
use crate::domain::types::{
    FreezeRequestId, MemberId, Money, PaymentId, PaymentMethodId, PlanId, PlanSnapshot,
    SubscriptionId, SubscriptionStatus,
};
use crate::error::{Result, SubscriptionError};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A member's temporary pause of their subscription.
///
/// Approval extends the subscription's end date by `requested_days`; the
/// flag stays set until the member cancels the freeze or the window fully
/// elapses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeRequest {
    pub id: FreezeRequestId,
    pub subscription_id: SubscriptionId,
    pub requested_days: u32,
    pub start_date: NaiveDate,
    pub is_active: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl FreezeRequest {
    /// First day no longer covered by the freeze window.
    pub fn window_end(&self) -> NaiveDate {
        self.start_date + Duration::days(i64::from(self.requested_days))
    }

    /// Whether `day` falls inside the half-open freeze window.
    pub fn covers(&self, day: NaiveDate) -> bool {
        day >= self.start_date && day < self.window_end()
    }

    /// A freeze whose window has fully elapsed no longer blocks new
    /// requests, even when it was never explicitly cancelled.
    pub fn is_consumed(&self, today: NaiveDate) -> bool {
        today >= self.window_end()
    }

    /// Days of the window spent as of `as_of`, clamped to the granted span.
    pub fn elapsed_days(&self, as_of: NaiveDate) -> u32 {
        let elapsed = (as_of - self.start_date).num_days();
        elapsed.clamp(0, i64::from(self.requested_days)) as u32
    }
}

/// A single payment towards a subscription. Append-only: corrections are new
/// records, never edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub subscription_id: SubscriptionId,
    pub amount: Money,
    pub payment_method: PaymentMethodId,
    pub created_at: DateTime<Utc>,
}

/// The subscription aggregate: one paid period of club access for a member,
/// together with its freeze and payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub member_id: MemberId,
    pub plan_id: PlanId,
    pub plan: PlanSnapshot,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Incremented by the attendance system, never by this engine.
    pub entry_count: u32,
    pub is_cancelled: bool,
    pub freezes: Vec<FreezeRequest>,
    pub payments: Vec<Payment>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        member_id: MemberId,
        plan_id: PlanId,
        plan: PlanSnapshot,
        start_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        let end_date = start_date + Duration::days(i64::from(plan.duration_days));
        Self {
            id: SubscriptionId::new(),
            member_id,
            plan_id,
            plan,
            start_date,
            end_date,
            entry_count: 0,
            is_cancelled: false,
            freezes: Vec::new(),
            payments: Vec::new(),
            created_at,
        }
    }

    pub fn status(&self, today: NaiveDate) -> SubscriptionStatus {
        resolve_status(self, today)
    }

    /// Sum of all recorded payments. Always derived, never stored.
    pub fn paid_amount(&self) -> Money {
        self.payments
            .iter()
            .fold(Money::zero(self.plan.price.currency()), |acc, p| {
                acc.checked_add(p.amount).unwrap_or(acc)
            })
    }

    /// Plan price minus recorded payments, floored at zero.
    pub fn remaining_amount(&self) -> Money {
        self.plan
            .price
            .checked_sub(self.paid_amount())
            .unwrap_or_else(|| Money::zero(self.plan.price.currency()))
    }

    /// Entries still available, `None` when the plan is unlimited.
    pub fn remaining_entries(&self) -> Option<u32> {
        if self.plan.max_entries == 0 {
            return None;
        }
        Some(self.plan.max_entries.saturating_sub(self.entry_count))
    }

    /// The freeze currently occupying the single active-freeze slot as of
    /// `today`: approved, not cancelled, window not yet fully elapsed.
    pub fn active_freeze(&self, today: NaiveDate) -> Option<&FreezeRequest> {
        self.freezes
            .iter()
            .find(|f| f.is_active && !f.is_consumed(today))
    }

    pub fn freeze(&self, freeze_id: &FreezeRequestId) -> Option<&FreezeRequest> {
        self.freezes.iter().find(|f| f.id == *freeze_id)
    }

    /// Mark the subscription cancelled. A flag, not a rollback: payments and
    /// dates are left untouched.
    pub fn cancel(&mut self) -> Result<()> {
        if self.is_cancelled {
            return Err(SubscriptionError::AlreadyCancelled { id: self.id });
        }
        self.is_cancelled = true;
        Ok(())
    }

    pub fn summary(&self, today: NaiveDate) -> SubscriptionSummary {
        SubscriptionSummary {
            id: self.id,
            member_id: self.member_id,
            plan_name: self.plan.name.clone(),
            status: self.status(today),
            start_date: self.start_date,
            end_date: self.end_date,
            paid_amount: self.paid_amount(),
            remaining_amount: self.remaining_amount(),
            entry_count: self.entry_count,
            remaining_entries: self.remaining_entries(),
            active_freeze: self.active_freeze(today).map(|f| f.id),
        }
    }
}

/// Per-subscription payload the list and card screens render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub id: SubscriptionId,
    pub member_id: MemberId,
    pub plan_name: String,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub entry_count: u32,
    pub remaining_entries: Option<u32>,
    pub active_freeze: Option<FreezeRequestId>,
}

/// Aggregated view over all of a member's subscription periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStatistics {
    pub total_subscriptions: u64,
    pub active: u64,
    pub frozen: u64,
    pub upcoming: u64,
    pub expired: u64,
    pub cancelled: u64,
    pub lifetime_paid: Money,
}
