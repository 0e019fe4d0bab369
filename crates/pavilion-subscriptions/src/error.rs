use crate::domain::types::{
    Currency, FreezeRequestId, MemberId, Money, PlanId, SubscriptionId, SubscriptionStatus,
};
use chrono::NaiveDate;
use thiserror::Error;

/// Business-rule rejections and collaborator failures.
///
/// Every precondition violation is an expected, recoverable outcome returned
/// to the immediate caller; only `Storage` carries an infrastructure fault,
/// passed through unmodified.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("freeze duration of {days} days is outside the allowed range 1..={max_days}")]
    InvalidDuration { days: u32, max_days: u32 },

    #[error("subscription {id} already has an active freeze")]
    AlreadyFrozen { id: SubscriptionId },

    #[error("subscription {id} has no active freeze {freeze_id}")]
    NoActiveFreeze {
        id: SubscriptionId,
        freeze_id: FreezeRequestId,
    },

    #[error("subscription {id} is cancelled")]
    SubscriptionCancelled { id: SubscriptionId },

    #[error("subscription {id} is expired as of {date}")]
    SubscriptionExpired { id: SubscriptionId, date: NaiveDate },

    #[error("payment of {requested} exceeds the remaining balance of {remaining}")]
    ExceedsRemaining { requested: Money, remaining: Money },

    #[error("payment amount {amount} must be positive")]
    InvalidAmount { amount: Money },

    #[error("expected an amount in {expected}, got {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    #[error("subscription {id} is {status}, only expired subscriptions can be renewed")]
    NotRenewable {
        id: SubscriptionId,
        status: SubscriptionStatus,
    },

    #[error("subscription {id} is already cancelled")]
    AlreadyCancelled { id: SubscriptionId },

    #[error("subscription {id} not found")]
    SubscriptionNotFound { id: SubscriptionId },

    #[error("member {id} not found")]
    MemberNotFound { id: MemberId },

    #[error("subscription plan {id} not found")]
    PlanNotFound { id: PlanId },

    #[error("storage error during {operation}: {source}")]
    Storage {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, SubscriptionError>;
