use crate::domain::subscription::Subscription;
use crate::domain::types::SubscriptionStatus;
use chrono::NaiveDate;

/// Resolve the lifecycle state of a subscription as of `today`.
///
/// First match wins and the order is load-bearing: cancellation dominates
/// everything, including a freeze record still marked active, and a freeze
/// window that has already elapsed falls through to the date comparison
/// instead of reporting `Frozen` forever.
pub fn resolve_status(subscription: &Subscription, today: NaiveDate) -> SubscriptionStatus {
    if subscription.is_cancelled {
        return SubscriptionStatus::Cancelled;
    }

    if subscription
        .freezes
        .iter()
        .any(|f| f.is_active && f.covers(today))
    {
        return SubscriptionStatus::Frozen;
    }

    if today < subscription.start_date {
        return SubscriptionStatus::Upcoming;
    }

    if today > subscription.end_date {
        return SubscriptionStatus::Expired;
    }

    SubscriptionStatus::Active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::FreezeRequest;
    use crate::domain::types::{Currency, FreezeRequestId, MemberId, Money, PlanId, PlanSnapshot};
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    fn subscription(start: NaiveDate, duration_days: u32) -> Subscription {
        Subscription::new(
            MemberId::new(),
            PlanId::monthly(),
            PlanSnapshot {
                name: "Monthly".to_string(),
                max_entries: 0,
                duration_days,
                price: Money::from_minor(10_000, Currency::Usd),
            },
            start,
            Utc::now(),
        )
    }

    fn freeze(sub: &Subscription, days: u32, start: NaiveDate, active: bool) -> FreezeRequest {
        FreezeRequest {
            id: FreezeRequestId::new(),
            subscription_id: sub.id,
            requested_days: days,
            start_date: start,
            is_active: active,
            cancelled_at: None,
        }
    }

    #[test]
    fn test_upcoming_before_start() {
        let sub = subscription(day(10), 30);
        assert_eq!(resolve_status(&sub, day(5)), SubscriptionStatus::Upcoming);
    }

    #[test]
    fn test_active_within_period() {
        let sub = subscription(day(0), 30);
        assert_eq!(resolve_status(&sub, day(0)), SubscriptionStatus::Active);
        assert_eq!(resolve_status(&sub, day(15)), SubscriptionStatus::Active);
        assert_eq!(resolve_status(&sub, day(30)), SubscriptionStatus::Active);
    }

    #[test]
    fn test_expired_after_end() {
        let sub = subscription(day(0), 30);
        assert_eq!(resolve_status(&sub, day(31)), SubscriptionStatus::Expired);
    }

    #[test]
    fn test_frozen_inside_active_window() {
        let mut sub = subscription(day(0), 30);
        let fr = freeze(&sub, 10, day(15), true);
        sub.freezes.push(fr);
        sub.end_date = sub.end_date + Duration::days(10);

        assert_eq!(resolve_status(&sub, day(20)), SubscriptionStatus::Frozen);
        // Elapsed window falls through to the date comparison.
        assert_eq!(resolve_status(&sub, day(26)), SubscriptionStatus::Active);
    }

    #[test]
    fn test_inactive_freeze_window_is_ignored() {
        let mut sub = subscription(day(0), 30);
        let fr = freeze(&sub, 10, day(15), false);
        sub.freezes.push(fr);

        assert_eq!(resolve_status(&sub, day(20)), SubscriptionStatus::Active);
    }

    #[test]
    fn test_cancellation_dominates_freeze() {
        let mut sub = subscription(day(0), 30);
        let fr = freeze(&sub, 10, day(15), true);
        sub.freezes.push(fr);
        sub.is_cancelled = true;

        assert_eq!(resolve_status(&sub, day(20)), SubscriptionStatus::Cancelled);
    }

    proptest! {
        /// Totality: exactly one state for any (start, duration, freeze, now)
        /// combination, and cancellation always dominates.
        #[test]
        fn prop_status_total_and_cancellation_dominant(
            start_offset in -120_i64..120,
            duration in 1_u32..400,
            freeze_days in 1_u32..60,
            freeze_offset in -60_i64..120,
            freeze_active in any::<bool>(),
            today_offset in -150_i64..300,
            cancelled in any::<bool>(),
        ) {
            let mut sub = subscription(day(start_offset), duration);
            let fr = freeze(&sub, freeze_days, day(freeze_offset), freeze_active);
            sub.freezes.push(fr);
            sub.is_cancelled = cancelled;

            let status = resolve_status(&sub, day(today_offset));

            // The match arms are exhaustive, so "exactly one" reduces to the
            // dominance checks.
            if cancelled {
                prop_assert_eq!(status, SubscriptionStatus::Cancelled);
            } else if status == SubscriptionStatus::Frozen {
                prop_assert!(sub.freezes.iter().any(|f| f.is_active && f.covers(day(today_offset))));
            }
        }
    }
}
