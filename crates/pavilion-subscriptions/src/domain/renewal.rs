//! Renewal: an expired subscription spawns a successor period under the
//! same plan terms. Additive only; history is never rewritten.

use crate::domain::subscription::Subscription;
use crate::domain::types::SubscriptionStatus;
use crate::error::{Result, SubscriptionError};
use chrono::{DateTime, NaiveDate, Utc};

impl Subscription {
    /// Create the successor subscription for an expired period.
    ///
    /// The new row reuses the plan snapshot taken at the original creation,
    /// starts today and carries no entries, payments or freezes. The
    /// predecessor is left untouched and still resolves as expired; the
    /// engine does not link the two, so single-renewal policy is the
    /// caller's concern.
    pub fn renew(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<Subscription> {
        let status = self.status(today);
        if status != SubscriptionStatus::Expired {
            return Err(SubscriptionError::NotRenewable {
                id: self.id,
                status,
            });
        }

        Ok(Subscription::new(
            self.member_id,
            self.plan_id.clone(),
            self.plan.clone(),
            today,
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Currency, MemberId, Money, PlanId, PlanSnapshot};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    fn at_day(n: i64) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day(n).and_hms_opt(9, 0, 0).unwrap())
    }

    fn subscription() -> Subscription {
        Subscription::new(
            MemberId::new(),
            PlanId::monthly(),
            PlanSnapshot {
                name: "Monthly".to_string(),
                max_entries: 12,
                duration_days: 30,
                price: Money::from_minor(10_000, Currency::Usd),
            },
            day(0),
            at_day(0),
        )
    }

    #[test]
    fn test_renewal_starts_fresh_period_from_today() {
        let mut original = subscription();
        original.entry_count = 12;

        let renewed = original.renew(day(32), at_day(32)).unwrap();

        assert_eq!(renewed.member_id, original.member_id);
        assert_eq!(renewed.plan, original.plan);
        assert_eq!(renewed.start_date, day(32));
        assert_eq!(renewed.end_date, day(62));
        assert_eq!(renewed.entry_count, 0);
        assert!(renewed.payments.is_empty());
        assert!(renewed.freezes.is_empty());
        assert_eq!(renewed.status(day(32)), SubscriptionStatus::Active);
    }

    #[test]
    fn test_renewal_leaves_original_untouched() {
        let original = subscription();
        let before = original.clone();

        original.renew(day(32), at_day(32)).unwrap();

        assert_eq!(original, before);
        assert_eq!(original.status(day(32)), SubscriptionStatus::Expired);
    }

    #[test]
    fn test_renewing_twice_from_same_original_succeeds() {
        // Renewals are unlinked; deduplication is a caller policy.
        let original = subscription();

        let first = original.renew(day(32), at_day(32)).unwrap();
        let second = original.renew(day(33), at_day(33)).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.start_date, day(33));
    }

    #[test]
    fn test_active_subscription_not_renewable() {
        let sub = subscription();
        let result = sub.renew(day(15), at_day(15));
        assert!(matches!(
            result,
            Err(SubscriptionError::NotRenewable {
                status: SubscriptionStatus::Active,
                ..
            })
        ));
    }

    #[test]
    fn test_upcoming_subscription_not_renewable() {
        let sub = subscription();
        let result = sub.renew(day(-5), at_day(-5));
        assert!(matches!(
            result,
            Err(SubscriptionError::NotRenewable {
                status: SubscriptionStatus::Upcoming,
                ..
            })
        ));
    }

    #[test]
    fn test_frozen_subscription_not_renewable() {
        let mut sub = subscription();
        sub.request_freeze(10, day(15), day(15), 90).unwrap();

        let result = sub.renew(day(20), at_day(20));
        assert!(matches!(
            result,
            Err(SubscriptionError::NotRenewable {
                status: SubscriptionStatus::Frozen,
                ..
            })
        ));
    }

    #[test]
    fn test_cancelled_subscription_not_renewable() {
        let mut sub = subscription();
        sub.cancel().unwrap();

        let result = sub.renew(day(60), at_day(60));
        assert!(matches!(
            result,
            Err(SubscriptionError::NotRenewable {
                status: SubscriptionStatus::Cancelled,
                ..
            })
        ));
    }
}
