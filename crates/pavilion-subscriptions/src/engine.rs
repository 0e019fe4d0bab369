//! Lifecycle engine façade: orchestrates the domain rules against the
//! persistence, member and plan collaborators.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::domain::subscription::{
    FreezeRequest, MemberStatistics, Payment, Subscription, SubscriptionSummary,
};
use crate::domain::types::{
    FreezeRequestId, MemberId, Money, PaymentMethodId, PlanId, SubscriptionId, SubscriptionStatus,
};
use crate::error::{Result, SubscriptionError};
use crate::storage::{MemberDirectory, PlanCatalog, SubscriptionRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Operations the presentation and report layers call.
#[async_trait]
pub trait SubscriptionOperations: Send + Sync {
    /// Create a subscription for a member on a plan, snapshotting the plan
    /// terms as of now.
    async fn create(
        &self,
        member_id: MemberId,
        plan_id: PlanId,
        start_date: NaiveDate,
    ) -> Result<Subscription>;

    async fn record_payment(
        &self,
        id: &SubscriptionId,
        amount: Money,
        payment_method: PaymentMethodId,
    ) -> Result<Payment>;

    async fn request_freeze(
        &self,
        id: &SubscriptionId,
        requested_days: u32,
        start_date: NaiveDate,
    ) -> Result<FreezeRequest>;

    async fn cancel_freeze(
        &self,
        id: &SubscriptionId,
        freeze_id: &FreezeRequestId,
    ) -> Result<Subscription>;

    async fn cancel_subscription(&self, id: &SubscriptionId) -> Result<Subscription>;

    /// Create the successor period for an expired subscription.
    async fn renew(&self, id: &SubscriptionId) -> Result<Subscription>;

    async fn resolve_status(&self, id: &SubscriptionId) -> Result<SubscriptionStatus>;

    async fn remaining_amount(&self, id: &SubscriptionId) -> Result<Money>;

    async fn remaining_entries(&self, id: &SubscriptionId) -> Result<Option<u32>>;

    async fn get_subscription(&self, id: &SubscriptionId) -> Result<Subscription>;

    async fn subscription_summary(&self, id: &SubscriptionId) -> Result<SubscriptionSummary>;

    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<SubscriptionSummary>>;

    async fn member_statistics(&self, member_id: &MemberId) -> Result<MemberStatistics>;
}

/// Default engine implementation.
///
/// Holds no domain state between calls; every operation is a load,
/// domain-rule application, save sequence against one aggregate. Write
/// operations on the same subscription are serialized through a
/// per-aggregate mutex so check-then-act rules (single active freeze, no
/// overpayment) cannot interleave; operations on different subscriptions
/// run in parallel.
pub struct SubscriptionEngine {
    repository: Arc<dyn SubscriptionRepository>,
    members: Arc<dyn MemberDirectory>,
    plans: Arc<dyn PlanCatalog>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    locks: Mutex<HashMap<SubscriptionId, Arc<Mutex<()>>>>,
}

impl SubscriptionEngine {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        members: Arc<dyn MemberDirectory>,
        plans: Arc<dyn PlanCatalog>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repository,
            members,
            plans,
            clock,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn aggregate_lock(&self, id: &SubscriptionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(*id).or_default().clone()
    }

    async fn load(&self, id: &SubscriptionId) -> Result<Subscription> {
        self.repository
            .get(id)
            .await?
            .ok_or(SubscriptionError::SubscriptionNotFound { id: *id })
    }
}

#[async_trait]
impl SubscriptionOperations for SubscriptionEngine {
    async fn create(
        &self,
        member_id: MemberId,
        plan_id: PlanId,
        start_date: NaiveDate,
    ) -> Result<Subscription> {
        let now = self.clock.now();

        if !self.members.member_exists(&member_id).await? {
            return Err(SubscriptionError::MemberNotFound { id: member_id });
        }
        let plan = self
            .plans
            .get_plan(&plan_id)
            .await?
            .ok_or_else(|| SubscriptionError::PlanNotFound {
                id: plan_id.clone(),
            })?;
        if plan.price.currency() != self.config.currency {
            return Err(SubscriptionError::CurrencyMismatch {
                expected: self.config.currency,
                actual: plan.price.currency(),
            });
        }

        let subscription = Subscription::new(member_id, plan_id, plan.snapshot(), start_date, now);
        self.repository.insert(&subscription).await?;

        info!(
            "Created subscription {} for member {} on plan {} ({} to {})",
            subscription.id,
            subscription.member_id,
            subscription.plan_id,
            subscription.start_date,
            subscription.end_date
        );
        Ok(subscription)
    }

    async fn record_payment(
        &self,
        id: &SubscriptionId,
        amount: Money,
        payment_method: PaymentMethodId,
    ) -> Result<Payment> {
        let now = self.clock.now();
        let lock = self.aggregate_lock(id).await;
        let _guard = lock.lock().await;

        let mut subscription = self.load(id).await?;
        let payment = subscription.record_payment(amount, payment_method, now)?;
        self.repository.update(&subscription).await?;

        info!(
            "Recorded payment of {} against subscription {}, {} remaining",
            payment.amount,
            subscription.id,
            subscription.remaining_amount()
        );
        Ok(payment)
    }

    async fn request_freeze(
        &self,
        id: &SubscriptionId,
        requested_days: u32,
        start_date: NaiveDate,
    ) -> Result<FreezeRequest> {
        let today = self.clock.today();
        let lock = self.aggregate_lock(id).await;
        let _guard = lock.lock().await;

        let mut subscription = self.load(id).await?;
        let freeze = subscription.request_freeze(
            requested_days,
            start_date,
            today,
            self.config.max_freeze_days,
        )?;
        self.repository.update(&subscription).await?;

        info!(
            "Froze subscription {} for {} days from {}, end date now {}",
            subscription.id, requested_days, start_date, subscription.end_date
        );
        Ok(freeze)
    }

    async fn cancel_freeze(
        &self,
        id: &SubscriptionId,
        freeze_id: &FreezeRequestId,
    ) -> Result<Subscription> {
        let now = self.clock.now();
        let lock = self.aggregate_lock(id).await;
        let _guard = lock.lock().await;

        let mut subscription = self.load(id).await?;
        subscription.cancel_freeze(freeze_id, now)?;
        self.repository.update(&subscription).await?;

        info!(
            "Cancelled freeze {} on subscription {}, end date now {}",
            freeze_id, subscription.id, subscription.end_date
        );
        Ok(subscription)
    }

    async fn cancel_subscription(&self, id: &SubscriptionId) -> Result<Subscription> {
        let lock = self.aggregate_lock(id).await;
        let _guard = lock.lock().await;

        let mut subscription = self.load(id).await?;
        subscription.cancel()?;
        self.repository.update(&subscription).await?;

        info!("Cancelled subscription {}", subscription.id);
        Ok(subscription)
    }

    async fn renew(&self, id: &SubscriptionId) -> Result<Subscription> {
        let now = self.clock.now();
        let today = now.date_naive();

        let subscription = self.load(id).await?;
        let successor = subscription.renew(today, now)?;
        self.repository.insert(&successor).await?;

        info!(
            "Renewed subscription {} into {} ({} to {})",
            subscription.id, successor.id, successor.start_date, successor.end_date
        );
        Ok(successor)
    }

    async fn resolve_status(&self, id: &SubscriptionId) -> Result<SubscriptionStatus> {
        let today = self.clock.today();
        let subscription = self.load(id).await?;
        Ok(subscription.status(today))
    }

    async fn remaining_amount(&self, id: &SubscriptionId) -> Result<Money> {
        let subscription = self.load(id).await?;
        Ok(subscription.remaining_amount())
    }

    async fn remaining_entries(&self, id: &SubscriptionId) -> Result<Option<u32>> {
        let subscription = self.load(id).await?;
        Ok(subscription.remaining_entries())
    }

    async fn get_subscription(&self, id: &SubscriptionId) -> Result<Subscription> {
        self.load(id).await
    }

    async fn subscription_summary(&self, id: &SubscriptionId) -> Result<SubscriptionSummary> {
        let today = self.clock.today();
        let subscription = self.load(id).await?;
        Ok(subscription.summary(today))
    }

    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<SubscriptionSummary>> {
        let today = self.clock.today();
        let subscriptions = self.repository.list_for_member(member_id).await?;
        Ok(subscriptions.iter().map(|s| s.summary(today)).collect())
    }

    async fn member_statistics(&self, member_id: &MemberId) -> Result<MemberStatistics> {
        let today = self.clock.today();
        let subscriptions = self.repository.list_for_member(member_id).await?;

        let mut statistics = MemberStatistics {
            total_subscriptions: subscriptions.len() as u64,
            active: 0,
            frozen: 0,
            upcoming: 0,
            expired: 0,
            cancelled: 0,
            lifetime_paid: Money::zero(self.config.currency),
        };

        for subscription in &subscriptions {
            match subscription.status(today) {
                SubscriptionStatus::Active => statistics.active += 1,
                SubscriptionStatus::Frozen => statistics.frozen += 1,
                SubscriptionStatus::Upcoming => statistics.upcoming += 1,
                SubscriptionStatus::Expired => statistics.expired += 1,
                SubscriptionStatus::Cancelled => statistics.cancelled += 1,
            }
            statistics.lifetime_paid = statistics
                .lifetime_paid
                .checked_add(subscription.paid_amount())
                .unwrap_or(statistics.lifetime_paid);
        }

        Ok(statistics)
    }
}
