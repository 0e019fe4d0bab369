use crate::domain::subscription::Subscription;
use crate::domain::types::{MemberId, SubscriptionId};
use crate::error::{Result, SubscriptionError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistence collaborator for the subscription aggregate.
///
/// Implementations must give the engine an atomic read-modify-write per
/// aggregate; the engine additionally serializes its own write operations
/// per subscription id. Infrastructure failures surface as
/// `SubscriptionError::Storage` and are passed through unmodified.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn get(&self, id: &SubscriptionId) -> Result<Option<Subscription>>;
    async fn insert(&self, subscription: &Subscription) -> Result<()>;
    async fn update(&self, subscription: &Subscription) -> Result<()>;
    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<Subscription>>;
}

/// In-memory repository for tests and single-process embedding.
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn get(&self, id: &SubscriptionId) -> Result<Option<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.get(id).cloned())
    }

    async fn insert(&self, subscription: &Subscription) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;
        match subscriptions.get_mut(&subscription.id) {
            Some(existing) => {
                *existing = subscription.clone();
                Ok(())
            }
            None => Err(SubscriptionError::SubscriptionNotFound {
                id: subscription.id,
            }),
        }
    }

    async fn list_for_member(&self, member_id: &MemberId) -> Result<Vec<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        let mut rows: Vec<Subscription> = subscriptions
            .values()
            .filter(|s| s.member_id == *member_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.created_at);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Currency, Money, PlanId, PlanSnapshot};
    use chrono::{Duration, NaiveDate, Utc};

    fn subscription(member_id: MemberId, created_offset: i64) -> Subscription {
        Subscription::new(
            member_id,
            PlanId::monthly(),
            PlanSnapshot {
                name: "Monthly".to_string(),
                max_entries: 0,
                duration_days: 30,
                price: Money::from_minor(10_000, Currency::Usd),
            },
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Utc::now() + Duration::seconds(created_offset),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let repo = InMemorySubscriptionRepository::new();
        let sub = subscription(MemberId::new(), 0);

        repo.insert(&sub).await.unwrap();

        let loaded = repo.get(&sub.id).await.unwrap().unwrap();
        assert_eq!(loaded, sub);
    }

    #[tokio::test]
    async fn test_update_unknown_subscription_fails() {
        let repo = InMemorySubscriptionRepository::new();
        let sub = subscription(MemberId::new(), 0);

        let result = repo.update(&sub).await;
        assert!(matches!(
            result,
            Err(SubscriptionError::SubscriptionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_for_member_ordered_by_creation() {
        let repo = InMemorySubscriptionRepository::new();
        let member_id = MemberId::new();

        let first = subscription(member_id, 0);
        let second = subscription(member_id, 10);
        let other = subscription(MemberId::new(), 5);

        repo.insert(&second).await.unwrap();
        repo.insert(&first).await.unwrap();
        repo.insert(&other).await.unwrap();

        let rows = repo.list_for_member(&member_id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, first.id);
        assert_eq!(rows[1].id, second.id);
    }
}
