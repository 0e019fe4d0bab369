use crate::domain::types::{MemberId, PlanId, SubscriptionType};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Read-only member resolution at subscription creation time.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn member_exists(&self, id: &MemberId) -> Result<bool>;
}

/// Read-only plan template resolution. The engine snapshots the returned
/// template into the aggregate rather than holding a live reference.
#[async_trait]
pub trait PlanCatalog: Send + Sync {
    async fn get_plan(&self, id: &PlanId) -> Result<Option<SubscriptionType>>;
}

/// In-memory member directory for tests and embedding.
pub struct InMemoryMemberDirectory {
    members: RwLock<HashSet<MemberId>>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashSet::new()),
        }
    }

    pub async fn add_member(&self, id: MemberId) {
        self.members.write().await.insert(id);
    }
}

impl Default for InMemoryMemberDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn member_exists(&self, id: &MemberId) -> Result<bool> {
        Ok(self.members.read().await.contains(id))
    }
}

/// In-memory plan catalog for tests and embedding.
pub struct InMemoryPlanCatalog {
    plans: RwLock<HashMap<PlanId, SubscriptionType>>,
}

impl InMemoryPlanCatalog {
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_plan(&self, plan: SubscriptionType) {
        self.plans.write().await.insert(plan.id.clone(), plan);
    }
}

impl Default for InMemoryPlanCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanCatalog for InMemoryPlanCatalog {
    async fn get_plan(&self, id: &PlanId) -> Result<Option<SubscriptionType>> {
        Ok(self.plans.read().await.get(id).cloned())
    }
}
