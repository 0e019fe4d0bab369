pub mod catalog;
pub mod subscriptions;

pub use catalog::{
    InMemoryMemberDirectory, InMemoryPlanCatalog, MemberDirectory, PlanCatalog,
};
pub use subscriptions::{InMemorySubscriptionRepository, SubscriptionRepository};
