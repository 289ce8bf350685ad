pub mod entity_gateway;
pub mod invalidation_notifier;

pub use entity_gateway::EntityGateway;
pub use invalidation_notifier::InvalidationNotifier;

#[cfg(test)]
pub use entity_gateway::MockEntityGateway;
#[cfg(test)]
pub use invalidation_notifier::MockInvalidationNotifier;
