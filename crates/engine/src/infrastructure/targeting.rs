//! Per-user target selection.

use async_trait::async_trait;
use dashmap::DashMap;
use fartrek_domain::{ActorId, UserId};

use crate::infrastructure::ports::{RepoError, TargetingPort};

/// At most one selected actor per user.
#[derive(Debug, Default)]
pub struct InMemoryTargeting {
    targets: DashMap<UserId, ActorId>,
}

impl InMemoryTargeting {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TargetingPort for InMemoryTargeting {
    async fn target_of(&self, user: UserId) -> Result<Option<ActorId>, RepoError> {
        Ok(self.targets.get(&user).map(|entry| *entry.value()))
    }

    async fn set_target(&self, user: UserId, target: ActorId) -> Result<(), RepoError> {
        self.targets.insert(user, target);
        Ok(())
    }

    async fn clear_target(&self, user: UserId) -> Result<(), RepoError> {
        self.targets.remove(&user);
        Ok(())
    }
}
