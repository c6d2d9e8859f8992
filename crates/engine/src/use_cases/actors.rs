//! Actor storage and target selection.

use std::sync::Arc;

use fartrek_domain::{Actor as DomainActor, ActorId, UserId};

use crate::entities::Actor;
use crate::infrastructure::ports::{RepoError, TargetingPort};

pub struct ActorOps {
    actor: Arc<Actor>,
    targeting: Arc<dyn TargetingPort>,
}

impl ActorOps {
    pub fn new(actor: Arc<Actor>, targeting: Arc<dyn TargetingPort>) -> Self {
        Self { actor, targeting }
    }

    pub async fn get(&self, id: ActorId) -> Result<DomainActor, ActorError> {
        Ok(self.actor.require(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<DomainActor>, ActorError> {
        Ok(self.actor.list().await?)
    }

    /// Store a whole actor document, replacing any previous version.
    pub async fn save(&self, actor: DomainActor) -> Result<DomainActor, ActorError> {
        self.actor.save(&actor).await?;
        tracing::info!(actor_id = %actor.id(), name = actor.name(), "Actor stored");
        Ok(actor)
    }

    pub async fn target_of(&self, user: UserId) -> Result<Option<ActorId>, ActorError> {
        Ok(self.targeting.target_of(user).await?)
    }

    /// Select a target for the user's ship attacks. The target must exist.
    pub async fn set_target(&self, user: UserId, target: ActorId) -> Result<(), ActorError> {
        self.actor.require(target).await?;
        self.targeting.set_target(user, target).await?;
        tracing::debug!(user = %user, target_id = %target, "Target selected");
        Ok(())
    }

    pub async fn clear_target(&self, user: UserId) -> Result<(), ActorError> {
        Ok(self.targeting.clear_target(user).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::targeting::InMemoryTargeting;
    use crate::test_fixtures::{actor_store, actors};

    #[tokio::test]
    async fn target_must_exist() {
        let ship = actors::starship("IKV Drex", UserId::new());
        let ship_id = ship.id();
        let (_, actor) = actor_store([ship]);
        let ops = ActorOps::new(actor, Arc::new(InMemoryTargeting::new()));
        let user = UserId::new();

        let err = ops.set_target(user, ActorId::new()).await.unwrap_err();
        assert!(matches!(err, ActorError::Repo(ref e) if e.is_not_found()));

        ops.set_target(user, ship_id).await.unwrap();
        assert_eq!(ops.target_of(user).await.unwrap(), Some(ship_id));
        ops.clear_target(user).await.unwrap();
        assert_eq!(ops.target_of(user).await.unwrap(), None);
    }
}
