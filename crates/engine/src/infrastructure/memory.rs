//! In-memory actor store.
//!
//! Stands in for the host's document database. Each actor lives in its own
//! `DashMap` shard entry, so a patch holds that entry's write lock from the
//! guard check through the last field write.

use async_trait::async_trait;
use dashmap::DashMap;
use fartrek_domain::{Actor, ActorId, ActorPatch};

use crate::infrastructure::ports::{ActorRepo, RepoError};

#[derive(Default)]
pub struct InMemoryActorRepo {
    actors: DashMap<ActorId, Actor>,
}

impl InMemoryActorRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actors(actors: impl IntoIterator<Item = Actor>) -> Self {
        let repo = Self::new();
        for actor in actors {
            repo.actors.insert(actor.id(), actor);
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[async_trait]
impl ActorRepo for InMemoryActorRepo {
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError> {
        Ok(self.actors.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, actor: &Actor) -> Result<(), RepoError> {
        self.actors.insert(actor.id(), actor.clone());
        Ok(())
    }

    async fn patch(&self, id: ActorId, patch: &ActorPatch) -> Result<Actor, RepoError> {
        let mut entry = self
            .actors
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Actor", id))?;
        entry.apply_patch(patch)?;
        tracing::debug!(actor_id = %id, paths = ?patch.paths(), "Actor patched");
        Ok(entry.value().clone())
    }

    async fn list(&self) -> Result<Vec<Actor>, RepoError> {
        let mut actors: Vec<Actor> = self
            .actors
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        actors.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fartrek_domain::{
        ActorKind, DamageLevel, FieldGuard, FieldUpdate, Resources, ShipState, Subsystem,
    };

    fn officer(fate: u32) -> Actor {
        Actor::new("Lt. Reyes", ActorKind::Character)
            .unwrap()
            .with_resources(Resources {
                fate,
                ..Resources::default()
            })
    }

    #[tokio::test]
    async fn save_then_get() {
        let repo = InMemoryActorRepo::new();
        let actor = officer(1);
        repo.save(&actor).await.unwrap();
        assert_eq!(repo.get(actor.id()).await.unwrap(), Some(actor));
        assert_eq!(repo.get(ActorId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn guarded_patch_applies_once() {
        let actor = officer(1);
        let id = actor.id();
        let repo = InMemoryActorRepo::with_actors([actor]);
        let spend = ActorPatch::new()
            .guard(FieldGuard::FatePoints { expected: 1 })
            .set(FieldUpdate::FatePoints { value: 0 });

        let updated = repo.patch(id, &spend).await.unwrap();
        assert_eq!(updated.resources().fate, 0);

        let err = repo.patch(id, &spend).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repo.get(id).await.unwrap().unwrap().resources().fate, 0);
    }

    #[tokio::test]
    async fn patch_unknown_actor_is_not_found() {
        let repo = InMemoryActorRepo::new();
        let err = repo
            .patch(ActorId::new(), &ActorPatch::new().set(FieldUpdate::Wounds { value: 1 }))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn invalid_patch_writes_nothing() {
        let ship = Actor::new("USS Tiber", ActorKind::Ship)
            .unwrap()
            .with_ship(ShipState::default())
            .unwrap();
        let id = ship.id();
        let repo = InMemoryActorRepo::with_actors([ship.clone()]);
        let patch = ActorPatch::new()
            .set(FieldUpdate::SubsystemLevel {
                subsystem: Subsystem::Warp,
                level: DamageLevel::OFFLINE,
            })
            .set(FieldUpdate::PoolValue {
                pool: fartrek_domain::ShipPool::Structure,
                value: 500,
            });
        let err = repo.patch(id, &patch).await.unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
        assert_eq!(repo.get(id).await.unwrap(), Some(ship));
    }

    #[tokio::test]
    async fn concurrent_spends_only_one_wins() {
        let actor = officer(1);
        let id = actor.id();
        let repo = std::sync::Arc::new(InMemoryActorRepo::with_actors([actor]));
        let spend = ActorPatch::new()
            .guard(FieldGuard::FatePoints { expected: 1 })
            .set(FieldUpdate::FatePoints { value: 0 });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                let spend = spend.clone();
                tokio::spawn(async move { repo.patch(id, &spend).await.is_ok() })
            })
            .collect();
        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }
}
