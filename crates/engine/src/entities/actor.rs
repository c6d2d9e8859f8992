//! Actor entity operations.

use std::sync::Arc;

use fartrek_domain::{self as domain, ActorId, ActorPatch};

use crate::infrastructure::ports::{ActorRepo, RepoError};

/// Actor entity operations.
pub struct Actor {
    repo: Arc<dyn ActorRepo>,
}

impl Actor {
    pub fn new(repo: Arc<dyn ActorRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: ActorId) -> Result<Option<domain::Actor>, RepoError> {
        self.repo.get(id).await
    }

    /// Like [`Actor::get`], but a missing actor is an error.
    pub async fn require(&self, id: ActorId) -> Result<domain::Actor, RepoError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| RepoError::not_found("Actor", id))
    }

    pub async fn save(&self, actor: &domain::Actor) -> Result<(), RepoError> {
        self.repo.save(actor).await
    }

    /// Write the patch's fields. Empty patches are skipped.
    pub async fn patch(&self, id: ActorId, patch: &ActorPatch) -> Result<domain::Actor, RepoError> {
        if patch.is_empty() {
            return self.require(id).await;
        }
        self.repo.patch(id, patch).await
    }

    pub async fn list(&self) -> Result<Vec<domain::Actor>, RepoError> {
        self.repo.list().await
    }
}
