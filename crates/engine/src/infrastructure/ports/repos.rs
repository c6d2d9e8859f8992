//! Repository port traits for actor storage.

use async_trait::async_trait;
use fartrek_domain::{Actor, ActorId, ActorPatch};

use super::error::RepoError;

/// Actor documents owned by the host.
///
/// `patch` merges named leaf fields into the stored actor. Guards in the patch
/// are checked against the stored values under the same per-actor lock as the
/// write, so a failed guard surfaces as [`RepoError::Conflict`] and nothing is
/// written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError>;
    async fn save(&self, actor: &Actor) -> Result<(), RepoError>;
    async fn patch(&self, id: ActorId, patch: &ActorPatch) -> Result<Actor, RepoError>;
    async fn list(&self) -> Result<Vec<Actor>, RepoError>;
}
