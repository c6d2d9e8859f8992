//! Ports for host services the rules call out to.

use async_trait::async_trait;
use fartrek_domain::{Actor, ActorId, DomainEvent, UserId};

use super::error::{AnnouncementError, RepoError};
use super::types::Announcement;

/// Publishes roll results and state changes (the host's chat log).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementPort: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> Result<(), AnnouncementError>;
    async fn recent(&self, limit: usize) -> Vec<Announcement>;
}

/// Whether a user holds update rights on an actor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationPort: Send + Sync {
    async fn can_update(&self, user: UserId, actor: &Actor) -> bool;
}

/// Each user's selected opposing actor, if any.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetingPort: Send + Sync {
    async fn target_of(&self, user: UserId) -> Result<Option<ActorId>, RepoError>;
    async fn set_target(&self, user: UserId, target: ActorId) -> Result<(), RepoError>;
    async fn clear_target(&self, user: UserId) -> Result<(), RepoError>;
}
