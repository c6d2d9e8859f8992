//! Starship subsystem use cases.
//!
//! Two ways to change a subsystem's damage level:
//! - `CycleSubsystem`: the bookkeeping toggle, (level + 1) mod 4, any direction
//! - `ApplySubsystemHit`: automated damage, which only ever raises a level
//!
//! Both writes are guarded on the level that was read.

use std::sync::Arc;

use fartrek_domain::rules;
use fartrek_domain::{
    Actor as DomainActor, ActorId, DamageLevel, DomainError, DomainEvent, Severity, Subsystem,
    SubsystemHitOutcome, UserId,
};

use crate::entities::Actor;
use crate::infrastructure::ports::{AnnouncementPort, AuthorizationPort, RandomPort, RepoError};

use super::{announce, dice};

/// Container for subsystem use cases.
pub struct SubsystemUseCases {
    pub cycle: Arc<CycleSubsystem>,
    pub hit: Arc<ApplySubsystemHit>,
}

impl SubsystemUseCases {
    pub fn new(cycle: Arc<CycleSubsystem>, hit: Arc<ApplySubsystemHit>) -> Self {
        Self { cycle, hit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleResult {
    pub subsystem: Subsystem,
    pub previous: DamageLevel,
    pub level: DamageLevel,
}

/// An automated hit: the d6 that picked the subsystem and what it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsystemHitReport {
    pub die: i32,
    pub severity: Severity,
    pub outcome: SubsystemHitOutcome,
}

// =============================================================================
// Manual cycle
// =============================================================================

pub struct CycleSubsystem {
    actor: Arc<Actor>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl CycleSubsystem {
    pub fn new(actor: Arc<Actor>, announcer: Arc<dyn AnnouncementPort>) -> Self {
        Self { actor, announcer }
    }

    pub async fn execute(
        &self,
        actor_id: ActorId,
        subsystem: Subsystem,
    ) -> Result<CycleResult, SubsystemError> {
        let ship = self.actor.require(actor_id).await?;
        let cycle = rules::cycle_subsystem(&ship, subsystem)?;
        self.actor.patch(actor_id, &cycle.patch).await?;

        tracing::info!(
            actor_id = %actor_id,
            subsystem = %subsystem,
            level = %cycle.level,
            "Subsystem cycled"
        );
        announce(
            &*self.announcer,
            DomainEvent::SubsystemCycled {
                actor_id,
                subsystem,
                level: cycle.level,
            },
        )
        .await;

        Ok(CycleResult {
            subsystem,
            previous: cycle.previous,
            level: cycle.level,
        })
    }
}

// =============================================================================
// Automated hit
// =============================================================================

/// Damage a random subsystem (1d6 over the canonical order) to at least the
/// given severity.
pub struct ApplySubsystemHit {
    actor: Arc<Actor>,
    authorization: Arc<dyn AuthorizationPort>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl ApplySubsystemHit {
    pub fn new(
        actor: Arc<Actor>,
        authorization: Arc<dyn AuthorizationPort>,
        random: Arc<dyn RandomPort>,
        announcer: Arc<dyn AnnouncementPort>,
    ) -> Self {
        Self {
            actor,
            authorization,
            random,
            announcer,
        }
    }

    pub async fn execute(
        &self,
        invoker: UserId,
        target_id: ActorId,
        severity: Severity,
    ) -> Result<SubsystemHitReport, SubsystemError> {
        let target = self.actor.require(target_id).await?;
        target.require_ship()?;
        if !self.authorization.can_update(invoker, &target).await {
            return Err(SubsystemError::Forbidden {
                user: invoker,
                actor: target_id,
            });
        }
        self.apply(&target, severity).await
    }

    /// Roll and write the hit. Callers have already checked update rights.
    pub(crate) async fn apply(
        &self,
        target: &DomainActor,
        severity: Severity,
    ) -> Result<SubsystemHitReport, SubsystemError> {
        let die = rules::subsystem_die().roll(dice(&*self.random)).total;
        let subsystem = Subsystem::from_die(die)?;
        let (outcome, patch) = rules::subsystem_hit(target, subsystem, severity)?;
        if let Some(patch) = patch {
            self.actor.patch(target.id(), &patch).await?;
        }

        tracing::info!(
            actor_id = %target.id(),
            die,
            subsystem = %subsystem,
            severity = severity.value(),
            applied = outcome.is_applied(),
            "Subsystem hit"
        );
        announce(
            &*self.announcer,
            DomainEvent::SubsystemHit {
                actor_id: target.id(),
                die,
                outcome,
            },
        )
        .await;

        Ok(SubsystemHitReport {
            die,
            severity,
            outcome,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubsystemError {
    #[error("User {user} may not update actor {actor}")]
    Forbidden { user: UserId, actor: ActorId },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
