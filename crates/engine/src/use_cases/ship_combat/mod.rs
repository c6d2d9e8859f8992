//! Ship combat use cases.
//!
//! The attack protocol runs in a fixed order:
//! 1. Resolve the target (explicit id, else the invoker's selection)
//! 2. Attack roll, announced
//! 3. Effect roll against the target's maneuver rating, announced
//! 4. Damage on the target, if the invoker may update it
//!
//! A refusal or failure in step 4 is reported alongside the rolls. It never
//! takes back what steps 2 and 3 announced.

use std::sync::Arc;

use fartrek_domain::rules::{self, EffectResolution, IncomingHit, PoolChange};
use fartrek_domain::{
    Actor as DomainActor, ActorId, CheckResult, DiceRollResult, DomainError, DomainEvent,
    ShipPool, Subsystem, UserId,
};

use crate::entities::Actor;
use crate::infrastructure::ports::{
    AnnouncementPort, AuthorizationPort, RandomPort, RepoError, TargetingPort,
};
use crate::use_cases::subsystems::{ApplySubsystemHit, SubsystemHitReport};

use super::{announce, dice};

/// Container for ship combat use cases.
pub struct ShipCombatUseCases {
    pub attack: Arc<ResolveShipAttack>,
    pub incoming: Arc<ApplyIncomingHit>,
    pub repair: Arc<RepairShip>,
}

impl ShipCombatUseCases {
    pub fn new(
        attack: Arc<ResolveShipAttack>,
        incoming: Arc<ApplyIncomingHit>,
        repair: Arc<RepairShip>,
    ) -> Self {
        Self {
            attack,
            incoming,
            repair,
        }
    }
}

// =============================================================================
// Attack
// =============================================================================

#[derive(Debug, Clone)]
pub struct ShipAttackInput {
    pub weapon: Subsystem,
    pub skill: i32,
    pub to_hit: Option<i32>,
    /// Explicit target; falls back to the invoker's selection.
    pub target_id: Option<ActorId>,
    /// Rating to subtract when no target ship resolves.
    pub target_rating: Option<i32>,
    pub modifier: i32,
}

impl Default for ShipAttackInput {
    fn default() -> Self {
        Self {
            weapon: Subsystem::Phasers,
            skill: 0,
            to_hit: None,
            target_id: None,
            target_rating: None,
            modifier: 0,
        }
    }
}

/// What the attack did on the target's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteDamage {
    Missed,
    NoTarget,
    Refused {
        target_id: ActorId,
        reason: String,
    },
    ShieldsDrained {
        target_id: ActorId,
        roll: DiceRollResult,
        change: PoolChange,
    },
    SubsystemHit {
        target_id: ActorId,
        hit: SubsystemHitReport,
    },
    /// The write on the target did not go through.
    Failed {
        target_id: ActorId,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ShipAttackReport {
    pub actor_id: ActorId,
    pub attack: CheckResult,
    pub hit: bool,
    pub target_rating: i32,
    pub effect: Option<EffectResolution>,
    pub remote: RemoteDamage,
}

pub struct ResolveShipAttack {
    actor: Arc<Actor>,
    targeting: Arc<dyn TargetingPort>,
    authorization: Arc<dyn AuthorizationPort>,
    subsystem_hit: Arc<ApplySubsystemHit>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl ResolveShipAttack {
    pub fn new(
        actor: Arc<Actor>,
        targeting: Arc<dyn TargetingPort>,
        authorization: Arc<dyn AuthorizationPort>,
        subsystem_hit: Arc<ApplySubsystemHit>,
        random: Arc<dyn RandomPort>,
        announcer: Arc<dyn AnnouncementPort>,
    ) -> Self {
        Self {
            actor,
            targeting,
            authorization,
            subsystem_hit,
            random,
            announcer,
        }
    }

    pub async fn execute(
        &self,
        invoker: UserId,
        attacker_id: ActorId,
        input: ShipAttackInput,
    ) -> Result<ShipAttackReport, ShipCombatError> {
        let attacker = self.actor.require(attacker_id).await?;
        let target = self.resolve_target(invoker, input.target_id).await?;
        let spec = rules::ship_attack(&attacker, input.weapon, input.skill, input.to_hit)?;

        // Attack roll
        let attack = spec.roll(dice(&*self.random));
        tracing::info!(
            actor_id = %attacker_id,
            weapon = %input.weapon,
            total = attack.total,
            "Ship attack rolled"
        );
        announce(
            &*self.announcer,
            DomainEvent::ShipAttackRolled {
                actor_id: attacker_id,
                weapon: input.weapon,
                result: attack.clone(),
            },
        )
        .await;

        let target_rating = target
            .as_ref()
            .and_then(DomainActor::effective_rating)
            .or(input.target_rating)
            .unwrap_or(0);

        let hit = attack.success.unwrap_or(true);
        if !hit {
            return Ok(ShipAttackReport {
                actor_id: attacker_id,
                attack,
                hit,
                target_rating,
                effect: None,
                remote: RemoteDamage::Missed,
            });
        }

        // Effect roll
        let effect = EffectResolution::from_roll(
            rules::effect_roll(&attacker, target_rating, input.modifier)?.roll(dice(&*self.random)),
        );
        tracing::info!(
            actor_id = %attacker_id,
            total = effect.roll.total,
            class = effect.class.label(),
            "Ship effect resolved"
        );
        announce(
            &*self.announcer,
            DomainEvent::ShipEffectResolved {
                actor_id: attacker_id,
                target_id: target.as_ref().map(DomainActor::id),
                resolution: effect.clone(),
            },
        )
        .await;

        let remote = match target {
            Some(target) => self.damage_target(invoker, attacker_id, &target, &effect).await,
            None => RemoteDamage::NoTarget,
        };

        Ok(ShipAttackReport {
            actor_id: attacker_id,
            attack,
            hit,
            target_rating,
            effect: Some(effect),
            remote,
        })
    }

    /// An explicit target must exist and be a ship. A stale selection is
    /// dropped instead.
    async fn resolve_target(
        &self,
        invoker: UserId,
        explicit: Option<ActorId>,
    ) -> Result<Option<DomainActor>, ShipCombatError> {
        let target = match explicit {
            Some(id) => Some(self.actor.require(id).await?),
            None => match self.targeting.target_of(invoker).await? {
                Some(id) => {
                    let selected = self.actor.get(id).await?;
                    if selected.is_none() {
                        tracing::warn!(user = %invoker, target_id = %id, "Selected target no longer exists");
                    }
                    selected
                }
                None => None,
            },
        };
        if let Some(target) = &target {
            if !target.is_ship() {
                return Err(ShipCombatError::TargetNotShip(target.id()));
            }
        }
        Ok(target)
    }

    async fn damage_target(
        &self,
        invoker: UserId,
        attacker_id: ActorId,
        target: &DomainActor,
        effect: &EffectResolution,
    ) -> RemoteDamage {
        let target_id = target.id();
        if !self.authorization.can_update(invoker, target).await {
            let reason = format!("no update rights on {}", target.name());
            tracing::warn!(user = %invoker, target_id = %target_id, "Remote damage refused");
            announce(
                &*self.announcer,
                DomainEvent::RemoteDamageRefused {
                    actor_id: attacker_id,
                    target_id,
                    reason: reason.clone(),
                },
            )
            .await;
            return RemoteDamage::Refused { target_id, reason };
        }

        match effect.severity {
            Some(severity) => match self.subsystem_hit.apply(target, severity).await {
                Ok(hit) => RemoteDamage::SubsystemHit { target_id, hit },
                Err(e) => {
                    tracing::warn!(error = %e, target_id = %target_id, "Subsystem hit failed");
                    RemoteDamage::Failed {
                        target_id,
                        reason: e.to_string(),
                    }
                }
            },
            None => match self.absorb(target).await {
                Ok((roll, change)) => RemoteDamage::ShieldsDrained {
                    target_id,
                    roll,
                    change,
                },
                Err(e) => {
                    tracing::warn!(error = %e, target_id = %target_id, "Shield absorption failed");
                    RemoteDamage::Failed {
                        target_id,
                        reason: e.to_string(),
                    }
                }
            },
        }
    }

    /// Shields soak the hit: they lose 1d6x5 percent, structure is untouched.
    async fn absorb(
        &self,
        target: &DomainActor,
    ) -> Result<(DiceRollResult, PoolChange), ShipCombatError> {
        let ship = target.require_ship()?;
        let roll = rules::shield_roll().roll(dice(&*self.random));
        let change = rules::drain_shields(ship, roll.total);
        self.actor.patch(target.id(), &change.patch()).await?;
        announce(
            &*self.announcer,
            DomainEvent::ShieldsDrained {
                actor_id: target.id(),
                change: change.clone(),
            },
        )
        .await;
        Ok((roll, change))
    }
}

// =============================================================================
// Incoming hit
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingHitReport {
    pub actor_id: ActorId,
    pub pool: ShipPool,
    pub drain_roll: Option<DiceRollResult>,
    pub change: PoolChange,
}

/// Damage taken by the invoker's own ship. Active shields with charge left
/// absorb the hit; otherwise the entered amount comes off structure.
pub struct ApplyIncomingHit {
    actor: Arc<Actor>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl ApplyIncomingHit {
    pub fn new(
        actor: Arc<Actor>,
        random: Arc<dyn RandomPort>,
        announcer: Arc<dyn AnnouncementPort>,
    ) -> Self {
        Self {
            actor,
            random,
            announcer,
        }
    }

    pub async fn execute(
        &self,
        actor_id: ActorId,
        structure_damage: Option<i32>,
    ) -> Result<IncomingHitReport, ShipCombatError> {
        let ship_actor = self.actor.require(actor_id).await?;
        let ship = ship_actor.require_ship()?;

        let (drain_roll, change, event) = match rules::incoming_hit_target(ship) {
            IncomingHit::Shields => {
                let roll = rules::shield_roll().roll(dice(&*self.random));
                let change = rules::drain_shields(ship, roll.total);
                let event = DomainEvent::ShieldsDrained {
                    actor_id,
                    change: change.clone(),
                };
                (Some(roll), change, event)
            }
            IncomingHit::Structure => {
                let amount = structure_damage.ok_or(ShipCombatError::MissingStructureDamage)?;
                let change = rules::damage_structure(ship, amount)?;
                let event = DomainEvent::StructureDamaged {
                    actor_id,
                    change: change.clone(),
                };
                (None, change, event)
            }
        };
        self.actor.patch(actor_id, &change.patch()).await?;

        tracing::info!(
            actor_id = %actor_id,
            pool = %change.pool,
            previous = change.previous,
            current = change.current,
            "Incoming hit applied"
        );
        announce(&*self.announcer, event).await;

        Ok(IncomingHitReport {
            actor_id,
            pool: change.pool,
            drain_roll,
            change,
        })
    }
}

// =============================================================================
// Repair
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport {
    pub actor_id: ActorId,
    pub roll: CheckResult,
    pub shield_roll: Option<DiceRollResult>,
    pub change: PoolChange,
}

pub struct RepairShip {
    actor: Arc<Actor>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl RepairShip {
    pub fn new(
        actor: Arc<Actor>,
        random: Arc<dyn RandomPort>,
        announcer: Arc<dyn AnnouncementPort>,
    ) -> Self {
        Self {
            actor,
            random,
            announcer,
        }
    }

    pub async fn execute(
        &self,
        actor_id: ActorId,
        pool: ShipPool,
        skill: i32,
    ) -> Result<RepairReport, ShipCombatError> {
        let ship_actor = self.actor.require(actor_id).await?;
        let roll = rules::repair(&ship_actor, pool, skill)?.roll(dice(&*self.random));
        let shield_roll = (pool == ShipPool::Shields)
            .then(|| rules::shield_roll().roll(dice(&*self.random)));

        let amount = rules::repair_amount(pool, roll.total, shield_roll.as_ref().map(|r| r.total));
        let change = rules::restore_pool(ship_actor.require_ship()?, pool, amount);
        self.actor.patch(actor_id, &change.patch()).await?;

        tracing::info!(
            actor_id = %actor_id,
            pool = %pool,
            total = roll.total,
            restored = change.current - change.previous,
            "Repair resolved"
        );
        announce(
            &*self.announcer,
            DomainEvent::PoolRepaired {
                actor_id,
                roll: roll.clone(),
                change: change.clone(),
            },
        )
        .await;

        Ok(RepairReport {
            actor_id,
            roll,
            shield_roll,
            change,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShipCombatError {
    #[error("Target {0} is not a ship")]
    TargetNotShip(ActorId),
    #[error("Structure damage amount required when shields are down")]
    MissingStructureDamage,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
