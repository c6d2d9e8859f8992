//! Application state and composition.

use std::sync::Arc;

use crate::entities;
use crate::infrastructure::{
    announcer::LogAnnouncer,
    authorization::OwnershipAuthorization,
    clock::{SystemClock, SystemRandom},
    config::AppConfig,
    memory::InMemoryActorRepo,
    ports::{ActorRepo, AnnouncementPort, AuthorizationPort, ClockPort, RandomPort, TargetingPort},
    targeting::InMemoryTargeting,
};
use crate::use_cases::{
    self,
    checks::{RollAttributeTest, RollInitiative, RollItem, RollSurvival},
    fate::FateReroll,
    ship_combat::{ApplyIncomingHit, RepairShip, ResolveShipAttack},
    subsystems::{ApplySubsystemHit, CycleSubsystem},
    weapons::ToggleWeaponMode,
};

/// Main application state.
///
/// Holds all use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub announcer: Arc<dyn AnnouncementPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub actors: Arc<use_cases::ActorOps>,
    pub checks: use_cases::CheckUseCases,
    pub weapons: use_cases::WeaponUseCases,
    pub subsystems: use_cases::SubsystemUseCases,
    pub ship_combat: use_cases::ShipCombatUseCases,
    pub fate: use_cases::FateUseCases,
}

/// The ports an [`App`] is assembled from.
pub struct Ports {
    pub actors: Arc<dyn ActorRepo>,
    pub targeting: Arc<dyn TargetingPort>,
    pub authorization: Arc<dyn AuthorizationPort>,
    pub announcer: Arc<dyn AnnouncementPort>,
    pub random: Arc<dyn RandomPort>,
}

impl App {
    pub fn new(ports: Ports) -> Self {
        let Ports {
            actors,
            targeting,
            authorization,
            announcer,
            random,
        } = ports;
        let actor = Arc::new(entities::Actor::new(actors));

        let subsystem_hit = Arc::new(ApplySubsystemHit::new(
            actor.clone(),
            authorization.clone(),
            random.clone(),
            announcer.clone(),
        ));

        let use_cases = UseCases {
            actors: Arc::new(use_cases::ActorOps::new(actor.clone(), targeting.clone())),
            checks: use_cases::CheckUseCases::new(
                Arc::new(RollAttributeTest::new(
                    actor.clone(),
                    random.clone(),
                    announcer.clone(),
                )),
                Arc::new(RollInitiative::new(
                    actor.clone(),
                    random.clone(),
                    announcer.clone(),
                )),
                Arc::new(RollItem::new(actor.clone(), random.clone(), announcer.clone())),
                Arc::new(RollSurvival::new(
                    actor.clone(),
                    random.clone(),
                    announcer.clone(),
                )),
            ),
            weapons: use_cases::WeaponUseCases::new(Arc::new(ToggleWeaponMode::new(
                actor.clone(),
                announcer.clone(),
            ))),
            subsystems: use_cases::SubsystemUseCases::new(
                Arc::new(CycleSubsystem::new(actor.clone(), announcer.clone())),
                subsystem_hit.clone(),
            ),
            ship_combat: use_cases::ShipCombatUseCases::new(
                Arc::new(ResolveShipAttack::new(
                    actor.clone(),
                    targeting,
                    authorization,
                    subsystem_hit,
                    random.clone(),
                    announcer.clone(),
                )),
                Arc::new(ApplyIncomingHit::new(
                    actor.clone(),
                    random.clone(),
                    announcer.clone(),
                )),
                Arc::new(RepairShip::new(actor.clone(), random.clone(), announcer.clone())),
            ),
            fate: use_cases::FateUseCases::new(Arc::new(FateReroll::new(
                actor,
                random,
                announcer.clone(),
            ))),
        };

        Self {
            use_cases,
            announcer,
        }
    }

    /// In-memory adapters configured from the environment.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let seed = config.load_seed_actors()?;
        tracing::info!(count = seed.len(), "Loaded seed actors");

        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        if config.dice_seed.is_some() {
            tracing::info!(seed = ?config.dice_seed, "Dice are deterministic");
        }

        Ok(Self::new(Ports {
            actors: Arc::new(InMemoryActorRepo::with_actors(seed)),
            targeting: Arc::new(InMemoryTargeting::new()),
            authorization: Arc::new(OwnershipAuthorization::new(
                config.game_masters.iter().copied(),
            )),
            announcer: Arc::new(LogAnnouncer::new(clock, config.announcement_history)),
            random: Arc::new(SystemRandom::from_seed(config.dice_seed)),
        }))
    }
}
