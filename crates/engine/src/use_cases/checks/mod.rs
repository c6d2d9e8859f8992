//! Character check use cases.
//!
//! Attribute tests, initiative, item rolls (skill check or weapon attack by
//! item variant) and the consciousness check. Only a passed consciousness
//! check writes to the sheet.

use std::sync::Arc;

use fartrek_domain::rules::{self, ItemCheck};
use fartrek_domain::{
    ActorId, AttributeKey, CheckResult, DomainError, DomainEvent, ItemId, PhaserMode,
};

use crate::entities::Actor;
use crate::infrastructure::ports::{AnnouncementPort, RandomPort, RepoError};

use super::{announce, dice};

/// Container for check use cases.
pub struct CheckUseCases {
    pub attribute: Arc<RollAttributeTest>,
    pub initiative: Arc<RollInitiative>,
    pub item: Arc<RollItem>,
    pub survival: Arc<RollSurvival>,
}

impl CheckUseCases {
    pub fn new(
        attribute: Arc<RollAttributeTest>,
        initiative: Arc<RollInitiative>,
        item: Arc<RollItem>,
        survival: Arc<RollSurvival>,
    ) -> Self {
        Self {
            attribute,
            initiative,
            item,
            survival,
        }
    }
}

/// A completed roll and whether fate could be spent on it.
#[derive(Debug, Clone)]
pub struct CheckRoll {
    pub actor_id: ActorId,
    pub result: CheckResult,
    pub fate_available: bool,
}

#[derive(Debug, Clone)]
pub enum ItemRoll {
    Skill(CheckRoll),
    Weapon {
        roll: CheckRoll,
        item_id: ItemId,
        defense_stat: AttributeKey,
        weapon_tn: i32,
        mode: Option<PhaserMode>,
    },
}

impl ItemRoll {
    pub fn roll(&self) -> &CheckRoll {
        match self {
            Self::Skill(roll) | Self::Weapon { roll, .. } => roll,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SurvivalRoll {
    pub roll: CheckRoll,
    pub wounds_before: u32,
    pub wounds_after: u32,
}

// =============================================================================
// Attribute test
// =============================================================================

pub struct RollAttributeTest {
    actor: Arc<Actor>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl RollAttributeTest {
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
        attribute: AttributeKey,
        modifier: i32,
    ) -> Result<CheckRoll, CheckError> {
        let actor = self.actor.require(actor_id).await?;
        let result = rules::attribute_test(&actor, attribute, modifier).roll(dice(&*self.random));

        tracing::info!(
            actor_id = %actor_id,
            attribute = %attribute,
            total = result.total,
            "Attribute test rolled"
        );
        announce(
            &*self.announcer,
            DomainEvent::CheckRolled {
                actor_id,
                result: result.clone(),
            },
        )
        .await;

        Ok(CheckRoll {
            actor_id,
            result,
            fate_available: actor.can_spend_fate(),
        })
    }
}

// =============================================================================
// Initiative
// =============================================================================

pub struct RollInitiative {
    actor: Arc<Actor>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl RollInitiative {
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

    pub async fn execute(&self, actor_id: ActorId, modifier: i32) -> Result<CheckRoll, CheckError> {
        let actor = self.actor.require(actor_id).await?;
        let result = rules::initiative(&actor, modifier).roll(dice(&*self.random));

        tracing::info!(actor_id = %actor_id, total = result.total, "Initiative rolled");
        announce(
            &*self.announcer,
            DomainEvent::CheckRolled {
                actor_id,
                result: result.clone(),
            },
        )
        .await;

        Ok(CheckRoll {
            actor_id,
            result,
            fate_available: actor.can_spend_fate(),
        })
    }
}

// =============================================================================
// Item roll
// =============================================================================

/// Roll whatever an item rolls: skills make a skill check, weapons attack.
pub struct RollItem {
    actor: Arc<Actor>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl RollItem {
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
        item_id: ItemId,
        modifier: i32,
    ) -> Result<ItemRoll, CheckError> {
        let actor = self.actor.require(actor_id).await?;
        let check = rules::item_check(&actor, item_id, modifier)?;
        let result = check.spec().roll(dice(&*self.random));
        let fate_available = actor.can_spend_fate();

        let (event, roll) = match check {
            ItemCheck::Skill(_) => {
                tracing::info!(
                    actor_id = %actor_id,
                    skill = %result.label,
                    total = result.total,
                    "Skill check rolled"
                );
                let event = DomainEvent::CheckRolled {
                    actor_id,
                    result: result.clone(),
                };
                let roll = ItemRoll::Skill(CheckRoll {
                    actor_id,
                    result,
                    fate_available,
                });
                (event, roll)
            }
            ItemCheck::Weapon(attack) => {
                tracing::info!(
                    actor_id = %actor_id,
                    weapon = %result.label,
                    range = %attack.range,
                    total = result.total,
                    "Weapon attack rolled"
                );
                let event = DomainEvent::WeaponAttackRolled {
                    actor_id,
                    item_id,
                    result: result.clone(),
                    defense_stat: attack.defense_stat,
                    weapon_tn: attack.weapon_tn,
                    mode: attack.mode,
                };
                let roll = ItemRoll::Weapon {
                    roll: CheckRoll {
                        actor_id,
                        result,
                        fate_available,
                    },
                    item_id,
                    defense_stat: attack.defense_stat,
                    weapon_tn: attack.weapon_tn,
                    mode: attack.mode,
                };
                (event, roll)
            }
        };

        announce(&*self.announcer, event).await;
        Ok(roll)
    }
}

// =============================================================================
// Consciousness check
// =============================================================================

/// Consciousness check after a hit. Passing costs one wound; failing leaves
/// the sheet alone.
pub struct RollSurvival {
    actor: Arc<Actor>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl RollSurvival {
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
        weapon_tn: i32,
        modifier: i32,
    ) -> Result<SurvivalRoll, CheckError> {
        let actor = self.actor.require(actor_id).await?;
        let result = rules::survival(&actor, weapon_tn, modifier).roll(dice(&*self.random));
        let wounds_before = actor.resources().wounds;

        let wounds_after = match rules::survival_patch(&actor, &result) {
            Some(patch) => self.actor.patch(actor_id, &patch).await?.resources().wounds,
            None => wounds_before,
        };

        tracing::info!(
            actor_id = %actor_id,
            total = result.total,
            target = ?result.target_number,
            wounds = wounds_after,
            "Consciousness check resolved"
        );
        announce(
            &*self.announcer,
            DomainEvent::SurvivalResolved {
                actor_id,
                result: result.clone(),
                wounds: wounds_after,
            },
        )
        .await;

        Ok(SurvivalRoll {
            roll: CheckRoll {
                actor_id,
                result,
                fate_available: actor.can_spend_fate(),
            },
            wounds_before,
            wounds_after,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
