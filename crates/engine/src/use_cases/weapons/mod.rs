//! Weapon use cases: the stun/heavy/kill selector.

use std::sync::Arc;

use fartrek_domain::rules;
use fartrek_domain::{ActorId, DomainError, DomainEvent, ItemId, PhaserMode};

use crate::entities::Actor;
use crate::infrastructure::ports::{AnnouncementPort, RepoError};

use super::announce;

/// Container for weapon use cases.
pub struct WeaponUseCases {
    pub toggle_mode: Arc<ToggleWeaponMode>,
}

impl WeaponUseCases {
    pub fn new(toggle_mode: Arc<ToggleWeaponMode>) -> Self {
        Self { toggle_mode }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub item_id: ItemId,
    pub weapon: String,
    pub previous: PhaserMode,
    pub mode: PhaserMode,
    /// The weapon's stored TN after the change.
    pub weapon_tn: i32,
}

/// Advance a stun-capable weapon one step: stun, heavy, kill, stun.
pub struct ToggleWeaponMode {
    actor: Arc<Actor>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl ToggleWeaponMode {
    pub fn new(actor: Arc<Actor>, announcer: Arc<dyn AnnouncementPort>) -> Self {
        Self { actor, announcer }
    }

    pub async fn execute(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
    ) -> Result<ModeChange, WeaponModeError> {
        let actor = self.actor.require(actor_id).await?;
        let toggle = rules::toggle_weapon_mode(&actor, item_id)?;
        self.actor.patch(actor_id, &toggle.patch).await?;

        let change = ModeChange {
            item_id,
            weapon: toggle.weapon,
            previous: toggle.previous,
            mode: toggle.next,
            weapon_tn: toggle.next.target_number(),
        };
        tracing::info!(
            actor_id = %actor_id,
            weapon = %change.weapon,
            mode = %change.mode,
            "Weapon mode changed"
        );
        announce(
            &*self.announcer,
            DomainEvent::WeaponModeChanged {
                actor_id,
                item_id,
                weapon: change.weapon.clone(),
                mode: change.mode,
                weapon_tn: change.weapon_tn,
            },
        )
        .await;
        Ok(change)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeaponModeError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
