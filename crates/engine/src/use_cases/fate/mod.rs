//! Fate point use cases.

use std::sync::Arc;

use fartrek_domain::{
    ActorId, ActorPatch, DiceFormula, DiceParseError, DiceRollResult, DomainEvent, FieldGuard,
    FieldUpdate,
};

use crate::entities::Actor;
use crate::infrastructure::ports::{AnnouncementPort, RandomPort, RepoError};

use super::{announce, dice};

/// Container for fate use cases.
pub struct FateUseCases {
    pub reroll: Arc<FateReroll>,
}

impl FateUseCases {
    pub fn new(reroll: Arc<FateReroll>) -> Self {
        Self { reroll }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RerollResult {
    pub actor_id: ActorId,
    pub label: String,
    pub roll: DiceRollResult,
    pub remaining_fate: u32,
}

/// Spend one fate point to re-roll a previous check with fresh dice.
///
/// The spend is a compare-and-set on the fate value that was read, so two
/// rerolls racing on the last point cannot both succeed. The formula is
/// parsed before anything is spent.
pub struct FateReroll {
    actor: Arc<Actor>,
    random: Arc<dyn RandomPort>,
    announcer: Arc<dyn AnnouncementPort>,
}

impl FateReroll {
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
        label: impl Into<String>,
        formula: &str,
    ) -> Result<RerollResult, FateError> {
        let label = label.into();
        let formula = DiceFormula::parse(formula)?;
        let actor = self.actor.require(actor_id).await?;

        let fate = actor.resources().fate;
        if fate == 0 {
            tracing::debug!(actor_id = %actor_id, "Fate reroll refused, no fate left");
            return Err(FateError::NoFatePoints);
        }
        let spend = ActorPatch::new()
            .guard(FieldGuard::FatePoints { expected: fate })
            .set(FieldUpdate::FatePoints { value: fate - 1 });
        let updated = self.actor.patch(actor_id, &spend).await.map_err(|e| {
            if e.is_conflict() {
                FateError::Contended
            } else {
                FateError::Repo(e)
            }
        })?;
        let remaining_fate = updated.resources().fate;

        let roll = formula.roll(dice(&*self.random));
        tracing::info!(
            actor_id = %actor_id,
            label = %label,
            total = roll.total,
            remaining_fate,
            "Fate reroll"
        );
        announce(
            &*self.announcer,
            DomainEvent::FateRerolled {
                actor_id,
                label: label.clone(),
                roll: roll.clone(),
                remaining_fate,
            },
        )
        .await;

        Ok(RerollResult {
            actor_id,
            label,
            roll,
            remaining_fate,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FateError {
    #[error("No fate points left")]
    NoFatePoints,
    #[error("Fate points changed during the reroll")]
    Contended,
    #[error("Invalid reroll formula: {0}")]
    Formula(#[from] DiceParseError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
