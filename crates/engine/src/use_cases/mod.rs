//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific rules area. Every use case
//! follows the same order: roll the dice, write the resulting patch, then
//! announce. Announcements go out only after the write has succeeded.

pub mod actors;
pub mod checks;
pub mod fate;
pub mod ship_combat;
pub mod subsystems;
pub mod weapons;

pub use actors::{ActorError, ActorOps};
pub use checks::CheckUseCases;
pub use fate::FateUseCases;
pub use ship_combat::ShipCombatUseCases;
pub use subsystems::SubsystemUseCases;
pub use weapons::WeaponUseCases;

use fartrek_domain::DomainEvent;

use crate::infrastructure::ports::{AnnouncementPort, RandomPort};

/// Publish an event. A failed announcement is logged; the write it reports
/// has already happened and stays.
pub(crate) async fn announce(announcer: &dyn AnnouncementPort, event: DomainEvent) {
    let event_type = event.event_type();
    if let Err(e) = announcer.publish(event).await {
        tracing::warn!(error = %e, event_type, "Failed to publish announcement");
    }
}

/// Adapts the random port to the `FnMut(min, max)` the domain rolls with.
pub(crate) fn dice(random: &dyn RandomPort) -> impl FnMut(i32, i32) -> i32 + '_ {
    move |min, max| random.gen_range(min, max)
}
