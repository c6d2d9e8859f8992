//! Request bodies
//!
//! Every situational modifier defaults to 0 when omitted, like the modifier
//! field of the roll dialogs.

mod checks;
mod fate;
mod ship;
mod targeting;

pub use checks::{AttributeTestRequest, InitiativeRequest, ItemRollRequest, SurvivalRequest};
pub use fate::FateRerollRequest;
pub use ship::{IncomingHitRequest, RepairRequest, ShipAttackRequest, SubsystemHitRequest};
pub use targeting::SetTargetRequest;
