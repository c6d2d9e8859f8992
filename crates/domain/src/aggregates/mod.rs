//! Aggregates - Consistency boundaries that own their writes

mod actor;

pub use actor::{Actor, ActorKind, PatchError, Resources, ShipState};
