//! Far Trek Shared - Wire contracts for the rules engine
//!
//! Request bodies and response payloads exchanged between the engine's HTTP
//! surface and a tabletop host or UI client.
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **No domain IDs** - use raw `uuid::Uuid` in DTOs
//! 3. **camelCase on the wire**

pub mod requests;
pub mod responses;

pub use requests::{
    AttributeTestRequest, FateRerollRequest, IncomingHitRequest, InitiativeRequest,
    ItemRollRequest, RepairRequest, SetTargetRequest, ShipAttackRequest, SubsystemHitRequest,
    SurvivalRequest,
};
pub use responses::{
    ActorSheetResponse, AnnouncementData, ErrorCode, FateRerollResponse, IncomingHitResponse,
    ItemRollResponse, RemoteDamageData, RepairResponse, ResponseResult, RollResponse,
    ShipAttackResponse, SubsystemCycleResponse, SubsystemHitResponse, SurvivalResponse,
    WeaponAttackResponse, WeaponModeResponse,
};
