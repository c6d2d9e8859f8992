//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Actor storage (the host's documents; in-memory here)
//! - Announcements (the host's chat log)
//! - Authorization and target selection (host user state)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

pub use error::{AnnouncementError, RepoError};
pub use external::{AnnouncementPort, AuthorizationPort, TargetingPort};
pub use repos::ActorRepo;
pub use testing::{ClockPort, RandomPort};
pub use types::Announcement;

// =============================================================================
// Mocks (test only)
// =============================================================================
#[cfg(test)]
pub use external::{MockAnnouncementPort, MockAuthorizationPort, MockTargetingPort};
#[cfg(test)]
pub use repos::MockActorRepo;
#[cfg(test)]
pub use testing::MockClockPort;
