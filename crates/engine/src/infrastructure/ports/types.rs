//! Data carried across port boundaries.

use chrono::{DateTime, Utc};
use fartrek_domain::DomainEvent;

/// A published event as kept in the announcement log.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub sequence: u64,
    pub published_at: DateTime<Utc>,
    pub event: DomainEvent,
}
