//! Announcement log.
//!
//! Every published event is written to the tracing log and kept in a bounded
//! history that clients poll through `GET /api/announcements`.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use fartrek_domain::DomainEvent;
use tokio::sync::Mutex;

use crate::infrastructure::ports::{Announcement, AnnouncementError, AnnouncementPort, ClockPort};

pub const DEFAULT_HISTORY: usize = 200;

struct History {
    entries: VecDeque<Announcement>,
    next_sequence: u64,
}

pub struct LogAnnouncer {
    clock: Arc<dyn ClockPort>,
    capacity: usize,
    history: Mutex<History>,
}

impl LogAnnouncer {
    pub fn new(clock: Arc<dyn ClockPort>, capacity: usize) -> Self {
        Self {
            clock,
            capacity: capacity.max(1),
            history: Mutex::new(History {
                entries: VecDeque::new(),
                next_sequence: 1,
            }),
        }
    }
}

#[async_trait]
impl AnnouncementPort for LogAnnouncer {
    async fn publish(&self, event: DomainEvent) -> Result<(), AnnouncementError> {
        tracing::info!(
            event_type = event.event_type(),
            actor_id = %event.actor_id(),
            event = ?event,
            "Announcement"
        );

        let mut history = self.history.lock().await;
        let sequence = history.next_sequence;
        history.next_sequence += 1;
        history.entries.push_back(Announcement {
            sequence,
            published_at: self.clock.now(),
            event,
        });
        while history.entries.len() > self.capacity {
            history.entries.pop_front();
        }
        Ok(())
    }

    /// Newest last.
    async fn recent(&self, limit: usize) -> Vec<Announcement> {
        let history = self.history.lock().await;
        let skip = history.entries.len().saturating_sub(limit);
        history.entries.iter().skip(skip).cloned().collect()
    }
}
