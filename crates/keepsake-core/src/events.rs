use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CardEntry;
use crate::storage::Stats;

/// Every observable outcome of a trigger produces an Event.
/// The presentation layer polls for them or subscribes through an
/// [`EventSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A card was handed to the presentation layer.
    CardRevealed {
        card: CardEntry,
        /// False when the card had been seen before (re-show).
        newly_viewed: bool,
        at: DateTime<Utc>,
    },
    SecretUnlocked {
        secret_id: String,
        message: String,
        at: DateTime<Utc>,
    },
    MilestoneReached {
        milestone: Milestone,
        at: DateTime<Utc>,
    },
    /// Every card has been seen and the policy asks the user whether to
    /// start over.
    ResetOffered {
        at: DateTime<Utc>,
    },
    ProgressReset {
        at: DateTime<Utc>,
    },
    StatsChanged {
        stats: Stats,
        at: DateTime<Utc>,
    },
    /// The change is applied in memory but could not be written.
    PersistenceFailed {
        message: String,
        at: DateTime<Utc>,
    },
}

/// Derived progress thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Milestone {
    /// The Nth distinct card was recorded; unlocks `secret_id`.
    CardCount { count: u32, secret_id: String },
    /// Every card in the deck has been seen.
    AllCardsRevealed { total: u32 },
}

/// Optional push-style subscriber, injected at construction time.
pub trait EventSink {
    fn publish(&mut self, event: &Event);
}

/// Collects events into a vector. Handy for embedders that batch.
impl EventSink for Vec<Event> {
    fn publish(&mut self, event: &Event) {
        self.push(event.clone());
    }
}
