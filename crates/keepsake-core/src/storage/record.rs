//! The persisted progress aggregate.
//!
//! Field names follow the stored JSON (`user`, `cardsViewed`, ...), so a
//! record written by one version of the site reads back in another.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Who the gift is for. Fixed once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub start_date: NaiveDate,
    pub first_visit: DateTime<Utc>,
}

/// Everything that changes while the gift is being explored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Ascending iteration comes for free.
    #[serde(default)]
    pub cards_viewed: BTreeSet<u32>,
    /// Not required to be a subset of `cards_viewed`.
    #[serde(default)]
    pub favorites: BTreeSet<u32>,
    /// Discovery order is kept for display.
    #[serde(default)]
    pub secrets_found: IndexSet<String>,
    pub last_visit: DateTime<Utc>,
    #[serde(default = "default_total_visits")]
    pub total_visits: u32,
}

fn default_total_visits() -> u32 {
    1
}

/// The single persisted aggregate of one installation's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "user")]
    pub identity: Identity,
    pub progress: Progress,
}

impl UserRecord {
    /// A first-visit record: empty sets, one visit, both timestamps `now`.
    pub fn fresh(name: impl Into<String>, start_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            identity: Identity {
                name: name.into(),
                start_date,
                first_visit: now,
            },
            progress: Progress {
                cards_viewed: BTreeSet::new(),
                favorites: BTreeSet::new(),
                secrets_found: IndexSet::new(),
                last_visit: now,
                total_visits: 1,
            },
        }
    }

    /// Register another session start.
    pub fn record_visit(&mut self, now: DateTime<Utc>) {
        self.progress.last_visit = now;
        self.progress.total_visits = self.progress.total_visits.saturating_add(1);
    }
}
