//! Write-through store for the single [`UserRecord`].
//!
//! The store is the only thing allowed to mutate the record. Every mutation
//! changes the in-memory copy and writes the slot before returning, so no
//! caller can observe a changed-but-unsaved record. A failed write is logged
//! and kept in [`ProgressStore::last_write_error`]; the in-memory change is
//! not rolled back.
//!
//! A missing or unparsable slot reads as "no record". Until
//! [`ProgressStore::initialize_if_absent`] has run, mutations are no-ops.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::record::UserRecord;
use super::slot::KeyValueSlot;
use crate::error::StorageError;

/// Number of reason cards in the deck.
pub const TOTAL_CARDS: u32 = 365;
/// Number of hidden secrets.
pub const TOTAL_SECRETS: u32 = 15;
/// Name used when no identity is configured.
pub const DEFAULT_NAME: &str = "Lucija";

/// Default relationship start date (2025-02-08).
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 8).unwrap_or_default()
}

/// Read-only projection used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub cards_viewed: u32,
    pub total_cards: u32,
    pub favorites: u32,
    pub secrets_found: u32,
    pub total_secrets: u32,
    pub total_visits: u32,
    pub first_visit: Option<DateTime<Utc>>,
    pub last_visit: Option<DateTime<Utc>>,
}

impl Stats {
    /// The shape reported when there is no record.
    pub fn empty(total_cards: u32, total_secrets: u32) -> Self {
        Self {
            cards_viewed: 0,
            total_cards,
            favorites: 0,
            secrets_found: 0,
            total_secrets,
            total_visits: 0,
            first_visit: None,
            last_visit: None,
        }
    }

    /// 0.0 .. 100.0 of the deck revealed.
    pub fn card_percentage(&self) -> f64 {
        percentage(self.cards_viewed, self.total_cards)
    }

    /// 0.0 .. 100.0 of the secrets found.
    pub fn secret_percentage(&self) -> f64 {
        percentage(self.secrets_found, self.total_secrets)
    }

    pub fn all_cards_viewed(&self) -> bool {
        self.total_cards > 0 && self.cards_viewed >= self.total_cards
    }
}

pub(crate) fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).min(100.0)
}

/// Owner of the persisted progress record.
#[derive(Debug)]
pub struct ProgressStore<S: KeyValueSlot> {
    slot: S,
    record: Option<UserRecord>,
    name: String,
    start_date: NaiveDate,
    total_cards: u32,
    total_secrets: u32,
    last_write_error: Option<StorageError>,
}

impl<S: KeyValueSlot> ProgressStore<S> {
    /// Create a store over `slot`. Nothing is read until
    /// [`initialize_if_absent`](Self::initialize_if_absent).
    pub fn new(slot: S) -> Self {
        Self {
            slot,
            record: None,
            name: DEFAULT_NAME.to_string(),
            start_date: default_start_date(),
            total_cards: TOTAL_CARDS,
            total_secrets: TOTAL_SECRETS,
            last_write_error: None,
        }
    }

    /// Identity written into a freshly created record.
    pub fn with_identity(mut self, name: impl Into<String>, start_date: NaiveDate) -> Self {
        self.name = name.into();
        self.start_date = start_date;
        self
    }

    /// Upper bounds for the card and secret sets.
    pub fn with_totals(mut self, total_cards: u32, total_secrets: u32) -> Self {
        self.total_cards = total_cards;
        self.total_secrets = total_secrets;
        self
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Read the record from the slot.
    ///
    /// Absent, unreadable and unparsable slots all yield `None`.
    pub fn load(&self) -> Option<UserRecord> {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Error reading progress record: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!("Discarding unparsable progress record at {}: {e}", self.slot.location());
                None
            }
        }
    }

    /// Start a session: create the record on first visit, otherwise count
    /// the visit. Returns `true` when a fresh record was created.
    pub fn initialize_if_absent(&mut self) -> bool {
        let now = Utc::now();
        let created = match self.load() {
            Some(mut record) => {
                record.record_visit(now);
                self.record = Some(record);
                false
            }
            None => {
                self.record = Some(UserRecord::fresh(self.name.clone(), self.start_date, now));
                true
            }
        };
        self.persist();
        created
    }

    /// Serialize the in-memory record into the slot.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let record = self.record.as_ref().ok_or(StorageError::NoRecord)?;
        let content = serde_json::to_string(record)?;
        self.slot.write(&content)
    }

    /// Remove the backing record entirely.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.record = None;
        self.slot.remove().inspect_err(|e| {
            tracing::error!("Error clearing progress record: {e}");
        })
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add `id` to the viewed set. Returns `true` only for a fresh reveal.
    pub fn mark_card_viewed(&mut self, id: u32) -> bool {
        if id == 0 || id > self.total_cards {
            tracing::warn!(card_id = id, "Ignoring card outside 1..={}", self.total_cards);
            return false;
        }
        let Some(record) = self.record.as_mut() else {
            return false;
        };
        if !record.progress.cards_viewed.insert(id) {
            return false;
        }
        self.persist();
        true
    }

    /// Flip favorite membership. Returns the new state.
    pub fn toggle_favorite(&mut self, id: u32) -> bool {
        let Some(record) = self.record.as_mut() else {
            return false;
        };
        let favorites = &mut record.progress.favorites;
        let now_favorite = if favorites.remove(&id) {
            false
        } else {
            favorites.insert(id);
            true
        };
        self.persist();
        now_favorite
    }

    /// Add a found secret. Returns `true` only when newly added.
    pub fn add_secret(&mut self, id: &str) -> bool {
        let total_secrets = self.total_secrets as usize;
        let Some(record) = self.record.as_mut() else {
            return false;
        };
        let secrets = &mut record.progress.secrets_found;
        if secrets.contains(id) {
            return false;
        }
        if secrets.len() >= total_secrets {
            tracing::warn!(secret_id = id, "All {total_secrets} secrets already found");
            return false;
        }
        secrets.insert(id.to_string());
        self.persist();
        true
    }

    /// Forget viewed cards. Favorites and secrets survive.
    pub fn reset_card_progress(&mut self) {
        let Some(record) = self.record.as_mut() else {
            return;
        };
        record.progress.cards_viewed.clear();
        self.persist();
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn record(&self) -> Option<&UserRecord> {
        self.record.as_ref()
    }

    pub fn is_favorited(&self, id: u32) -> bool {
        self.record
            .as_ref()
            .is_some_and(|r| r.progress.favorites.contains(&id))
    }

    pub fn has_secret(&self, id: &str) -> bool {
        self.record
            .as_ref()
            .is_some_and(|r| r.progress.secrets_found.contains(id))
    }

    pub fn has_viewed(&self, id: u32) -> bool {
        self.record
            .as_ref()
            .is_some_and(|r| r.progress.cards_viewed.contains(&id))
    }

    /// Viewed card ids, ascending.
    pub fn viewed_cards(&self) -> Vec<u32> {
        self.record
            .as_ref()
            .map(|r| r.progress.cards_viewed.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Favorited card ids, ascending.
    pub fn favorites(&self) -> Vec<u32> {
        self.record
            .as_ref()
            .map(|r| r.progress.favorites.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Found secret ids in discovery order.
    pub fn secrets(&self) -> Vec<String> {
        self.record
            .as_ref()
            .map(|r| r.progress.secrets_found.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn viewed_count(&self) -> u32 {
        self.record
            .as_ref()
            .map_or(0, |r| r.progress.cards_viewed.len() as u32)
    }

    pub fn total_cards(&self) -> u32 {
        self.total_cards
    }

    pub fn total_secrets(&self) -> u32 {
        self.total_secrets
    }

    pub fn get_stats(&self) -> Stats {
        let Some(record) = self.record.as_ref() else {
            return Stats::empty(self.total_cards, self.total_secrets);
        };
        let progress = &record.progress;
        Stats {
            cards_viewed: progress.cards_viewed.len() as u32,
            total_cards: self.total_cards,
            favorites: progress.favorites.len() as u32,
            secrets_found: progress.secrets_found.len() as u32,
            total_secrets: self.total_secrets,
            total_visits: progress.total_visits,
            first_visit: Some(record.identity.first_visit),
            last_visit: Some(progress.last_visit),
        }
    }

    /// No record yet, or this is the first session.
    pub fn is_first_visit(&self) -> bool {
        self.record
            .as_ref()
            .map_or(true, |r| r.progress.total_visits == 1)
    }

    /// Pretty-printed backup of the whole record.
    pub fn export_json(&self) -> Result<String, StorageError> {
        let record = self.record.as_ref().ok_or(StorageError::NoRecord)?;
        Ok(serde_json::to_string_pretty(record)?)
    }

    /// Error from the most recent write, cleared by the next successful one.
    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.last_write_error.as_ref()
    }

    fn persist(&mut self) -> bool {
        match self.save() {
            Ok(()) => {
                self.last_write_error = None;
                true
            }
            Err(e) => {
                tracing::error!("Error saving progress record: {e}");
                self.last_write_error = Some(e);
                false
            }
        }
    }
}
