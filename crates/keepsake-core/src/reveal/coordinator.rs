use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::Serialize;

use super::ExhaustionPolicy;
use crate::anniversary::{is_anniversary, TimeTogether};
use crate::catalog::{CardCatalog, CardEntry, Catalogs, SecretCatalog, SecretEntry};
use crate::error::StorageError;
use crate::events::{Event, EventSink, Milestone};
use crate::gestures::{Gesture, GestureTracker};
use crate::storage::progress::percentage;
use crate::storage::{KeyValueSlot, ProgressStore, RevealConfig};

/// Result of a "show next card" trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum NextCard {
    Revealed { card: CardEntry, newly_viewed: bool },
    /// Every card has been seen and the policy is `OfferReset`.
    ResetOffered,
    /// No card catalog is loaded, or the record was cleared.
    Unavailable,
}

/// Found / total / percentage for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevealProgress {
    pub found: u32,
    pub total: u32,
    pub percentage: f64,
}

/// A secret still waiting to be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretHint {
    pub id: String,
    pub hint: String,
}

/// Decides what to reveal next and records it in the progress store.
pub struct RevealCoordinator<S: KeyValueSlot> {
    store: ProgressStore<S>,
    cards: Arc<CardCatalog>,
    secrets: Arc<SecretCatalog>,
    settings: RevealConfig,
    rng: Mcg128Xsl64,
    gestures: GestureTracker,
    current_card: Option<u32>,
    pending: Vec<Event>,
    sink: Option<Box<dyn EventSink>>,
}

impl<S: KeyValueSlot> RevealCoordinator<S> {
    /// Begin a session and start accepting triggers. Catalogs must already
    /// be loaded.
    ///
    /// A store without a record in memory is initialized here, which counts
    /// this visit. A store the caller already initialized is used as is.
    /// Cards whose id the store cannot record (above its `total_cards`) are
    /// dropped from the deck.
    pub fn start(catalogs: Catalogs, mut store: ProgressStore<S>, settings: RevealConfig) -> Self {
        let first_visit = if store.record().is_some() {
            store.is_first_visit()
        } else {
            store.initialize_if_absent()
        };
        let total_cards = store.total_cards();
        let cards = if catalogs.cards.iter().any(|card| card.id > total_cards) {
            let bounded = catalogs.cards.up_to(total_cards);
            tracing::warn!(
                dropped = catalogs.cards.len() - bounded.len(),
                "Dropping cards outside 1..={total_cards}"
            );
            Arc::new(bounded)
        } else {
            catalogs.cards
        };
        let rng = match settings.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let keyword = store
            .record()
            .map(|r| r.identity.name.clone())
            .unwrap_or_default();
        tracing::info!(
            first_visit,
            cards = cards.len(),
            secrets = catalogs.secrets.len(),
            "Reveal session started"
        );

        let mut coordinator = Self {
            store,
            cards,
            secrets: catalogs.secrets,
            settings,
            rng,
            gestures: GestureTracker::new(&keyword),
            current_card: None,
            pending: Vec::new(),
            sink: None,
        };
        coordinator.report_write_failure();
        coordinator
    }

    /// Push every event to `sink` as well as queueing it.
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    // ── Triggers ─────────────────────────────────────────────────────

    /// Pick a card, hand it out, record it.
    ///
    /// `Unavailable` when no cards are loaded or after [`clear_all`](Self::clear_all)
    /// dropped the record.
    pub fn request_next_card(&mut self) -> NextCard {
        if self.cards.is_empty() {
            tracing::debug!("No card catalog loaded, nothing to reveal");
            return NextCard::Unavailable;
        }
        if self.store.record().is_none() {
            tracing::debug!("No progress record, nothing to reveal");
            return NextCard::Unavailable;
        }

        let cards = Arc::clone(&self.cards);
        let pool: Vec<&CardEntry> = cards
            .iter()
            .filter(|card| !self.store.has_viewed(card.id))
            .collect();

        let card = if pool.is_empty() {
            match self.settings.exhaustion {
                ExhaustionPolicy::RandomReshow => {
                    let index = self.rng.gen_range(0..cards.len());
                    cards.iter().nth(index).cloned()
                }
                ExhaustionPolicy::OfferReset => {
                    tracing::debug!("All cards viewed, offering reset");
                    self.emit(Event::ResetOffered { at: Utc::now() });
                    return NextCard::ResetOffered;
                }
            }
        } else {
            let index = self.rng.gen_range(0..pool.len());
            Some(pool[index].clone())
        };
        let Some(card) = card else {
            return NextCard::Unavailable;
        };
        tracing::debug!(card_id = card.id, pool = pool.len(), "Selected card");

        self.current_card = Some(card.id);
        let newly_viewed = self.store.mark_card_viewed(card.id);
        self.emit(Event::CardRevealed {
            card: card.clone(),
            newly_viewed,
            at: Utc::now(),
        });
        if newly_viewed {
            self.report_write_failure();
            self.after_first_view(card.id);
        }

        NextCard::Revealed { card, newly_viewed }
    }

    /// Unlock a secret. Returns `true` only the first time.
    ///
    /// Unknown ids and already-found secrets are silent no-ops, so a gesture
    /// that keeps firing never notifies twice.
    pub fn reveal_secret(&mut self, id: &str) -> bool {
        let Some(secret) = self.secrets.get(id).cloned() else {
            tracing::debug!(secret_id = id, "Ignoring unknown secret");
            return false;
        };
        if self.store.has_secret(id) || !self.store.add_secret(id) {
            return false;
        }
        self.report_write_failure();
        tracing::info!(secret_id = id, "Secret unlocked");
        self.emit(Event::SecretUnlocked {
            secret_id: secret.id,
            message: secret.message,
            at: Utc::now(),
        });
        self.emit_stats();
        true
    }

    /// Flip favorite state. Returns the new state.
    pub fn toggle_favorite(&mut self, id: u32) -> bool {
        let favorited = self.store.toggle_favorite(id);
        self.report_write_failure();
        favorited
    }

    /// Forget viewed cards and go back to the initial, nothing-shown state.
    ///
    /// Confirmation belongs to the caller; this resets unconditionally.
    pub fn reset_progress(&mut self) {
        if self.store.record().is_none() {
            return;
        }
        self.store.reset_card_progress();
        self.report_write_failure();
        self.current_card = None;
        tracing::info!("Card progress reset");
        self.emit(Event::ProgressReset { at: Utc::now() });
        self.emit_stats();
    }

    /// Feed a raw input to the gesture recognizers.
    pub fn handle_gesture(&mut self, gesture: &Gesture, at_ms: u64) -> bool {
        match self.gestures.observe(gesture, at_ms) {
            Some(secret_id) => self.reveal_secret(secret_id),
            None => false,
        }
    }

    /// Unlock the anniversary secret when `today` is the anniversary.
    pub fn check_anniversary(&mut self, today: NaiveDate) -> bool {
        let Some(start) = self.start_date() else {
            return false;
        };
        if !is_anniversary(start, today) {
            return false;
        }
        let secret_id = self.settings.anniversary_secret.clone();
        self.reveal_secret(&secret_id)
    }

    /// Mark every catalog secret found without per-secret notifications.
    pub fn reveal_all_secrets(&mut self) -> u32 {
        let secrets = Arc::clone(&self.secrets);
        let added = secrets
            .iter()
            .filter(|secret| self.store.add_secret(&secret.id))
            .count() as u32;
        if added > 0 {
            self.report_write_failure();
            self.emit_stats();
        }
        added
    }

    /// Drop the whole persisted record.
    ///
    /// Every trigger is a no-op afterwards; start a new session to begin
    /// again.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.current_card = None;
        self.store.clear_all()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn cards(&self) -> &CardCatalog {
        &self.cards
    }

    pub fn secrets(&self) -> &SecretCatalog {
        &self.secrets
    }

    pub fn settings(&self) -> &RevealConfig {
        &self.settings
    }

    /// Card most recently revealed in this session.
    pub fn current_card(&self) -> Option<&CardEntry> {
        self.current_card.and_then(|id| self.cards.get(id))
    }

    /// Viewed cards, ascending by id.
    pub fn collection(&self) -> Vec<&CardEntry> {
        self.store
            .viewed_cards()
            .into_iter()
            .filter_map(|id| self.cards.get(id))
            .collect()
    }

    pub fn favorite_cards(&self) -> Vec<&CardEntry> {
        self.store
            .favorites()
            .into_iter()
            .filter_map(|id| self.cards.get(id))
            .collect()
    }

    /// Found secrets in discovery order.
    pub fn found_secrets(&self) -> Vec<&SecretEntry> {
        self.store
            .secrets()
            .iter()
            .filter_map(|id| self.secrets.get(id))
            .collect()
    }

    pub fn hints(&self) -> Vec<SecretHint> {
        self.secrets
            .missing(|id| self.store.has_secret(id))
            .map(|s| SecretHint {
                id: s.id.clone(),
                hint: s.hint.clone(),
            })
            .collect()
    }

    pub fn card_progress(&self) -> RevealProgress {
        let found = self.collection().len() as u32;
        let total = self.cards.len() as u32;
        RevealProgress {
            found,
            total,
            percentage: percentage(found, total),
        }
    }

    pub fn secret_progress(&self) -> RevealProgress {
        let found = self.found_secrets().len() as u32;
        let total = self.secrets.len() as u32;
        RevealProgress {
            found,
            total,
            percentage: percentage(found, total),
        }
    }

    pub fn time_together(&self, now: NaiveDateTime) -> Option<TimeTogether> {
        self.start_date().map(|start| TimeTogether::between(start, now))
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn after_first_view(&mut self, card_id: u32) {
        let viewed = self.store.viewed_count();
        self.emit_stats();

        // Exact match: the 51st card must not fire it again. A reset that
        // reaches the count again is silent once the secret is found.
        if viewed == self.settings.milestone_cards && !self.store.has_secret(&self.settings.milestone_secret) {
            let secret_id = self.settings.milestone_secret.clone();
            tracing::info!(viewed, "Card milestone reached");
            self.emit(Event::MilestoneReached {
                milestone: Milestone::CardCount {
                    count: viewed,
                    secret_id: secret_id.clone(),
                },
                at: Utc::now(),
            });
            self.reveal_secret(&secret_id);
        }

        if card_id == self.settings.special_card {
            let secret_id = self.settings.special_card_secret.clone();
            self.reveal_secret(&secret_id);
        }

        let total = self.store.total_cards();
        if viewed == total {
            tracing::info!(total, "All cards revealed");
            self.emit(Event::MilestoneReached {
                milestone: Milestone::AllCardsRevealed { total },
                at: Utc::now(),
            });
        }
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.store.record().map(|r| r.identity.start_date)
    }

    fn emit_stats(&mut self) {
        let stats = self.store.get_stats();
        self.emit(Event::StatsChanged {
            stats,
            at: Utc::now(),
        });
    }

    fn report_write_failure(&mut self) {
        if let Some(e) = self.store.last_write_error() {
            let message = e.to_string();
            self.emit(Event::PersistenceFailed {
                message,
                at: Utc::now(),
            });
        }
    }

    fn emit(&mut self, event: Event) {
        if let Some(sink) = self.sink.as_mut() {
            sink.publish(&event);
        }
        self.pending.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardEntry, SecretEntry};
    use crate::gestures::{Target, KONAMI_CODE};
    use crate::storage::MemorySlot;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn card_catalog(n: u32) -> CardCatalog {
        CardCatalog::new(
            (1..=n)
                .map(|id| CardEntry {
                    id,
                    category: "Ljubav".into(),
                    emoji: "💖".into(),
                    reason_text: format!("Reason {id}"),
                })
                .collect(),
        )
        .unwrap()
    }

    fn secret_catalog() -> SecretCatalog {
        SecretCatalog::new(
            (1..=15)
                .map(|i| SecretEntry {
                    id: format!("secret{i}"),
                    message: format!("Message {i}"),
                    hint: format!("Hint {i}"),
                })
                .collect(),
        )
        .unwrap()
    }

    fn settings() -> RevealConfig {
        RevealConfig {
            seed: Some(42),
            ..RevealConfig::default()
        }
    }

    fn coordinator_with(n: u32, settings: RevealConfig) -> RevealCoordinator<MemorySlot> {
        let store = ProgressStore::new(MemorySlot::new()).with_totals(n, 15);
        let catalogs = Catalogs::new(card_catalog(n), secret_catalog());
        RevealCoordinator::start(catalogs, store, settings)
    }

    fn coordinator(n: u32) -> RevealCoordinator<MemorySlot> {
        coordinator_with(n, settings())
    }

    fn unlocked(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::SecretUnlocked { secret_id, .. } => Some(secret_id.clone()),
                _ => None,
            })
            .collect()
    }

    fn milestones(events: &[Event]) -> Vec<Milestone> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::MilestoneReached { milestone, .. } => Some(milestone.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn next_card_draws_unviewed_cards_until_exhausted() {
        let mut c = coordinator(20);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            match c.request_next_card() {
                NextCard::Revealed { card, newly_viewed } => {
                    assert!(newly_viewed);
                    assert!(seen.insert(card.id));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(c.store().viewed_count(), 20);
    }

    #[test]
    fn exhausted_deck_reshows_random_card() {
        let mut c = coordinator(5);
        for _ in 0..5 {
            c.request_next_card();
        }
        for _ in 0..20 {
            match c.request_next_card() {
                NextCard::Revealed { card, newly_viewed } => {
                    assert!(!newly_viewed);
                    assert!(c.cards().contains(card.id));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn exhausted_deck_offers_reset_when_configured() {
        let mut c = coordinator_with(
            3,
            RevealConfig {
                exhaustion: ExhaustionPolicy::OfferReset,
                ..settings()
            },
        );
        for _ in 0..3 {
            c.request_next_card();
        }
        c.drain_events();
        assert_eq!(c.request_next_card(), NextCard::ResetOffered);
        assert!(matches!(c.drain_events().as_slice(), [Event::ResetOffered { .. }]));
        assert_eq!(c.store().viewed_count(), 3);
    }

    #[test]
    fn empty_catalog_is_unavailable() {
        let store = ProgressStore::new(MemorySlot::new());
        let mut c = RevealCoordinator::start(Catalogs::default(), store, settings());
        assert_eq!(c.request_next_card(), NextCard::Unavailable);
        assert!(!c.reveal_secret("secret1"));
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn reveal_emits_card_then_stats() {
        let mut c = coordinator(10);
        c.request_next_card();
        let events = c.drain_events();
        assert!(matches!(events[0], Event::CardRevealed { newly_viewed: true, .. }));
        assert!(matches!(events[1], Event::StatsChanged { ref stats, .. } if stats.cards_viewed == 1));
        assert_eq!(c.current_card().map(|card| card.id), c.store().viewed_cards().first().copied());
    }

    #[test]
    fn milestone_fires_once_at_exact_count() {
        let mut c = coordinator(60);
        let mut fired_at = Vec::new();
        for i in 1..=60 {
            c.request_next_card();
            let events = c.drain_events();
            if !milestones(&events).is_empty() && i < 60 {
                fired_at.push(i);
                assert_eq!(unlocked(&events), vec!["secret9".to_string()]);
            }
        }
        assert_eq!(fired_at, vec![50]);
    }

    #[test]
    fn reshow_after_milestone_does_not_refire() {
        let mut c = coordinator(50);
        for _ in 0..50 {
            c.request_next_card();
        }
        c.drain_events();
        for _ in 0..10 {
            c.request_next_card();
        }
        let events = c.drain_events();
        assert!(milestones(&events).is_empty());
        assert!(unlocked(&events).is_empty());
    }

    #[test]
    fn milestone_not_repeated_after_reset() {
        let mut c = coordinator(60);
        for _ in 0..50 {
            c.request_next_card();
        }
        assert_eq!(milestones(&c.drain_events()).len(), 1);

        c.reset_progress();
        for _ in 0..50 {
            c.request_next_card();
        }
        let events = c.drain_events();
        assert!(milestones(&events).is_empty());
        assert!(unlocked(&events).is_empty());
        assert_eq!(c.store().viewed_count(), 50);
    }

    #[test]
    fn cards_past_the_total_are_dropped_from_the_deck() {
        let deck = CardCatalog::new(
            [1, 2, 3, 400]
                .into_iter()
                .map(|id| CardEntry {
                    id,
                    category: "Ljubav".into(),
                    emoji: "💖".into(),
                    reason_text: format!("Reason {id}"),
                })
                .collect(),
        )
        .unwrap();
        let store = ProgressStore::new(MemorySlot::new()).with_totals(4, 15);
        let mut c = RevealCoordinator::start(
            Catalogs::new(deck, secret_catalog()),
            store,
            RevealConfig {
                exhaustion: ExhaustionPolicy::OfferReset,
                ..settings()
            },
        );
        assert_eq!(c.cards().len(), 3);
        assert!(!c.cards().contains(400));

        let mut offered = false;
        for _ in 0..50 {
            match c.request_next_card() {
                NextCard::Revealed { card, .. } => assert_ne!(card.id, 400),
                NextCard::ResetOffered => offered = true,
                NextCard::Unavailable => panic!("deck should be available"),
            }
        }
        assert_eq!(c.store().viewed_count(), 3);
        assert!(offered);
    }

    #[test]
    fn start_does_not_recount_an_initialized_store() {
        let mut store = ProgressStore::new(MemorySlot::new()).with_totals(5, 15);
        store.initialize_if_absent();
        let c = RevealCoordinator::start(
            Catalogs::new(card_catalog(5), secret_catalog()),
            store,
            settings(),
        );
        assert_eq!(c.store().get_stats().total_visits, 1);
    }

    #[test]
    fn cleared_record_stops_reveals() {
        let mut c = coordinator(5);
        c.request_next_card();
        c.clear_all().unwrap();
        c.drain_events();

        assert_eq!(c.request_next_card(), NextCard::Unavailable);
        assert!(!c.reveal_secret("secret1"));
        c.reset_progress();
        assert!(c.drain_events().is_empty());
        assert!(c.store().record().is_none());
    }

    #[test]
    fn special_card_unlocks_its_secret() {
        let mut c = coordinator(365);
        while !c.store().has_viewed(143) {
            c.request_next_card();
        }
        assert!(c.store().has_secret("secret7"));
        let events = c.drain_events();
        assert_eq!(unlocked(&events).iter().filter(|s| *s == "secret7").count(), 1);
    }

    #[test]
    fn completion_fires_when_deck_is_done() {
        let mut c = coordinator(8);
        for _ in 0..7 {
            c.request_next_card();
        }
        assert!(milestones(&c.drain_events()).is_empty());
        c.request_next_card();
        assert_eq!(
            milestones(&c.drain_events()),
            vec![Milestone::AllCardsRevealed { total: 8 }]
        );
    }

    #[test]
    fn reveal_secret_notifies_once() {
        let mut c = coordinator(5);
        assert!(c.reveal_secret("secret7"));
        assert!(!c.reveal_secret("secret7"));
        let events = c.drain_events();
        assert_eq!(unlocked(&events), vec!["secret7".to_string()]);
        assert!(matches!(
            &events[0],
            Event::SecretUnlocked { message, .. } if message == "Message 7"
        ));
    }

    #[test]
    fn unknown_secret_is_noop() {
        let mut c = coordinator(5);
        assert!(!c.reveal_secret("secret99"));
        assert!(!c.store().has_secret("secret99"));
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn toggle_favorite_passthrough() {
        let mut c = coordinator(10);
        assert!(c.toggle_favorite(5));
        assert!(c.store().is_favorited(5));
        assert!(!c.toggle_favorite(5));
        assert!(!c.store().is_favorited(5));
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn reset_clears_cards_and_current_selection() {
        let mut c = coordinator(10);
        c.request_next_card();
        c.reveal_secret("secret1");
        let viewed = c.store().viewed_cards()[0];
        c.toggle_favorite(viewed);
        c.drain_events();

        c.reset_progress();

        assert!(c.current_card().is_none());
        assert!(c.store().viewed_cards().is_empty());
        assert_eq!(c.store().favorites(), vec![viewed]);
        assert_eq!(c.store().secrets(), vec!["secret1".to_string()]);
        let events = c.drain_events();
        assert!(matches!(events[0], Event::ProgressReset { .. }));
        assert!(matches!(events[1], Event::StatsChanged { ref stats, .. } if stats.cards_viewed == 0));
    }

    #[test]
    fn gestures_unlock_secrets_once() {
        let mut c = coordinator(5);
        let mut unlocked_now = false;
        for key in KONAMI_CODE {
            unlocked_now = c.handle_gesture(&Gesture::KeyDown(key.to_string()), 0);
        }
        assert!(unlocked_now);
        for key in KONAMI_CODE {
            unlocked_now = c.handle_gesture(&Gesture::KeyDown(key.to_string()), 0);
        }
        assert!(!unlocked_now);
        assert!(c.handle_gesture(&Gesture::Click(Target::WaxSeal), 0));
        assert!(c.handle_gesture(&Gesture::Click(Target::LetterName), 0));
        assert!(!c.handle_gesture(&Gesture::Click(Target::LetterName), 0));
        assert_eq!(unlocked(&c.drain_events()), vec!["secret6", "secret3", "secret8"]);
    }

    #[test]
    fn typing_the_name_unlocks_keyword_secret() {
        let mut c = coordinator(5);
        let mut fired = false;
        for (i, ch) in "lucija".chars().enumerate() {
            fired = c.handle_gesture(&Gesture::KeyPress(ch), i as u64 * 50);
        }
        assert!(fired);
        assert!(c.store().has_secret("secret2"));
    }

    #[test]
    fn anniversary_secret_only_on_the_day() {
        let mut c = coordinator(5);
        let other_day = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let anniversary = NaiveDate::from_ymd_opt(2026, 2, 8).unwrap();
        assert!(!c.check_anniversary(other_day));
        assert!(c.check_anniversary(anniversary));
        assert!(!c.check_anniversary(anniversary));
        assert!(c.store().has_secret("secret15"));
    }

    #[test]
    fn hints_list_unfound_secrets() {
        let mut c = coordinator(5);
        c.reveal_secret("secret1");
        let hints = c.hints();
        assert_eq!(hints.len(), 14);
        assert_eq!(hints[0], SecretHint { id: "secret2".into(), hint: "Hint 2".into() });
    }

    #[test]
    fn collection_is_sorted_and_progress_tracks_it() {
        let mut c = coordinator(10);
        for _ in 0..4 {
            c.request_next_card();
        }
        let ids: Vec<u32> = c.collection().iter().map(|card| card.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        let progress = c.card_progress();
        assert_eq!(progress.found, 4);
        assert_eq!(progress.total, 10);
        assert!((progress.percentage - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reveal_all_secrets_marks_everything() {
        let mut c = coordinator(5);
        c.reveal_secret("secret4");
        c.drain_events();
        assert_eq!(c.reveal_all_secrets(), 14);
        assert_eq!(c.secret_progress().found, 15);
        assert!(c.hints().is_empty());
        let events = c.drain_events();
        assert!(unlocked(&events).is_empty());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn write_failures_are_surfaced() {
        let mut slot = MemorySlot::new();
        slot.set_reject_writes(true);
        let store = ProgressStore::new(slot).with_totals(5, 15);
        let mut c = RevealCoordinator::start(
            Catalogs::new(card_catalog(5), secret_catalog()),
            store,
            settings(),
        );
        assert!(matches!(c.drain_events().as_slice(), [Event::PersistenceFailed { .. }]));

        match c.request_next_card() {
            NextCard::Revealed { newly_viewed, .. } => assert!(newly_viewed),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(c.store().viewed_count(), 1);
        let events = c.drain_events();
        assert!(events.iter().any(|e| matches!(e, Event::PersistenceFailed { .. })));
    }

    #[test]
    fn sink_receives_every_event() {
        struct Shared(Rc<RefCell<Vec<Event>>>);
        impl EventSink for Shared {
            fn publish(&mut self, event: &Event) {
                self.0.borrow_mut().push(event.clone());
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut c = coordinator(5).with_sink(Box::new(Shared(Rc::clone(&seen))));
        c.request_next_card();
        c.reveal_secret("secret1");
        let polled = c.drain_events();
        assert_eq!(*seen.borrow(), polled);
    }

    #[test]
    fn time_together_uses_record_start_date() {
        let c = coordinator(5);
        let now = NaiveDate::from_ymd_opt(2025, 2, 9)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        let t = c.time_together(now).unwrap();
        assert_eq!((t.days, t.hours), (1, 1));
    }
}
