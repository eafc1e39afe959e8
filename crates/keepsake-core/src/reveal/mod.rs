//! Reveal gating for cards and secrets.
//!
//! ## Card stream
//!
//! ```text
//! Idle -> Selecting -> Revealing -> Recorded -> Idle
//! ```
//!
//! Selecting draws uniformly from the cards not yet viewed. Revealing hands
//! the card to the presentation layer as a `CardRevealed` event. Recorded
//! marks the card viewed and, for a first view only, fires the derived
//! effects (stats refresh, milestone, linked secret, completion).
//!
//! ## Secret stream
//!
//! Same shape without selection: the trigger names the secret, and the
//! coordinator unlocks it at most once.

mod coordinator;

pub use coordinator::{NextCard, RevealCoordinator, RevealProgress, SecretHint};

use serde::{Deserialize, Serialize};

/// What "show next card" does once every card has been viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Keep drawing, uniformly from the whole deck.
    #[default]
    RandomReshow,
    /// Draw nothing and offer to reset card progress instead.
    OfferReset,
}
