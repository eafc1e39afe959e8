//! # Keepsake Core Library
//!
//! Engine behind a personal anniversary gift: a deck of "reasons" cards
//! revealed one at a time and a set of hidden secrets unlocked by page
//! gestures, with all progress kept in a single local record.
//!
//! ## Architecture
//!
//! - **Storage**: a write-through [`ProgressStore`] over a one-key
//!   [`KeyValueSlot`], plus TOML-based configuration
//! - **Catalogs**: read-only card and secret content, loaded from files or
//!   HTTP and degrading to empty on failure
//! - **Reveal**: the [`RevealCoordinator`] picks unseen cards, records them
//!   and fires milestones and linked secrets exactly once
//! - **Gestures**: small recognizers that map raw input to secret ids
//!
//! ## Key Components
//!
//! - [`RevealCoordinator`]: reveal gating and derived effects
//! - [`ProgressStore`]: the only writer of the persisted record
//! - [`Config`]: application configuration management
//! - [`Event`]: everything the presentation layer reacts to

pub mod anniversary;
pub mod bootstrap;
pub mod catalog;
pub mod error;
pub mod events;
pub mod gestures;
pub mod reveal;
pub mod storage;

pub use anniversary::TimeTogether;
pub use catalog::{CardCatalog, CardEntry, Catalogs, ContentSource, SecretCatalog, SecretEntry};
pub use error::{CatalogError, ConfigError, CoreError, StorageError};
pub use events::{Event, EventSink, Milestone};
pub use gestures::{Gesture, GestureTracker, Target};
pub use reveal::{ExhaustionPolicy, NextCard, RevealCoordinator, RevealProgress, SecretHint};
pub use storage::{Config, FileSlot, KeyValueSlot, MemorySlot, ProgressStore, Stats, UserRecord};
