use clap::Subcommand;
use keepsake_core::Gesture;

use super::{print_json, print_outcome, session, CmdResult};

/// Spacing between replayed gestures, well inside every click window.
const GESTURE_STEP_MS: u64 = 100;

#[derive(Subcommand)]
pub enum SecretAction {
    /// Unlock a secret by id
    Reveal {
        /// Secret id (e.g. "secret3")
        id: String,
    },
    /// Unlock every secret at once
    RevealAll,
    /// Hints for secrets not found yet
    Hints,
    /// Found secrets in discovery order
    List,
    /// Replay a JSON array of gestures, e.g. '[{"kind":"click","value":"wax_seal"}]'
    Gesture {
        json: String,
    },
}

pub async fn run(action: SecretAction) -> CmdResult {
    let mut coordinator = session().await?;
    match action {
        SecretAction::Reveal { id } => {
            let unlocked = coordinator.reveal_secret(&id);
            print_outcome(serde_json::json!({ "id": id, "unlocked": unlocked }), coordinator.drain_events())
        }
        SecretAction::RevealAll => {
            let added = coordinator.reveal_all_secrets();
            print_outcome(serde_json::json!({ "added": added }), coordinator.drain_events())
        }
        SecretAction::Hints => print_json(&coordinator.hints()),
        SecretAction::List => print_json(&coordinator.found_secrets()),
        SecretAction::Gesture { json } => {
            let gestures: Vec<Gesture> = serde_json::from_str(&json)?;
            let mut unlocked = 0u32;
            for (i, gesture) in gestures.iter().enumerate() {
                if coordinator.handle_gesture(gesture, i as u64 * GESTURE_STEP_MS) {
                    unlocked += 1;
                }
            }
            print_outcome(serde_json::json!({ "unlocked": unlocked }), coordinator.drain_events())
        }
    }
}
