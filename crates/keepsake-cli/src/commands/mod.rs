pub mod anniversary;
pub mod card;
pub mod config;
pub mod progress;
pub mod secret;
pub mod stats;

use keepsake_core::{Config, Event, FileSlot, RevealCoordinator};
use serde_json::json;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open a session from the on-disk configuration.
pub async fn session() -> Result<RevealCoordinator<FileSlot>, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    Ok(keepsake_core::bootstrap::open(&config).await?)
}

pub fn print_json(value: &impl serde::Serialize) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a command result together with the events it produced.
pub fn print_outcome(result: impl serde::Serialize, events: Vec<Event>) -> CmdResult {
    for event in &events {
        if let Event::PersistenceFailed { message, .. } = event {
            tracing::warn!("Progress not saved: {message}");
        }
    }
    print_json(&json!({ "result": result, "events": events }))
}
