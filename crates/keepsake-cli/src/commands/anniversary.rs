use chrono::Local;
use clap::Subcommand;

use super::{print_json, print_outcome, session, CmdResult};

#[derive(Subcommand)]
pub enum AnniversaryAction {
    /// Time elapsed since the start date
    Since,
    /// Unlock the anniversary secret if today is the day
    Check,
}

pub async fn run(action: AnniversaryAction) -> CmdResult {
    let mut coordinator = session().await?;
    let now = Local::now().naive_local();
    match action {
        AnniversaryAction::Since => {
            let Some(elapsed) = coordinator.time_together(now) else {
                return Err("no progress record".into());
            };
            print_json(&serde_json::json!({
                "elapsed": elapsed,
                "display": elapsed.to_string(),
            }))
        }
        AnniversaryAction::Check => {
            let unlocked = coordinator.check_anniversary(now.date());
            print_outcome(serde_json::json!({ "unlocked": unlocked }), coordinator.drain_events())
        }
    }
}
