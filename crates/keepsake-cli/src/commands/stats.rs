use chrono::Local;
use serde_json::json;

use super::{print_json, session, CmdResult};

pub async fn run() -> CmdResult {
    let coordinator = session().await?;
    print_json(&json!({
        "stats": coordinator.store().get_stats(),
        "cards": coordinator.card_progress(),
        "secrets": coordinator.secret_progress(),
        "time_together": coordinator.time_together(Local::now().naive_local()),
    }))
}
