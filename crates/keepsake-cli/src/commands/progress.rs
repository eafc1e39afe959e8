use clap::Subcommand;

use super::{print_outcome, session, CmdResult};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Forget viewed cards (favorites and secrets stay)
    Reset {
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },
    /// Delete the stored record entirely
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Print the stored record as JSON
    Export,
}

pub async fn run(action: ProgressAction) -> CmdResult {
    let mut coordinator = session().await?;
    match action {
        ProgressAction::Reset { yes } => {
            if !yes {
                return Err("resetting progress needs --yes".into());
            }
            coordinator.reset_progress();
            print_outcome("reset", coordinator.drain_events())
        }
        ProgressAction::Clear { yes } => {
            if !yes {
                return Err("clearing progress needs --yes".into());
            }
            coordinator.clear_all()?;
            print_outcome("cleared", coordinator.drain_events())
        }
        ProgressAction::Export => {
            println!("{}", coordinator.store().export_json()?);
            Ok(())
        }
    }
}
