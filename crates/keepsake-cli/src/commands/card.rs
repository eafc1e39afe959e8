use clap::Subcommand;

use super::{print_json, print_outcome, session, CmdResult};

#[derive(Subcommand)]
pub enum CardAction {
    /// Reveal the next card
    Next,
    /// Toggle favorite on a card
    Favorite {
        /// Card id
        id: u32,
    },
    /// List viewed cards
    Collection {
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
}

pub async fn run(action: CardAction) -> CmdResult {
    let mut coordinator = session().await?;
    match action {
        CardAction::Next => {
            let next = coordinator.request_next_card();
            print_outcome(next, coordinator.drain_events())
        }
        CardAction::Favorite { id } => {
            if !coordinator.cards().contains(id) {
                return Err(format!("unknown card: {id}").into());
            }
            let favorited = coordinator.toggle_favorite(id);
            print_outcome(serde_json::json!({ "id": id, "favorited": favorited }), coordinator.drain_events())
        }
        CardAction::Collection { favorites } => {
            let cards = if favorites {
                coordinator.favorite_cards()
            } else {
                coordinator.collection()
            };
            print_json(&cards)
        }
    }
}
