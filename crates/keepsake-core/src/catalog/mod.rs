//! Static content catalogs: the 365 reason cards and the hidden secrets.
//!
//! Catalogs are loaded once, validated, then shared read-only behind an
//! `Arc`. A catalog that fails to load is replaced by an empty one so the
//! engine keeps running in a degraded mode.

mod source;

pub use source::ContentSource;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One reason card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub id: u32,
    pub category: String,
    pub emoji: String,
    #[serde(rename = "reason")]
    pub reason_text: String,
}

/// One hidden secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEntry {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub hint: String,
}

/// Reason cards, in source order, with an id index.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: Vec<CardEntry>,
    by_id: HashMap<u32, usize>,
}

impl CardCatalog {
    pub fn new(cards: Vec<CardEntry>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(cards.len());
        for (index, card) in cards.iter().enumerate() {
            if card.id == 0 {
                return Err(CatalogError::InvalidId(card.id.to_string()));
            }
            if by_id.insert(card.id, index).is_some() {
                return Err(CatalogError::DuplicateId(card.id.to_string()));
            }
        }
        Ok(Self { cards, by_id })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn get(&self, id: u32) -> Option<&CardEntry> {
        self.by_id.get(&id).map(|&i| &self.cards[i])
    }

    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardEntry> {
        self.cards.iter()
    }

    /// Copy keeping only cards with `id <= max_id`, in source order.
    pub fn up_to(&self, max_id: u32) -> Self {
        let cards: Vec<CardEntry> = self.cards.iter().filter(|c| c.id <= max_id).cloned().collect();
        let by_id = cards.iter().enumerate().map(|(index, card)| (card.id, index)).collect();
        Self { cards, by_id }
    }
}

/// Secrets, in source order, with an id index.
#[derive(Debug, Clone, Default)]
pub struct SecretCatalog {
    secrets: Vec<SecretEntry>,
    by_id: HashMap<String, usize>,
}

impl SecretCatalog {
    pub fn new(secrets: Vec<SecretEntry>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(secrets.len());
        for (index, secret) in secrets.iter().enumerate() {
            if secret.id.trim().is_empty() {
                return Err(CatalogError::InvalidId(secret.id.clone()));
            }
            if by_id.insert(secret.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(secret.id.clone()));
            }
        }
        Ok(Self { secrets, by_id })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn get(&self, id: &str) -> Option<&SecretEntry> {
        self.by_id.get(id).map(|&i| &self.secrets[i])
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SecretEntry> {
        self.secrets.iter()
    }

    /// Secrets for which `is_found` is false, in catalog order.
    pub fn missing<'a, F>(&'a self, is_found: F) -> impl Iterator<Item = &'a SecretEntry> + 'a
    where
        F: Fn(&str) -> bool + 'a,
    {
        self.secrets.iter().filter(move |s| !is_found(&s.id))
    }
}

/// Both catalogs, shared immutably.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub cards: Arc<CardCatalog>,
    pub secrets: Arc<SecretCatalog>,
}

impl Catalogs {
    pub fn new(cards: CardCatalog, secrets: SecretCatalog) -> Self {
        Self {
            cards: Arc::new(cards),
            secrets: Arc::new(secrets),
        }
    }

    /// Load both catalogs. Each one that fails is logged and left empty.
    pub async fn load(cards: &ContentSource, secrets: &ContentSource) -> Self {
        let card_catalog = match cards.fetch::<CardEntry>().await.and_then(CardCatalog::new) {
            Ok(catalog) => {
                tracing::debug!(count = catalog.len(), source = %cards, "Loaded card catalog");
                catalog
            }
            Err(e) => {
                tracing::error!(source = %cards, "Error loading reasons: {e}");
                CardCatalog::default()
            }
        };
        let secret_catalog = match secrets.fetch::<SecretEntry>().await.and_then(SecretCatalog::new) {
            Ok(catalog) => {
                tracing::debug!(count = catalog.len(), source = %secrets, "Loaded secret catalog");
                catalog
            }
            Err(e) => {
                tracing::error!(source = %secrets, "Error loading secrets: {e}");
                SecretCatalog::default()
            }
        };
        Self::new(card_catalog, secret_catalog)
    }

    /// True when neither catalog has any content.
    pub fn is_degraded(&self) -> bool {
        self.cards.is_empty() && self.secrets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32) -> CardEntry {
        CardEntry {
            id,
            category: "Ljubav".into(),
            emoji: "💖".into(),
            reason_text: format!("Reason {id}"),
        }
    }

    #[test]
    fn card_json_uses_reason_field() {
        let json = r#"[{"id": 1, "category": "Smijeh", "emoji": "😄", "reason": "Tvoj smijeh"}]"#;
        let catalog = CardCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get(1).unwrap().reason_text, "Tvoj smijeh");
        assert!(catalog.contains(1));
        assert!(!catalog.contains(2));
    }

    #[test]
    fn duplicate_card_ids_are_rejected() {
        let result = CardCatalog::new(vec![card(1), card(2), card(1)]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "1"));
    }

    #[test]
    fn zero_card_id_is_rejected() {
        assert!(matches!(CardCatalog::new(vec![card(0)]), Err(CatalogError::InvalidId(_))));
    }

    #[test]
    fn up_to_drops_cards_past_the_bound() {
        let catalog = CardCatalog::new(vec![card(1), card(400), card(2), card(3)]).unwrap();
        let bounded = catalog.up_to(3);
        assert_eq!(bounded.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!bounded.contains(400));
        assert_eq!(bounded.get(2).unwrap().reason_text, "Reason 2");
    }

    #[test]
    fn secret_hint_is_optional() {
        let json = r#"[{"id": "secret1", "message": "Hi"}]"#;
        let catalog = SecretCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get("secret1").unwrap().hint, "");
    }

    #[test]
    fn blank_secret_id_is_rejected() {
        let json = r#"[{"id": " ", "message": "Hi", "hint": ""}]"#;
        assert!(matches!(SecretCatalog::from_json(json), Err(CatalogError::InvalidId(_))));
    }

    #[test]
    fn missing_secrets_keep_catalog_order() {
        let json = r#"[
            {"id": "secret1", "message": "a", "hint": "h1"},
            {"id": "secret2", "message": "b", "hint": "h2"},
            {"id": "secret3", "message": "c", "hint": "h3"}
        ]"#;
        let catalog = SecretCatalog::from_json(json).unwrap();
        let ids: Vec<_> = catalog
            .missing(|id| id == "secret2")
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["secret1", "secret3"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(CardCatalog::from_json("{"), Err(CatalogError::Parse(_))));
    }
}
