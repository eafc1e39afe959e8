//! Wiring from configuration to a running coordinator.

use std::path::Path;

use crate::catalog::{Catalogs, ContentSource};
use crate::error::Result;
use crate::reveal::RevealCoordinator;
use crate::storage::{data_dir, Config, FileSlot, ProgressStore};

/// Open a session backed by the default data directory.
pub async fn open(config: &Config) -> Result<RevealCoordinator<FileSlot>> {
    let dir = data_dir()?;
    Ok(open_in(config, &dir).await)
}

/// Open a session with the progress record and relative catalog paths
/// rooted at `dir`.
///
/// Catalog failures do not abort: the coordinator starts with whatever
/// loaded.
pub async fn open_in(config: &Config, dir: &Path) -> RevealCoordinator<FileSlot> {
    let cards = ContentSource::resolve(&config.content.cards, dir);
    let secrets = ContentSource::resolve(&config.content.secrets, dir);
    let catalogs = Catalogs::load(&cards, &secrets).await;
    if catalogs.is_degraded() {
        tracing::warn!("No content loaded, running with empty catalogs");
    }

    let store = ProgressStore::new(FileSlot::in_dir(dir))
        .with_identity(config.identity.name.clone(), config.identity.start_date)
        .with_totals(config.totals.cards, config.totals.secrets);

    RevealCoordinator::start(catalogs, store, config.reveal.clone())
}
