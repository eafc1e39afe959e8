mod config;
pub mod progress;
pub mod record;
pub mod slot;

pub use config::{Config, ContentConfig, IdentityConfig, RevealConfig, TotalsConfig};
pub use progress::{ProgressStore, Stats};
pub use record::{Identity, Progress, UserRecord};
pub use slot::{FileSlot, KeyValueSlot, MemorySlot};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/keepsake[-dev]/` based on KEEPSAKE_ENV.
///
/// Set KEEPSAKE_ENV=dev to use the development data directory, or
/// KEEPSAKE_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("KEEPSAKE_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("KEEPSAKE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("keepsake-dev")
            } else {
                base_dir.join("keepsake")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
