use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::CatalogError;

/// Where a catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Remote(Url),
}

impl ContentSource {
    /// Interpret a configured location. `http(s)://` values are remote,
    /// anything else is a path, relative paths resolving against `base`.
    pub fn resolve(location: &str, base: &Path) -> Self {
        if let Ok(url) = Url::parse(location) {
            if matches!(url.scheme(), "http" | "https") {
                return ContentSource::Remote(url);
            }
        }
        let path = PathBuf::from(location);
        if path.is_absolute() {
            ContentSource::File(path)
        } else {
            ContentSource::File(base.join(path))
        }
    }

    /// Fetch and decode a JSON array of entries.
    pub async fn fetch<T: DeserializeOwned>(&self) -> Result<Vec<T>, CatalogError> {
        let body = match self {
            ContentSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogError::Read {
                    path: path.clone(),
                    source,
                })?,
            ContentSource::Remote(url) => {
                let fetch_failed = |source| CatalogError::Fetch {
                    url: url.to_string(),
                    source,
                };
                let response = reqwest::get(url.clone()).await.map_err(fetch_failed)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                response.text().await.map_err(fetch_failed)?
            }
        };
        Ok(serde_json::from_str(&body)?)
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::File(path) => write!(f, "{}", path.display()),
            ContentSource::Remote(url) => write!(f, "{url}"),
        }
    }
}
