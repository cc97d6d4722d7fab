//! Listing data source.
//!
//! The market is seeded from a data-service payload saved to disk. The
//! load is async and has exactly one error boundary: any failure (no
//! path, unreadable file, undecodable payload) falls back to the
//! built-in dataset. There is no retry.

use std::path::{Path, PathBuf};

use market_protocol::{decode_app_data, fallback_app_data, AppData, ProtocolError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("no data path configured")]
    NotConfigured,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] ProtocolError),
}

/// Where the loaded data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Source,
    Fallback,
}

/// Read and decode the payload at `path`.
pub async fn fetch_app_data(path: Option<&Path>) -> Result<AppData, DataSourceError> {
    let path = path.ok_or(DataSourceError::NotConfigured)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DataSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(decode_app_data(&text)?)
}

/// [`fetch_app_data`], or the fallback dataset on any error.
pub async fn load_app_data(path: Option<&Path>) -> (AppData, DataOrigin) {
    match fetch_app_data(path).await {
        Ok(data) => {
            info!(listings = data.market_listings.len(), "loaded market data");
            (data, DataOrigin::Source)
        }
        Err(DataSourceError::NotConfigured) => {
            info!("no data path configured, using built-in market data");
            (fallback_app_data(), DataOrigin::Fallback)
        }
        Err(e) => {
            warn!("market data unavailable, using built-in data: {}", e);
            (fallback_app_data(), DataOrigin::Fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn no_path_uses_fallback() {
        let (data, origin) = load_app_data(None).await;
        assert_eq!(origin, DataOrigin::Fallback);
        assert_eq!(data.market_listings.len(), 8);
    }

    #[tokio::test]
    async fn missing_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let (_, origin) = load_app_data(Some(&dir.path().join("absent.json"))).await;
        assert_eq!(origin, DataOrigin::Fallback);
    }

    #[tokio::test]
    async fn fenced_payload_is_decoded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "```json\n{}\n```",
            r#"{"marketListings":[{"id":"x","name":"Canola","price":900}],
                "cropDetails":[],"userProfile":{"name":"A"},"wallet":{"balance":0}}"#
        )
        .unwrap();

        let (data, origin) = load_app_data(Some(file.path())).await;
        assert_eq!(origin, DataOrigin::Source);
        assert_eq!(data.market_listings[0].name, "Canola");
    }

    #[tokio::test]
    async fn garbage_payload_uses_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "sorry, I can't help with that").unwrap();

        let err = fetch_app_data(Some(file.path())).await.unwrap_err();
        assert!(matches!(err, DataSourceError::Decode(_)));
        let (_, origin) = load_app_data(Some(file.path())).await;
        assert_eq!(origin, DataOrigin::Fallback);
    }
}
