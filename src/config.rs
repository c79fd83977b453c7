use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::error::{AppError, Result};

/// Session-wide API configuration: the base URL every request is built from.
///
/// Cloning is cheap and all clones share the same value. Loaders subscribe to
/// change notifications so they can reset when the address changes. Nothing
/// set here is written back to disk.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    tx: Arc<watch::Sender<String>>,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let url = normalize(base_url)?;
        let (tx, _rx) = watch::channel(url);
        Ok(Self { tx: Arc::new(tx) })
    }

    pub fn base_url(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Replace the base URL. Only emptiness is checked; an unreachable address
    /// shows up as failing loads afterwards. Setting the current value again
    /// does not notify subscribers.
    pub fn set_base_url(&self, value: &str) -> Result<()> {
        let url = normalize(value)?;
        let changed = self.tx.send_if_modified(|current| {
            if *current == url {
                false
            } else {
                *current = url.clone();
                true
            }
        });
        if changed {
            info!(base_url = %url, "API base URL changed");
        }
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

fn normalize(value: &str) -> Result<String> {
    let url = value.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(AppError::Config("API base URL must not be empty".into()));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_url() {
        assert!(ApiConfig::new("   ").is_err());
        let config = ApiConfig::new("http://localhost:3000").unwrap();
        assert!(matches!(config.set_base_url(""), Err(AppError::Config(_))));
        assert_eq!(config.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_trims_trailing_slash() {
        let config = ApiConfig::new(" http://10.0.0.2:3000/ ").unwrap();
        assert_eq!(config.base_url(), "http://10.0.0.2:3000");
    }

    #[test]
    fn test_clones_share_value() {
        let config = ApiConfig::new("http://a").unwrap();
        let other = config.clone();
        other.set_base_url("http://b").unwrap();
        assert_eq!(config.base_url(), "http://b");
    }

    #[test]
    fn test_subscribers_see_changes_once() {
        let config = ApiConfig::new("http://a").unwrap();
        let mut rx = config.subscribe();
        assert!(!rx.has_changed().unwrap());

        config.set_base_url("http://a/").unwrap();
        assert!(!rx.has_changed().unwrap());

        config.set_base_url("http://b").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "http://b");
        assert!(!rx.has_changed().unwrap());
    }
}
