//! Saved/pinned resources overlay
//!
//! Keyed by user. When opened with a path, the whole overlay is loaded at
//! startup and rewritten atomically after every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use tradedesk_core::resources::{SavedResource, sort_saved};
use tradedesk_core::store::SavedResourceStore;
use tradedesk_core::{Error, Result, UserId};

use crate::Latency;
use crate::atomic_writer::write_json;

type Overlay = HashMap<UserId, Vec<SavedResource>>;

pub struct FileSavedResourceStore {
    path: Option<PathBuf>,
    overlay: RwLock<Overlay>,
    latency: Latency,
}

impl FileSavedResourceStore {
    /// Overlay that lives only in memory
    pub fn in_memory(latency: Latency) -> Self {
        Self {
            path: None,
            overlay: RwLock::new(HashMap::new()),
            latency,
        }
    }

    /// Load the overlay from `path` if it exists
    pub fn open(path: impl AsRef<Path>, latency: Latency) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let overlay: Overlay = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                Error::Store(format!("Failed to load saved resources from {:?}: {}", path, e))
            })?
        } else {
            HashMap::new()
        };
        info!(
            "Loaded saved resources for {} users from {:?}",
            overlay.len(),
            path
        );
        Ok(Self {
            path: Some(path),
            overlay: RwLock::new(overlay),
            latency,
        })
    }

    /// Run `f` on a copy of the user's entries. The copy replaces the live
    /// overlay only once it has been persisted; `f` reports whether it
    /// changed anything.
    async fn modify<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut Vec<SavedResource>) -> Result<(T, bool)>,
    ) -> Result<T> {
        let mut overlay = self.overlay.write().await;
        let mut entries = overlay.get(user).cloned().unwrap_or_default();
        let (value, changed) = f(&mut entries)?;
        if !changed {
            return Ok(value);
        }

        let mut next = overlay.clone();
        if entries.is_empty() {
            next.remove(user);
        } else {
            next.insert(user.clone(), entries);
        }
        self.persist(&next)?;
        *overlay = next;
        Ok(value)
    }

    fn persist(&self, overlay: &Overlay) -> Result<()> {
        if let Some(path) = &self.path {
            write_json(path, overlay)?;
            debug!("Persisted saved resources to {:?}", path);
        }
        Ok(())
    }
}

#[async_trait]
impl SavedResourceStore for FileSavedResourceStore {
    async fn list(&self, user: &UserId) -> Result<Vec<SavedResource>> {
        self.latency.wait().await;
        let mut saved = self
            .overlay
            .read()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default();
        sort_saved(&mut saved);
        Ok(saved)
    }

    async fn save(&self, user: &UserId, resource_id: &str) -> Result<SavedResource> {
        self.latency.wait().await;
        self.modify(user, |entries| {
            if let Some(existing) = entries.iter().find(|s| s.resource_id == resource_id) {
                return Ok((existing.clone(), false));
            }
            let entry = SavedResource {
                resource_id: resource_id.to_string(),
                pinned: false,
                saved_at: Utc::now(),
            };
            entries.push(entry.clone());
            Ok((entry, true))
        })
        .await
    }

    async fn unsave(&self, user: &UserId, resource_id: &str) -> Result<bool> {
        self.latency.wait().await;
        self.modify(user, |entries| {
            let before = entries.len();
            entries.retain(|s| s.resource_id != resource_id);
            let removed = entries.len() != before;
            Ok((removed, removed))
        })
        .await
    }

    async fn set_pinned(
        &self,
        user: &UserId,
        resource_id: &str,
        pinned: bool,
    ) -> Result<SavedResource> {
        self.latency.wait().await;
        self.modify(user, |entries| {
            match entries.iter_mut().find(|s| s.resource_id == resource_id) {
                Some(existing) => {
                    let changed = existing.pinned != pinned;
                    existing.pinned = pinned;
                    Ok((existing.clone(), changed))
                }
                None if pinned => {
                    let entry = SavedResource {
                        resource_id: resource_id.to_string(),
                        pinned,
                        saved_at: Utc::now(),
                    };
                    entries.push(entry.clone());
                    Ok((entry, true))
                }
                None => Err(Error::not_found("Saved resource", resource_id)),
            }
        })
        .await
    }
}
