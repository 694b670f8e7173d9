use std::sync::Arc;
use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::assets::loader::{LoadedAsset, Loader};
use crate::assets::prefab::{Prefab, SharedPrefab};
use crate::errors::{Error, Result};
use crate::resources::ReleaseSender;

new_key_type! {
    pub struct PrefabHandle;
}

// Internal data structure, protected by a lock.
#[derive(Default)]
pub struct LibraryInner {
    pub map: SlotMap<PrefabHandle, SharedPrefab>,
    pub lookup: FxHashMap<String, PrefabHandle>,
}

/// Thread-safe url → prefab store that doubles as a [`Loader`].
///
/// Every load instantiates a fresh node graph from the registered prefab.
#[derive(Default)]
pub struct PrefabLibrary {
    inner: RwLock<LibraryInner>,
    latency: Option<Duration>,
    listener: Option<ReleaseSender>,
}

impl PrefabLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates I/O latency on every load.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Subscribes `listener` to every resource the library instantiates.
    #[must_use]
    pub fn with_release_listener(mut self, listener: ReleaseSender) -> Self {
        self.listener = Some(listener);
        self
    }

    /// [Write] Registers a prefab under `url`, replacing any previous one.
    pub fn insert(&self, url: &str, prefab: impl Into<Prefab>) -> PrefabHandle {
        let mut guard = self.inner.write();
        if let Some(handle) = guard.lookup.remove(url) {
            guard.map.remove(handle);
        }
        let handle = guard.map.insert(Arc::new(prefab.into()));
        guard.lookup.insert(url.to_string(), handle);
        handle
    }

    /// [Write] Unregisters `url`.
    pub fn remove(&self, url: &str) -> Option<SharedPrefab> {
        let mut guard = self.inner.write();
        let handle = guard.lookup.remove(url)?;
        guard.map.remove(handle)
    }

    /// [Read] Gets a single prefab.
    #[must_use]
    pub fn get(&self, handle: PrefabHandle) -> Option<SharedPrefab> {
        self.inner.read().map.get(handle).cloned()
    }

    #[must_use]
    pub fn get_by_url(&self, url: &str) -> Option<SharedPrefab> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(url)?;
        guard.map.get(*handle).cloned()
    }

    #[must_use]
    pub fn handle(&self, url: &str) -> Option<PrefabHandle> {
        self.inner.read().lookup.get(url).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [Read - Advanced] Acquires a read-lock guard for batch access.
    pub fn read_lock(&self) -> RwLockReadGuard<'_, LibraryInner> {
        self.inner.read()
    }
}

impl Loader for PrefabLibrary {
    async fn load(&self, url: &str) -> Result<LoadedAsset> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let prefab = self
            .get_by_url(url)
            .ok_or_else(|| Error::AssetNotFound(url.to_string()))?;

        let scene = match &self.listener {
            Some(listener) => prefab.instantiate_with_listener(listener)?,
            None => prefab.instantiate()?,
        };
        log::debug!("Instantiated prefab '{}' for '{url}'", prefab.name);

        Ok(LoadedAsset {
            url: url.to_string(),
            scene,
            animations: prefab.animations.clone(),
            retained: prefab.shared_textures.clone(),
        })
    }
}
