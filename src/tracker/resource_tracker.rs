use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::tracker::resource::{Resource, ResourceId};
use crate::tracker::walker::{ResourceVisitor, Walk};

static NEXT_TRACKER_ID: AtomicU64 = AtomicU64::new(1);

/// Outcome of [`ResourceTracker::dispose_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposeReport {
    /// Composite nodes removed from a parent
    pub detached: usize,
    /// Release operations invoked
    pub released: usize,
}

/// Per-asset ownership set responsible for eventual bulk release.
///
/// # Lifecycle
///
/// 1. Created when an asset starts loading
/// 2. Populated by [`track`](Self::track) (usually once, with the loaded root)
/// 3. Emptied by [`dispose_all`](Self::dispose_all), which detaches every
///    tracked node from its parent and releases every disposable exactly once
///
/// Entries are keyed by [`ResourceId`], so a texture shared by several
/// materials is a single entry. The tracker holds strong handles, which keeps
/// ids stable for as long as an entry exists.
///
/// There is no implicit finalization: dropping a non-empty tracker releases
/// nothing and only logs a warning.
#[derive(Debug)]
pub struct ResourceTracker {
    id: u64,
    resources: FxHashMap<ResourceId, Resource>,
}

impl Default for ResourceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_TRACKER_ID.fetch_add(1, Ordering::Relaxed),
            resources: FxHashMap::default(),
        }
    }

    /// Process-unique tracker id. Ids are never reused.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Registers every resource reachable from `value` and returns `value` unchanged.
    ///
    /// Accepts nodes, leaf resources, materials, scenes, `Option`s and
    /// sequences of any of those. `None` and empty sequences are no-ops.
    pub fn track<T: Walk>(&mut self, value: T) -> T {
        let before = self.resources.len();
        value.walk(&mut Registrar {
            resources: &mut self.resources,
            walked: FxHashSet::default(),
        });
        let added = self.resources.len() - before;
        if added > 0 {
            log::debug!(
                "Tracker #{} registered {} resource(s), {} total",
                self.id,
                added,
                self.resources.len()
            );
        }
        value
    }

    /// Removes one resource without releasing it. Returns `false` if it was not tracked.
    pub fn untrack(&mut self, resource: impl Into<ResourceId>) -> bool {
        let removed = self.resources.remove(&resource.into());
        if let Some(resource) = &removed {
            log::trace!(
                "Tracker #{} untracked {:?} '{}'",
                self.id,
                resource.kind(),
                resource.label()
            );
        }
        removed.is_some()
    }

    #[must_use]
    pub fn contains(&self, resource: impl Into<ResourceId>) -> bool {
        self.resources.contains_key(&resource.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Tracked resources in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Detaches every tracked node from its parent, releases every tracked
    /// disposable once, then empties the set.
    ///
    /// Calling it again (or on an empty tracker) does nothing.
    pub fn dispose_all(&mut self) -> DisposeReport {
        let resources = std::mem::take(&mut self.resources);
        let mut report = DisposeReport::default();

        // Every entry stays alive until the pass ends, so parent edges resolve
        for resource in resources.values() {
            if let Some(node) = resource.as_composite()
                && node.detach()
            {
                report.detached += 1;
            }
            if let Some(disposable) = resource.as_disposable() {
                disposable.dispose();
                report.released += 1;
            }
        }

        if report != DisposeReport::default() {
            log::debug!(
                "Tracker #{} disposed: {} detached, {} released",
                self.id,
                report.detached,
                report.released
            );
        }
        report
    }
}

impl Drop for ResourceTracker {
    fn drop(&mut self) {
        if !self.resources.is_empty() {
            log::warn!(
                "Tracker #{} dropped with {} live resource(s); call dispose_all() first",
                self.id,
                self.resources.len()
            );
        }
    }
}

/// Inserts visited resources into a tracker's set.
///
/// Descent is pruned per `track` call only: a resource tracked earlier is
/// walked again, so children or textures added since then are picked up.
struct Registrar<'a> {
    resources: &'a mut FxHashMap<ResourceId, Resource>,
    walked: FxHashSet<ResourceId>,
}

impl ResourceVisitor for Registrar<'_> {
    fn visit(&mut self, resource: &Resource) -> bool {
        let id = resource.id();
        if !self.walked.insert(id) {
            return false;
        }
        if let Entry::Vacant(entry) = self.resources.entry(id) {
            log::trace!("Tracking {:?} '{}'", resource.kind(), resource.label());
            entry.insert(resource.clone());
        }
        true
    }
}
