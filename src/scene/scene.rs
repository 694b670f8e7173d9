use std::sync::atomic::{AtomicU32, Ordering};

use crate::scene::node::{Composite, NodeKind, NodeRef};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Counters a render pass reads from the live graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub nodes: usize,
    pub meshes: usize,
    pub visible_meshes: usize,
    pub helpers: usize,
}

/// Scene container.
///
/// The scene owns a root group; assets are attached with [`Scene::add`] and
/// detached again by the tracker on disposal. Cloning a `Scene` shares the
/// same root, so a render task and the asset loop can hold it concurrently.
#[derive(Debug, Clone)]
pub struct Scene {
    pub id: u32,
    root: NodeRef,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            root: NodeRef::group("Scene"),
        }
    }

    /// The scene's top-level node.
    #[must_use]
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Attaches `node` at the top level.
    pub fn add(&self, node: &NodeRef) -> bool {
        self.root.add(node)
    }

    /// Detaches a top-level node. No-op if it is not attached here.
    pub fn remove(&self, node: &NodeRef) -> bool {
        self.root.remove(node)
    }

    /// Whether `node` is a direct child of the scene root.
    #[must_use]
    pub fn contains(&self, node: &NodeRef) -> bool {
        node.parent().is_some_and(|p| p.ptr_eq(&self.root))
    }

    #[must_use]
    pub fn children(&self) -> Vec<NodeRef> {
        self.root.children()
    }

    /// Number of top-level nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.child_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pre-order traversal of every node below the root.
    pub fn traverse(&self, f: &mut impl FnMut(&NodeRef)) {
        for child in self.root.children() {
            child.traverse(f);
        }
    }

    #[must_use]
    pub fn stats(&self) -> SceneStats {
        let mut stats = SceneStats::default();
        self.traverse(&mut |node| {
            stats.nodes += 1;
            match node.kind {
                NodeKind::Mesh => {
                    stats.meshes += 1;
                    if node.visible() {
                        stats.visible_meshes += 1;
                    }
                }
                NodeKind::Helper => stats.helpers += 1,
                NodeKind::Group => {}
            }
        });
        stats
    }
}
