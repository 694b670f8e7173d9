use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::resources::release::{Disposable, ReleaseEvent, ReleaseSender, ReleaseState, ResourceKind};
use crate::resources::{GeometryRef, MaterialRef};
use crate::tracker::ResourceId;

/// Role of a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Pure grouping node, owns nothing itself
    #[default]
    Group,
    /// Renders its geometry with its material(s)
    Mesh,
    /// Debug helper that owns internal buffers and must be released
    Helper,
}

impl NodeKind {
    /// Whether nodes of this kind expose a release operation of their own.
    #[inline]
    #[must_use]
    pub fn is_releasable(self) -> bool {
        matches!(self, Self::Helper)
    }
}

/// The material(s) attached to a node: none, one, or one per geometry group.
#[derive(Debug, Clone, Default)]
pub enum MaterialSlot {
    #[default]
    Empty,
    Single(MaterialRef),
    Multi(Vec<MaterialRef>),
}

impl MaterialSlot {
    #[must_use]
    pub fn as_slice(&self) -> &[MaterialRef] {
        match self {
            Self::Empty => &[],
            Self::Single(material) => std::slice::from_ref(material),
            Self::Multi(materials) => materials,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<MaterialRef> for MaterialSlot {
    fn from(material: MaterialRef) -> Self {
        Self::Single(material)
    }
}

impl From<Vec<MaterialRef>> for MaterialSlot {
    fn from(materials: Vec<MaterialRef>) -> Self {
        Self::Multi(materials)
    }
}

impl From<Option<MaterialRef>> for MaterialSlot {
    fn from(material: Option<MaterialRef>) -> Self {
        material.map_or(Self::Empty, Self::Single)
    }
}

/// Capability: a scene-graph element with children, geometry and materials.
///
/// All accessors return snapshots (cloned handles) so that traversal never
/// holds a node lock while visiting other nodes.
pub trait Composite {
    fn parent(&self) -> Option<NodeRef>;
    fn children(&self) -> Vec<NodeRef>;
    fn geometry(&self) -> Option<GeometryRef>;
    fn materials(&self) -> MaterialSlot;

    /// Removes the node from its parent. Returns `false` if it had none.
    fn detach(&self) -> bool;
}

/// A scene graph node.
///
/// # Hierarchy
///
/// - `children`: owning edges to child nodes
/// - `parent`: weak back-reference, used only to detach; it never extends
///   the parent's lifetime
///
/// Use [`NodeRef::add`] / [`NodeRef::remove`] which keep both sides in sync.
#[derive(Debug)]
pub struct Node {
    pub uuid: Uuid,
    pub name: String,
    pub kind: NodeKind,

    // === Core Hierarchy ===
    parent: RwLock<Weak<Node>>,
    children: RwLock<Vec<NodeRef>>,

    // === Resource Slots ===
    geometry: RwLock<Option<GeometryRef>>,
    material: RwLock<MaterialSlot>,

    visible: AtomicBool,
    release: ReleaseState,
}

impl Node {
    #[must_use]
    pub fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            geometry: RwLock::new(None),
            material: RwLock::new(MaterialSlot::Empty),
            visible: AtomicBool::new(true),
            release: ReleaseState::new(),
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: GeometryRef) -> Self {
        *self.geometry.get_mut() = Some(geometry);
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: impl Into<MaterialSlot>) -> Self {
        *self.material.get_mut() = material.into();
        self
    }

    pub fn set_geometry(&self, geometry: Option<GeometryRef>) {
        *self.geometry.write() = geometry;
    }

    pub fn set_material(&self, material: impl Into<MaterialSlot>) {
        *self.material.write() = material.into();
    }

    #[inline]
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.read().strong_count() > 0
    }

    pub fn on_release(&self, sender: ReleaseSender) {
        self.release.subscribe(sender);
    }
}

impl Disposable for Node {
    fn dispose(&self) {
        self.release.release(ReleaseEvent {
            uuid: self.uuid,
            kind: ResourceKind::Node,
            label: self.name.clone(),
            bytes: 0,
        });
    }

    fn dispose_count(&self) -> u32 {
        self.release.count()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Shared handle to a [`Node`].
#[derive(Debug, Clone)]
pub struct NodeRef(Arc<Node>);

impl NodeRef {
    #[must_use]
    pub fn new(node: Node) -> Self {
        Self(Arc::new(node))
    }

    #[must_use]
    pub fn group(name: &str) -> Self {
        Self::new(Node::new(name, NodeKind::Group))
    }

    #[must_use]
    pub fn mesh(name: &str, geometry: GeometryRef, material: impl Into<MaterialSlot>) -> Self {
        Self::new(
            Node::new(name, NodeKind::Mesh)
                .with_geometry(geometry)
                .with_material(material),
        )
    }

    #[must_use]
    pub fn helper(name: &str) -> Self {
        Self::new(Node::new(name, NodeKind::Helper))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ResourceId {
        ResourceId::of(&self.0)
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Attaches `child` under this node, detaching it from its old parent.
    ///
    /// Attaching a node to itself or to one of its descendants is refused.
    pub fn add(&self, child: &NodeRef) -> bool {
        if self.ptr_eq(child) {
            log::warn!("Cannot attach node '{}' to itself!", self.name);
            return false;
        }
        if child.is_ancestor_of(self) {
            log::warn!(
                "Cannot attach node '{}' under its own descendant '{}'",
                child.name,
                self.name
            );
            return false;
        }

        child.remove_from_parent();
        self.0.children.write().push(child.clone());
        *child.0.parent.write() = Arc::downgrade(&self.0);
        true
    }

    /// Removes `child` from this node. No-op (returns `false`) if it is not a child.
    pub fn remove(&self, child: &NodeRef) -> bool {
        let removed = {
            let mut children = self.0.children.write();
            match children.iter().position(|c| c.ptr_eq(child)) {
                Some(i) => {
                    children.remove(i);
                    true
                }
                None => false,
            }
        };
        if removed {
            *child.0.parent.write() = Weak::new();
        }
        removed
    }

    /// Detaches this node from its parent, if any.
    pub fn remove_from_parent(&self) -> bool {
        let removed = self.parent().is_some_and(|parent| parent.remove(self));
        // A parent that was already dropped leaves a dead weak edge behind.
        *self.0.parent.write() = Weak::new();
        removed
    }

    /// Whether `self` appears on `other`'s parent chain.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &NodeRef) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Pre-order traversal of this node and all its descendants.
    pub fn traverse(&self, f: &mut impl FnMut(&NodeRef)) {
        f(self);
        for child in self.children() {
            child.traverse(f);
        }
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeRef> {
        let mut found = None;
        self.traverse(&mut |node| {
            if found.is_none() && node.name == name {
                found = Some(node.clone());
            }
        });
        found
    }
}

impl Composite for NodeRef {
    fn parent(&self) -> Option<NodeRef> {
        self.0.parent.read().upgrade().map(NodeRef)
    }

    fn children(&self) -> Vec<NodeRef> {
        self.0.children.read().clone()
    }

    fn geometry(&self) -> Option<GeometryRef> {
        self.0.geometry.read().clone()
    }

    fn materials(&self) -> MaterialSlot {
        self.0.material.read().clone()
    }

    fn detach(&self) -> bool {
        self.remove_from_parent()
    }
}

impl From<Node> for NodeRef {
    fn from(node: Node) -> Self {
        Self::new(node)
    }
}

impl Deref for NodeRef {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
