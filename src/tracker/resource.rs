use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::resources::{
    Disposable, GeometryRef, MaterialLike, MaterialRef, ResourceKind, TextureRef,
};
use crate::scene::{Composite, NodeRef};

/// Identity of a shared resource: the address of its allocation.
///
/// Two structurally identical textures have different ids; one texture
/// reached through several materials has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(usize);

impl ResourceId {
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized>(arc: &Arc<T>) -> Self {
        Self(Arc::as_ptr(arc).cast::<()>().addr())
    }
}

bitflags! {
    /// What a resource can do, determined once per visit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Exposes a release operation
        const DISPOSABLE = 1 << 0;
        /// Has children, geometry and materials; may have a parent
        const COMPOSITE  = 1 << 1;
        /// Has a property map and optional uniforms
        const MATERIAL   = 1 << 2;
    }
}

/// Closed classification of everything the tracker can hold.
#[derive(Clone)]
pub enum Resource {
    Node(NodeRef),
    Geometry(GeometryRef),
    Material(MaterialRef),
    Texture(TextureRef),
    /// Caller-defined disposable (render targets, skeleton buffers, ...)
    External(Arc<dyn Disposable>),
}

impl Resource {
    #[must_use]
    pub fn id(&self) -> ResourceId {
        match self {
            Self::Node(node) => node.id(),
            Self::Geometry(geometry) => geometry.id(),
            Self::Material(material) => material.id(),
            Self::Texture(texture) => texture.id(),
            Self::External(external) => ResourceId::of(external),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Node(_) => ResourceKind::Node,
            Self::Geometry(_) => ResourceKind::Geometry,
            Self::Material(_) => ResourceKind::Material,
            Self::Texture(_) => ResourceKind::Texture,
            Self::External(_) => ResourceKind::External,
        }
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Node(node) if node.kind.is_releasable() => {
                Capabilities::COMPOSITE | Capabilities::DISPOSABLE
            }
            Self::Node(_) => Capabilities::COMPOSITE,
            Self::Material(_) => Capabilities::DISPOSABLE | Capabilities::MATERIAL,
            Self::Geometry(_) | Self::Texture(_) | Self::External(_) => Capabilities::DISPOSABLE,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Node(node) => &node.name,
            Self::Geometry(geometry) => &geometry.name,
            Self::Material(material) => &material.name,
            Self::Texture(texture) => &texture.name,
            Self::External(external) => external.label(),
        }
    }

    /// The release operation, if this resource has one.
    #[must_use]
    pub fn as_disposable(&self) -> Option<&dyn Disposable> {
        if !self.capabilities().contains(Capabilities::DISPOSABLE) {
            return None;
        }
        match self {
            Self::Node(node) => Some(&**node),
            Self::Geometry(geometry) => Some(&**geometry),
            Self::Material(material) => Some(&**material),
            Self::Texture(texture) => Some(&**texture),
            Self::External(external) => Some(&**external),
        }
    }

    #[must_use]
    pub fn as_composite(&self) -> Option<&dyn Composite> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_material(&self) -> Option<&dyn MaterialLike> {
        match self {
            Self::Material(material) => Some(&**material),
            _ => None,
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind())
            .field("label", &self.label())
            .field("id", &self.id())
            .finish()
    }
}

impl From<NodeRef> for Resource {
    fn from(node: NodeRef) -> Self {
        Self::Node(node)
    }
}

impl From<GeometryRef> for Resource {
    fn from(geometry: GeometryRef) -> Self {
        Self::Geometry(geometry)
    }
}

impl From<MaterialRef> for Resource {
    fn from(material: MaterialRef) -> Self {
        Self::Material(material)
    }
}

impl From<TextureRef> for Resource {
    fn from(texture: TextureRef) -> Self {
        Self::Texture(texture)
    }
}

impl From<Arc<dyn Disposable>> for Resource {
    fn from(external: Arc<dyn Disposable>) -> Self {
        Self::External(external)
    }
}

// Lookup conversions used by `ResourceTracker::untrack` / `contains`.

impl From<&Resource> for ResourceId {
    fn from(resource: &Resource) -> Self {
        resource.id()
    }
}

impl From<&NodeRef> for ResourceId {
    fn from(node: &NodeRef) -> Self {
        node.id()
    }
}

impl From<&GeometryRef> for ResourceId {
    fn from(geometry: &GeometryRef) -> Self {
        geometry.id()
    }
}

impl From<&MaterialRef> for ResourceId {
    fn from(material: &MaterialRef) -> Self {
        material.id()
    }
}

impl From<&TextureRef> for ResourceId {
    fn from(texture: &TextureRef) -> Self {
        texture.id()
    }
}

impl From<&Arc<dyn Disposable>> for ResourceId {
    fn from(external: &Arc<dyn Disposable>) -> Self {
        ResourceId::of(external)
    }
}
