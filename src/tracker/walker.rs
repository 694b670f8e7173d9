//! Resource Graph Walker
//!
//! Discovers every disposable resource reachable from a value:
//!
//! 1. `None` is a no-op, sequences are walked element by element
//!    (both handled by the [`Walk`] impls on `Option`, slices and `Vec`).
//! 2. Anything disposable or composite is reported to the visitor.
//! 3. Composite nodes are descended into: geometry, material slot, children.
//! 4. Materials are descended into: texture-valued properties, then every
//!    uniform value that is a texture or a texture array.
//!
//! A visitor returns `false` for a resource it has already walked in the
//! current pass and the walker does not descend into it again. Whether the
//! resource was recorded by an earlier pass is a separate question: those
//! are walked again so that anything attached since is still found. The
//! resulting set does not depend on visiting order.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::resources::{Disposable, GeometryRef, MaterialRef, TextureRef, UniformValue};
use crate::scene::{MaterialSlot, NodeRef, Scene};
use crate::tracker::resource::{Capabilities, Resource, ResourceId};

/// Receives the resources found by the walker.
pub trait ResourceVisitor {
    /// Records `resource`. Returns `false` to skip descending into it,
    /// i.e. when it was already walked in this pass.
    fn visit(&mut self, resource: &Resource) -> bool;
}

/// A value the walker can descend into.
pub trait Walk {
    fn walk(&self, visitor: &mut dyn ResourceVisitor);
}

/// Classifies `resource` and walks whatever it contains.
pub fn walk_resource(resource: &Resource, visitor: &mut dyn ResourceVisitor) {
    let caps = resource.capabilities();
    if caps.intersects(Capabilities::DISPOSABLE | Capabilities::COMPOSITE) && !visitor.visit(resource) {
        return;
    }

    if let Some(node) = resource.as_composite() {
        node.geometry().walk(visitor);
        node.materials().walk(visitor);
        node.children().walk(visitor);
    } else if let Some(material) = resource.as_material() {
        material.property_textures().walk(visitor);
        if let Some(values) = material.uniform_values() {
            values.walk(visitor);
        }
    }
}

/// Lists the deduplicated resources reachable from `value` without tracking them.
#[must_use]
pub fn enumerate<T: Walk + ?Sized>(value: &T) -> Vec<Resource> {
    let mut collector = Collector::default();
    value.walk(&mut collector);
    collector.found
}

#[derive(Default)]
struct Collector {
    seen: FxHashSet<ResourceId>,
    found: Vec<Resource>,
}

impl ResourceVisitor for Collector {
    fn visit(&mut self, resource: &Resource) -> bool {
        if self.seen.insert(resource.id()) {
            self.found.push(resource.clone());
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Walk implementations
// ============================================================================

impl Walk for Resource {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        walk_resource(self, visitor);
    }
}

impl Walk for NodeRef {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        walk_resource(&Resource::Node(self.clone()), visitor);
    }
}

impl Walk for GeometryRef {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        walk_resource(&Resource::Geometry(self.clone()), visitor);
    }
}

impl Walk for MaterialRef {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        walk_resource(&Resource::Material(self.clone()), visitor);
    }
}

impl Walk for TextureRef {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        walk_resource(&Resource::Texture(self.clone()), visitor);
    }
}

impl Walk for Arc<dyn Disposable> {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        walk_resource(&Resource::External(Arc::clone(self)), visitor);
    }
}

impl Walk for MaterialSlot {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        self.as_slice().walk(visitor);
    }
}

impl Walk for UniformValue {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        self.textures().walk(visitor);
    }
}

/// Walking a scene walks its top-level node.
impl Walk for Scene {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        self.root().walk(visitor);
    }
}

impl<T: Walk> Walk for Option<T> {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        if let Some(value) = self {
            value.walk(visitor);
        }
    }
}

impl<T: Walk> Walk for [T] {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        for value in self {
            value.walk(visitor);
        }
    }
}

impl<T: Walk, const N: usize> Walk for [T; N] {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        self.as_slice().walk(visitor);
    }
}

impl<T: Walk> Walk for Vec<T> {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        self.as_slice().walk(visitor);
    }
}

impl<T: Walk + ?Sized> Walk for &T {
    fn walk(&self, visitor: &mut dyn ResourceVisitor) {
        (**self).walk(visitor);
    }
}
