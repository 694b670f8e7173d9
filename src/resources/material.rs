use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec3, Vec4};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::resources::release::{Disposable, ReleaseEvent, ReleaseSender, ReleaseState, ResourceKind};
use crate::resources::texture::TextureRef;
use crate::resources::uniforms::{Uniform, UniformValue};
use crate::tracker::ResourceId;

/// Value of a named material property.
#[derive(Debug, Clone)]
pub enum MaterialValue {
    Float(f32),
    Bool(bool),
    Vec3(Vec3),
    Color(Vec4),
    Texture(TextureRef),
}

impl MaterialValue {
    #[must_use]
    pub fn as_texture(&self) -> Option<&TextureRef> {
        match self {
            Self::Texture(texture) => Some(texture),
            _ => None,
        }
    }
}

impl From<f32> for MaterialValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for MaterialValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec3> for MaterialValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for MaterialValue {
    fn from(v: Vec4) -> Self {
        Self::Color(v)
    }
}

impl From<TextureRef> for MaterialValue {
    fn from(v: TextureRef) -> Self {
        Self::Texture(v)
    }
}

/// Capability: a property bag whose values may reference textures.
///
/// Both accessors return snapshots so callers never hold the material's
/// locks while recursing into the textures.
pub trait MaterialLike {
    /// Textures stored directly as property values.
    fn property_textures(&self) -> Vec<TextureRef>;

    /// Uniform values, or `None` when the material has no uniform map.
    fn uniform_values(&self) -> Option<Vec<UniformValue>>;
}

/// Surface description: a property map plus an optional uniform map.
///
/// Standard materials only use properties (`map`, `normalMap`, `color`, ...).
/// Shader materials additionally carry uniforms whose values may be single
/// textures or texture arrays.
#[derive(Debug)]
pub struct Material {
    pub uuid: Uuid,
    pub name: String,

    properties: RwLock<FxHashMap<String, MaterialValue>>,
    uniforms: RwLock<Option<FxHashMap<String, Uniform>>>,

    version: AtomicU64,
    release: ReleaseState,
}

impl Material {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            properties: RwLock::new(FxHashMap::default()),
            uniforms: RwLock::new(None),
            version: AtomicU64::new(0),
            release: ReleaseState::new(),
        }
    }

    /// Unlit material with a base colour.
    #[must_use]
    pub fn basic(name: &str, color: Vec4) -> Self {
        Self::new(name).with_property("color", color)
    }

    /// Material carrying an (initially empty) uniform map.
    #[must_use]
    pub fn shader(name: &str) -> Self {
        let material = Self::new(name);
        *material.uniforms.write() = Some(FxHashMap::default());
        material
    }

    #[must_use]
    pub fn with_property(mut self, name: &str, value: impl Into<MaterialValue>) -> Self {
        self.properties.get_mut().insert(name.to_string(), value.into());
        self
    }

    /// Shorthand for a texture property such as `map` or `normalMap`.
    #[must_use]
    pub fn with_map(self, name: &str, texture: TextureRef) -> Self {
        self.with_property(name, texture)
    }

    #[must_use]
    pub fn with_uniform(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.uniforms
            .get_mut()
            .get_or_insert_with(FxHashMap::default)
            .insert(name.to_string(), Uniform::new(value));
        self
    }

    // === Properties ===

    pub fn set_property(&self, name: &str, value: impl Into<MaterialValue>) {
        self.properties.write().insert(name.to_string(), value.into());
        self.version.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<MaterialValue> {
        self.properties.read().get(name).cloned()
    }

    pub fn remove_property(&self, name: &str) -> Option<MaterialValue> {
        let removed = self.properties.write().remove(name);
        if removed.is_some() {
            self.version.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.read().len()
    }

    // === Uniforms ===

    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        self.uniforms
            .write()
            .get_or_insert_with(FxHashMap::default)
            .insert(name.to_string(), Uniform::new(value));
        self.version.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<Uniform> {
        self.uniforms.read().as_ref()?.get(name).cloned()
    }

    #[must_use]
    pub fn has_uniforms(&self) -> bool {
        self.uniforms.read().is_some()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    pub fn on_release(&self, sender: ReleaseSender) {
        self.release.subscribe(sender);
    }
}

impl MaterialLike for Material {
    fn property_textures(&self) -> Vec<TextureRef> {
        self.properties
            .read()
            .values()
            .filter_map(MaterialValue::as_texture)
            .cloned()
            .collect()
    }

    fn uniform_values(&self) -> Option<Vec<UniformValue>> {
        self.uniforms
            .read()
            .as_ref()
            .map(|uniforms| uniforms.values().map(|u| u.value.clone()).collect())
    }
}

impl Disposable for Material {
    // Textures referenced by the material are released on their own.
    fn dispose(&self) {
        self.version.fetch_add(1, Ordering::Relaxed);
        self.release.release(ReleaseEvent {
            uuid: self.uuid,
            kind: ResourceKind::Material,
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

/// Shared handle to a [`Material`].
#[derive(Debug, Clone)]
pub struct MaterialRef(Arc<Material>);

impl MaterialRef {
    #[must_use]
    pub fn new(material: Material) -> Self {
        Self(Arc::new(material))
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
}

impl From<Material> for MaterialRef {
    fn from(material: Material) -> Self {
        Self::new(material)
    }
}

impl Deref for MaterialRef {
    type Target = Material;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
