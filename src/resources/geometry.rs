use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::resources::release::{Disposable, ReleaseEvent, ReleaseSender, ReleaseState, ResourceKind};
use crate::tracker::ResourceId;

/// A single vertex attribute stream (positions, normals, uvs, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub data: Vec<f32>,
    /// Components per vertex (3 for positions, 2 for uvs)
    pub item_size: usize,
}

impl Attribute {
    #[must_use]
    pub fn new(data: Vec<f32>, item_size: usize) -> Self {
        Self { data, item_size }
    }

    /// Number of vertices in this stream.
    #[must_use]
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.data.len() / self.item_size
        }
    }
}

/// A disposable leaf holding vertex attributes and an optional index buffer.
#[derive(Debug)]
pub struct Geometry {
    pub uuid: Uuid,
    pub name: String,

    attributes: RwLock<FxHashMap<String, Attribute>>,
    index: RwLock<Option<Vec<u32>>>,

    version: AtomicU64,
    release: ReleaseState,
}

impl Geometry {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            attributes: RwLock::new(FxHashMap::default()),
            index: RwLock::new(None),
            version: AtomicU64::new(0),
            release: ReleaseState::new(),
        }
    }

    /// Axis-aligned plane in the XY plane, centred at the origin.
    #[must_use]
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new("PlaneGeometry")
            .with_attribute(
                "position",
                Attribute::new(
                    vec![-hw, -hh, 0.0, hw, -hh, 0.0, hw, hh, 0.0, -hw, hh, 0.0],
                    3,
                ),
            )
            .with_attribute(
                "uv",
                Attribute::new(vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0], 2),
            )
            .with_index(vec![0, 1, 2, 0, 2, 3])
    }

    /// Cube of edge `size` sharing its eight corners between faces.
    #[must_use]
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let mut positions = Vec::with_capacity(24);
        for i in 0..8u32 {
            positions.push(if i & 1 == 0 { -h } else { h });
            positions.push(if i & 2 == 0 { -h } else { h });
            positions.push(if i & 4 == 0 { -h } else { h });
        }
        #[rustfmt::skip]
        let index = vec![
            0, 2, 1, 1, 2, 3, // -z
            4, 5, 6, 5, 7, 6, // +z
            0, 1, 4, 1, 5, 4, // -y
            2, 6, 3, 3, 6, 7, // +y
            0, 4, 2, 2, 4, 6, // -x
            1, 3, 5, 3, 7, 5, // +x
        ];
        Self::new("CubeGeometry")
            .with_attribute("position", Attribute::new(positions, 3))
            .with_index(index)
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.get_mut().insert(name.to_string(), attribute);
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: Vec<u32>) -> Self {
        *self.index.get_mut() = Some(index);
        self
    }

    pub fn set_attribute(&self, name: &str, attribute: Attribute) {
        self.attributes.write().insert(name.to_string(), attribute);
        self.version.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Attribute> {
        self.attributes.read().get(name).cloned()
    }

    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.attributes.read().len()
    }

    #[must_use]
    pub fn index_count(&self) -> usize {
        self.index.read().as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.attributes
            .read()
            .get("position")
            .map_or(0, Attribute::count)
    }

    /// CPU bytes held by attributes and indices.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        let attributes: usize = self
            .attributes
            .read()
            .values()
            .map(|a| a.data.len() * size_of::<f32>())
            .sum();
        attributes + self.index_count() * size_of::<u32>()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    pub fn on_release(&self, sender: ReleaseSender) {
        self.release.subscribe(sender);
    }
}

impl Disposable for Geometry {
    fn dispose(&self) {
        let bytes = self.byte_size();
        self.attributes.write().clear();
        *self.index.write() = None;
        self.version.fetch_add(1, Ordering::Relaxed);
        self.release.release(ReleaseEvent {
            uuid: self.uuid,
            kind: ResourceKind::Geometry,
            label: self.name.clone(),
            bytes,
        });
    }

    fn dispose_count(&self) -> u32 {
        self.release.count()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Shared handle to a [`Geometry`].
#[derive(Debug, Clone)]
pub struct GeometryRef(Arc<Geometry>);

impl GeometryRef {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self(Arc::new(geometry))
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

impl From<Geometry> for GeometryRef {
    fn from(geometry: Geometry) -> Self {
        Self::new(geometry)
    }
}

impl Deref for GeometryRef {
    type Target = Geometry;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
