use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::resources::release::{Disposable, ReleaseEvent, ReleaseSender, ReleaseState, ResourceKind};
use crate::tracker::ResourceId;

// ============================================================================
// 1. Pixel Formats
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    R8Unorm,
    #[default]
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgba16Float,
    Rgba32Float,
}

impl TextureFormat {
    #[must_use]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::R8Unorm => 1,
            Self::Rgba8Unorm | Self::Rgba8UnormSrgb => 4,
            Self::Rgba16Float => 8,
            Self::Rgba32Float => 16,
        }
    }
}

// ============================================================================
// 2. Texture Asset
// ============================================================================

/// A disposable leaf resource holding image data.
#[derive(Debug)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,

    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,

    data: RwLock<Option<Vec<u8>>>,
    version: AtomicU64,
    release: ReleaseState,
}

impl Texture {
    /// Creates a texture; `data` is the CPU copy uploaded on first use.
    #[must_use]
    pub fn new(name: &str, width: u32, height: u32, format: TextureFormat, data: Option<Vec<u8>>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            width,
            height,
            format,
            data: RwLock::new(data),
            version: AtomicU64::new(0),
            release: ReleaseState::new(),
        }
    }

    /// 2D RGBA8 texture filled with a single colour.
    #[must_use]
    pub fn solid(name: &str, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data = rgba.iter().copied().cycle().take(pixels * 4).collect();
        Self::new(name, width, height, TextureFormat::Rgba8Unorm, Some(data))
    }

    /// Replaces the CPU copy and bumps the version.
    pub fn update_data(&self, data: Vec<u8>) {
        *self.data.write() = Some(data);
        self.version.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.read().is_some()
    }

    /// Bytes currently held on the CPU side.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.data.read().as_ref().map_or(0, Vec::len)
    }

    /// Bytes a full mip level 0 occupies in this format.
    #[must_use]
    pub fn expected_size(&self) -> usize {
        (self.width as usize) * (self.height as usize) * self.format.bytes_per_pixel()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    pub fn on_release(&self, sender: ReleaseSender) {
        self.release.subscribe(sender);
    }
}

impl Disposable for Texture {
    fn dispose(&self) {
        let bytes = self.data.write().take().map_or(0, |d| d.len());
        self.version.fetch_add(1, Ordering::Relaxed);
        self.release.release(ReleaseEvent {
            uuid: self.uuid,
            kind: ResourceKind::Texture,
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

/// Shared handle to a [`Texture`]. Cloning shares the same texture.
#[derive(Debug, Clone)]
pub struct TextureRef(Arc<Texture>);

impl TextureRef {
    #[must_use]
    pub fn new(texture: Texture) -> Self {
        Self(Arc::new(texture))
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

impl From<Texture> for TextureRef {
    fn from(texture: Texture) -> Self {
        Self::new(texture)
    }
}

impl Deref for TextureRef {
    type Target = Texture;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
