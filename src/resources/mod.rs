//! Disposable Resources
//!
//! Leaf and material resources referenced by scene nodes:
//! - [`Texture`]: image data, disposable leaf
//! - [`Geometry`]: vertex attributes, disposable leaf
//! - [`Material`]: property bag (+ optional uniforms) that may reference textures
//!
//! Each resource type comes with a cheap, cloneable `*Ref` handle. Handle
//! identity (not value equality) is what the tracker deduplicates on.

pub mod geometry;
pub mod material;
pub mod release;
pub mod texture;
pub mod uniforms;

pub use geometry::{Attribute, Geometry, GeometryRef};
pub use material::{Material, MaterialLike, MaterialRef, MaterialValue};
pub use release::{
    Disposable, ReleaseEvent, ReleaseReceiver, ReleaseSender, ReleaseState, ResourceKind,
    release_channel,
};
pub use texture::{Texture, TextureFormat, TextureRef};
pub use uniforms::{Uniform, UniformValue};
