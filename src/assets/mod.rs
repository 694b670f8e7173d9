//! Asset Loading
//!
//! The tracker only consumes the root node of a load result. This module
//! provides the [`Loader`] seam plus an in-memory prefab library used by the
//! asset cycle, tests and demos.

pub mod library;
pub mod loader;
pub mod prefab;

pub use library::{PrefabHandle, PrefabLibrary};
pub use loader::{LoadedAsset, Loader};
pub use prefab::{
    Prefab, PrefabGeometry, PrefabMaterial, PrefabNode, PrefabTexture, PrefabValue, SharedPrefab,
    TextureSource,
};
