//! # Myth Tracker
//!
//! Deduplicating resource tracking and bulk disposal for scene graphs that
//! are loaded, displayed for a while, and then thrown away.
//!
//! - [`tracker`]: walks a value, records every reachable disposable once, and
//!   later detaches and releases them in one pass
//! - [`scene`] / [`resources`]: the node graph and the leaf resources it references
//! - [`assets`]: the [`Loader`] seam and an in-memory prefab library
//! - [`cycle`]: the timed load → display → dispose loop
//!
//! ```rust,ignore
//! let library = PrefabLibrary::new();
//! library.insert("crate.prefab", prefab);
//!
//! let mut cycle = AssetCycle::new(library, Scene::new(), settings)?;
//! let (handle, token) = cancel_pair();
//! let completed = cycle.run(token).await?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assets;
pub mod cycle;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod tracker;

pub use assets::{LoadedAsset, Loader, Prefab, PrefabLibrary};
pub use cycle::{
    AssetCycle, CancelHandle, CancelToken, CycleOutcome, CycleSettings, CycleState, cancel_pair,
};
pub use errors::{Error, Result};
pub use resources::{
    Disposable, Geometry, GeometryRef, Material, MaterialRef, Texture, TextureRef, UniformValue,
};
pub use scene::{Node, NodeKind, NodeRef, Scene};
pub use tracker::{DisposeReport, Resource, ResourceId, ResourceTracker, Walk, enumerate};
