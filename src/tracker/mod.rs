//! Resource Tracking
//!
//! - [`walker`]: discovers every disposable resource reachable from a value
//! - [`ResourceTracker`]: deduplicated ownership set with bulk disposal
//! - [`Resource`] / [`Capabilities`]: closed classification the walker dispatches on
//!
//! ```rust,ignore
//! let mut tracker = ResourceTracker::new();
//! let root = tracker.track(asset.scene);
//! scene.add(&root);
//! // ... display ...
//! tracker.dispose_all();
//! ```

pub mod resource;
pub mod resource_tracker;
pub mod walker;

pub use resource::{Capabilities, Resource, ResourceId};
pub use resource_tracker::{DisposeReport, ResourceTracker};
pub use walker::{ResourceVisitor, Walk, enumerate};
