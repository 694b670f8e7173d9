//! Scene Graph
//!
//! - [`Node`] / [`NodeRef`]: hierarchical nodes with geometry and material slots
//! - [`Composite`]: the capability the tracker uses to descend into nodes
//! - [`Scene`]: shared container the asset loop attaches loaded roots to

pub mod node;
pub mod scene;

pub use node::{Composite, MaterialSlot, Node, NodeKind, NodeRef};
pub use scene::{Scene, SceneStats};
