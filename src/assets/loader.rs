use std::future::Future;
use std::sync::Arc;

use crate::errors::Result;
use crate::resources::TextureRef;
use crate::scene::NodeRef;

/// Result of a successful load. Only `scene` is consumed by the tracker.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub url: String,
    /// Root node of the loaded asset
    pub scene: NodeRef,
    /// Names of the animation clips shipped with the asset
    pub animations: Vec<String>,
    /// Textures reachable from `scene` that outlive this asset; not to be released with it
    pub retained: Vec<TextureRef>,
}

/// Asynchronously resolves a url into a freshly built node graph.
pub trait Loader: Send + Sync {
    fn load(&self, url: &str) -> impl Future<Output = Result<LoadedAsset>> + Send;
}

impl<L: Loader> Loader for Arc<L> {
    fn load(&self, url: &str) -> impl Future<Output = Result<LoadedAsset>> + Send {
        (**self).load(url)
    }
}
