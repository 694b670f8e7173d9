//! Asset Cycle
//!
//! Timed load → attach → display → dispose loop over an ordered list of
//! assets, modelled as an explicit state machine:
//!
//! ```text
//! Idle → Loading → Attached → Displayed → Disposed → Idle → ...
//!           └──────────── (cancelled / failed) ────→ Idle
//! ```
//!
//! Each cycle owns exactly one [`ResourceTracker`]. The only suspension
//! points are the load and the display hold; both race against a
//! [`CancelToken`]. Tracking and disposal run synchronously between them.

pub mod settings;

use tokio::sync::watch;

pub use settings::CycleSettings;

use crate::assets::{LoadedAsset, Loader};
use crate::errors::{Error, Result};
use crate::scene::Scene;
use crate::tracker::{DisposeReport, ResourceTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CycleState {
    #[default]
    Idle,
    Loading,
    Attached,
    Displayed,
    Disposed,
}

impl CycleState {
    /// The state a successful step leads to.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Loading,
            Self::Loading => Self::Attached,
            Self::Attached => Self::Displayed,
            Self::Displayed => Self::Disposed,
            Self::Disposed => Self::Idle,
        }
    }

    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        to == self.next() || (self == Self::Loading && to == Self::Idle)
    }
}

/// How a single cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(DisposeReport),
    Cancelled,
}

/// Creates a connected cancellation pair.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelToken(rx))
}

/// Requests cancellation of every associated [`CancelToken`].
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken(watch::Receiver<bool>);

impl CancelToken {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves if the
    /// handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let closed = self.0.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives the load/display/dispose loop for one scene.
pub struct AssetCycle<L> {
    loader: L,
    scene: Scene,
    settings: CycleSettings,
    state: watch::Sender<CycleState>,
    cursor: usize,
    completed: u64,
    active: Option<ResourceTracker>,
}

impl<L: Loader> AssetCycle<L> {
    pub fn new(loader: L, scene: Scene, settings: CycleSettings) -> Result<Self> {
        settings.validate()?;
        let (state, _) = watch::channel(CycleState::Idle);
        Ok(Self {
            loader,
            scene,
            settings,
            state,
            cursor: 0,
            completed: 0,
            active: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> CycleState {
        *self.state.borrow()
    }

    /// Watches state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CycleState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    #[must_use]
    pub fn completed_cycles(&self) -> u64 {
        self.completed
    }

    /// Url the next cycle will load.
    #[must_use]
    pub fn next_url(&self) -> &str {
        &self.settings.assets[self.cursor]
    }

    /// Tracker of the asset currently on display, if any.
    #[must_use]
    pub fn tracker(&self) -> Option<&ResourceTracker> {
        self.active.as_ref()
    }

    /// Runs one full cycle for the next asset.
    ///
    /// A cancelled hold leaves the asset attached and tracked; call
    /// [`teardown`](Self::teardown) (or another `run_once`) to release it.
    pub async fn run_once(&mut self, cancel: &mut CancelToken) -> Result<CycleOutcome> {
        // Left over from a cancelled hold
        self.teardown();

        let url = self.settings.assets[self.cursor].clone();

        self.transition(CycleState::Loading);
        log::info!("Loading '{url}'");
        let loaded = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = self.load_asset(&url) => Some(result),
        };
        let asset = match loaded {
            None => {
                log::info!("Cancelled while loading '{url}'");
                self.transition(CycleState::Idle);
                return Ok(CycleOutcome::Cancelled);
            }
            Some(Err(err)) => {
                log::error!("Failed to load '{url}': {err}");
                self.advance_cursor();
                self.transition(CycleState::Idle);
                return Err(err);
            }
            Some(Ok(asset)) => {
                self.advance_cursor();
                asset
            }
        };

        let mut tracker = ResourceTracker::new();
        let root = tracker.track(asset.scene);
        // Retained textures outlive the asset
        for texture in &asset.retained {
            if tracker.untrack(texture) {
                log::debug!("Keeping retained texture '{}' of '{url}'", texture.name);
            }
        }
        self.scene.add(&root);
        log::info!("Displaying '{url}' ({} tracked resources)", tracker.len());
        self.active = Some(tracker);
        self.transition(CycleState::Attached);
        self.transition(CycleState::Displayed);

        let cancelled = tokio::select! {
            biased;
            () = cancel.cancelled() => true,
            () = tokio::time::sleep(self.settings.hold()) => false,
        };
        if cancelled {
            log::info!("Cancelled while displaying '{url}'");
            return Ok(CycleOutcome::Cancelled);
        }

        let report = self.teardown();
        self.completed += 1;
        Ok(CycleOutcome::Completed(report))
    }

    /// Repeats [`run_once`](Self::run_once) until cancelled, `max_cycles` is
    /// reached, or a load fails. The asset on display is always disposed
    /// before returning. Returns the number of completed cycles.
    pub async fn run(&mut self, mut cancel: CancelToken) -> Result<u64> {
        let mut cycles = 0;
        loop {
            if self.settings.max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }
            match self.run_once(&mut cancel).await {
                Ok(CycleOutcome::Completed(_)) => cycles += 1,
                Ok(CycleOutcome::Cancelled) => break,
                Err(err) => {
                    self.teardown();
                    return Err(err);
                }
            }
        }
        self.teardown();
        Ok(cycles)
    }

    /// Disposes the asset on display, if any.
    pub fn teardown(&mut self) -> DisposeReport {
        let Some(mut tracker) = self.active.take() else {
            return DisposeReport::default();
        };
        let report = tracker.dispose_all();
        self.transition(CycleState::Disposed);
        self.transition(CycleState::Idle);
        report
    }

    async fn load_asset(&self, url: &str) -> Result<LoadedAsset> {
        match self.settings.load_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.loader.load(url))
                .await
                .map_err(|_| Error::LoadTimeout {
                    url: url.to_string(),
                    after: limit,
                })?,
            None => self.loader.load(url).await,
        }
    }

    fn advance_cursor(&mut self) {
        self.cursor = (self.cursor + 1) % self.settings.assets.len();
    }

    fn transition(&self, to: CycleState) {
        let from = self.state();
        if !from.can_transition_to(to) {
            log::warn!("Illegal asset cycle transition {from:?} -> {to:?}");
        }
        log::debug!("Asset cycle: {from:?} -> {to:?}");
        self.state.send_replace(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_form_a_loop() {
        let mut state = CycleState::Idle;
        for _ in 0..5 {
            state = state.next();
        }
        assert_eq!(state, CycleState::Idle);
    }

    #[test]
    fn only_loading_may_fall_back_to_idle() {
        assert!(CycleState::Loading.can_transition_to(CycleState::Idle));
        assert!(!CycleState::Displayed.can_transition_to(CycleState::Idle));
        assert!(CycleState::Displayed.can_transition_to(CycleState::Disposed));
    }
}
