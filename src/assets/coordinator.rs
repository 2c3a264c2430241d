//! Asset Load Coordinator
//!
//! Issues one independent, non-blocking load per configured asset. Each load
//! is retried a fixed number of times and its outcome is reported as an
//! [`AssetEvent`] on a channel. The host drains that channel on its own
//! thread (see [`ShowcaseContext::drain_asset_events`]), so scene mutation
//! never races the render loop.
//!
//! There is no barrier across loads and no timeout: a load runs until it
//! succeeds or exhausts its attempts.
//!
//! [`ShowcaseContext::drain_asset_events`]: crate::context::ShowcaseContext::drain_asset_events

use futures::future::join_all;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::prefab::ModelPrefab;
use crate::assets::source::{BoxedFuture, ModelSource};
use crate::errors::SkyscrollError;

#[cfg(not(target_arch = "wasm32"))]
use std::sync::OnceLock;
#[cfg(not(target_arch = "wasm32"))]
use tokio::runtime::Runtime;

/// One model to load and where to place it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub locator: String,
    #[serde(default)]
    pub position: Vec3,
    /// Uniform scale applied to the instantiated root.
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

impl AssetSpec {
    #[must_use]
    pub fn new(locator: impl Into<String>, position: Vec3, scale: f32) -> Self {
        Self {
            locator: locator.into(),
            position,
            scale,
        }
    }
}

/// Outcome of one asset load.
#[derive(Debug)]
pub enum AssetEvent {
    Ready {
        spec: AssetSpec,
        prefab: ModelPrefab,
    },
    Failed {
        spec: AssetSpec,
        error: SkyscrollError,
    },
}

impl AssetEvent {
    #[must_use]
    pub fn spec(&self) -> &AssetSpec {
        match self {
            AssetEvent::Ready { spec, .. } | AssetEvent::Failed { spec, .. } => spec,
        }
    }
}

/// A load task ready to hand to an executor.
pub type LoadTask = BoxedFuture<'static, ()>;

pub struct AssetLoadCoordinator<S> {
    source: S,
    retries: u32,
    tx: flume::Sender<AssetEvent>,
    rx: flume::Receiver<AssetEvent>,
}

impl<S: ModelSource + Clone + 'static> AssetLoadCoordinator<S> {
    /// Each asset gets `1 + retries` attempts.
    #[must_use]
    pub fn new(source: S, retries: u32) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            source,
            retries,
            tx,
            rx,
        }
    }

    /// Receiver for load outcomes. All clones share one queue.
    #[must_use]
    pub fn events(&self) -> flume::Receiver<AssetEvent> {
        self.rx.clone()
    }

    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Builds the task that loads `spec` and reports the outcome.
    #[must_use]
    pub fn load_task(&self, spec: AssetSpec) -> LoadTask {
        let source = self.source.clone();
        let tx = self.tx.clone();
        let attempts = self.retries.saturating_add(1);
        Box::pin(async move {
            let event = load_with_retry(&source, spec, attempts).await;
            if tx.send(event).is_err() {
                log::debug!("Asset event receiver dropped");
            }
        })
    }

    /// Hands one task per asset to `spawn` and returns immediately.
    pub fn issue_all<F>(&self, specs: &[AssetSpec], mut spawn: F) -> usize
    where
        F: FnMut(LoadTask),
    {
        for spec in specs {
            log::info!("Loading asset '{}'", spec.locator);
            spawn(self.load_task(spec.clone()));
        }
        specs.len()
    }

    /// Runs every load concurrently on the current task and resolves once all
    /// outcomes have been sent.
    pub async fn load_all(&self, specs: &[AssetSpec]) {
        join_all(specs.iter().cloned().map(|spec| self.load_task(spec))).await;
    }
}

async fn load_with_retry<S: ModelSource>(source: &S, spec: AssetSpec, attempts: u32) -> AssetEvent {
    let mut attempt = 1;
    loop {
        match source.load(&spec.locator).await {
            Ok(prefab) => return AssetEvent::Ready { spec, prefab },
            Err(error) if attempt < attempts => {
                log::warn!(
                    "Loading '{}' failed (attempt {attempt}/{attempts}): {error}",
                    spec.locator
                );
                attempt += 1;
            }
            Err(error) => {
                log::warn!(
                    "Giving up on '{}' after {attempts} attempt(s): {error}",
                    spec.locator
                );
                return AssetEvent::Failed { spec, error };
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn asset_runtime() -> Option<&'static Runtime> {
    static RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();
    RUNTIME
        .get_or_init(|| match Runtime::new() {
            Ok(rt) => Some(rt),
            Err(e) => {
                log::error!("Failed to create asset loader runtime: {e}");
                None
            }
        })
        .as_ref()
}

/// Default spawner: a shared tokio runtime on native, the browser event loop
/// on wasm32.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_load(task: LoadTask) {
    match asset_runtime() {
        Some(rt) => {
            rt.spawn(task);
        }
        None => log::error!("Asset runtime unavailable, load dropped"),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn spawn_load(task: LoadTask) {
    wasm_bindgen_futures::spawn_local(task);
}
