//! Asset loading
//!
//! - [`io`]: byte readers (local files, HTTP)
//! - [`loaders`]: glTF/GLB decoding into a [`ModelPrefab`]
//! - [`source`]: the [`ModelSource`] seam the coordinator loads through
//! - [`coordinator`]: per-asset load tasks, retries and the outcome channel

pub mod coordinator;
pub mod io;
pub mod loaders;
pub mod prefab;
pub mod source;

pub use coordinator::{AssetEvent, AssetLoadCoordinator, AssetSpec, LoadTask, spawn_load};
pub use io::{AssetReader, AssetReaderVariant};
#[cfg(feature = "gltf")]
pub use loaders::GltfLoader;
pub use prefab::{ModelPrefab, PrefabNode};
pub use source::{BoxedFuture, LoadFuture, MaybeSendSync, ModelSource};
#[cfg(feature = "gltf")]
pub use source::GltfSource;
