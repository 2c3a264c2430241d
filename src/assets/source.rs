use std::future::Future;
use std::pin::Pin;

#[cfg(feature = "gltf")]
use crate::assets::io::{AssetReader, AssetReaderVariant, source_filename};
use crate::assets::prefab::ModelPrefab;
use crate::errors::Result;

/// Boxed future that is `Send` on native targets, where loads run on a
/// multi-threaded runtime, and local on wasm32.
#[cfg(not(target_arch = "wasm32"))]
pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
#[cfg(target_arch = "wasm32")]
pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Future returned by [`ModelSource::load`].
pub type LoadFuture = BoxedFuture<'static, Result<ModelPrefab>>;

/// `Send + Sync` on native targets, no bound on wasm32.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSendSync for T {}

/// Turns an asset locator into a model prefab.
///
/// Loads are independent of each other; the coordinator issues one call per
/// asset and never waits on the set as a whole.
pub trait ModelSource: MaybeSendSync {
    fn load(&self, locator: &str) -> LoadFuture;
}

/// Reads glTF/GLB bytes through an [`AssetReaderVariant`] and decodes them.
#[cfg(feature = "gltf")]
#[derive(Clone)]
pub struct GltfSource {
    reader: AssetReaderVariant,
}

#[cfg(feature = "gltf")]
impl GltfSource {
    #[must_use]
    pub fn new(reader: AssetReaderVariant) -> Self {
        Self { reader }
    }

    /// Builds a source for an asset root: a directory or an `http(s)` URL.
    pub fn from_root(root: &str) -> Result<Self> {
        Ok(Self::new(AssetReaderVariant::from_source(root)?))
    }
}

#[cfg(feature = "gltf")]
impl ModelSource for GltfSource {
    fn load(&self, locator: &str) -> LoadFuture {
        let reader = self.reader.clone();
        let locator = locator.to_owned();
        Box::pin(async move {
            let bytes = reader.read_bytes(&locator).await?;
            crate::assets::loaders::GltfLoader::load_from_bytes(source_filename(&locator), &bytes)
        })
    }
}
