//! Byte readers for asset locators.
//!
//! Local files are read through tokio on native targets. Remote resources go
//! through `ehttp`, which maps to `fetch` in the browser.

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::source::BoxedFuture;
use crate::errors::{Result, SkyscrollError};

/// Asynchronous byte source for asset locators relative to a root.
pub trait AssetReader {
    fn read_bytes<'a>(&'a self, uri: &'a str) -> BoxedFuture<'a, Result<Vec<u8>>>;
}

/// Reads files relative to a root directory.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileAssetReader {
    root_path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetReader for FileAssetReader {
    fn read_bytes<'a>(&'a self, uri: &'a str) -> BoxedFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let path = self.root_path.join(uri);
            let data = tokio::fs::read(&path).await?;
            Ok(data)
        })
    }
}

/// Fetches resources relative to a base URL.
#[cfg(feature = "http")]
pub struct HttpAssetReader {
    root_url: url::Url,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    pub fn new(url_str: &str) -> Result<Self> {
        let url = url::Url::parse(url_str)
            .map_err(|e| SkyscrollError::InvalidConfig(format!("bad asset root '{url_str}': {e}")))?;
        let root_url = if url.path().ends_with('/') {
            url
        } else {
            let mut u = url.clone();
            if let Ok(mut segments) = u.path_segments_mut() {
                segments.pop();
                segments.push("");
            }
            u
        };
        Ok(Self { root_url })
    }

    #[inline]
    #[must_use]
    pub fn root_url(&self) -> &url::Url {
        &self.root_url
    }
}

#[cfg(feature = "http")]
impl AssetReader for HttpAssetReader {
    fn read_bytes<'a>(&'a self, uri: &'a str) -> BoxedFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let url = self
                .root_url
                .join(uri)
                .map_err(|e| SkyscrollError::asset_load(uri, e))?;
            let response = ehttp::fetch_async(ehttp::Request::get(url.as_str()))
                .await
                .map_err(|e| SkyscrollError::asset_load(uri, e))?;
            if !response.ok {
                return Err(SkyscrollError::Http {
                    status: response.status,
                });
            }
            Ok(response.bytes)
        })
    }
}

/// Reader chosen from the shape of the asset root.
#[derive(Clone)]
pub enum AssetReaderVariant {
    #[cfg(not(target_arch = "wasm32"))]
    File(Arc<FileAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
}

impl AssetReaderVariant {
    /// `http(s)://` roots use the HTTP reader, anything else is a directory.
    pub fn from_source(source: &str) -> Result<Self> {
        if is_url(source) {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(SkyscrollError::InvalidConfig(
                    "HTTP feature is not enabled. Enable it with `features = [\"http\"]`".into(),
                ))
            }
        } else {
            #[cfg(not(target_arch = "wasm32"))]
            {
                Ok(Self::File(Arc::new(FileAssetReader::new(source))))
            }
            #[cfg(target_arch = "wasm32")]
            {
                Err(SkyscrollError::InvalidConfig(format!(
                    "asset root '{source}' must be an absolute URL on the web"
                )))
            }
        }
    }
}

impl AssetReader for AssetReaderVariant {
    fn read_bytes<'a>(&'a self, uri: &'a str) -> BoxedFuture<'a, Result<Vec<u8>>> {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            Self::File(r) => r.read_bytes(uri),
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri),
        }
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// File name part of a locator, used to name the instantiated model.
#[must_use]
pub fn source_filename(source: &str) -> &str {
    let trimmed = source.split(['?', '#']).next().unwrap_or(source);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}
