use std::{collections::HashMap, fmt, sync::Arc};

use tracing::debug;
use uuid::Uuid;

/// Immutable media bytes tagged with a mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    mime: String,
    data: Arc<[u8]>,
}

impl MediaBlob {
    /// Wrap `data` as a blob of type `mime`.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Container/mime type.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// In-memory URL referring to a [`MediaBlob`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// The URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live object URLs.
///
/// Every URL created here keeps its blob alive until it is revoked.
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
    urls: HashMap<ObjectUrl, MediaBlob>,
}

impl ObjectUrlStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `blob` and return a fresh URL for it.
    pub fn create(&mut self, blob: MediaBlob) -> ObjectUrl {
        let url = ObjectUrl(format!("blob:humanai/{}", Uuid::new_v4()));
        debug!(url = %url, size = blob.size(), "Object URL created");
        self.urls.insert(url.clone(), blob);
        url
    }

    /// Look up the blob behind a live URL.
    pub fn resolve(&self, url: &ObjectUrl) -> Option<&MediaBlob> {
        self.urls.get(url)
    }

    /// Release a URL. Returns `false` if it was not live.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        let revoked = self.urls.remove(url).is_some();
        if revoked {
            debug!(url = %url, "Object URL revoked");
        }
        revoked
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.urls.len()
    }
}
