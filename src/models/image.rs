use bytes::Bytes;

/// A fetched logo image
///
/// `Bytes` keeps clones out of the cache cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub bytes: Bytes,
    pub content_type: String,
}

impl ImageResource {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
