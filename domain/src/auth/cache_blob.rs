//! Serialized token cache blob

/// The identity client's whole token cache, serialized.
///
/// Opaque outside the identity adapter: stores only read and write it whole.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CachedTokenBlob(Vec<u8>);

impl CachedTokenBlob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// The blob holds refresh tokens; keep them out of logs.
impl std::fmt::Debug for CachedTokenBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CachedTokenBlob({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for CachedTokenBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<String> for CachedTokenBlob {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}
