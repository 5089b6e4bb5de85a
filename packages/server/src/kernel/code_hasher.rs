use sha2::{Digest, Sha256};

use super::BaseCodeHasher;

/// Hex SHA-256 of the code, optionally prefixed with a server-side pepper.
///
/// Without a pepper the digest is the plain `sha256(code)`, so rows written
/// before a pepper was configured stay verifiable only while it is unset.
#[derive(Debug, Clone, Default)]
pub struct Sha256CodeHasher {
    pepper: Option<String>,
}

impl Sha256CodeHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pepper(pepper: impl Into<String>) -> Self {
        Self {
            pepper: Some(pepper.into()),
        }
    }
}

impl BaseCodeHasher for Sha256CodeHasher {
    fn digest(&self, code: &str) -> String {
        let mut hasher = Sha256::new();
        if let Some(pepper) = &self.pepper {
            hasher.update(pepper.as_bytes());
            hasher.update(b":");
        }
        hasher.update(code.as_bytes());
        hex::encode(hasher.finalize())
    }
}
