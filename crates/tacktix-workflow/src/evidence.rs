//! Evidence artifact storage.
//!
//! Result submissions must carry proof (screenshots, recordings). The
//! [`EvidenceStore`] seam persists each artifact and returns a stable
//! reference string recorded on the submission. Two implementations:
//! [`ObjectEvidenceStore`] models remote object storage, and
//! [`InlineEvidenceStore`] keeps only a content digest when no object
//! storage is wired up.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use tacktix_types::Result;

/// One proof artifact as uploaded by a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EvidenceFile {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Hex SHA-256 of the artifact content.
    #[must_use]
    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// The seam to evidence persistence.
#[allow(async_fn_in_trait)]
pub trait EvidenceStore {
    /// Persist one artifact and return its reference string.
    async fn store(&self, file: &EvidenceFile) -> Result<String>;
}

/// Digest-only fallback: nothing is persisted, the reference pins the
/// content so later uploads can be checked against the claim.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineEvidenceStore;

impl EvidenceStore for InlineEvidenceStore {
    async fn store(&self, file: &EvidenceFile) -> Result<String> {
        Ok(format!("inline:sha256:{}", file.sha256_hex()))
    }
}

/// In-memory stand-in for remote object storage. Content-addressed keys,
/// so re-uploading identical bytes is harmless.
#[derive(Clone, Default)]
pub struct ObjectEvidenceStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl ObjectEvidenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a stored artifact by its reference.
    pub async fn fetch(&self, reference: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(reference).cloned()
    }
}

impl EvidenceStore for ObjectEvidenceStore {
    async fn store(&self, file: &EvidenceFile) -> Result<String> {
        let key = format!("object://match-proofs/{}/{}", file.sha256_hex(), file.name);
        self.objects
            .lock()
            .await
            .insert(key.clone(), file.bytes.clone());
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inline_reference_is_content_digest() {
        let file = EvidenceFile::new("final.png", "image/png", vec![1, 2, 3]);
        let reference = InlineEvidenceStore.store(&file).await.unwrap();
        assert!(reference.starts_with("inline:sha256:"));

        // Same bytes, same reference.
        let again = InlineEvidenceStore.store(&file).await.unwrap();
        assert_eq!(reference, again);

        let other = EvidenceFile::new("final.png", "image/png", vec![9, 9]);
        assert_ne!(reference, InlineEvidenceStore.store(&other).await.unwrap());
    }

    #[tokio::test]
    async fn object_store_round_trip() {
        let store = ObjectEvidenceStore::new();
        let file = EvidenceFile::new("clip.mp4", "video/mp4", b"frames".to_vec());

        let reference = store.store(&file).await.unwrap();
        assert!(reference.starts_with("object://match-proofs/"));
        assert!(reference.ends_with("/clip.mp4"));

        let bytes = store.fetch(&reference).await.unwrap();
        assert_eq!(bytes, b"frames");
        assert!(store.fetch("object://match-proofs/nope").await.is_none());
    }
}
