//! Enrollment artifact store.
//!
//! Each registered customer gets a scannable enrollment artifact whose
//! payload is `"{customer_id}:{vendor_id}"`. The store hands back an opaque
//! reference (for the filesystem store, a relative path) that the customer
//! record carries around.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("failed to write enrollment artifact: {0}")]
    Write(String),
    #[error("failed to remove enrollment artifact: {0}")]
    Remove(String),
}

/// Payload encoded into the artifact.
pub fn payload_for(customer_id: Uuid, vendor_id: Uuid) -> String {
    format!("{}:{}", customer_id, vendor_id)
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Generate and persist the artifact; returns the reference stored on
    /// the customer record.
    async fn store(&self, customer_id: Uuid, vendor_id: Uuid) -> Result<String, EnrollmentError>;

    /// Remove a previously stored artifact. Removing a reference that no
    /// longer exists is not an error.
    async fn remove(&self, reference: &str) -> Result<(), EnrollmentError>;
}

/// Filesystem-backed store writing one file per customer under a base
/// directory (created at startup).
pub struct FsEnrollmentStore {
    base_dir: PathBuf,
}

impl FsEnrollmentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn artifact_path(&self, customer_id: Uuid) -> PathBuf {
        self.base_dir.join(format!("customer_{}.code", customer_id))
    }
}

#[async_trait]
impl EnrollmentStore for FsEnrollmentStore {
    async fn store(&self, customer_id: Uuid, vendor_id: Uuid) -> Result<String, EnrollmentError> {
        let path = self.artifact_path(customer_id);
        tokio::fs::write(&path, payload_for(customer_id, vendor_id))
            .await
            .map_err(|e| EnrollmentError::Write(e.to_string()))?;
        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, reference: &str) -> Result<(), EnrollmentError> {
        match tokio::fs::remove_file(reference).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EnrollmentError::Remove(e.to_string())),
        }
    }
}

/// In-memory store for tests.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockEnrollmentStore {
        pub artifacts: Mutex<HashMap<String, String>>,
        pub fail_store: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl EnrollmentStore for MockEnrollmentStore {
        async fn store(
            &self,
            customer_id: Uuid,
            vendor_id: Uuid,
        ) -> Result<String, EnrollmentError> {
            if self.fail_store.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(EnrollmentError::Write("injected failure".into()));
            }
            let reference = format!("mock://customer_{}.code", customer_id);
            self.artifacts
                .lock()
                .unwrap()
                .insert(reference.clone(), payload_for(customer_id, vendor_id));
            Ok(reference)
        }

        async fn remove(&self, reference: &str) -> Result<(), EnrollmentError> {
            self.artifacts.lock().unwrap().remove(reference);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_joins_ids_with_colon() {
        let c = Uuid::new_v4();
        let v = Uuid::new_v4();
        assert_eq!(payload_for(c, v), format!("{}:{}", c, v));
    }

    #[tokio::test]
    async fn fs_store_writes_and_removes() {
        let dir = std::env::temp_dir().join(format!("enroll_test_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = FsEnrollmentStore::new(&dir);

        let c = Uuid::new_v4();
        let v = Uuid::new_v4();
        let reference = store.store(c, v).await.unwrap();
        let content = tokio::fs::read_to_string(&reference).await.unwrap();
        assert_eq!(content, payload_for(c, v));

        store.remove(&reference).await.unwrap();
        assert!(tokio::fs::metadata(&reference).await.is_err());
        // Second remove is a no-op
        store.remove(&reference).await.unwrap();

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
