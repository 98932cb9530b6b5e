//! Artifact store: uploaded PDFs kept as flat files under one directory.
//!
//! Every artifact lives at `<root>/<uuid>.pdf`. Identifiers coming back from
//! clients are parsed as UUIDs before any path is built, so a derived path can
//! never point outside `root`.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

const EXTENSION: &str = "pdf";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write artifact {id}: {source}")]
    Write {
        id: Uuid,
        #[source]
        source: io::Error,
    },

    #[error("failed to read artifact {id}: {source}")]
    Read {
        id: Uuid,
        #[source]
        source: io::Error,
    },

    #[error("failed to stat artifact {id}: {source}")]
    Stat {
        id: Uuid,
        #[source]
        source: io::Error,
    },

    #[error("artifact {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens the store, creating the storage directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` verbatim under a fresh identifier and returns it.
    pub async fn store(&self, bytes: &[u8]) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        let path = self.path_for_id(id);

        let mut file = create_new(&path)
            .await
            .map_err(|source| StorageError::Write { id, source })?;
        if let Err(source) = write_fully(&mut file, bytes).await {
            drop(file);
            discard_partial(&path).await;
            return Err(StorageError::Write { id, source });
        }

        debug!("Stored artifact {id} ({} bytes)", bytes.len());
        Ok(id)
    }

    /// True iff `identifier` names an artifact present on disk.
    /// Identifiers that are not UUIDs are never present; I/O failures are errors.
    pub async fn exists(&self, identifier: &str) -> Result<bool, StorageError> {
        let Some(id) = parse_identifier(identifier) else {
            return Ok(false);
        };
        tokio::fs::try_exists(self.path_for_id(id))
            .await
            .map_err(|source| StorageError::Stat { id, source })
    }

    /// Derives the on-disk path for a client-supplied identifier.
    /// Returns `None` for anything that is not a UUID.
    pub fn path_for(&self, identifier: &str) -> Option<PathBuf> {
        parse_identifier(identifier).map(|id| self.path_for_id(id))
    }

    pub fn path_for_id(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", id.as_hyphenated()))
    }

    /// Reads a stored artifact back into memory.
    pub async fn read(&self, identifier: &str) -> Result<Vec<u8>, StorageError> {
        let id = parse_identifier(identifier)
            .ok_or_else(|| StorageError::NotFound(identifier.to_string()))?;
        match tokio::fs::read(self.path_for_id(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(identifier.to_string()))
            }
            Err(source) => Err(StorageError::Read { id, source }),
        }
    }
}

// create_new: an identifier is written exactly once
async fn create_new(path: &Path) -> io::Result<File> {
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
}

async fn write_fully<W: AsyncWrite + Unpin>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes).await?;
    writer.flush().await
}

/// Best-effort removal of a half-written artifact.
async fn discard_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed partial artifact {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial artifact {}: {e}", path.display()),
    }
}

fn parse_identifier(identifier: &str) -> Option<Uuid> {
    Uuid::parse_str(identifier.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path().join("volume")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_missing_directory() {
        let (dir, store) = temp_store().await;
        assert!(store.root().is_dir());
        assert!(store.root().starts_with(dir.path()));
    }

    #[tokio::test]
    async fn test_same_payload_twice_gets_distinct_ids() {
        let (_dir, store) = temp_store().await;
        let payload = b"%PDF-1.4 not really a pdf";

        let first = store.store(payload).await.unwrap();
        let second = store.store(payload).await.unwrap();
        assert_ne!(first, second);

        let first_back = store.read(&first.to_string()).await.unwrap();
        let second_back = store.read(&second.to_string()).await.unwrap();
        assert_eq!(first_back, payload);
        assert_eq!(second_back, payload);
    }

    #[tokio::test]
    async fn test_stored_file_named_after_identifier() {
        let (_dir, store) = temp_store().await;
        let id = store.store(b"abc").await.unwrap();
        let expected = store.root().join(format!("{id}.pdf"));
        assert!(expected.is_file());
        assert_eq!(store.path_for(&id.to_string()), Some(expected));
    }

    #[tokio::test]
    async fn test_exists_only_for_stored_identifiers() {
        let (_dir, store) = temp_store().await;
        let id = store.store(b"abc").await.unwrap();
        assert!(store.exists(&id.to_string()).await.unwrap());
        assert!(!store.exists(&Uuid::new_v4().to_string()).await.unwrap());
        assert!(!store.exists("../../etc/passwd").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("volume");
        std::fs::write(&not_a_dir, b"plain file").unwrap();
        let store = ArtifactStore { root: not_a_dir };

        let err = store.exists(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, StorageError::Stat { .. }));
    }

    #[tokio::test]
    async fn test_write_fully_surfaces_writer_failure() {
        // peer hung up, so every write fails
        let (mut sink, peer) = tokio::io::duplex(1);
        drop(peer);
        let err = write_fully(&mut sink, b"more than one byte").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_discard_partial_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.pdf");
        std::fs::write(&path, b"%PDF-1.4 trunc").unwrap();

        discard_partial(&path).await;
        assert!(!path.exists());

        // already gone
        discard_partial(&path).await;
    }

    #[tokio::test]
    async fn test_create_new_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken.pdf");
        std::fs::write(&path, b"original").unwrap();

        let err = create_new(&path).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = ArtifactStore {
            root: PathBuf::from("/srv/volume"),
        };
        assert_eq!(store.path_for("../../etc/passwd"), None);
        assert_eq!(store.path_for("../secret"), None);
        assert_eq!(store.path_for(""), None);
    }

    #[test]
    fn test_path_for_canonicalises_identifier() {
        let store = ArtifactStore {
            root: PathBuf::from("/srv/volume"),
        };
        let id = Uuid::new_v4();
        let upper = id.to_string().to_uppercase();
        let path = store.path_for(&upper).unwrap();
        assert_eq!(path, PathBuf::from(format!("/srv/volume/{id}.pdf")));
        assert!(path.starts_with("/srv/volume"));
    }

    #[tokio::test]
    async fn test_read_unknown_identifier_is_not_found() {
        let (_dir, store) = temp_store().await;
        let err = store.read(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));

        let err = store.read("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore {
            root: dir.path().join("gone"),
        };
        let err = store.store(b"abc").await.unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }
}
