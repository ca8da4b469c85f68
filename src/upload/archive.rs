use std::path::{Path, PathBuf};
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use crate::error::{KuduUpdateError, Result};

const DIGEST_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDigest {
    pub size: u64,
    pub sha256: String,
}

/// A local zip that has been checked to exist.
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    path: PathBuf,
}

impl ArchiveFile {
    /// Blocking existence check; meant to run before any network activity.
    pub fn open_checked(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.is_file() {
            return Err(KuduUpdateError::FileNotFound(path));
        }

        // Unreadable files fail here too.
        std::fs::File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => KuduUpdateError::FileNotFound(path.clone()),
            _ => KuduUpdateError::Io(e),
        })?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn open(&self) -> Result<tokio::fs::File> {
        Ok(tokio::fs::File::open(&self.path).await?)
    }

    /// Size and SHA-256 of the archive, read in fixed-size chunks.
    pub async fn inspect(&self) -> Result<ArchiveDigest> {
        let mut file = self.open().await?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; DIGEST_CHUNK_SIZE];
        let mut size = 0u64;

        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            size += n as u64;
        }

        Ok(ArchiveDigest {
            size,
            sha256: format!("{:x}", hasher.finalize()),
        })
    }
}
