use std::path::PathBuf;

use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::traits::{BoxReader, MediaStore};

/// Length of the random stem suffix used to resolve name collisions.
const SUFFIX_LEN: usize = 7;

/// Filesystem-backed media store.
///
/// Objects live at `{root}/{prefix}/{name}` and are addressed by the
/// relative path `{prefix}/{name}`. Writes go through a temp file and an
/// atomic rename so a crashed upload never leaves a partial object behind.
pub struct FilesystemMediaStore {
    root: PathBuf,
    prefix: String,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store rooted at `root`.
    pub async fn new(root: PathBuf, prefix: &str, max_size: u64) -> Result<Self, StorageError> {
        let prefix = prefix.trim_matches('/').to_string();
        fs::create_dir_all(root.join(&prefix)).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            prefix,
            max_size,
        })
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }

    /// Resolve a relative path, rejecting anything that could escape the
    /// media root.
    fn checked_path(&self, rel: &str) -> Result<PathBuf, StorageError> {
        if rel.is_empty()
            || rel.starts_with('/')
            || rel.contains('\\')
            || rel.contains('\0')
            || rel
                .split('/')
                .any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return Err(StorageError::InvalidPath(rel.to_string()));
        }
        Ok(self.root.join(rel))
    }

    /// Pick a free relative path for `filename`, suffixing the stem when
    /// the plain name is already taken.
    async fn available_rel_path(&self, filename: &str) -> Result<String, StorageError> {
        let candidate = format!("{}/{}", self.prefix, filename);
        if !fs::try_exists(self.checked_path(&candidate)?).await? {
            return Ok(candidate);
        }

        let (stem, ext) = match filename.rsplit_once('.') {
            Some((s, e)) if !s.is_empty() => (s, Some(e)),
            _ => (filename, None),
        };

        loop {
            let suffix: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(SUFFIX_LEN)
                .map(char::from)
                .collect();
            let name = match ext {
                Some(ext) => format!("{stem}_{suffix}.{ext}"),
                None => format!("{stem}_{suffix}"),
            };
            let candidate = format!("{}/{}", self.prefix, name);
            if !fs::try_exists(self.checked_path(&candidate)?).await? {
                return Ok(candidate);
            }
        }
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn save_stream(
        &self,
        filename: &str,
        mut reader: BoxReader,
    ) -> Result<String, StorageError> {
        let temp_path = self.temp_path();
        let mut temp_file = fs::File::create(&temp_path).await?;
        let mut total_bytes: u64 = 0;

        let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > self.max_size {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(StorageError::SizeLimitExceeded {
                    actual: total_bytes,
                    limit: self.max_size,
                });
            }

            temp_file.write_all(&buf[..n]).await?;
        }

        temp_file.flush().await?;
        drop(temp_file);

        let rel = match self.available_rel_path(filename).await {
            Ok(rel) => rel,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };
        let dest = self.root.join(&rel);

        if let Err(e) = fs::rename(&temp_path, &dest).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(rel)
    }

    async fn open(&self, path: &str) -> Result<BoxReader, StorageError> {
        let full = self.checked_path(path)?;
        match fs::File::open(&full).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.checked_path(path)?;
        Ok(fs::try_exists(&full).await?)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.checked_path(path)?;
        match fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
