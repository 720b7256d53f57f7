use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Named media storage under a fixed logical prefix.
///
/// Objects are addressed by relative paths such as
/// `uploads/images/sunrise.jpg`. Resolving those paths into URLs is the
/// HTTP layer's job, not the store's.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store bytes under the given filename and return the relative path
    /// the object ended up at.
    async fn save(&self, filename: &str, data: &[u8]) -> Result<String, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.save_stream(filename, reader).await
    }

    /// Store data from an async reader and return the relative path.
    ///
    /// The stored name may differ from `filename`: a name collision is
    /// resolved by suffixing the stem, never by overwriting.
    async fn save_stream(&self, filename: &str, reader: BoxReader)
    -> Result<String, StorageError>;

    /// Open a stored object as a streaming async reader.
    async fn open(&self, path: &str) -> Result<BoxReader, StorageError>;

    /// Check whether an object exists at the given relative path.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete an object by its relative path.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;
}
