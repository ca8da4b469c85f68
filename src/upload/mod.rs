mod archive;
mod uploader;

pub use archive::{ArchiveDigest, ArchiveFile};
pub use uploader::{ArchiveUploader, HttpArchiveUploader, UploadReceipt};
