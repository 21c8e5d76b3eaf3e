// Service exports
pub mod directory;
pub mod documents;

pub use directory::{normalize_record, DirectoryError, GrantsDirectoryClient};
pub use documents::{DocumentAnalyzer, DocumentError, SUPPORTED_EXTENSIONS};
