use crate::core::Extractor;
use crate::models::{AnalyzeDocumentRequest, DocumentAnalysis, ExtractedFields};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File extensions accepted for RFP documents
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

/// Errors that can occur while turning a document into text
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Either file_path or content must be provided")]
    MissingInput,

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Document path must be relative to the document root: {0}")]
    OutsideRoot(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("No text decoder available for .{0} documents")]
    UndecodableFormat(String),

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the extractor over an RFP given inline or as a file
///
/// With a document root, file paths are resolved under it and may not leave it.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer {
    extractor: Extractor,
    root: Option<PathBuf>,
}

impl DocumentAnalyzer {
    pub fn new(extractor: Extractor) -> Self {
        Self { extractor, root: None }
    }

    /// Restrict file paths to `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Check the request names a usable document
    pub async fn validate(&self, request: &AnalyzeDocumentRequest) -> Result<(), DocumentError> {
        self.checked_path(request).await.map(|_| ())
    }

    /// Analyze a document, reporting any failure in the result instead of raising it
    pub async fn analyze(&self, request: &AnalyzeDocumentRequest) -> DocumentAnalysis {
        match self.try_analyze(request).await {
            Ok(fields) => DocumentAnalysis::succeeded(fields),
            Err(e) => {
                tracing::error!("Error processing RFP: {}", e);
                DocumentAnalysis::failed(e.to_string())
            }
        }
    }

    async fn try_analyze(&self, request: &AnalyzeDocumentRequest) -> Result<ExtractedFields, DocumentError> {
        let path = self.checked_path(request).await?;
        let text = read_text(request.content.as_deref(), path.as_deref()).await?;
        Ok(self.extractor.extract(&text))
    }

    /// Validated file path of the request, `None` when only content was given
    async fn checked_path(&self, request: &AnalyzeDocumentRequest) -> Result<Option<PathBuf>, DocumentError> {
        if request.content.is_none() && request.file_path.is_none() {
            return Err(DocumentError::MissingInput);
        }

        let Some(file_path) = &request.file_path else {
            return Ok(None);
        };

        let path = self.resolve(file_path).await?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(DocumentError::NotFound(file_path.clone()));
        }

        let extension = extension_of(&path);
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DocumentError::UnsupportedType(format!(".{}", extension)));
        }

        Ok(Some(path))
    }

    async fn resolve(&self, file_path: &str) -> Result<PathBuf, DocumentError> {
        let Some(root) = &self.root else {
            return Ok(PathBuf::from(file_path));
        };

        // Checked before touching the filesystem so outside paths reveal nothing
        let relative = Path::new(file_path);
        if !relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(DocumentError::OutsideRoot(file_path.to_string()));
        }

        // Symlinks may still point out of the root
        let not_found = || DocumentError::NotFound(file_path.to_string());
        let root = tokio::fs::canonicalize(root).await.map_err(|_| not_found())?;
        let path = tokio::fs::canonicalize(root.join(relative))
            .await
            .map_err(|_| not_found())?;
        if !path.starts_with(&root) {
            return Err(not_found());
        }

        Ok(path)
    }
}

/// Inline content wins over a file path
async fn read_text(content: Option<&str>, path: Option<&Path>) -> Result<String, DocumentError> {
    if let Some(content) = content {
        return Ok(content.to_string());
    }

    let path = path.ok_or(DocumentError::MissingInput)?;

    match extension_of(path).as_str() {
        "txt" => Ok(tokio::fs::read_to_string(path).await?),
        // PDF and DOCX decoding is handled outside this service
        other => Err(DocumentError::UndecodableFormat(other.to_string())),
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}
