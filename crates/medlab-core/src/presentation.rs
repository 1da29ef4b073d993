//! Handing rendered documents to the platform.
//!
//! Displaying, printing or opening a document belongs to the host platform.
//! Hosts plug in through [`Presenter`]; failures come back as
//! [`PrintOutcome`] values for a dismissible notification.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::document::Document;

/// Presentation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresentError {
    #[error("{0}")]
    EnvironmentUnavailable(String),

    #[error("Presentation failed: {0}")]
    Failed(String),
}

/// Platform hook that shows or prints a document.
pub trait Presenter {
    fn present(&self, document: &Document) -> Result<(), PresentError>;
}

/// Presenter for platforms without print support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl Presenter for UnsupportedPlatform {
    fn present(&self, _document: &Document) -> Result<(), PresentError> {
        Err(PresentError::EnvironmentUnavailable(
            "Printing is only available on web platform".into(),
        ))
    }
}

/// Writes documents as `.html` files into a directory.
#[derive(Debug, Clone)]
pub struct HtmlFilePresenter {
    dir: PathBuf,
}

impl HtmlFilePresenter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path a document is written to.
    ///
    /// The readable part of the name is the sanitized id; the hash suffix
    /// keeps ids that sanitize alike (`r/1`, `r_1`) in separate files.
    pub fn path_for(&self, document: &Document) -> PathBuf {
        let safe_id: String = document
            .entity_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let digest = Sha256::digest(document.entity_id.as_bytes());
        self.dir.join(format!(
            "{}-{}-{}.html",
            document.kind.as_str(),
            safe_id,
            hex::encode(&digest[..4])
        ))
    }
}

impl Presenter for HtmlFilePresenter {
    fn present(&self, document: &Document) -> Result<(), PresentError> {
        let path = self.path_for(document);
        fs::write(&path, &document.html)
            .map_err(|e| PresentError::Failed(format!("{}: {}", path.display(), e)))
    }
}

/// User-facing result of a print request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintOutcome {
    pub success: bool,
    pub message: String,
}

/// Present a document, turning any failure into an outcome message.
pub fn print_document(presenter: &dyn Presenter, document: &Document) -> PrintOutcome {
    match presenter.present(document) {
        Ok(()) => PrintOutcome {
            success: true,
            message: format!("{} ready to print", capitalize(document.kind.as_str())),
        },
        Err(e) => {
            tracing::warn!(kind = document.kind.as_str(), id = %document.entity_id, error = %e, "print failed");
            PrintOutcome {
                success: false,
                message: e.to_string(),
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;

    fn doc() -> Document {
        Document {
            kind: DocumentKind::Report,
            entity_id: "r/1".into(),
            title: "Lab - Report".into(),
            html: "<html></html>".into(),
        }
    }

    #[test]
    fn test_unsupported_platform_outcome() {
        let outcome = print_document(&UnsupportedPlatform, &doc());
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Printing is only available on web platform");
    }

    #[test]
    fn test_html_file_presenter() {
        let dir = tempfile::tempdir().unwrap();
        let presenter = HtmlFilePresenter::new(dir.path());

        let outcome = print_document(&presenter, &doc());
        assert!(outcome.success);
        assert_eq!(outcome.message, "Report ready to print");

        let path = presenter.path_for(&doc());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("report-r_1-") && name.ends_with(".html"));
        let written = fs::read_to_string(path).unwrap();
        assert_eq!(written, "<html></html>");
    }

    #[test]
    fn test_ids_that_sanitize_alike_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let presenter = HtmlFilePresenter::new(dir.path());
        let slash = doc();
        let underscore = Document {
            entity_id: "r_1".into(),
            html: "<html>second</html>".into(),
            ..doc()
        };

        assert_ne!(presenter.path_for(&slash), presenter.path_for(&underscore));
        assert!(print_document(&presenter, &slash).success);
        assert!(print_document(&presenter, &underscore).success);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
        assert_eq!(
            fs::read_to_string(presenter.path_for(&slash)).unwrap(),
            "<html></html>"
        );
    }

    #[test]
    fn test_html_file_presenter_missing_dir() {
        let presenter = HtmlFilePresenter::new("/nonexistent/medlab/out");
        let outcome = print_document(&presenter, &doc());
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Presentation failed"));
    }
}
