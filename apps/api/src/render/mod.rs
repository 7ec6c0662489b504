//! Document rendering: converts a submitted resume into a preview image.
//!
//! Rendering is delegated to poppler's `pdftoppm` in a scratch directory:
//! write the document, rasterize page one to PNG, read the result back.
//! The binary name is configurable so deployments can point at a wrapper.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::storage::files::DocumentFile;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to spawn renderer '{bin}': {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("renderer exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("renderer produced no output image")]
    MissingOutput,
    #[error("scratch directory error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders the first page of `file` as a PNG preview.
    async fn render_preview(&self, file: &DocumentFile) -> Result<DocumentFile, RenderError>;
}

pub struct PopplerRenderer {
    bin: String,
}

impl PopplerRenderer {
    pub fn new(bin: String) -> Self {
        Self { bin }
    }

    /// Preview file name derived from the source document's stem.
    fn preview_name(file_name: &str) -> String {
        let stem = std::path::Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("resume");
        format!("{stem}.png")
    }
}

#[async_trait]
impl DocumentRenderer for PopplerRenderer {
    async fn render_preview(&self, file: &DocumentFile) -> Result<DocumentFile, RenderError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input.pdf");
        let output_base = scratch.path().join("preview");
        tokio::fs::write(&input, &file.bytes).await?;

        // -singlefile keeps pdftoppm from appending a page-number suffix.
        let output = Command::new(&self.bin)
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg("144")
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg(&input)
            .arg(&output_base)
            .output()
            .await
            .map_err(|source| RenderError::Spawn { bin: self.bin.clone(), source })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let rendered = scratch.path().join("preview.png");
        let bytes = match tokio::fs::read(&rendered).await {
            Ok(bytes) if !bytes.is_empty() => Bytes::from(bytes),
            _ => return Err(RenderError::MissingOutput),
        };

        debug!("rendered '{}' preview ({} bytes)", file.file_name, bytes.len());
        Ok(DocumentFile {
            file_name: Self::preview_name(&file.file_name),
            content_type: "image/png".to_string(),
            bytes,
        })
    }
}
