//! PDF → image conversion. Rasterization itself is delegated to `pdftoppm`;
//! this module only stages the file, runs the tool and collects the PNG.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::storage::BlobFile;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to convert PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to convert PDF: {tool} exited with status {code:?}: {stderr}")]
    Tool {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to convert PDF to image.")]
    NoOutput,
}

#[async_trait]
pub trait PdfConverter: Send + Sync {
    /// Renders the first page of `pdf` to a PNG named after the source file.
    async fn convert(&self, pdf: &BlobFile) -> Result<BlobFile, ConversionError>;
}

pub struct PdftoppmConverter {
    binary: String,
    dpi: u32,
}

impl PdftoppmConverter {
    pub fn new(binary: impl Into<String>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }
}

#[async_trait]
impl PdfConverter for PdftoppmConverter {
    async fn convert(&self, pdf: &BlobFile) -> Result<BlobFile, ConversionError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.pdf");
        tokio::fs::write(&input, &pdf.bytes).await?;

        // pdftoppm appends the extension to the output prefix.
        let prefix = dir.path().join("page");
        let output = Command::new(&self.binary)
            .arg("-png")
            .arg("-singlefile")
            .args(["-f", "1", "-l", "1"])
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&input)
            .arg(&prefix)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("{} failed for {}: {stderr}", self.binary, pdf.name);
            return Err(ConversionError::Tool {
                tool: self.binary.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        let png = match tokio::fs::read(prefix.with_extension("png")).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return Err(ConversionError::NoOutput),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConversionError::NoOutput)
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Rendered {} to {} PNG bytes", pdf.name, png.len());

        Ok(BlobFile {
            name: image_name_for(&pdf.name),
            content_type: "image/png".to_string(),
            bytes: Bytes::from(png),
        })
    }
}

/// `resume.pdf` → `resume.png`; names without a `.pdf` suffix just gain `.png`.
fn image_name_for(pdf_name: &str) -> String {
    let stem = match pdf_name.len().checked_sub(4) {
        Some(split)
            if pdf_name.is_char_boundary(split)
                && pdf_name[split..].eq_ignore_ascii_case(".pdf") =>
        {
            &pdf_name[..split]
        }
        _ => pdf_name,
    };
    format!("{stem}.png")
}
