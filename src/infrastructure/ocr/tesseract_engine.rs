use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::OnceCell;

use crate::application::ports::{OcrEngine, OcrError, OcrPass};

/// Runs the `tesseract` CLI, image on stdin and text on stdout.
pub struct TesseractEngine {
    command: String,
    available: OnceCell<bool>,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            available: OnceCell::new(),
        }
    }

    async fn detect(&self) -> bool {
        let status = Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::warn!(command = %self.command, %status, "tesseract version check failed");
                false
            }
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "tesseract is not installed");
                false
            }
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.detect()).await
    }

    async fn recognize(&self, image_png: &[u8], pass: &OcrPass) -> Result<String, OcrError> {
        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", pass.languages.as_str(), "--psm"])
            .arg(pass.segmentation.psm().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => OcrError::Unavailable(e.to_string()),
                _ => OcrError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image_png).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::RecognitionFailed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
