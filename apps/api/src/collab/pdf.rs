use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use super::{ExportId, ExportedFile, Outcome, PdfRenderer};

/// Converts markup with an external HTML→PDF tool, invoked as
/// `<program> [args...] <input.html> <output.pdf>` (wkhtmltopdf, weasyprint
/// and similar tools follow this shape).
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
    out_dir: PathBuf,
}

impl CommandPdfRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            out_dir: out_dir.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render_to_file(&self, markup: &str) -> Outcome<ExportedFile> {
        if let Err(e) = tokio::fs::create_dir_all(&self.out_dir).await {
            return Outcome::Failed(format!("cannot create {}: {e}", self.out_dir.display()));
        }

        // Removed when dropped at the end of this call.
        let input = match tempfile::Builder::new()
            .prefix("cv-")
            .suffix(".html")
            .tempfile_in(&self.out_dir)
        {
            Ok(file) => file,
            Err(e) => return Outcome::Failed(format!("cannot create temporary file: {e}")),
        };
        if let Err(e) = tokio::fs::write(input.path(), markup).await {
            return Outcome::Failed(format!("cannot write markup: {e}"));
        }

        let id = ExportId::new();
        let output = self.out_dir.join(format!("cv-{id}.pdf"));

        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(input.path())
            .arg(&output)
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => {
                info!(program = %self.program, path = %output.display(), "PDF rendered");
                Outcome::Success(ExportedFile {
                    id,
                    path: output,
                    media_type: "application/pdf",
                })
            }
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                warn!(program = %self.program, status = %out.status, "PDF command failed");
                Outcome::Failed(format!(
                    "`{}` exited with {}: {}",
                    self.program,
                    out.status,
                    stderr.trim()
                ))
            }
            Err(e) => {
                warn!(program = %self.program, "PDF command could not be started: {e}");
                Outcome::Failed(format!("cannot run `{}`: {e}", self.program))
            }
        }
    }

    fn backend(&self) -> &'static str {
        "command"
    }
}

/// Fallback when no converter is configured: writes the print-ready HTML so
/// it can be opened and printed to PDF by a browser.
pub struct HtmlSnapshotRenderer {
    out_dir: PathBuf,
}

impl HtmlSnapshotRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

#[async_trait]
impl PdfRenderer for HtmlSnapshotRenderer {
    async fn render_to_file(&self, markup: &str) -> Outcome<ExportedFile> {
        if let Err(e) = tokio::fs::create_dir_all(&self.out_dir).await {
            return Outcome::Failed(format!("cannot create {}: {e}", self.out_dir.display()));
        }
        let id = ExportId::new();
        let path = self.out_dir.join(format!("cv-{id}.html"));
        match tokio::fs::write(&path, markup).await {
            Ok(()) => {
                info!(path = %path.display(), "HTML snapshot written");
                Outcome::Success(ExportedFile {
                    id,
                    path,
                    media_type: "text/html",
                })
            }
            Err(e) => Outcome::Failed(format!("cannot write {}: {e}", path.display())),
        }
    }

    fn backend(&self) -> &'static str {
        "html"
    }
}
