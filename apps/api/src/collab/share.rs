use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::{ExportedFile, Outcome, ShareTarget};

/// Shares by copying the exported file into an outbox directory that another
/// process (mail drop, synced folder) picks up. Without an outbox, sharing is
/// unavailable on this host.
pub struct DirectoryShare {
    outbox: Option<PathBuf>,
}

impl DirectoryShare {
    pub fn new(outbox: Option<PathBuf>) -> Self {
        Self { outbox }
    }

    pub fn is_available(&self) -> bool {
        self.outbox.is_some()
    }
}

#[async_trait]
impl ShareTarget for DirectoryShare {
    async fn share(&self, file: &ExportedFile) -> Outcome<()> {
        let Some(outbox) = &self.outbox else {
            return Outcome::Failed("sharing is not available on this host".to_string());
        };
        if let Err(e) = tokio::fs::create_dir_all(outbox).await {
            return Outcome::Failed(format!("cannot create {}: {e}", outbox.display()));
        }
        let Some(name) = file.path.file_name() else {
            return Outcome::Failed(format!("{} has no file name", file.path.display()));
        };
        let target = outbox.join(name);
        match tokio::fs::copy(&file.path, &target).await {
            Ok(bytes) => {
                info!(id = %file.id, path = %target.display(), bytes, "export shared");
                Outcome::Success(())
            }
            Err(e) => Outcome::Failed(format!("cannot copy to {}: {e}", target.display())),
        }
    }
}
