//! External collaborators: image acquisition, PDF generation and sharing.
//!
//! Each call reports an [`Outcome`] so callers handle success, user
//! cancellation and failure explicitly. Implementations are swapped at
//! startup and carried in `AppState` as `Arc<dyn ...>`.

pub mod image;
pub mod pdf;
pub mod share;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::ProfileImage;

/// Result of an asynchronous request to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Cancelled,
    Failed(String),
}

impl<T> Outcome<T> {
    /// `Ok(None)` on cancellation; failures become `err(reason)`.
    pub fn into_result<E>(self, err: impl FnOnce(String) -> E) -> Result<Option<T>, E> {
        match self {
            Outcome::Success(value) => Ok(Some(value)),
            Outcome::Cancelled => Ok(None),
            Outcome::Failed(reason) => Err(err(reason)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollabError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Could not load the image: {0}")]
    Image(String),

    #[error("Could not generate the PDF: {0}")]
    Pdf(String),

    #[error("Could not share the file: {0}")]
    Share(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Granted,
    Denied,
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn request_permission(&self) -> Permission;

    async fn acquire(&self) -> Outcome<ProfileImage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportId(Uuid);

impl ExportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ExportId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A rendered file on local disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub id: ExportId,
    pub path: PathBuf,
    pub media_type: &'static str,
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_to_file(&self, markup: &str) -> Outcome<ExportedFile>;

    /// Short name reported to clients, e.g. "command" or "html".
    fn backend(&self) -> &'static str;
}

#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, file: &ExportedFile) -> Outcome<()>;
}
