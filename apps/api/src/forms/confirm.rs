//! Two-step deletion: a request yields a token and a prompt; only confirming
//! the token touches the store.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::EntryId;
use crate::store::CvDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationToken(Uuid);

impl ConfirmationToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ConfirmationToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DeleteTarget {
    Experience(EntryId),
    Education(EntryId),
    Skill(EntryId),
    ProfileImage,
}

impl DeleteTarget {
    pub fn prompt(self) -> &'static str {
        match self {
            DeleteTarget::Experience(_) => "Are you sure you want to delete this experience?",
            DeleteTarget::Education(_) => "Are you sure you want to delete this education entry?",
            DeleteTarget::Skill(_) => "Delete this skill?",
            DeleteTarget::ProfileImage => "Are you sure you want to remove the profile photo?",
        }
    }

    /// Applies the delete. Missing targets are a no-op.
    fn apply(self, document: &mut CvDocument) -> bool {
        match self {
            DeleteTarget::Experience(id) => document.delete_experience(id),
            DeleteTarget::Education(id) => document.delete_education(id),
            DeleteTarget::Skill(id) => document.delete_skill(id),
            DeleteTarget::ProfileImage => document.clear_profile_image(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingDelete {
    pub token: ConfirmationToken,
    pub target: DeleteTarget,
    pub prompt: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub target: DeleteTarget,
    /// False when the entry was already gone.
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmError {
    #[error("No pending confirmation with token {0}")]
    UnknownToken(ConfirmationToken),
}

#[derive(Debug, Default)]
pub struct PendingConfirmations {
    pending: HashMap<ConfirmationToken, DeleteTarget>,
}

impl PendingConfirmations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for `target`. An earlier request for the same target
    /// is superseded and its token stops working.
    pub fn request(&mut self, target: DeleteTarget) -> PendingDelete {
        let before = self.len();
        self.pending.retain(|_, pending| *pending != target);
        let superseded = before - self.len();

        let token = ConfirmationToken::new();
        self.pending.insert(token, target);
        debug!(
            %token,
            ?target,
            superseded,
            pending = self.len(),
            "delete confirmation requested"
        );
        PendingDelete {
            token,
            target,
            prompt: target.prompt(),
        }
    }

    pub fn confirm(
        &mut self,
        token: ConfirmationToken,
        document: &mut CvDocument,
    ) -> Result<DeleteOutcome, ConfirmError> {
        let target = self
            .pending
            .remove(&token)
            .ok_or(ConfirmError::UnknownToken(token))?;
        let removed = target.apply(document);
        info!(?target, removed, "delete confirmed");
        Ok(DeleteOutcome { target, removed })
    }

    pub fn cancel(&mut self, token: ConfirmationToken) -> Result<DeleteTarget, ConfirmError> {
        let target = self
            .pending
            .remove(&token)
            .ok_or(ConfirmError::UnknownToken(token))?;
        debug!(%token, ?target, "delete cancelled");
        Ok(target)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
