use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use crate::collab::{ExportId, ExportedFile, PdfRenderer, ShareTarget};
use crate::config::Config;
use crate::forms::confirm::PendingConfirmations;
use crate::forms::{EducationForm, ExperienceForm, FormController, PersonalInfoForm, SkillForm};
use crate::store::CvDocument;

/// Exports kept available for sharing. Older ones are evicted.
pub const MAX_RETAINED_EXPORTS: usize = 16;

/// Everything one editing session mutates: the document, the form buffers,
/// outstanding delete confirmations and the files exported so far.
pub struct Session {
    pub document: CvDocument,
    pub personal: FormController<PersonalInfoForm>,
    pub experience: FormController<ExperienceForm>,
    pub education: FormController<EducationForm>,
    pub skills: FormController<SkillForm>,
    pub confirmations: PendingConfirmations,
    pub exports: ExportLog,
}

impl Session {
    pub fn new() -> Self {
        Self {
            document: CvDocument::new(),
            personal: FormController::new(),
            experience: FormController::new(),
            education: FormController::new(),
            skills: FormController::new(),
            confirmations: PendingConfirmations::new(),
            exports: ExportLog::new(MAX_RETAINED_EXPORTS),
        }
    }
}

/// Most recent exports, oldest first, bounded by `capacity`.
#[derive(Debug)]
pub struct ExportLog {
    files: VecDeque<ExportedFile>,
    capacity: usize,
}

impl ExportLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            files: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Records `file`, returning the exports pushed out to make room. Their
    /// files are the caller's to remove.
    pub fn record(&mut self, file: ExportedFile) -> Vec<ExportedFile> {
        self.files.push_back(file);
        let excess = self.files.len().saturating_sub(self.capacity);
        self.files.drain(..excess).collect()
    }

    pub fn get(&self, id: ExportId) -> Option<&ExportedFile> {
        self.files.iter().find(|f| f.id == id)
    }
}

/// Source of "today" for date rules. Tests pin it.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    #[cfg(test)]
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            #[cfg(test)]
            Clock::Fixed(date) => *date,
        }
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Handlers take the session lock for the whole of a mutation, so at most
/// one runs against the document at a time. Collaborator calls are made
/// with the lock released.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub config: Config,
    /// HTML→PDF backend. Default: HtmlSnapshotRenderer. Swap via PDF_COMMAND.
    pub pdf: Arc<dyn PdfRenderer>,
    pub share: Arc<dyn ShareTarget>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(config: Config, pdf: Arc<dyn PdfRenderer>, share: Arc<dyn ShareTarget>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            config,
            pdf,
            share,
            clock: Clock::System,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn export(n: usize) -> ExportedFile {
        ExportedFile {
            id: ExportId::new(),
            path: PathBuf::from(format!("cv-{n}.html")),
            media_type: "text/html",
        }
    }

    #[test]
    fn test_export_log_evicts_oldest() {
        let mut log = ExportLog::new(2);
        let first = export(1);
        let second = export(2);
        let third = export(3);

        assert!(log.record(first.clone()).is_empty());
        assert!(log.record(second.clone()).is_empty());
        assert_eq!(log.record(third.clone()), vec![first.clone()]);

        assert!(log.get(first.id).is_none());
        assert_eq!(log.get(second.id), Some(&second));
        assert_eq!(log.get(third.id), Some(&third));
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.document, CvDocument::new());
        assert_eq!(session.confirmations.len(), 0);
        assert!(session.exports.get(ExportId::new()).is_none());
    }
}
