// Form controllers: one validated form per CV section.
// Each form is a rule table plus a builder; the generic controller owns the
// input buffer and does validate → build → commit.

pub mod confirm;
pub mod education;
pub mod experience;
pub mod handlers;
pub mod personal;
pub mod photo;
pub mod skills;

use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::store::{CvDocument, StoreError};
use crate::validation::{validate, validate_all, FieldRule, FieldSource, Rejection, RuleContext};

pub use education::EducationForm;
pub use experience::ExperienceForm;
pub use personal::PersonalInfoForm;
pub use skills::SkillForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    PersonalInfo,
    Experience,
    Education,
    Skills,
    Photo,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::PersonalInfo => "personal-info",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Photo => "photo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Describes one form: its raw input, its rules, and how a validated input
/// becomes a store mutation.
pub trait FormSpec {
    type Input: FieldSource + Default + Clone + Serialize + DeserializeOwned;
    /// What the store received.
    type Output;

    const SECTION: Section;

    fn rules() -> &'static [FieldRule];

    /// Builds the entity from input that already passed `rules()`.
    fn build(input: &Self::Input, document: &CvDocument) -> Self::Output;

    fn commit(document: &mut CvDocument, output: Self::Output)
        -> Result<Self::Output, StoreError>;

    /// Buffer contents after a successful submit.
    fn after_commit(_document: &CvDocument) -> Self::Input {
        Self::Input::default()
    }
}

/// Owns a form's input buffer between user actions.
pub struct FormController<F: FormSpec> {
    buffer: F::Input,
    _form: PhantomData<F>,
}

impl<F: FormSpec> Default for FormController<F> {
    fn default() -> Self {
        Self::with_input(F::Input::default())
    }
}

impl<F: FormSpec> FormController<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: F::Input) -> Self {
        Self {
            buffer: input,
            _form: PhantomData,
        }
    }

    pub fn input(&self) -> &F::Input {
        &self.buffer
    }

    pub fn input_mut(&mut self) -> &mut F::Input {
        &mut self.buffer
    }

    pub fn fill(&mut self, input: F::Input) {
        self.buffer = input;
    }

    pub fn reset(&mut self) {
        self.buffer = F::Input::default();
    }

    /// Every failing field, without touching the store.
    pub fn check(&self, document: &CvDocument, today: NaiveDate) -> Vec<Rejection> {
        let ctx = RuleContext { today, document };
        validate_all(F::rules(), &self.buffer, &ctx)
    }

    /// Validates the buffer and commits it. On rejection the buffer is left
    /// as-is so it can be corrected.
    pub fn submit(
        &mut self,
        document: &mut CvDocument,
        today: NaiveDate,
    ) -> Result<F::Output, SubmitError> {
        let ctx = RuleContext {
            today,
            document: &*document,
        };
        if let Err(rejection) = validate(F::rules(), &self.buffer, &ctx) {
            debug!(section = %F::SECTION, field = rejection.field, "submission rejected");
            return Err(rejection.into());
        }

        let output = F::build(&self.buffer, document);
        let committed = F::commit(document, output)?;
        self.buffer = F::after_commit(document);
        debug!(section = %F::SECTION, "submission committed");
        Ok(committed)
    }

    /// Replaces the buffer with `input`, then submits.
    pub fn submit_input(
        &mut self,
        input: F::Input,
        document: &mut CvDocument,
        today: NaiveDate,
    ) -> Result<F::Output, SubmitError> {
        self.fill(input);
        self.submit(document, today)
    }
}

/// Trimmed value, or `None` when empty.
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
