use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{optional, FormSpec, Section};
use crate::models::dates::{is_current_marker, DateBounds};
use crate::models::{EntryId, Experience};
use crate::store::{CvDocument, StoreError};
use crate::validation::rules::EXPERIENCE_RULES;
use crate::validation::{FieldRule, FieldSource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceInput {
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// Empty, or "Current"/"Actual", for an ongoing position.
    pub end_date: String,
    pub description: String,
}

impl ExperienceInput {
    /// Picker limits for the two date fields given what is typed so far.
    pub fn date_bounds(&self, today: NaiveDate) -> ExperienceDateBounds {
        ExperienceDateBounds {
            start_date: DateBounds::experience_start(today),
            end_date: DateBounds::experience_end(&self.start_date, today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExperienceDateBounds {
    pub start_date: DateBounds,
    pub end_date: DateBounds,
}

impl FieldSource for ExperienceInput {
    fn value(&self, field: &str) -> &str {
        match field {
            "company" => &self.company,
            "position" => &self.position,
            "start_date" => &self.start_date,
            "end_date" => &self.end_date,
            "description" => &self.description,
            _ => "",
        }
    }
}

pub struct ExperienceForm;

impl FormSpec for ExperienceForm {
    type Input = ExperienceInput;
    type Output = Experience;

    const SECTION: Section = Section::Experience;

    fn rules() -> &'static [FieldRule] {
        EXPERIENCE_RULES
    }

    fn build(input: &ExperienceInput, _document: &CvDocument) -> Experience {
        let end_date = if is_current_marker(&input.end_date) {
            None
        } else {
            optional(&input.end_date)
        };
        Experience {
            id: EntryId::new(),
            company: input.company.trim().to_string(),
            position: input.position.trim().to_string(),
            start_date: input.start_date.trim().to_string(),
            end_date,
            description: optional(&input.description),
        }
    }

    fn commit(document: &mut CvDocument, entry: Experience) -> Result<Experience, StoreError> {
        document.add_experience(entry.clone())?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormController, SubmitError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn acme() -> ExperienceInput {
        ExperienceInput {
            company: "Acme".into(),
            position: "Engineer".into(),
            start_date: "enero 2020".into(),
            end_date: String::new(),
            description: String::new(),
        }
    }

    fn rejection(err: SubmitError) -> crate::validation::Rejection {
        match err {
            SubmitError::Rejected(r) => r,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_add_clears_buffer_and_stores_entry() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<ExperienceForm>::new();

        let entry = form.submit_input(acme(), &mut doc, today()).unwrap();

        assert_eq!(doc.experiences().len(), 1);
        assert_eq!(doc.experiences().get(entry.id), Some(&entry));
        assert_eq!(entry.end_date, None);
        assert_eq!(form.input(), &ExperienceInput::default());
    }

    #[test]
    fn test_current_sentinel_stored_as_ongoing() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<ExperienceForm>::new();
        let mut input = acme();
        input.end_date = "Current".into();
        let entry = form.submit_input(input, &mut doc, today()).unwrap();
        assert_eq!(entry.end_date, None);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<ExperienceForm>::new();
        let mut input = acme();
        input.end_date = "diciembre 2019".into();

        let r = rejection(form.submit_input(input.clone(), &mut doc, today()).unwrap_err());
        assert_eq!(r.field, "end_date");
        assert!(doc.experiences().is_empty());
        assert_eq!(form.input(), &input);
    }

    #[test]
    fn test_malformed_end_date_is_stored_as_given() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<ExperienceForm>::new();
        let mut input = acme();
        input.end_date = "late 2019".into();

        let entry = form.submit_input(input, &mut doc, today()).unwrap();
        assert_eq!(entry.end_date.as_deref(), Some("late 2019"));
    }

    #[test]
    fn test_future_start_rejected() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<ExperienceForm>::new();
        let mut input = acme();
        input.start_date = "julio 2024".into();

        let r = rejection(form.submit_input(input, &mut doc, today()).unwrap_err());
        assert_eq!(r.message, "Start date cannot be in the future");
    }

    #[test]
    fn test_required_fields_checked_first() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<ExperienceForm>::new();
        let r = rejection(
            form.submit_input(ExperienceInput::default(), &mut doc, today())
                .unwrap_err(),
        );
        assert_eq!(r.field, "company");
        assert_eq!(r.message, "Company is required");
    }

    #[test]
    fn test_short_description_rejected() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<ExperienceForm>::new();
        let mut input = acme();
        input.description = "Coding".into();
        let r = rejection(form.submit_input(input, &mut doc, today()).unwrap_err());
        assert_eq!(r.field, "description");
    }

    #[test]
    fn test_date_bounds_follow_start_date() {
        let bounds = acme().date_bounds(today());
        assert_eq!(bounds.end_date.min, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(bounds.start_date.max, Some(today()));
    }
}
