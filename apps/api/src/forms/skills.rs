use serde::{Deserialize, Serialize};

use super::{FormSpec, Section};
use crate::models::{EntryId, Skill, SkillLevel};
use crate::store::{CvDocument, StoreError};
use crate::validation::rules::SKILL_RULES;
use crate::validation::{FieldRule, FieldSource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillInput {
    pub name: String,
    pub level: String,
}

impl FieldSource for SkillInput {
    fn value(&self, field: &str) -> &str {
        match field {
            "name" => &self.name,
            "level" => &self.level,
            _ => "",
        }
    }
}

pub struct SkillForm;

impl FormSpec for SkillForm {
    type Input = SkillInput;
    type Output = Skill;

    const SECTION: Section = Section::Skills;

    fn rules() -> &'static [FieldRule] {
        SKILL_RULES
    }

    fn build(input: &SkillInput, _document: &CvDocument) -> Skill {
        Skill {
            id: EntryId::new(),
            name: input.name.trim().to_string(),
            // The rules reject anything that does not parse.
            level: input.level.parse().unwrap_or(SkillLevel::Basic),
        }
    }

    fn commit(document: &mut CvDocument, skill: Skill) -> Result<Skill, StoreError> {
        document.add_skill(skill.clone())?;
        Ok(skill)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::forms::{FormController, SubmitError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn skill(name: &str, level: &str) -> SkillInput {
        SkillInput {
            name: name.into(),
            level: level.into(),
        }
    }

    fn rejected_field(err: SubmitError) -> &'static str {
        match err {
            SubmitError::Rejected(r) => r.field,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_level_rejected() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<SkillForm>::new();
        let err = form.submit_input(skill("Go", "Master"), &mut doc, today()).unwrap_err();
        assert_eq!(rejected_field(err), "level");
        assert!(doc.skills().is_empty());
    }

    #[test]
    fn test_valid_skill_added() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<SkillForm>::new();
        let added = form.submit_input(skill("Go", "Expert"), &mut doc, today()).unwrap();
        assert_eq!(added.level, SkillLevel::Expert);
        assert_eq!(doc.skills().len(), 1);
        assert_eq!(form.input(), &SkillInput::default());
    }

    #[test]
    fn test_spanish_level_accepted() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<SkillForm>::new();
        let added = form
            .submit_input(skill("Python", "Intermedio"), &mut doc, today())
            .unwrap();
        assert_eq!(added.level, SkillLevel::Intermediate);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<SkillForm>::new();
        form.submit_input(skill("Rust", "Advanced"), &mut doc, today())
            .unwrap();
        let err = form
            .submit_input(skill("  rust ", "Basic"), &mut doc, today())
            .unwrap_err();
        assert_eq!(rejected_field(err), "name");
        assert_eq!(doc.skills().len(), 1);
    }

    #[test]
    fn test_name_length_bounds() {
        let mut doc = CvDocument::new();
        let mut form = FormController::<SkillForm>::new();
        let err = form.submit_input(skill("C", "Basic"), &mut doc, today()).unwrap_err();
        assert_eq!(rejected_field(err), "name");

        let long = "x".repeat(51);
        let err = form.submit_input(skill(&long, "Basic"), &mut doc, today()).unwrap_err();
        assert_eq!(rejected_field(err), "name");
    }
}
