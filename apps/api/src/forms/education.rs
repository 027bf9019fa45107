use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{optional, FormSpec, Section};
use crate::models::dates::DateBounds;
use crate::models::{Education, EntryId};
use crate::store::{CvDocument, StoreError};
use crate::validation::rules::EDUCATION_RULES;
use crate::validation::{FieldRule, FieldSource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationInput {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_year: String,
}

impl EducationInput {
    pub fn date_bounds(today: NaiveDate) -> DateBounds {
        DateBounds::graduation(today)
    }
}

impl FieldSource for EducationInput {
    fn value(&self, field: &str) -> &str {
        match field {
            "institution" => &self.institution,
            "degree" => &self.degree,
            "field" => &self.field,
            "graduation_year" => &self.graduation_year,
            _ => "",
        }
    }
}

pub struct EducationForm;

impl FormSpec for EducationForm {
    type Input = EducationInput;
    type Output = Education;

    const SECTION: Section = Section::Education;

    fn rules() -> &'static [FieldRule] {
        EDUCATION_RULES
    }

    fn build(input: &EducationInput, _document: &CvDocument) -> Education {
        Education {
            id: EntryId::new(),
            institution: input.institution.trim().to_string(),
            degree: input.degree.trim().to_string(),
            field: optional(&input.field),
            // The rules guarantee four digits.
            graduation_year: input.graduation_year.trim().parse().unwrap_or_default(),
        }
    }

    fn commit(document: &mut CvDocument, entry: Education) -> Result<Education, StoreError> {
        document.add_education(entry.clone())?;
        Ok(entry)
    }
}
