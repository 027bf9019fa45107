use serde::{Deserialize, Serialize};

use super::{optional, FormSpec, Section};
use crate::models::PersonalInfo;
use crate::store::{CvDocument, StoreError};
use crate::validation::rules::PERSONAL_INFO_RULES;
use crate::validation::{FieldRule, FieldSource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfoInput {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
}

impl PersonalInfoInput {
    /// Seeds the form from what the document already holds.
    pub fn from_info(info: &PersonalInfo) -> Self {
        Self {
            full_name: info.full_name.clone(),
            email: info.email.clone(),
            phone: info.phone.clone().unwrap_or_default(),
            location: info.location.clone().unwrap_or_default(),
            summary: info.summary.clone().unwrap_or_default(),
        }
    }
}

impl FieldSource for PersonalInfoInput {
    fn value(&self, field: &str) -> &str {
        match field {
            "full_name" => &self.full_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "location" => &self.location,
            "summary" => &self.summary,
            _ => "",
        }
    }
}

pub struct PersonalInfoForm;

impl FormSpec for PersonalInfoForm {
    type Input = PersonalInfoInput;
    type Output = PersonalInfo;

    const SECTION: Section = Section::PersonalInfo;

    fn rules() -> &'static [FieldRule] {
        PERSONAL_INFO_RULES
    }

    /// The photo is managed by its own screen, so the current one is carried over.
    fn build(input: &PersonalInfoInput, document: &CvDocument) -> PersonalInfo {
        PersonalInfo {
            full_name: input.full_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: optional(&input.phone),
            location: optional(&input.location),
            summary: optional(&input.summary),
            profile_image: document.personal_info().profile_image.clone(),
        }
    }

    fn commit(document: &mut CvDocument, info: PersonalInfo) -> Result<PersonalInfo, StoreError> {
        document.update_personal_info(info.clone());
        Ok(info)
    }

    fn after_commit(document: &CvDocument) -> PersonalInfoInput {
        PersonalInfoInput::from_info(document.personal_info())
    }
}
