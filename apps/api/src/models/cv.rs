use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::models::locale::Locale;

/// Identifier of an entry inside one of the document's collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Profile photo held in memory. Serialized as base64 so the document
/// snapshot stays valid JSON.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ProfileImage {
    pub mime_type: String,
    #[serde(serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
}

impl ProfileImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// `data:` URI suitable for an inline `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for ProfileImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn serialize_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub profile_image: Option<ProfileImage>,
}

impl PersonalInfo {
    pub fn is_complete(&self) -> bool {
        !self.full_name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Experience {
    pub id: EntryId,
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// `None` means the position is ongoing.
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Education {
    pub id: EntryId,
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub graduation_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    #[serde(alias = "Basico", alias = "Básico")]
    Basic,
    #[serde(alias = "Intermedio")]
    Intermediate,
    #[serde(alias = "Avanzado")]
    Advanced,
    #[serde(alias = "Experto")]
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Basic,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, SkillLevel::Basic) => "Basic",
            (Locale::En, SkillLevel::Intermediate) => "Intermediate",
            (Locale::En, SkillLevel::Advanced) => "Advanced",
            (Locale::En, SkillLevel::Expert) => "Expert",
            (Locale::Es, SkillLevel::Basic) => "Básico",
            (Locale::Es, SkillLevel::Intermediate) => "Intermedio",
            (Locale::Es, SkillLevel::Advanced) => "Avanzado",
            (Locale::Es, SkillLevel::Expert) => "Experto",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    /// Accepts the English names and the Spanish labels the mobile form used.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SkillLevel::ALL
            .into_iter()
            .find(|level| {
                level.label(Locale::En).eq_ignore_ascii_case(trimmed)
                    || level.label(Locale::Es).to_lowercase() == trimmed.to_lowercase()
            })
            .or_else(|| match trimmed.to_lowercase().as_str() {
                "basico" => Some(SkillLevel::Basic),
                _ => None,
            })
            .ok_or_else(|| format!("unknown skill level '{trimmed}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub id: EntryId,
    pub name: String,
    pub level: SkillLevel,
}
