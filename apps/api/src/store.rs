//! CV document store: the single in-memory aggregate the forms write into.
//!
//! The store performs no validation. Callers run the form rules first and
//! only hand fully built entities to these methods.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{Education, EntryId, Experience, PersonalInfo, ProfileImage, Skill};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("An entry with id {0} already exists")]
    DuplicateId(EntryId),
}

/// Anything that lives in an ordered collection keyed by id.
pub trait Entry {
    fn id(&self) -> EntryId;
}

impl Entry for Experience {
    fn id(&self) -> EntryId {
        self.id
    }
}

impl Entry for Education {
    fn id(&self) -> EntryId {
        self.id
    }
}

impl Entry for Skill {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Insertion-ordered collection with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entry> Collection<T> {
    pub fn insert(&mut self, entry: T) -> Result<EntryId, StoreError> {
        let id = entry.id();
        if self.contains(id) {
            return Err(StoreError::DuplicateId(id));
        }
        self.items.push(entry);
        Ok(id)
    }

    /// Removes the entry with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let pos = self.items.iter().position(|e| e.id() == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.items.iter().any(|e| e.id() == id)
    }
}

impl<T> Collection<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The résumé aggregate: one personal-info record plus three ordered
/// collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CvDocument {
    personal_info: PersonalInfo,
    experiences: Collection<Experience>,
    education: Collection<Education>,
    skills: Collection<Skill>,
}

impl CvDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.personal_info
    }

    pub fn experiences(&self) -> &Collection<Experience> {
        &self.experiences
    }

    pub fn education(&self) -> &Collection<Education> {
        &self.education
    }

    pub fn skills(&self) -> &Collection<Skill> {
        &self.skills
    }

    /// Replaces personal info wholesale.
    pub fn update_personal_info(&mut self, info: PersonalInfo) {
        debug!("personal info updated");
        self.personal_info = info;
    }

    pub fn set_profile_image(&mut self, image: ProfileImage) {
        debug!(bytes = image.len(), mime = %image.mime_type, "profile image set");
        self.personal_info.profile_image = Some(image);
    }

    /// Returns whether an image was present.
    pub fn clear_profile_image(&mut self) -> bool {
        self.personal_info.profile_image.take().is_some()
    }

    pub fn add_experience(&mut self, entry: Experience) -> Result<EntryId, StoreError> {
        let id = self.experiences.insert(entry)?;
        debug!(%id, total = self.experiences.len(), "experience added");
        Ok(id)
    }

    pub fn add_education(&mut self, entry: Education) -> Result<EntryId, StoreError> {
        let id = self.education.insert(entry)?;
        debug!(%id, total = self.education.len(), "education added");
        Ok(id)
    }

    pub fn add_skill(&mut self, entry: Skill) -> Result<EntryId, StoreError> {
        let id = self.skills.insert(entry)?;
        debug!(%id, total = self.skills.len(), "skill added");
        Ok(id)
    }

    /// Absent ids are a no-op; the return value says whether anything was removed.
    pub fn delete_experience(&mut self, id: EntryId) -> bool {
        let removed = self.experiences.remove(id).is_some();
        debug!(%id, removed, "experience delete");
        removed
    }

    pub fn delete_education(&mut self, id: EntryId) -> bool {
        let removed = self.education.remove(id).is_some();
        debug!(%id, removed, "education delete");
        removed
    }

    pub fn delete_skill(&mut self, id: EntryId) -> bool {
        let removed = self.skills.remove(id).is_some();
        debug!(%id, removed, "skill delete");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillLevel;

    fn experience(company: &str) -> Experience {
        Experience {
            id: EntryId::new(),
            company: company.to_string(),
            position: "Engineer".to_string(),
            start_date: "enero 2020".to_string(),
            end_date: None,
            description: None,
        }
    }

    fn skill(name: &str) -> Skill {
        Skill {
            id: EntryId::new(),
            name: name.to_string(),
            level: SkillLevel::Advanced,
        }
    }

    #[test]
    fn test_add_grows_by_one_with_fresh_id() {
        let mut doc = CvDocument::new();
        doc.add_experience(experience("Acme")).unwrap();
        let before: Vec<EntryId> = doc.experiences().iter().map(|e| e.id).collect();

        let entry = experience("Globex");
        let new_id = entry.id;
        doc.add_experience(entry).unwrap();

        assert_eq!(doc.experiences().len(), before.len() + 1);
        assert!(!before.contains(&new_id));
        assert!(doc.experiences().contains(new_id));
    }

    #[test]
    fn test_duplicate_id_rejected_without_write() {
        let mut doc = CvDocument::new();
        let entry = skill("Rust");
        let dup = entry.clone();
        doc.add_skill(entry).unwrap();

        let err = doc.add_skill(dup.clone()).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(dup.id));
        assert_eq!(doc.skills().len(), 1);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut doc = CvDocument::new();
        doc.add_skill(skill("Rust")).unwrap();
        let snapshot = doc.clone();

        assert!(!doc.delete_skill(EntryId::new()));
        assert!(!doc.delete_experience(EntryId::new()));
        assert!(!doc.delete_education(EntryId::new()));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_delete_first_keeps_second_in_order() {
        let mut doc = CvDocument::new();
        let first = experience("Acme");
        let second = experience("Globex");
        let third = experience("Initech");
        let (first_id, second_id, third_id) = (first.id, second.id, third.id);
        doc.add_experience(first).unwrap();
        doc.add_experience(second).unwrap();
        doc.add_experience(third).unwrap();

        assert!(doc.delete_experience(first_id));

        let ids: Vec<EntryId> = doc.experiences().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second_id, third_id]);
    }

    #[test]
    fn test_personal_info_read_after_write() {
        let mut doc = CvDocument::new();
        let info = PersonalInfo {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: Some("+44 20 7946".into()),
            location: None,
            summary: None,
            profile_image: None,
        };
        doc.update_personal_info(info.clone());
        assert_eq!(doc.personal_info(), &info);
    }

    #[test]
    fn test_profile_image_set_and_clear() {
        let mut doc = CvDocument::new();
        assert!(!doc.clear_profile_image());
        doc.set_profile_image(ProfileImage::new("image/jpeg", vec![0xff, 0xd8]));
        assert!(doc.personal_info().profile_image.is_some());
        assert!(doc.clear_profile_image());
        assert!(doc.personal_info().profile_image.is_none());
    }
}
