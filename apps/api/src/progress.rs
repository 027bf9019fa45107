use serde::{Deserialize, Serialize};

use crate::forms::Section;
use crate::store::CvDocument;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionProgress {
    pub section: Section,
    pub status: SectionStatus,
    pub entry_count: usize,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    /// Weighted share of completed sections, 0.0 – 1.0.
    pub completion: f64,
    pub sections: Vec<SectionProgress>,
    pub missing_sections: Vec<Section>,
    pub ready_to_export: bool,
}

const SECTION_WEIGHTS: &[(Section, f64)] = &[
    (Section::PersonalInfo, 0.35),
    (Section::Experience, 0.25),
    (Section::Education, 0.20),
    (Section::Skills, 0.10),
    (Section::Photo, 0.10),
];

pub fn compute_progress(document: &CvDocument) -> ProgressReport {
    let mut sections = Vec::with_capacity(SECTION_WEIGHTS.len());
    let mut missing_sections = Vec::new();
    let mut weighted = 0.0;

    for &(section, weight) in SECTION_WEIGHTS {
        let (complete, entry_count, recommendation) = match section {
            Section::PersonalInfo => (
                document.personal_info().is_complete(),
                usize::from(document.personal_info().is_complete()),
                "Add at least your full name and email",
            ),
            Section::Experience => (
                !document.experiences().is_empty(),
                document.experiences().len(),
                "Add at least one work experience",
            ),
            Section::Education => (
                !document.education().is_empty(),
                document.education().len(),
                "Add at least one education entry",
            ),
            Section::Skills => (
                !document.skills().is_empty(),
                document.skills().len(),
                "Add a few skills with their level",
            ),
            Section::Photo => (
                document.personal_info().profile_image.is_some(),
                usize::from(document.personal_info().profile_image.is_some()),
                "Add a profile photo",
            ),
        };

        if complete {
            weighted += weight;
        } else {
            missing_sections.push(section);
        }
        sections.push(SectionProgress {
            section,
            status: if complete {
                SectionStatus::Complete
            } else {
                SectionStatus::Missing
            },
            entry_count,
            recommendation: (!complete).then(|| recommendation.to_string()),
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let completion = if total_weight > 0.0 {
        (weighted / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ProgressReport {
        completion,
        sections,
        missing_sections,
        ready_to_export: document.personal_info().is_complete(),
    }
}
