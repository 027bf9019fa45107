use crate::models::Locale;

/// Fixed strings the renderer prints around user content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub document_title: &'static str,
    pub name_placeholder: &'static str,
    pub no_photo: &'static str,
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
    pub current: &'static str,
}

const ES: Labels = Labels {
    document_title: "Currículum",
    name_placeholder: "Nombre Completo",
    no_photo: "Sin foto",
    summary: "Resumen Profesional",
    experience: "Experiencia Laboral",
    education: "Educación",
    skills: "Habilidades",
    current: "Actual",
};

const EN: Labels = Labels {
    document_title: "Curriculum Vitae",
    name_placeholder: "Full Name",
    no_photo: "No photo",
    summary: "Professional Summary",
    experience: "Work Experience",
    education: "Education",
    skills: "Skills",
    current: "Current",
};

pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::Es => &ES,
        Locale::En => &EN,
    }
}
