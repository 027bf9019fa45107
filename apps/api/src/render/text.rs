use std::fmt::Write;

use super::labels::labels;
use super::{date_range, education_detail, RenderOptions};
use crate::store::CvDocument;

/// Plain-text preview. Sections without content are left out entirely.
pub fn render_text(document: &CvDocument, options: RenderOptions) -> String {
    let labels = labels(options.locale);
    let info = document.personal_info();
    let mut out = String::new();

    let name = info.full_name.trim();
    out.push_str(if name.is_empty() {
        labels.name_placeholder
    } else {
        name
    });
    out.push('\n');

    let contact: Vec<&str> = [
        Some(info.email.as_str()).filter(|e| !e.trim().is_empty()),
        info.phone.as_deref(),
        info.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !contact.is_empty() {
        out.push_str(&contact.join(" | "));
        out.push('\n');
    }

    if let Some(summary) = &info.summary {
        section(&mut out, labels.summary);
        out.push_str(summary);
        out.push('\n');
    }

    if !document.experiences().is_empty() {
        section(&mut out, labels.experience);
        for exp in document.experiences() {
            let _ = writeln!(
                out,
                "{} — {}, {}",
                exp.position,
                exp.company,
                date_range(exp, labels)
            );
            if let Some(description) = &exp.description {
                let _ = writeln!(out, "    {description}");
            }
        }
    }

    if !document.education().is_empty() {
        section(&mut out, labels.education);
        for edu in document.education() {
            let _ = writeln!(
                out,
                "{} — {}, {}",
                edu.degree,
                edu.institution,
                education_detail(edu)
            );
        }
    }

    if !document.skills().is_empty() {
        section(&mut out, labels.skills);
        for skill in document.skills() {
            let _ = writeln!(out, "{} ({})", skill.name, skill.level.label(options.locale));
        }
    }

    out
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.chars().count()));
    out.push('\n');
}
