//! Print-ready HTML. The same markup is shown as the preview and handed to
//! the PDF renderer.

use std::borrow::Cow;
use std::fmt::Write;

use super::labels::labels;
use super::{date_range, education_detail, RenderOptions};
use crate::store::CvDocument;

const STYLE: &str = r#"
      body { font-family: 'Segoe UI', Arial, sans-serif; padding: 20px 25px; color: #2c3e50; background-color: #f9fafb; font-size: 13px; }
      h1 { font-size: 22px; font-weight: 700; margin: 8px 0 2px 0; }
      h2 { font-size: 16px; font-weight: 600; color: #2c3e50; border-bottom: 2px solid #3498db; display: inline-block; margin-bottom: 6px; }
      p { margin: 3px 0; }
      .header { text-align: center; margin-bottom: 18px; background-color: #ffffff; border-radius: 10px; padding: 16px 10px; }
      .photo { width: 95px; height: 95px; border-radius: 50%; object-fit: cover; border: 2px solid #3498db; margin-bottom: 10px; }
      .no-photo { width: 95px; height: 95px; border-radius: 50%; background: #ddd; text-align: center; line-height: 95px; color: #888; margin: auto; font-size: 12px; }
      .contact { color: #555; font-size: 12px; margin-top: 2px; }
      .section { background-color: #ffffff; border-radius: 10px; padding: 14px 16px; margin-bottom: 12px; }
      .item { margin-bottom: 6px; }
      .item strong { font-size: 13px; }
      .date { color: #7f8c8d; font-size: 12px; }
      .skill { display: inline-block; background-color: #ecf6fd; color: #2c3e50; margin: 3px 5px 3px 0; padding: 5px 10px; border-radius: 20px; border: 1px solid #3498db; font-size: 12px; }
"#;

/// Escapes text for element content and quoted attributes.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub fn render_html(document: &CvDocument, options: RenderOptions) -> String {
    let labels = labels(options.locale);
    let info = document.personal_info();
    let mut out = String::with_capacity(4096);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"{}\">\n  <head>\n    <meta charset=\"utf-8\" />\n    <title>{}</title>\n    <style>{STYLE}    </style>\n  </head>\n  <body>\n",
        options.locale.code(),
        escape(labels.document_title),
    );

    // Header: photo, name, contact lines.
    out.push_str("    <div class=\"header\">\n");
    match &info.profile_image {
        Some(image) => {
            let _ = writeln!(
                out,
                "      <img src=\"{}\" class=\"photo\" alt=\"\" />",
                escape(&image.data_uri())
            );
        }
        None => {
            let _ = writeln!(
                out,
                "      <div class=\"no-photo\">{}</div>",
                escape(labels.no_photo)
            );
        }
    }
    let name = info.full_name.trim();
    let name = if name.is_empty() {
        labels.name_placeholder
    } else {
        name
    };
    let _ = writeln!(out, "      <h1>{}</h1>", escape(name));
    let contacts = [
        Some(info.email.as_str()).filter(|e| !e.trim().is_empty()),
        info.phone.as_deref(),
        info.location.as_deref(),
    ];
    for contact in contacts.into_iter().flatten() {
        let _ = writeln!(out, "      <p class=\"contact\">{}</p>", escape(contact));
    }
    out.push_str("    </div>\n");

    if let Some(summary) = &info.summary {
        open_section(&mut out, labels.summary);
        let _ = writeln!(out, "      <p>{}</p>", escape(summary));
        close_section(&mut out);
    }

    if !document.experiences().is_empty() {
        open_section(&mut out, labels.experience);
        for exp in document.experiences() {
            let _ = write!(
                out,
                "      <div class=\"item\">\n        <strong>{}</strong> — {}<br/>\n        <span class=\"date\">{}</span>\n",
                escape(&exp.position),
                escape(&exp.company),
                escape(&date_range(exp, labels)),
            );
            if let Some(description) = &exp.description {
                let _ = writeln!(out, "        <p>{}</p>", escape(description));
            }
            out.push_str("      </div>\n");
        }
        close_section(&mut out);
    }

    if !document.education().is_empty() {
        open_section(&mut out, labels.education);
        for edu in document.education() {
            let _ = write!(
                out,
                "      <div class=\"item\">\n        <strong>{}</strong> — {}<br/>\n        <span class=\"date\">{}</span>\n      </div>\n",
                escape(&edu.degree),
                escape(&edu.institution),
                escape(&education_detail(edu)),
            );
        }
        close_section(&mut out);
    }

    if !document.skills().is_empty() {
        open_section(&mut out, labels.skills);
        for skill in document.skills() {
            let _ = writeln!(
                out,
                "      <span class=\"skill\">{} - {}</span>",
                escape(&skill.name),
                escape(skill.level.label(options.locale)),
            );
        }
        close_section(&mut out);
    }

    out.push_str("  </body>\n</html>\n");
    out
}

fn open_section(out: &mut String, title: &str) {
    let _ = writeln!(
        out,
        "    <div class=\"section\">\n      <h2>{}</h2>",
        escape(title)
    );
}

fn close_section(out: &mut String) {
    out.push_str("    </div>\n");
}
