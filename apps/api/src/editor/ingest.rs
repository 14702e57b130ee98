//! Ingestion boundary: turns any externally supplied JSON value into a complete
//! `ResumeDocument`.
//!
//! The upload parser, the sample gallery and direct API loads all hand over data of
//! unknown shape. Normalization applies a fixed default table once, here, so the
//! rest of the editor can assume every field exists:
//!
//! | input                          | result                      |
//! |--------------------------------|-----------------------------|
//! | missing / null scalar          | `""`                        |
//! | numeric or boolean scalar      | its display form            |
//! | any other scalar shape         | `""`                        |
//! | missing / non-array collection | `[]`                        |
//! | non-object entry               | dropped                     |
//! | non-string skill               | dropped (numbers kept)      |
//! | description given as an array  | lines joined with `\n`      |
//!
//! Entry ids are never taken from the input; they are derived from position.

use serde::Serialize;
use serde_json::Value;

use crate::models::resume::{EducationEntry, EntryId, ExperienceEntry, ResumeDocument};

/// What normalization had to repair. Logged, never surfaced as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub missing_fields: Vec<String>,
    pub dropped_entries: usize,
    pub dropped_skills: usize,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.missing_fields.is_empty() && self.dropped_entries == 0 && self.dropped_skills == 0
    }
}

const SCALAR_KEYS: &[&str] = &["fullName", "email", "phone", "location", "linkedin", "summary"];

/// Normalizes `data` into a complete document.
///
/// Never fails: a non-object input yields an empty document.
pub fn normalize(data: &Value) -> (ResumeDocument, IngestReport) {
    let mut report = IngestReport::default();

    for key in SCALAR_KEYS {
        if data.get(key).map_or(true, Value::is_null) {
            report.missing_fields.push(key.to_string());
        }
    }

    let experience = entries(data, "experience", &mut report)
        .enumerate()
        .map(|(i, obj)| experience_from(i as EntryId, obj))
        .collect();
    let education = entries(data, "education", &mut report)
        .enumerate()
        .map(|(i, obj)| EducationEntry {
            id: i as EntryId,
            degree: text(obj.get("degree")),
            school: text(obj.get("school")),
            date: text(obj.get("date")),
            location: text(obj.get("location")),
        })
        .collect();
    let projects = entries(data, "projects", &mut report)
        .enumerate()
        .map(|(i, obj)| experience_from(i as EntryId, obj))
        .collect();

    let skills = match data.get("skills").and_then(Value::as_array) {
        Some(arr) => arr
            .iter()
            .filter_map(|v| {
                let skill = match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                };
                if skill.is_none() {
                    report.dropped_skills += 1;
                }
                skill
            })
            .collect(),
        None => Vec::new(),
    };

    let document = ResumeDocument {
        full_name: text(data.get("fullName")),
        email: text(data.get("email")),
        phone: text(data.get("phone")),
        location: text(data.get("location")),
        linkedin: text(data.get("linkedin")),
        summary: text(data.get("summary")),
        experience,
        education,
        skills,
        projects,
    };

    (document, report)
}

/// Object entries of the array at `key`; anything else in the array is counted and skipped.
fn entries<'a>(
    data: &'a Value,
    key: &str,
    report: &'a mut IngestReport,
) -> impl Iterator<Item = &'a Value> + 'a {
    data.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(move |v| {
            if v.is_object() {
                true
            } else {
                report.dropped_entries += 1;
                false
            }
        })
}

fn experience_from(id: EntryId, obj: &Value) -> ExperienceEntry {
    let description = match obj.get("description") {
        Some(Value::Array(lines)) => lines
            .iter()
            .map(|l| text(Some(l)))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => text(other),
    };

    ExperienceEntry {
        id,
        title: text(obj.get("title")),
        company: text(obj.get("company")),
        date: text(obj.get("date")),
        location: text(obj.get("location")),
        description,
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_yields_empty_document() {
        let (doc, report) = normalize(&json!({}));
        assert_eq!(doc, ResumeDocument::empty());
        assert_eq!(report.missing_fields.len(), SCALAR_KEYS.len());
    }

    #[test]
    fn test_non_object_input_yields_empty_document() {
        for input in [json!(null), json!("resume"), json!(42), json!([1, 2])] {
            let (doc, _) = normalize(&input);
            assert_eq!(doc, ResumeDocument::empty(), "input {input} should normalize to empty");
        }
    }

    #[test]
    fn test_only_full_name_supplied() {
        let (doc, _) = normalize(&json!({ "fullName": "Ana Li" }));
        assert_eq!(doc.full_name, "Ana Li");
        assert_eq!(doc.summary, "");
        assert!(doc.experience.is_empty());
        assert!(doc.skills.is_empty());
    }

    #[test]
    fn test_entry_ids_derive_from_position_not_input() {
        let (doc, _) = normalize(&json!({
            "experience": [
                { "id": 99, "title": "A" },
                { "id": 99, "title": "B" },
            ],
            "education": [{ "degree": "BSc" }],
        }));
        let ids: Vec<_> = doc.experience.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(doc.experience[1].title, "B");
        assert_eq!(doc.experience[1].company, "");
        assert_eq!(doc.education[0].id, 0);
        assert_eq!(doc.education[0].school, "");
    }

    #[test]
    fn test_malformed_entries_and_skills_are_dropped() {
        let (doc, report) = normalize(&json!({
            "experience": ["not an entry", { "title": "Kept" }, null],
            "skills": ["Rust", { "name": "bad" }, 3, null],
            "education": "should be a list",
        }));
        assert_eq!(doc.experience.len(), 1);
        assert_eq!(doc.experience[0].id, 0);
        assert_eq!(doc.skills, vec!["Rust".to_string(), "3".to_string()]);
        assert!(doc.education.is_empty());
        assert_eq!(report.dropped_entries, 2);
        assert_eq!(report.dropped_skills, 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_mistyped_scalars_become_text_or_empty() {
        let (doc, _) = normalize(&json!({
            "phone": 5551234567u64,
            "email": ["a@b.c"],
            "summary": null,
        }));
        assert_eq!(doc.phone, "5551234567");
        assert_eq!(doc.email, "");
        assert_eq!(doc.summary, "");
    }

    #[test]
    fn test_description_array_is_joined_into_lines() {
        let (doc, _) = normalize(&json!({
            "experience": [{ "description": ["• One", "", "• Two"] }],
        }));
        assert_eq!(doc.experience[0].description, "• One\n• Two");
    }

    #[test]
    fn test_complete_input_reports_clean() {
        let input = serde_json::to_value(ResumeDocument::starter()).unwrap();
        let (doc, report) = normalize(&input);
        assert!(report.is_clean());
        assert_eq!(doc.full_name, "John Doe");
        // ids are re-derived from position
        assert_eq!(doc.education[1].id, 1);
    }
}
