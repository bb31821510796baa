use std::collections::HashMap;

use serde::Deserialize;

use crate::entities::resume::{EducationEntry, ExperienceEntry, StructuredResume};

/// Highest experience slot read from a submission (`exp_*_1` .. `exp_*_5`).
pub const MAX_EXPERIENCE_ENTRIES: usize = 5;
/// Highest education slot read from a submission (`edu_*_1` .. `edu_*_3`).
pub const MAX_EDUCATION_ENTRIES: usize = 3;

/// A submitted form value: browsers send repeated fields as lists, JavaScript
/// clients send plain strings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FormValue {
    One(String),
    Many(Vec<String>),
}

/// Raw submission payload: field name to value, before any normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawForm(pub HashMap<String, FormValue>);

impl RawForm {
    /// Builds a form from repeated key/value pairs, collapsing duplicates of
    /// the same key into a multi-value field.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map: HashMap<String, FormValue> = HashMap::new();
        for (key, value) in pairs {
            match map.remove(&key) {
                None => {
                    map.insert(key, FormValue::One(value));
                }
                Some(FormValue::One(first)) => {
                    map.insert(key, FormValue::Many(vec![first, value]));
                }
                Some(FormValue::Many(mut values)) => {
                    values.push(value);
                    map.insert(key, FormValue::Many(values));
                }
            }
        }
        RawForm(map)
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.0.get(key)
    }

    /// Reads a field as a scalar. A singleton multi-value field collapses to
    /// its sole element; a longer list yields its first element.
    pub fn scalar(&self, key: &str) -> &str {
        match self.0.get(key) {
            Some(FormValue::One(value)) => value,
            Some(FormValue::Many(values)) => values.first().map(String::as_str).unwrap_or(""),
            None => "",
        }
    }

    fn trimmed(&self, key: &str) -> String {
        self.scalar(key).trim().to_string()
    }
}

/// Converts a raw submission into the structured record. Pure: reads only the
/// given mapping, performs no validation beyond presence/emptiness.
pub fn form_to_structured(form: &RawForm) -> StructuredResume {
    let mut structured = StructuredResume {
        full_name: form.trimmed("full_name"),
        title: form.trimmed("title"),
        email: form.trimmed("email"),
        phone: form.trimmed("phone"),
        summary: form.trimmed("summary"),
        linkedin: form.trimmed("linkedin"),
        website: form.trimmed("website"),
        ..StructuredResume::default()
    };

    let photo_url = form.trimmed("photo_url");
    if !photo_url.is_empty() {
        structured.photo_url = Some(photo_url);
    }

    structured.skills = normalize_skills(form.get("skills"));

    for i in 1..=MAX_EXPERIENCE_ENTRIES {
        let entry = ExperienceEntry {
            company: form.trimmed(&format!("exp_company_{i}")),
            role: form.trimmed(&format!("exp_role_{i}")),
            dates: form.trimmed(&format!("exp_dates_{i}")),
            desc: form.trimmed(&format!("exp_desc_{i}")),
        };
        if entry.has_content() {
            structured.experience.push(entry);
        }
    }

    for i in 1..=MAX_EDUCATION_ENTRIES {
        let entry = EducationEntry {
            school: form.trimmed(&format!("edu_school_{i}")),
            degree: form.trimmed(&format!("edu_degree_{i}")),
            years: form.trimmed(&format!("edu_years_{i}")),
        };
        if entry.has_content() {
            structured.education.push(entry);
        }
    }

    structured
}

/// Skills arrive either as a list of strings or as one comma-separated
/// string. A singleton list collapses to its element first.
fn normalize_skills(value: Option<&FormValue>) -> Vec<String> {
    let collapsed = match value {
        None => return Vec::new(),
        Some(FormValue::Many(values)) if values.len() != 1 => {
            return values
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Some(FormValue::Many(values)) => values[0].as_str(),
        Some(FormValue::One(value)) => value.as_str(),
    };

    collapsed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> RawForm {
        RawForm::from_pairs(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn scalar_fields_are_trimmed_and_default_empty() {
        let structured = form_to_structured(&form(&[
            ("full_name", "  Jane Doe  "),
            ("email", "jane@x.com"),
        ]));
        assert_eq!(structured.full_name, "Jane Doe");
        assert_eq!(structured.email, "jane@x.com");
        assert_eq!(structured.phone, "");
        assert_eq!(structured.summary, "");
        assert!(structured.photo_url.is_none());
    }

    #[test]
    fn skills_from_comma_string_keep_order_and_drop_empties() {
        let structured = form_to_structured(&form(&[("skills", "a, b ,c,, ")]));
        assert_eq!(structured.skills, vec!["a", "b", "c"]);
    }

    #[test]
    fn skills_from_list_keep_order_and_drop_empties() {
        let raw = RawForm::from_pairs(vec![
            ("skills".to_string(), "Rust".to_string()),
            ("skills".to_string(), "  ".to_string()),
            ("skills".to_string(), " SQL ".to_string()),
        ]);
        let structured = form_to_structured(&raw);
        assert_eq!(structured.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn singleton_skills_list_collapses_to_comma_string() {
        let raw = RawForm(HashMap::from([(
            "skills".to_string(),
            FormValue::Many(vec!["Go, Python".to_string()]),
        )]));
        let structured = form_to_structured(&raw);
        assert_eq!(structured.skills, vec!["Go", "Python"]);
    }

    #[test]
    fn experience_entry_with_only_dates_is_dropped() {
        let structured = form_to_structured(&form(&[("exp_dates_1", "2020-2021")]));
        assert!(structured.experience.is_empty());
    }

    #[test]
    fn experience_entries_preserve_index_order() {
        let structured = form_to_structured(&form(&[
            ("exp_role_2", "Senior Engineer"),
            ("exp_company_2", "Beta"),
            ("exp_role_1", "Engineer"),
            ("exp_company_1", "Acme"),
            ("exp_dates_1", "2019"),
        ]));
        assert_eq!(structured.experience.len(), 2);
        assert_eq!(structured.experience[0].company, "Acme");
        assert_eq!(structured.experience[0].dates, "2019");
        assert_eq!(structured.experience[1].company, "Beta");
    }

    #[test]
    fn slots_beyond_the_fixed_range_are_ignored() {
        let structured = form_to_structured(&form(&[
            ("exp_role_6", "Ghost"),
            ("edu_school_4", "Ghost U"),
        ]));
        assert!(structured.experience.is_empty());
        assert!(structured.education.is_empty());
    }

    #[test]
    fn education_requires_school_or_degree() {
        let structured = form_to_structured(&form(&[
            ("edu_years_1", "2015-2019"),
            ("edu_school_2", "MIT"),
        ]));
        assert_eq!(structured.education.len(), 1);
        assert_eq!(structured.education[0].school, "MIT");
        assert_eq!(structured.education[0].years, "");
    }

    #[test]
    fn malformed_dates_are_kept_as_free_text() {
        let structured = form_to_structured(&form(&[
            ("exp_role_1", "Engineer"),
            ("exp_dates_1", "whenever it was"),
        ]));
        assert_eq!(structured.experience[0].dates, "whenever it was");
    }
}
