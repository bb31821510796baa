use crate::entities::resume::StructuredResume;

/// Serializes the structured record into a human-readable UTF-8 document.
/// Section order is fixed; a section with no content is omitted entirely,
/// header included. Every non-empty section ends with a blank separator line.
pub fn structured_to_plaintext(data: &StructuredResume) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !data.full_name.is_empty() || !data.title.is_empty() {
        if !data.full_name.is_empty() {
            lines.push(format!("Full name: {}", data.full_name));
        }
        if !data.title.is_empty() {
            lines.push(format!("Title: {}", data.title));
        }
        lines.push(String::new());
    }

    let has_contact = !data.email.is_empty()
        || !data.phone.is_empty()
        || !data.website.is_empty()
        || !data.linkedin.is_empty();
    if has_contact {
        lines.push("Contact:".to_string());
        if !data.email.is_empty() {
            lines.push(data.email.clone());
        }
        if !data.phone.is_empty() {
            lines.push(data.phone.clone());
        }
        if !data.website.is_empty() {
            lines.push(format!("Website: {}", data.website));
        }
        if !data.linkedin.is_empty() {
            lines.push(format!("Linkedin: {}", data.linkedin));
        }
        lines.push(String::new());
    }

    if !data.summary.is_empty() {
        lines.push("Summary:".to_string());
        lines.push(data.summary.clone());
        lines.push(String::new());
    }

    if !data.skills.is_empty() {
        lines.push("Skills:".to_string());
        lines.push(data.skills.join(","));
        lines.push(String::new());
    }

    if !data.experience.is_empty() {
        lines.push("Experience:".to_string());
        for entry in &data.experience {
            let mut line = match (entry.role.is_empty(), entry.company.is_empty()) {
                (false, false) => format!("{} at {}", entry.role, entry.company),
                (false, true) => entry.role.clone(),
                (true, false) => entry.company.clone(),
                (true, true) => String::new(),
            };
            if !entry.dates.is_empty() && !line.is_empty() {
                line.push_str(&format!(" ({})", entry.dates));
            }
            if !line.is_empty() {
                lines.push(line);
            }
            if !entry.desc.is_empty() {
                lines.push(entry.desc.clone());
            }
            lines.push(String::new());
        }
    }

    if !data.education.is_empty() {
        lines.push("Education:".to_string());
        for entry in &data.education {
            let mut line = match (entry.degree.is_empty(), entry.school.is_empty()) {
                (false, false) => format!("{} - {}", entry.degree, entry.school),
                (false, true) => entry.degree.clone(),
                (true, false) => entry.school.clone(),
                (true, true) => String::new(),
            };
            if !entry.years.is_empty() {
                line.push_str(&format!(" ({})", entry.years));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::resume::{EducationEntry, ExperienceEntry};

    fn sample() -> StructuredResume {
        StructuredResume {
            full_name: "Jane Doe".to_string(),
            title: "Engineer".to_string(),
            email: "jane@x.com".to_string(),
            phone: "555-0100".to_string(),
            summary: "Builds backends.".to_string(),
            skills: vec!["Go".to_string(), "Python".to_string()],
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                role: "Engineer".to_string(),
                dates: "2019-2023".to_string(),
                desc: "Shipped things.".to_string(),
            }],
            education: vec![EducationEntry {
                school: "MIT".to_string(),
                degree: "BSc".to_string(),
                years: "2015-2019".to_string(),
            }],
            ..StructuredResume::default()
        }
    }

    #[test]
    fn renders_all_sections_in_order() {
        let text = structured_to_plaintext(&sample());
        let expected = [
            "Full name: Jane Doe",
            "Title: Engineer",
            "Contact:",
            "jane@x.com",
            "555-0100",
            "Summary:",
            "Builds backends.",
            "Skills:",
            "Go,Python",
            "Experience:",
            "Engineer at Acme (2019-2023)",
            "Shipped things.",
            "Education:",
            "BSc - MIT (2015-2019)",
        ];
        let mut last = 0;
        for needle in expected {
            let pos = text[last..].find(needle).unwrap_or_else(|| {
                panic!("missing line {:?} after offset {} in:\n{}", needle, last, text)
            });
            last += pos + needle.len();
        }
    }

    #[test]
    fn empty_sections_omit_their_headers() {
        let data = StructuredResume {
            full_name: "Jane Doe".to_string(),
            ..StructuredResume::default()
        };
        let text = structured_to_plaintext(&data);
        assert!(text.contains("Full name: Jane Doe"));
        assert!(!text.contains("Contact:"));
        assert!(!text.contains("Skills:"));
        assert!(!text.contains("Experience:"));
        assert!(!text.contains("Education:"));
    }

    #[test]
    fn empty_record_renders_to_empty_text() {
        assert_eq!(structured_to_plaintext(&StructuredResume::default()), "");
    }

    #[test]
    fn website_and_linkedin_get_labelled_lines() {
        let data = StructuredResume {
            website: "https://jane.dev".to_string(),
            linkedin: "https://linkedin.com/in/jane".to_string(),
            ..StructuredResume::default()
        };
        let text = structured_to_plaintext(&data);
        assert!(text.contains("Website: https://jane.dev"));
        assert!(text.contains("Linkedin: https://linkedin.com/in/jane"));
    }

    #[test]
    fn desc_only_experience_entry_still_prints_description() {
        let data = StructuredResume {
            experience: vec![ExperienceEntry {
                desc: "Freelance work.".to_string(),
                ..ExperienceEntry::default()
            }],
            ..StructuredResume::default()
        };
        let text = structured_to_plaintext(&data);
        assert!(text.contains("Experience:"));
        assert!(text.contains("Freelance work."));
    }
}
