use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};

use super::RenderError;
use crate::entities::resume::StructuredResume;

pub const DEFAULT_TEMPLATE: &str = "template_modern.html";

/// Renders the structured record into one of the HTML template variants.
///
/// Template identifiers are untrusted input; every render first checks the
/// identifier against the allow-list derived from the template directory's
/// current contents.
pub struct TemplateRenderer {
    tera: Tera,
    dir: PathBuf,
}

impl TemplateRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let dir = dir.into();
        let glob = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&glob)?;
        Ok(TemplateRenderer { tera, dir })
    }

    /// File names present in the template directory right now. Listed per
    /// request so a deployed template shows up without a restart.
    pub fn allowed_templates(&self) -> BTreeSet<String> {
        list_template_files(&self.dir)
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed_templates().contains(name)
    }

    pub fn render(
        &self,
        template: &str,
        data: &StructuredResume,
        preview: bool,
    ) -> Result<String, RenderError> {
        if !self.is_allowed(template) {
            return Err(RenderError::TemplateNotAllowed(template.to_string()));
        }

        let mut context = Context::new();
        context.insert("data", data);
        context.insert("preview", &preview);
        Ok(self.tera.render(template, &context)?)
    }
}

fn list_template_files(dir: &Path) -> BTreeSet<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return BTreeSet::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".html"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn renderer_with(templates: &[(&str, &str)]) -> (tempfile::TempDir, TemplateRenderer) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in templates {
            fs::write(dir.path().join(name), body).unwrap();
        }
        let renderer = TemplateRenderer::new(dir.path()).unwrap();
        (dir, renderer)
    }

    #[test]
    fn renders_structured_data_into_the_template() {
        let (_dir, renderer) = renderer_with(&[(
            "template_modern.html",
            "<h1>{{ data.full_name }}</h1>{% if preview %}<em>preview</em>{% endif %}",
        )]);
        let data = StructuredResume {
            full_name: "Jane Doe".to_string(),
            ..StructuredResume::default()
        };
        let html = renderer.render("template_modern.html", &data, true).unwrap();
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains("<em>preview</em>"));
    }

    #[test]
    fn unknown_template_is_rejected_before_rendering() {
        let (_dir, renderer) = renderer_with(&[("template_modern.html", "ok")]);
        let err = renderer
            .render("../secrets.html", &StructuredResume::default(), false)
            .unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotAllowed(_)));
    }

    #[test]
    fn allow_list_reflects_directory_contents() {
        let (dir, renderer) = renderer_with(&[
            ("template_modern.html", "a"),
            ("template_classic.html", "b"),
            ("notes.txt", "not a template"),
        ]);
        let allowed = renderer.allowed_templates();
        assert!(allowed.contains("template_modern.html"));
        assert!(allowed.contains("template_classic.html"));
        assert!(!allowed.contains("notes.txt"));

        fs::remove_file(dir.path().join("template_classic.html")).unwrap();
        assert!(!renderer.is_allowed("template_classic.html"));
    }
}
