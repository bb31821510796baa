use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Pic, Run};

use super::{qr::qr_png, RenderError};
use crate::entities::resume::StructuredResume;

// Run sizes are half-points.
const NAME_SIZE: usize = 56;
const HEADING_SIZE: usize = 28;

// Display size of the embedded QR image, in EMU (914400 per inch).
const QR_SIZE_EMU: u32 = 2 * 914_400;

/// Serializes the structured record into a word-processing document. The
/// section set and ordering match the plain-text and PDF renderers; a QR code
/// for the preferred online profile goes on its own trailing page.
pub fn generate_docx(data: &StructuredResume) -> Result<Vec<u8>, RenderError> {
    let mut docx = Docx::new()
        .add_paragraph(heading(&data.full_name, NAME_SIZE));

    if !data.title.is_empty() {
        docx = docx.add_paragraph(body(&data.title));
    }

    docx = docx.add_paragraph(body(format!("Email: {}", data.email).trim_end()));
    docx = docx.add_paragraph(body(format!("Phone: {}", data.phone).trim_end()));
    if !data.website.is_empty() {
        docx = docx.add_paragraph(body(&format!("Website: {}", data.website)));
    }
    if !data.linkedin.is_empty() {
        docx = docx.add_paragraph(body(&format!("Linkedin: {}", data.linkedin)));
    }

    docx = docx
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("Profile", HEADING_SIZE))
        .add_paragraph(body(&data.summary));

    docx = docx
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("Skills", HEADING_SIZE))
        .add_paragraph(body(&data.skills.join(", ")));

    docx = docx
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("Experience", HEADING_SIZE));
    for entry in &data.experience {
        docx = docx
            .add_paragraph(body(&format!(
                "{} - {} | {}",
                entry.role, entry.company, entry.dates
            )))
            .add_paragraph(body(&entry.desc));
    }

    docx = docx
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading("Education", HEADING_SIZE));
    for entry in &data.education {
        docx = docx.add_paragraph(body(&format!(
            "{} - {} ({})",
            entry.degree, entry.school, entry.years
        )));
    }

    if let Some(payload) = data.qr_payload() {
        let png = qr_png(payload)?;
        let pic = Pic::new(&png).size(QR_SIZE_EMU, QR_SIZE_EMU);
        docx = docx
            .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
            .add_paragraph(heading("Scan this QR to view online:", HEADING_SIZE))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_image(pic)));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| RenderError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn heading(text: &str, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).size(size).bold())
}

fn body(text: impl AsRef<str>) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text.as_ref()))
}
