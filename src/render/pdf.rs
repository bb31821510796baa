use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use super::{qr::qr_image, wrap::split_text_to_lines, RenderError};
use crate::entities::resume::StructuredResume;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_X_MM: f32 = 15.0;
const TOP_Y_MM: f32 = 282.0;
const BOTTOM_Y_MM: f32 = 25.0;

const WRAP_COLS: usize = 90;
const DESC_WRAP_COLS: usize = 100;

const QR_SIZE_MM: f32 = 30.0;

/// Serializes the structured record into a paginated A4 PDF using direct
/// canvas layout: absolute text placement with a running vertical cursor,
/// greedy word-wrap at a fixed column limit, and a page break whenever the
/// cursor falls below the bottom margin.
pub fn generate_pdf(data: &StructuredResume) -> Result<Vec<u8>, RenderError> {
    let mut canvas = Canvas::new(&data.display_title())?;

    canvas.text(&data.full_name, 16.0, true);
    canvas.advance(4.0);
    if !data.title.is_empty() {
        canvas.text(&data.title, 10.0, false);
        canvas.advance(5.0);
    }
    canvas.advance(4.0);

    canvas.text(format!("Email: {}", data.email).trim_end(), 9.0, false);
    canvas.advance(5.0);
    canvas.text(format!("Phone: {}", data.phone).trim_end(), 9.0, false);
    canvas.advance(5.0);
    if !data.website.is_empty() {
        canvas.text(&format!("Website: {}", data.website), 9.0, false);
        canvas.advance(5.0);
    }
    if !data.linkedin.is_empty() {
        canvas.text(&format!("Linkedin: {}", data.linkedin), 9.0, false);
        canvas.advance(5.0);
    }

    canvas.heading("Profile");
    canvas.wrapped(&data.summary, WRAP_COLS, 0.0);
    canvas.advance(4.0);

    canvas.heading("Skills");
    canvas.wrapped(&data.skills.join(", "), WRAP_COLS, 0.0);
    canvas.advance(4.0);

    canvas.heading("Experience");
    for entry in &data.experience {
        canvas.ensure_room(12.0);
        canvas.text(&entry.role, 9.0, false);
        canvas.text_at(
            &format!("{} | {}", entry.company, entry.dates),
            8.0,
            false,
            110.0,
        );
        canvas.advance(5.0);
        canvas.wrapped(&entry.desc, DESC_WRAP_COLS, 6.0);
        canvas.advance(2.0);
    }
    canvas.advance(4.0);

    canvas.heading("Education");
    for entry in &data.education {
        canvas.ensure_room(6.0);
        canvas.text(
            &format!("{} - {} ({})", entry.degree, entry.school, entry.years),
            9.0,
            false,
        );
        canvas.advance(6.0);
    }

    if let Some(payload) = data.qr_payload() {
        canvas.draw_qr(payload)?;
    }

    canvas.finish()
}

/// Running-cursor wrapper around a printpdf document. The cursor tracks the
/// baseline of the next line in millimetres from the page bottom.
struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    y: f32,
}

impl Canvas {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "content",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Canvas {
            doc,
            layer,
            font,
            font_bold,
            y: TOP_Y_MM,
        })
    }

    /// Starts a new page when fewer than `needed` millimetres remain above
    /// the bottom margin.
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_Y_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_Y_MM;
        }
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        self.text_at(text, size, bold, 0.0);
    }

    fn text_at(&mut self, text: &str, size: f32, bold: bool, x_offset: f32) {
        self.ensure_room(0.0);
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer
            .use_text(text, size, Mm(MARGIN_X_MM + x_offset), Mm(self.y), font);
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(14.0);
        self.text(text, 11.0, true);
        self.advance(6.0);
    }

    fn wrapped(&mut self, text: &str, cols: usize, x_offset: f32) {
        for line in split_text_to_lines(text, cols) {
            self.ensure_room(4.0);
            self.text_at(&line, 9.0, false, x_offset);
            self.advance(4.0);
        }
    }

    /// Draws the QR image in the lower-right corner of the current page.
    fn draw_qr(&mut self, payload: &str) -> Result<(), RenderError> {
        let image = qr_image(payload)?;
        let pixels = image.width() as f32;
        // Physical size is pixels / dpi inches; solve for the dpi that maps
        // the rendered module grid onto the fixed display square.
        let dpi = pixels * 25.4 / QR_SIZE_MM;
        Image::from_dynamic_image(&image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(PAGE_WIDTH_MM - QR_SIZE_MM - 10.0)),
                translate_y: Some(Mm(20.0)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.doc
            .save(&mut BufWriter::new(&mut bytes))
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(bytes)
    }
}
