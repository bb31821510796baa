pub mod docx;
pub mod form;
pub mod pdf;
pub mod qr;
pub mod template;
pub mod text;
pub mod wrap;

use std::error::Error as _;

use derive_more::Display;

use crate::errors::AppError;

/// Errors raised while turning a structured record into bytes.
#[derive(Debug, Display)]
pub enum RenderError {
    #[display("PDF generation failed: {_0}")]
    Pdf(String),

    #[display("DOCX generation failed: {_0}")]
    Docx(String),

    #[display("QR encoding failed: {_0}")]
    Qr(String),

    #[display("Template rendering failed: {_0}")]
    Template(String),

    #[display("Template not in allow-list: {_0}")]
    TemplateNotAllowed(String),

    #[display("IO error: {_0}")]
    Io(std::io::Error),
}

impl From<tera::Error> for RenderError {
    fn from(err: tera::Error) -> Self {
        // Tera nests the useful cause one level down.
        let detail = err
            .source()
            .map(|s| format!("{}: {}", err, s))
            .unwrap_or_else(|| err.to_string());
        RenderError::Template(detail)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::TemplateNotAllowed(name) => AppError::InvalidTemplate(name),
            other => AppError::RenderFailed(other.to_string()),
        }
    }
}
