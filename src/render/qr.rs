use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::QrCode;

use super::RenderError;

const MODULE_PIXELS: u32 = 6;

/// Renders the payload as a greyscale QR image with a quiet zone, sized for
/// embedding at a fixed physical display size.
pub fn qr_image(payload: &str) -> Result<DynamicImage, RenderError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| RenderError::Qr(e.to_string()))?;
    let buffer = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .build();
    Ok(DynamicImage::ImageLuma8(buffer))
}

/// PNG-encoded QR image, for embedding into word-processing documents.
pub fn qr_png(payload: &str) -> Result<Vec<u8>, RenderError> {
    let image = qr_image(payload)?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| RenderError::Qr(e.to_string()))?;
    Ok(bytes)
}
