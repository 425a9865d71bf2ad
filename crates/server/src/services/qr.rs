//! Printable QR code for the ordering page.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qrcode::QrCode;
use qrcode::render::svg;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// Render a URL as an SVG QR code wrapped in a `data:` URL, ready to drop
/// into an `<img>` tag or print.
///
/// # Errors
///
/// Returns `QrError::Encode` if the URL is too long to fit a QR code.
pub fn ordering_page_qr(url: &str) -> Result<String, QrError> {
    let code = QrCode::new(url.as_bytes())?;
    let image = code
        .render::<svg::Color<'_>>()
        .min_dimensions(256, 256)
        .build();

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image)
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_produces_svg_data_url() {
        let data_url = ordering_page_qr("http://localhost:4000/order").unwrap();
        assert!(data_url.starts_with("data:image/svg+xml;base64,"));

        let b64 = data_url.trim_start_matches("data:image/svg+xml;base64,");
        let svg = String::from_utf8(STANDARD.decode(b64).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }
}
