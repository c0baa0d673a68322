use std::fmt;

use anyhow::{Context, Result};
use clap::ValueEnum;
use eframe::egui;
use serde::{Deserialize, Serialize};

const QR_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Address encoded by the presentation QR code unless configured otherwise.
pub const DEFAULT_QR_URL: &str = "https://flutter-a096c.web.app/";

/// Size of the overlay in the top-right corner of the presenter.
pub const PRESENTATION_QR_SIZE: QrSize = QrSize::Xl;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QrSize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl QrSize {
    pub fn pixels(self) -> u32 {
        match self {
            Self::Sm => 100,
            Self::Md => 150,
            Self::Lg => 200,
            Self::Xl => 300,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sm" => Some(Self::Sm),
            "md" => Some(Self::Md),
            "lg" => Some(Self::Lg),
            "xl" => Some(Self::Xl),
            _ => None,
        }
    }

    fn dimensions(self) -> String {
        let px = self.pixels();
        format!("{px}x{px}")
    }
}

impl fmt::Display for QrSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
        };
        f.write_str(name)
    }
}

/// URL of a QR-code image encoding `data`.
pub fn qr_image_url(data: &str, size: QrSize) -> String {
    format!(
        "{QR_SERVICE}?size={}&data={}",
        size.dimensions(),
        urlencoding::encode(data)
    )
}

/// Download and decode the QR image for `data`.
pub fn fetch_qr_image(data: &str, size: QrSize) -> Result<egui::ColorImage> {
    let url = qr_image_url(data, size);
    log::debug!("fetching QR code from {url}");
    let bytes = ureq::get(&url)
        .call()
        .context("Failed to request QR code image")?
        .body_mut()
        .read_to_vec()
        .context("Failed to read QR code image")?;
    let rgba = image::load_from_memory(&bytes)
        .context("Failed to decode QR code image")?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_qr_url() {
        assert_eq!(
            qr_image_url(DEFAULT_QR_URL, QrSize::Md),
            "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=https%3A%2F%2Fflutter-a096c.web.app%2F"
        );
    }

    #[test]
    fn test_query_characters_are_encoded() {
        let url = qr_image_url("https://deck.example.com/?slide=3&lang=uk", QrSize::Xl);
        assert!(url.contains("size=300x300"));
        assert!(url.ends_with("data=https%3A%2F%2Fdeck.example.com%2F%3Fslide%3D3%26lang%3Duk"));
    }

    #[test]
    fn test_sizes() {
        assert_eq!(QrSize::Sm.pixels(), 100);
        assert_eq!(QrSize::Lg.pixels(), 200);
        assert_eq!(QrSize::from_name("xl"), Some(QrSize::Xl));
        assert_eq!(QrSize::from_name("huge"), None);
        assert_eq!(QrSize::default().to_string(), "md");
    }
}
