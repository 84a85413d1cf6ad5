//! Fonts and images loaded once at startup and shared read-only

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::font::{FontMetrics, OutlineFont};
use crate::config::AssetsConfig;
use crate::errors::{WidgetError, WidgetResult};

/// Image bytes ready to be inlined as a data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: String,
    pub base64: String,
}

impl EncodedImage {
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            base64: STANDARD.encode(bytes),
        }
    }

    pub fn load(path: &Path) -> WidgetResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| WidgetError::AssetLoad {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_bytes(mime_for_path(path), &bytes))
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// The three card backgrounds and the site logo
#[derive(Debug, Clone)]
pub struct WidgetImages {
    pub background: EncodedImage,
    pub dark_background: EncodedImage,
    pub inverted_background: EncodedImage,
    pub logo: EncodedImage,
}

#[derive(Clone)]
pub struct WidgetAssets {
    pub bold: Arc<dyn FontMetrics>,
    pub regular: Arc<dyn FontMetrics>,
    pub images: Arc<WidgetImages>,
}

impl WidgetAssets {
    pub fn new(bold: Arc<dyn FontMetrics>, regular: Arc<dyn FontMetrics>, images: WidgetImages) -> Self {
        Self {
            bold,
            regular,
            images: Arc::new(images),
        }
    }

    /// Reads every configured asset; any missing or unreadable file fails.
    pub fn load(config: &AssetsConfig) -> WidgetResult<Self> {
        let bold = OutlineFont::load(&config.bold_font)?;
        let regular = OutlineFont::load(&config.regular_font)?;

        let images = WidgetImages {
            background: EncodedImage::load(&config.background)?,
            dark_background: EncodedImage::load(&config.dark_background)?,
            inverted_background: EncodedImage::load(&config.inverted_background)?,
            logo: EncodedImage::load(&config.logo)?,
        };

        info!(
            bold_font = %bold.name(),
            regular_font = %regular.name(),
            "Loaded widget assets"
        );

        Ok(Self::new(Arc::new(bold), Arc::new(regular), images))
    }
}
