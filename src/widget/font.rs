//! Font outlines and text measurement
//!
//! [`OutlineFont`] turns a run of text into absolute outline commands using
//! the glyph shapes, horizontal advances and pair kerning of a TrueType or
//! OpenType font. WOFF containers are not supported.

use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use super::path::{BoundingBox, DrawCommand};
use crate::errors::{WidgetError, WidgetResult};

/// Outline of a laid out run of text together with its exact extent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphPath {
    pub commands: Vec<DrawCommand>,
    pub bounding_box: BoundingBox,
}

impl GlyphPath {
    pub fn from_commands(commands: Vec<DrawCommand>) -> Self {
        let bounding_box = BoundingBox::from_commands(&commands);
        Self {
            commands,
            bounding_box,
        }
    }
}

/// Measures and outlines text.
///
/// `x` is the pen start and `y` the baseline; outlines grow upwards into
/// negative `y` as in SVG user space. Implementations must be pure.
pub trait FontMetrics: Send + Sync {
    fn get_path(&self, text: &str, x: f64, y: f64, size: f64) -> GlyphPath;
}

/// A parsed TrueType/OpenType font held in memory
#[derive(Clone)]
pub struct OutlineFont {
    name: String,
    data: Arc<[u8]>,
    units_per_em: f64,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl OutlineFont {
    pub fn load(path: &Path) -> WidgetResult<Self> {
        let name = path.display().to_string();
        let data = std::fs::read(path).map_err(|e| WidgetError::font_load(&name, e.to_string()))?;
        Self::from_bytes(name, data)
    }

    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> WidgetResult<Self> {
        let name = name.into();
        let units_per_em = {
            let face = Face::parse(&data, 0).map_err(|e| WidgetError::font_load(&name, e.to_string()))?;
            face.units_per_em()
        };

        debug!(font = %name, units_per_em, "Loaded font");

        Ok(Self {
            name,
            data: Arc::from(data),
            units_per_em: f64::from(units_per_em),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FontMetrics for OutlineFont {
    fn get_path(&self, text: &str, x: f64, y: f64, size: f64) -> GlyphPath {
        // Parsing only reads table headers; the bytes were validated on load
        let Ok(face) = Face::parse(&self.data, 0) else {
            return GlyphPath::default();
        };

        let scale = size / self.units_per_em;
        let mut sink = OutlineSink {
            commands: Vec::new(),
            origin_x: x,
            origin_y: y,
            scale,
        };
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
            if let Some(left) = previous {
                sink.origin_x += kerning(&face, left, glyph) * scale;
            }

            face.outline_glyph(glyph, &mut sink);
            sink.origin_x += f64::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
            previous = Some(glyph);
        }

        GlyphPath::from_commands(sink.commands)
    }
}

fn kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> f64 {
    face.tables()
        .kern
        .and_then(|kern| {
            kern.subtables
                .into_iter()
                .filter(|subtable| subtable.horizontal && !subtable.variable)
                .find_map(|subtable| subtable.glyphs_kerning(left, right))
        })
        .map(f64::from)
        .unwrap_or(0.0)
}

/// Collects outline callbacks in font units as scaled, y-flipped commands
struct OutlineSink {
    commands: Vec<DrawCommand>,
    origin_x: f64,
    origin_y: f64,
    scale: f64,
}

impl OutlineSink {
    fn tx(&self, x: f32) -> f64 {
        self.origin_x + f64::from(x) * self.scale
    }

    fn ty(&self, y: f32) -> f64 {
        self.origin_y - f64::from(y) * self.scale
    }
}

impl OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.tx(x), self.ty(y));
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.tx(x), self.ty(y));
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.tx(x1), self.ty(y1), self.tx(x), self.ty(y));
        self.commands.push(DrawCommand::QuadTo { x1, y1, x, y });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.tx(x1), self.ty(y1));
        let (x2, y2) = (self.tx(x2), self.ty(y2));
        let (x, y) = (self.tx(x), self.ty(y));
        self.commands.push(DrawCommand::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    fn close(&mut self) {
        self.commands.push(DrawCommand::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGULAR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/regular.ttf");

    fn regular() -> OutlineFont {
        OutlineFont::load(Path::new(REGULAR)).unwrap()
    }

    #[test]
    fn test_outlines_sit_above_the_baseline() {
        let path = regular().get_path("Hello", 0.0, 0.0, 16.0);

        assert!(!path.commands.is_empty());
        assert!(path.bounding_box.width() > 0.0);
        assert!(path.bounding_box.y1 < 0.0);
        assert!(path.bounding_box.y1 > -16.0);
    }

    #[test]
    fn test_width_scales_with_size() {
        let font = regular();
        let small = font.get_path("Widget", 0.0, 0.0, 16.0).bounding_box.width();
        let large = font.get_path("Widget", 0.0, 0.0, 32.0).bounding_box.width();

        assert!((large - 2.0 * small).abs() < 1e-6);
    }

    #[test]
    fn test_origin_translates_outline() {
        let font = regular();
        let at_origin = font.get_path("A", 0.0, 0.0, 16.0).bounding_box;
        let moved = font.get_path("A", 10.0, 18.0, 16.0).bounding_box;

        assert!((moved.x1 - at_origin.x1 - 10.0).abs() < 1e-9);
        assert!((moved.y1 - at_origin.y1 - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_whitespace_has_no_outline() {
        let path = regular().get_path("   ", 0.0, 0.0, 16.0);

        assert!(path.commands.is_empty());
        assert_eq!(path.bounding_box, BoundingBox::default());
    }

    #[test]
    fn test_missing_file_is_font_load_error() {
        let err = OutlineFont::load(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, WidgetError::FontLoad { .. }));
    }

    #[test]
    fn test_corrupt_bytes_are_rejected() {
        let err = OutlineFont::from_bytes("garbage", b"not a font".to_vec()).unwrap_err();
        assert!(matches!(err, WidgetError::FontLoad { .. }));
    }
}
