use std::collections::HashMap;

use ahash::RandomState;

use crate::freetype::{
    to_int, Engine, Face, KerningMode, Library, LineCap, LineJoin, LoadFlags, RenderMode, Result,
    Stroker,
};
use crate::pixmap::{Color, Format, Pixmap};

/// How glyphs are rasterized and converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub size_px: u32,
    pub color: Color,
    pub gamma: f32,
    pub format: Format,
    /// 1-bit rendering instead of anti-aliased coverage.
    pub mono: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size_px: crate::constants::DEFAULT_SIZE_PX,
            color: Color::WHITE,
            gamma: crate::constants::DEFAULT_GAMMA,
            format: Format::Rgba8888,
            mono: false,
        }
    }
}

/// Outline stroke applied before rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSettings {
    /// Border width in pixels.
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    /// Keep the inside border instead of the outside one.
    pub inside: bool,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            width: 0.0,
            cap: LineCap::Round,
            join: LineJoin::Round,
            miter_limit: crate::constants::DEFAULT_MITER_LIMIT,
            inside: false,
        }
    }
}

/// A converted glyph ready for compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGlyph {
    pub character: char,
    pub pixmap: Pixmap,
    /// Offset from the pen position to the left edge of the pixmap.
    pub left: i32,
    /// Offset from the baseline up to the top edge of the pixmap.
    pub top: i32,
    /// Horizontal advance in whole pixels.
    pub advance: i32,
}

struct GlyphStroker<E: Engine> {
    stroker: Stroker<E>,
    inside: bool,
}

/// Turns characters into pixmaps: load, optionally stroke, rasterize and
/// convert.
///
/// Results are cached per character. A character that failed once is cached
/// as missing and not attempted again.
pub struct GlyphRasterizer<E: Engine> {
    face: Face<E>,
    stroker: Option<GlyphStroker<E>>,
    settings: RenderSettings,
    cache: HashMap<char, Option<RenderedGlyph>, RandomState>,
}

impl<E: Engine> GlyphRasterizer<E> {
    /// Sizes `face` and prepares a stroker if `stroke` has a positive width.
    pub fn new(
        library: &Library<E>,
        mut face: Face<E>,
        settings: RenderSettings,
        stroke: Option<StrokeSettings>,
    ) -> Result<Self> {
        face.set_pixel_sizes(0, settings.size_px)?;

        let stroker = match stroke {
            Some(stroke) if stroke.width > 0.0 => {
                let mut stroker = library.create_stroker()?;
                stroker.set(
                    (stroke.width * 64.0).round() as i64,
                    stroke.cap,
                    stroke.join,
                    (stroke.miter_limit * 65536.0) as i64,
                );
                Some(GlyphStroker {
                    stroker,
                    inside: stroke.inside,
                })
            }
            _ => None,
        };

        Ok(Self {
            face,
            stroker,
            settings,
            cache: HashMap::default(),
        })
    }

    pub fn face(&self) -> &Face<E> {
        &self.face
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Distance between baselines in pixels.
    pub fn line_height(&self) -> i32 {
        to_int(self.face.size_metrics().height) as i32
    }

    pub fn ascender(&self) -> i32 {
        to_int(self.face.size_metrics().ascender) as i32
    }

    /// Kerning between two characters in pixels, `0` without kerning data.
    pub fn kerning(&self, left: char, right: char) -> i32 {
        if !self.face.has_kerning() {
            return 0;
        }
        let left = self.face.char_index(left as u32);
        let right = self.face.char_index(right as u32);
        if left == 0 || right == 0 {
            return 0;
        }
        (self.face.kerning(left, right, KerningMode::Default) >> 6) as i32
    }

    /// Rasterizes `character`, bypassing the cache.
    pub fn rasterize(&mut self, character: char) -> Result<RenderedGlyph> {
        let (load_flags, render_mode) = if self.settings.mono {
            (LoadFlags::TARGET_MONO, RenderMode::Mono)
        } else {
            (LoadFlags::DEFAULT, RenderMode::Normal)
        };

        self.face.load_char(character as u32, load_flags)?;
        let slot = self.face.glyph()?;
        let advance = to_int(slot.advance_x()) as i32;
        let mut outline = slot.get_glyph()?;

        if let Some(stroke) = &self.stroker {
            outline = outline.stroke_border(&stroke.stroker, stroke.inside)?;
        }
        let glyph = outline.to_bitmap(render_mode)?;

        let bitmap = glyph.bitmap();
        let settings = &self.settings;
        let pixmap = bitmap.to_pixmap(settings.format, settings.color, settings.gamma);
        log::trace!(
            "rasterized {:?}: {}x{} {:?}",
            character,
            bitmap.width(),
            bitmap.rows(),
            bitmap.pixel_mode()
        );

        Ok(RenderedGlyph {
            character,
            pixmap,
            left: glyph.left(),
            top: glyph.top(),
            advance,
        })
    }

    /// Cached rasterization. `None` if the glyph could not be rendered.
    pub fn glyph(&mut self, character: char) -> Option<&RenderedGlyph> {
        if !self.cache.contains_key(&character) {
            let rendered = match self.rasterize(character) {
                Ok(glyph) => Some(glyph),
                Err(e) => {
                    log::warn!("Failed to rasterize {:?}: {}", character, e);
                    None
                }
            };
            self.cache.insert(character, rendered);
        }
        self.cache.get(&character).and_then(Option::as_ref)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drops cached glyphs, e.g. after changing colors.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn set_color(&mut self, color: Color) {
        if self.settings.color != color {
            self.settings.color = color;
            self.clear_cache();
        }
    }
}
