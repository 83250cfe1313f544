use bitflags::bitflags;

bitflags! {
    /// Face-wide capability flags reported by the engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FaceFlags: u32 {
        const SCALABLE = 1 << 0;
        const FIXED_SIZES = 1 << 1;
        const FIXED_WIDTH = 1 << 2;
        const SFNT = 1 << 3;
        const HORIZONTAL = 1 << 4;
        const VERTICAL = 1 << 5;
        const KERNING = 1 << 6;
        const FAST_GLYPHS = 1 << 7;
        const MULTIPLE_MASTERS = 1 << 8;
        const GLYPH_NAMES = 1 << 9;
        const EXTERNAL_STREAM = 1 << 10;
        const HINTER = 1 << 11;
        const CID_KEYED = 1 << 12;
        const TRICKY = 1 << 13;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u32 {
        const ITALIC = 1 << 0;
        const BOLD = 1 << 1;
    }
}

bitflags! {
    /// Flags for [`Face::load_glyph`](super::Face::load_glyph).
    ///
    /// The `TARGET_*` values occupy bits 16-19 and are mutually exclusive.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LoadFlags: u32 {
        const NO_SCALE = 0x1;
        const NO_HINTING = 0x2;
        const RENDER = 0x4;
        const NO_BITMAP = 0x8;
        const VERTICAL_LAYOUT = 0x10;
        const FORCE_AUTOHINT = 0x20;
        const CROP_BITMAP = 0x40;
        const PEDANTIC = 0x80;
        const IGNORE_GLOBAL_ADVANCE_WIDTH = 0x200;
        const NO_RECURSE = 0x400;
        const IGNORE_TRANSFORM = 0x800;
        const MONOCHROME = 0x1000;
        const LINEAR_DESIGN = 0x2000;
        const NO_AUTOHINT = 0x8000;

        const TARGET_LIGHT = 0x10000;
        const TARGET_MONO = 0x20000;
        const TARGET_LCD = 0x30000;
        const TARGET_LCD_V = 0x40000;
    }
}

impl LoadFlags {
    pub const DEFAULT: LoadFlags = LoadFlags::empty();
    pub const TARGET_NORMAL: LoadFlags = LoadFlags::empty();
}

/// Native encoding of a rasterized bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelMode {
    None,
    /// 1 bit per pixel, most significant bit first.
    Mono,
    /// 8 bits of coverage per pixel.
    Gray,
    Gray2,
    Gray4,
    Lcd,
    LcdV,
}

impl PixelMode {
    /// Unknown codes (e.g. BGRA from newer engines) map to `None`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Mono,
            2 => Self::Gray,
            3 => Self::Gray2,
            4 => Self::Gray4,
            5 => Self::Lcd,
            6 => Self::LcdV,
            _ => Self::None,
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Mono => 1,
            Self::Gray => 2,
            Self::Gray2 => 3,
            Self::Gray4 => 4,
            Self::Lcd => 5,
            Self::LcdV => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    #[default]
    Normal,
    Light,
    Mono,
    Lcd,
    LcdV,
}

impl RenderMode {
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Light => 1,
            Self::Mono => 2,
            Self::Lcd => 3,
            Self::LcdV => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KerningMode {
    #[default]
    Default,
    Unfitted,
    Unscaled,
}

impl KerningMode {
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Default => 0,
            Self::Unfitted => 1,
            Self::Unscaled => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Butt => 0,
            Self::Round => 1,
            Self::Square => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    /// Alias of `MiterVariable` in the engine.
    Miter,
    MiterFixed,
}

impl LineJoin {
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Round => 0,
            Self::Bevel => 1,
            Self::Miter => 2,
            Self::MiterFixed => 3,
        }
    }
}

/// Glyph image format, a four character tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphFormat(pub u32);

impl GlyphFormat {
    pub const NONE: GlyphFormat = GlyphFormat(0);
    pub const COMPOSITE: GlyphFormat = GlyphFormat(tag(b'c', b'o', b'm', b'p'));
    pub const BITMAP: GlyphFormat = GlyphFormat(tag(b'b', b'i', b't', b's'));
    pub const OUTLINE: GlyphFormat = GlyphFormat(tag(b'o', b'u', b't', b'l'));
    pub const PLOTTER: GlyphFormat = GlyphFormat(tag(b'p', b'l', b'o', b't'));
}

/// Character map encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Encoding(pub u32);

impl Encoding {
    pub const NONE: Encoding = Encoding(0);
    pub const MS_SYMBOL: Encoding = Encoding(tag(b's', b'y', b'm', b'b'));
    pub const UNICODE: Encoding = Encoding(tag(b'u', b'n', b'i', b'c'));
    pub const SJIS: Encoding = Encoding(tag(b's', b'j', b'i', b's'));
    pub const GB2312: Encoding = Encoding(tag(b'g', b'b', b' ', b' '));
    pub const BIG5: Encoding = Encoding(tag(b'b', b'i', b'g', b'5'));
    pub const WANSUNG: Encoding = Encoding(tag(b'w', b'a', b'n', b's'));
    pub const JOHAB: Encoding = Encoding(tag(b'j', b'o', b'h', b'a'));
    pub const ADOBE_STANDARD: Encoding = Encoding(tag(b'A', b'D', b'O', b'B'));
    pub const ADOBE_EXPERT: Encoding = Encoding(tag(b'A', b'D', b'B', b'E'));
    pub const ADOBE_CUSTOM: Encoding = Encoding(tag(b'A', b'D', b'B', b'C'));
    pub const ADOBE_LATIN_1: Encoding = Encoding(tag(b'l', b'a', b't', b'1'));
    pub const OLD_LATIN_2: Encoding = Encoding(tag(b'l', b'a', b't', b'2'));
    pub const APPLE_ROMAN: Encoding = Encoding(tag(b'a', b'r', b'm', b'n'));
}

const fn tag(a: u8, b: u8, c: u8, d: u8) -> u32 {
    ((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8) | (d as u32)
}

/// Rounds a 26.6 fixed point value up to whole pixels.
#[inline]
pub fn to_int(value: i64) -> i64 {
    ((value + 63) & -64) >> 6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_int_rounds_up() {
        assert_eq!(to_int(0), 0);
        assert_eq!(to_int(1), 1);
        assert_eq!(to_int(64), 1);
        assert_eq!(to_int(65), 2);
        assert_eq!(to_int(-64), -1);
    }

    #[test]
    fn test_encoding_tags() {
        assert_eq!(Encoding::UNICODE.0, 0x756e_6963);
        assert_eq!(GlyphFormat::OUTLINE.0, 0x6f75_746c);
    }

    #[test]
    fn test_pixel_mode_raw() {
        for raw in 0..=6 {
            assert_eq!(PixelMode::from_raw(raw).to_raw(), raw);
        }
        assert_eq!(PixelMode::from_raw(7), PixelMode::None);
    }

    #[test]
    fn test_load_flags_targets() {
        let flags = LoadFlags::NO_HINTING | LoadFlags::TARGET_MONO;
        assert_eq!(flags.bits(), 0x20002);
        assert!(LoadFlags::DEFAULT.is_empty());
    }
}
