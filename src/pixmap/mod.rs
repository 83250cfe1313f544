//! CPU pixel surfaces that glyph bitmaps are converted into.

pub mod bridge;
mod color;

use std::fmt;
use std::str::FromStr;

pub use bridge::{map_for_read, StagedPixmap};
pub use color::Color;

/// Pixel layout of a [`Pixmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Alpha,
    LuminanceAlpha,
    Rgb565,
    Rgba4444,
    Rgb888,
    Rgba8888,
}

impl Format {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Format::Alpha => 1,
            Format::LuminanceAlpha | Format::Rgb565 | Format::Rgba4444 => 2,
            Format::Rgb888 => 3,
            Format::Rgba8888 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Alpha => "Alpha",
            Format::LuminanceAlpha => "LuminanceAlpha",
            Format::Rgb565 => "RGB565",
            Format::Rgba4444 => "RGBA4444",
            Format::Rgb888 => "RGB888",
            Format::Rgba8888 => "RGBA8888",
        }
    }

    /// Decodes one pixel into `0xRRGGBBAA`.
    fn decode(self, px: &[u8]) -> u32 {
        match self {
            Format::Alpha => 0xffff_ff00 | px[0] as u32,
            Format::LuminanceAlpha => {
                let l = px[0] as u32;
                (l << 24) | (l << 16) | (l << 8) | px[1] as u32
            }
            Format::Rgb565 => {
                let v = u16::from_le_bytes([px[0], px[1]]) as u32;
                let r = (v >> 11) & 0x1f;
                let g = (v >> 5) & 0x3f;
                let b = v & 0x1f;
                (((r << 3) | (r >> 2)) << 24)
                    | (((g << 2) | (g >> 4)) << 16)
                    | (((b << 3) | (b >> 2)) << 8)
                    | 0xff
            }
            Format::Rgba4444 => {
                let v = u16::from_le_bytes([px[0], px[1]]) as u32;
                let r = ((v >> 12) & 0xf) * 17;
                let g = ((v >> 8) & 0xf) * 17;
                let b = ((v >> 4) & 0xf) * 17;
                let a = (v & 0xf) * 17;
                (r << 24) | (g << 16) | (b << 8) | a
            }
            Format::Rgb888 => {
                ((px[0] as u32) << 24) | ((px[1] as u32) << 16) | ((px[2] as u32) << 8) | 0xff
            }
            Format::Rgba8888 => u32::from_be_bytes([px[0], px[1], px[2], px[3]]),
        }
    }

    /// Encodes `0xRRGGBBAA` into one pixel.
    fn encode(self, rgba: u32, px: &mut [u8]) {
        let [r, g, b, a] = rgba.to_be_bytes();
        match self {
            Format::Alpha => px[0] = a,
            Format::LuminanceAlpha => {
                px[0] = luminance(r, g, b);
                px[1] = a;
            }
            Format::Rgb565 => {
                let [r, g, b] = [r, g, b].map(u16::from);
                let v = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
                px.copy_from_slice(&v.to_le_bytes());
            }
            Format::Rgba4444 => {
                let [r, g, b, a] = [r, g, b, a].map(u16::from);
                let v = ((r >> 4) << 12) | ((g >> 4) << 8) | ((b >> 4) << 4) | (a >> 4);
                px.copy_from_slice(&v.to_le_bytes());
            }
            Format::Rgb888 => px.copy_from_slice(&[r, g, b]),
            Format::Rgba8888 => px.copy_from_slice(&[r, g, b, a]),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pixmap format: {0}")]
pub struct UnknownFormat(String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "alpha" => Ok(Format::Alpha),
            "luminancealpha" => Ok(Format::LuminanceAlpha),
            "rgb565" => Ok(Format::Rgb565),
            "rgba4444" => Ok(Format::Rgba4444),
            "rgb888" => Ok(Format::Rgb888),
            "rgba8888" => Ok(Format::Rgba8888),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32) as u8
}

/// How [`Pixmap::draw_pixmap`] combines source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blending {
    /// Straight copy.
    None,
    #[default]
    SourceOver,
}

/// A width x height grid of pixels in one [`Format`], rows top to bottom with
/// no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    format: Format,
    blending: Blending,
    pixels: Vec<u8>,
}

impl Pixmap {
    /// Creates a pixmap cleared to zero.
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            blending: Blending::default(),
            pixels: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn blending(&self) -> Blending {
        self.blending
    }

    pub fn set_blending(&mut self, blending: Blending) {
        self.blending = blending;
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Overwrites the pixel store. `pixels` must be exactly as long as it.
    pub fn put_pixels(&mut self, pixels: &[u8]) {
        self.pixels.copy_from_slice(pixels);
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel())
    }

    /// Pixel at (x, y) as `0xRRGGBBAA`, `0` outside the pixmap.
    pub fn get_pixel(&self, x: u32, y: u32) -> u32 {
        match self.offset(x, y) {
            Some(at) => self
                .format
                .decode(&self.pixels[at..at + self.format.bytes_per_pixel()]),
            None => 0,
        }
    }

    /// Stores `0xRRGGBBAA` at (x, y), ignoring blending. Out of range is a no-op.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: u32) {
        if let Some(at) = self.offset(x, y) {
            let bpp = self.format.bytes_per_pixel();
            self.format.encode(rgba, &mut self.pixels[at..at + bpp]);
        }
    }

    /// Draws `src` with its top-left corner at (x, y), converting formats and
    /// honoring this pixmap's blending mode.
    pub fn draw_pixmap(&mut self, src: &Pixmap, x: i32, y: i32) {
        for sy in 0..src.height {
            let dy = y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let color = src.get_pixel(sx, sy);
                let color = match self.blending {
                    Blending::None => color,
                    Blending::SourceOver => {
                        source_over(color, self.get_pixel(dx as u32, dy as u32))
                    }
                };
                self.set_pixel(dx as u32, dy as u32, color);
            }
        }
    }

    pub fn dispose(self) {}
}

/// Composites `src` over `dst`, both `0xRRGGBBAA`.
fn source_over(src: u32, dst: u32) -> u32 {
    let [sr, sg, sb, sa] = src.to_be_bytes().map(u32::from);
    let [dr, dg, db, da] = dst.to_be_bytes().map(u32::from);

    let da = da - (da * sa) / 255;
    let a = da + sa;
    if a == 0 {
        return 0;
    }
    let r = (dr * da + sr * sa) / a;
    let g = (dg * da + sg * sa) / a;
    let b = (db * da + sb * sa) / a;
    (r << 24) | (g << 16) | (b << 8) | a
}
