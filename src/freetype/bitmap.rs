use crate::pixmap::{map_for_read, Blending, Color, Format, Pixmap, StagedPixmap};

use super::engine::BitmapRecord;
use super::types::PixelMode;

/// Read-only view of a rasterized bitmap owned by a glyph or glyph slot.
///
/// Rows are stored `pitch.abs()` bytes apart. A negative pitch marks a
/// bottom-up bitmap; rows are still read in storage order.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    rows: u32,
    width: u32,
    pitch: i32,
    num_grays: u32,
    pixel_mode: u32,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// # Safety
    ///
    /// `record.buffer` must stay readable for `record.buffer_len()` bytes and
    /// unmodified for `'a`.
    pub(crate) unsafe fn from_record(record: BitmapRecord) -> Self {
        let len = if record.rows == 0 { 0 } else { record.buffer_len() };
        Self {
            rows: record.rows,
            width: record.width,
            pitch: record.pitch,
            num_grays: record.num_grays,
            pixel_mode: record.pixel_mode,
            data: unsafe { map_for_read(record.buffer, len) },
        }
    }

    /// Wraps bytes already in memory. `data` must hold `rows * |pitch|` bytes.
    pub fn from_slice(
        rows: u32,
        width: u32,
        pitch: i32,
        pixel_mode: PixelMode,
        data: &'a [u8],
    ) -> Self {
        let expected = rows as usize * pitch.unsigned_abs() as usize;
        debug_assert!(data.len() >= expected, "bitmap data shorter than rows * |pitch|");
        Self {
            rows,
            width,
            pitch,
            num_grays: match pixel_mode {
                PixelMode::Gray => 256,
                PixelMode::Gray2 => 4,
                PixelMode::Gray4 => 16,
                _ => 0,
            },
            pixel_mode: pixel_mode.to_raw(),
            data: &data[..expected.min(data.len())],
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn pitch(&self) -> i32 {
        self.pitch
    }

    pub fn num_gray(&self) -> u32 {
        self.num_grays
    }

    pub fn pixel_mode(&self) -> PixelMode {
        PixelMode::from_raw(self.pixel_mode)
    }

    /// Raw pixel bytes. Empty for a bitmap without rows, such as a space.
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// Converts into a pixmap of `format`, tinted with `color`.
    ///
    /// Coverage values other than 0 and 255 are mapped through
    /// `a * (coverage / 255) ^ gamma`. A plain white 8-bit gray bitmap without
    /// row padding and with a gamma of 1 is copied byte for byte into an
    /// [`Format::Alpha`] pixmap.
    pub fn to_pixmap(&self, format: Format, color: Color, gamma: f32) -> Pixmap {
        let pixmap = self.coverage_pixmap(color, gamma);
        if pixmap.format() == format {
            return pixmap;
        }

        log::trace!(
            "converting {}x{} glyph pixmap {} -> {}",
            self.width,
            self.rows,
            pixmap.format(),
            format
        );
        let mut converted = Pixmap::new(pixmap.width(), pixmap.height(), format);
        converted.set_blending(Blending::None);
        converted.draw_pixmap(&pixmap, 0, 0);
        converted.set_blending(Blending::SourceOver);
        pixmap.dispose();
        converted
    }

    /// The intermediate pixmap: [`Format::Alpha`] on the copy path,
    /// [`Format::Rgba8888`] otherwise.
    fn coverage_pixmap(&self, color: Color, gamma: f32) -> Pixmap {
        let width = self.width as usize;
        let rows = self.rows as usize;
        let row_bytes = self.pitch.unsigned_abs() as usize;
        let mode = self.pixel_mode();

        let staged = if color == Color::WHITE
            && mode == PixelMode::Gray
            && row_bytes == width
            && gamma == 1.0
        {
            let mut staged = StagedPixmap::new(Pixmap::new(self.width, self.rows, Format::Alpha));
            let dst = staged.pixels_mut();
            let len = dst.len().min(self.data.len());
            dst[..len].copy_from_slice(&self.data[..len]);
            staged
        } else {
            let mut staged =
                StagedPixmap::new(Pixmap::new(self.width, self.rows, Format::Rgba8888));
            if width > 0 && rows > 0 && row_bytes > 0 {
                let rgba = color.rgba8888();
                let mut dst_row = vec![0u32; width];
                let src_rows = self.data.chunks(row_bytes);
                let dst_rows = staged.pixels_mut().chunks_exact_mut(width * 4);
                for (src_row, dst) in src_rows.zip(dst_rows) {
                    if mode == PixelMode::Mono {
                        unpack_mono(src_row, rgba, &mut dst_row);
                    } else {
                        blend_coverage(src_row, rgba, gamma, &mut dst_row);
                    }
                    for px in dst_row.iter_mut() {
                        *px = px.to_be();
                    }
                    dst.copy_from_slice(bytemuck::cast_slice(&dst_row[..]));
                }
            }
            staged
        };
        staged.into_pixmap()
    }
}

/// One bit per pixel, most significant bit first.
fn unpack_mono(src: &[u8], rgba: u32, dst: &mut [u32]) {
    for (x, px) in dst.iter_mut().enumerate() {
        let byte = src.get(x / 8).copied().unwrap_or(0);
        *px = if byte & (0x80 >> (x % 8)) != 0 { rgba } else { 0 };
    }
}

fn blend_coverage(src: &[u8], rgba: u32, gamma: f32, dst: &mut [u32]) {
    let rgb = rgba & 0xffff_ff00;
    let a = rgba & 0xff;
    for (x, px) in dst.iter_mut().enumerate() {
        *px = match src.get(x).copied().unwrap_or(0) {
            0 => rgb,
            255 => rgb | a,
            coverage => {
                let alpha = a as f32 * (coverage as f32 / 255.0).powf(gamma);
                rgb | (alpha.round() as u32).min(255)
            }
        };
    }
}
