use std::rc::Rc;

use super::engine::{Engine, FaceRecord, SizeMetrics};
use super::error::{Error, Result};
use super::glyph::GlyphSlot;
use super::handle::{FaceHandle, SlotHandle};
use super::library::LibraryContext;
use super::types::{Encoding, FaceFlags, KerningMode, LoadFlags, RenderMode, StyleFlags};

/// A font opened from memory.
///
/// Loading and rendering take `&mut self`: the face has a single glyph slot,
/// and any [`GlyphSlot`] or slot [`Bitmap`](super::Bitmap) borrowed from it
/// must be gone before the slot is overwritten.
pub struct Face<E: Engine> {
    handle: FaceHandle,
    ctx: Rc<LibraryContext<E>>,
}

impl<E: Engine> Face<E> {
    pub(crate) fn new(handle: FaceHandle, ctx: Rc<LibraryContext<E>>) -> Self {
        Self { handle, ctx }
    }

    pub(crate) fn context(&self) -> &Rc<LibraryContext<E>> {
        &self.ctx
    }

    pub fn handle(&self) -> FaceHandle {
        self.handle
    }

    fn record(&self) -> FaceRecord {
        unsafe { self.ctx.engine().face_record(self.handle.address()) }
    }

    pub fn face_flags(&self) -> FaceFlags {
        FaceFlags::from_bits_truncate(self.record().face_flags)
    }

    pub fn style_flags(&self) -> StyleFlags {
        StyleFlags::from_bits_truncate(self.record().style_flags)
    }

    pub fn num_glyphs(&self) -> i64 {
        self.record().num_glyphs
    }

    pub fn ascender(&self) -> i32 {
        self.record().ascender
    }

    pub fn descender(&self) -> i32 {
        self.record().descender
    }

    pub fn height(&self) -> i32 {
        self.record().height
    }

    pub fn max_advance_width(&self) -> i32 {
        self.record().max_advance_width
    }

    pub fn max_advance_height(&self) -> i32 {
        self.record().max_advance_height
    }

    pub fn underline_position(&self) -> i32 {
        self.record().underline_position
    }

    pub fn underline_thickness(&self) -> i32 {
        self.record().underline_thickness
    }

    pub fn size_metrics(&self) -> SizeMetrics {
        unsafe { self.ctx.engine().size_metrics(self.handle.address()) }
    }

    /// Selects a bitmap strike of a fixed-size font.
    pub fn select_size(&mut self, strike_index: i32) -> Result<()> {
        let engine = self.ctx.live()?;
        let ok = unsafe { engine.select_size(self.handle.address(), strike_index) };
        self.check_size(ok)
    }

    /// Sizes in 26.6 points, resolutions in dpi.
    pub fn set_char_size(
        &mut self,
        char_width: i64,
        char_height: i64,
        horz_resolution: u32,
        vert_resolution: u32,
    ) -> Result<()> {
        let engine = self.ctx.live()?;
        let ok = unsafe {
            engine.set_char_size(
                self.handle.address(),
                char_width,
                char_height,
                horz_resolution,
                vert_resolution,
            )
        };
        self.check_size(ok)
    }

    /// A zero dimension means "same as the other one".
    pub fn set_pixel_sizes(&mut self, pixel_width: u32, pixel_height: u32) -> Result<()> {
        let engine = self.ctx.live()?;
        let ok =
            unsafe { engine.set_pixel_sizes(self.handle.address(), pixel_width, pixel_height) };
        self.check_size(ok)
    }

    fn check_size(&self, ok: bool) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(Error::FaceSize(self.ctx.error_code()))
        }
    }

    pub fn load_glyph(&mut self, glyph_index: u32, flags: LoadFlags) -> Result<()> {
        let engine = self.ctx.live()?;
        let ok = unsafe { engine.load_glyph(self.handle.address(), glyph_index, flags.bits()) };
        if ok {
            Ok(())
        } else {
            Err(Error::GlyphLoad {
                index: glyph_index,
                code: self.ctx.error_code(),
            })
        }
    }

    /// Loads the glyph mapped to `char_code` in the active charmap.
    pub fn load_char(&mut self, char_code: u32, flags: LoadFlags) -> Result<()> {
        let engine = self.ctx.live()?;
        let ok = unsafe { engine.load_char(self.handle.address(), char_code, flags.bits()) };
        if ok {
            Ok(())
        } else {
            Err(Error::GlyphLoad {
                index: char_code,
                code: self.ctx.error_code(),
            })
        }
    }

    /// Rasterizes the glyph currently in the slot, in place.
    pub fn render_glyph(&mut self, mode: RenderMode) -> Result<()> {
        let slot = self.slot_handle()?;
        let ok = unsafe { self.ctx.live()?.render_glyph(slot.address(), mode.to_raw()) };
        if ok {
            Ok(())
        } else {
            Err(Error::GlyphRaster(self.ctx.error_code()))
        }
    }

    /// View of the most recently loaded glyph.
    pub fn glyph(&self) -> Result<GlyphSlot<'_, E>> {
        Ok(GlyphSlot::new(self, self.slot_handle()?))
    }

    fn slot_handle(&self) -> Result<SlotHandle> {
        let raw = unsafe { self.ctx.live()?.glyph_slot(self.handle.address()) };
        SlotHandle::from_raw(raw).ok_or_else(|| Error::GlyphExtract(self.ctx.error_code()))
    }

    /// Switches the charmap used by [`Face::load_char`] and [`Face::char_index`].
    pub fn select_charmap(&mut self, encoding: Encoding) -> Result<()> {
        let engine = self.ctx.live()?;
        if unsafe { engine.select_charmap(self.handle.address(), encoding.0) } {
            Ok(())
        } else {
            Err(Error::Charmap(self.ctx.error_code()))
        }
    }

    /// Glyph index for `char_code`, `0` if the face has no glyph for it.
    pub fn char_index(&self, char_code: u32) -> u32 {
        unsafe { self.ctx.engine().char_index(self.handle.address(), char_code) }
    }

    pub fn has_kerning(&self) -> bool {
        unsafe { self.ctx.engine().has_kerning(self.handle.address()) }
    }

    /// Horizontal kerning between two glyph indices.
    pub fn kerning(&self, left_glyph: u32, right_glyph: u32, mode: KerningMode) -> i64 {
        unsafe {
            self.ctx.engine().kerning(
                self.handle.address(),
                left_glyph,
                right_glyph,
                mode.to_raw(),
            )
        }
    }

    pub fn dispose(self) {}
}

impl<E: Engine> Drop for Face<E> {
    fn drop(&mut self) {
        self.ctx.release_face(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freetype::engine::FaceRecord;
    use crate::freetype::recording::{Call, GlyphImage, RecordingEngine};
    use crate::freetype::Library;

    fn library() -> (RecordingEngine, Library<RecordingEngine>) {
        let engine = RecordingEngine::new()
            .with_glyph('A', GlyphImage::gray(2, 2, vec![0, 64, 128, 255]))
            .with_kerning('A', 'A', -64);
        let library = Library::with_engine(engine.clone()).unwrap();
        (engine, library)
    }

    #[test]
    fn test_face_record_accessors() {
        let (engine, library) = library();
        engine.set_face_record(FaceRecord {
            face_flags: (FaceFlags::SCALABLE | FaceFlags::KERNING).bits(),
            style_flags: StyleFlags::BOLD.bits(),
            num_glyphs: 42,
            ascender: 1900,
            descender: -500,
            height: 2400,
            underline_position: -200,
            underline_thickness: 100,
            ..Default::default()
        });
        let face = library.new_memory_face(b"font", 0).unwrap();

        assert!(face.face_flags().contains(FaceFlags::SCALABLE));
        assert_eq!(face.style_flags(), StyleFlags::BOLD);
        assert_eq!(face.num_glyphs(), 42);
        assert_eq!(face.ascender(), 1900);
        assert_eq!(face.descender(), -500);
        assert_eq!(face.height(), 2400);
        assert_eq!(face.underline_position(), -200);
        assert_eq!(face.underline_thickness(), 100);
        assert!(face.has_kerning());
    }

    #[test]
    fn test_pixel_size_updates_metrics() {
        let (_engine, library) = library();
        let mut face = library.new_memory_face(b"font", 0).unwrap();

        face.set_pixel_sizes(0, 16).unwrap();
        let metrics = face.size_metrics();
        assert_eq!(metrics.y_ppem, 16);
        assert_eq!(metrics.height, 16 * 64);
    }

    #[test]
    fn test_size_failure_carries_code() {
        let (engine, library) = library();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        engine.fail(Call::SetPixelSizes, 23);

        assert_eq!(face.set_pixel_sizes(0, 16), Err(Error::FaceSize(23)));
    }

    #[test]
    fn test_load_char_unknown_glyph() {
        let (_engine, library) = library();
        let mut face = library.new_memory_face(b"font", 0).unwrap();

        assert!(face.load_char('A' as u32, LoadFlags::DEFAULT).is_ok());
        assert_eq!(face.char_index('A' as u32), 1);
        assert_eq!(face.char_index('Z' as u32), 0);
        assert!(matches!(
            face.load_glyph(99, LoadFlags::DEFAULT),
            Err(Error::GlyphLoad { index: 99, .. })
        ));
    }

    #[test]
    fn test_kerning_lookup() {
        let (_engine, library) = library();
        let face = library.new_memory_face(b"font", 0).unwrap();
        let a = face.char_index('A' as u32);

        assert_eq!(face.kerning(a, a, KerningMode::Default), -64);
        assert_eq!(face.kerning(a, 0, KerningMode::Default), 0);
    }

    #[test]
    fn test_render_glyph_fills_slot_bitmap() {
        let (_engine, library) = library();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        face.load_char('A' as u32, LoadFlags::DEFAULT).unwrap();

        assert_eq!(face.glyph().unwrap().bitmap().rows(), 0);

        face.render_glyph(RenderMode::Normal).unwrap();
        let slot = face.glyph().unwrap();
        let bitmap = slot.bitmap();
        assert_eq!(bitmap.rows(), 2);
        assert_eq!(bitmap.buffer(), &[0, 64, 128, 255]);
    }

    #[test]
    fn test_select_charmap() {
        let (engine, library) = library();
        let engine = engine.with_charmap(Encoding::MS_SYMBOL);
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        assert_eq!(face.char_index('A' as u32), 1);

        assert_eq!(face.select_charmap(Encoding::BIG5), Err(Error::Charmap(6)));
        assert_eq!(face.char_index('A' as u32), 1);

        face.select_charmap(Encoding::MS_SYMBOL).unwrap();
        assert_eq!(face.char_index('A' as u32), 0);
        face.select_charmap(Encoding::UNICODE).unwrap();
        assert_eq!(face.char_index('A' as u32), 1);
        assert_eq!(engine.calls(Call::SelectCharmap), 3);
    }

    #[test]
    fn test_face_after_library_stops_calling_engine() {
        let (engine, library) = library();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        face.load_char('A' as u32, LoadFlags::DEFAULT).unwrap();
        drop(library);

        assert_eq!(
            face.load_char('A' as u32, LoadFlags::DEFAULT),
            Err(Error::LibraryDisposed)
        );
        assert_eq!(face.set_pixel_sizes(0, 12), Err(Error::LibraryDisposed));
        assert_eq!(face.render_glyph(RenderMode::Normal), Err(Error::LibraryDisposed));
        assert!(matches!(face.glyph(), Err(Error::LibraryDisposed)));
        assert_eq!(engine.calls(Call::LoadChar), 1);
        assert_eq!(engine.calls(Call::SetPixelSizes), 0);
        assert_eq!(engine.calls(Call::RenderGlyph), 0);
    }

    #[test]
    #[should_panic(expected = "used after its library was disposed")]
    fn test_face_metrics_after_library_panic() {
        let (_engine, library) = library();
        let face = library.new_memory_face(b"font", 0).unwrap();
        drop(library);

        face.num_glyphs();
    }
}
