use std::fmt;
use std::rc::Rc;

use super::bitmap::Bitmap;
use super::engine::{Engine, GlyphMetrics, SlotRecord};
use super::error::{Error, Result};
use super::face::Face;
use super::handle::{GlyphHandle, SlotHandle};
use super::library::LibraryContext;
use super::stroker::Stroker;
use super::types::{GlyphFormat, RenderMode};

/// Non-owning view of a face's glyph slot.
///
/// Borrows the face, so it cannot outlive the next `load_*`/`render_glyph`.
pub struct GlyphSlot<'a, E: Engine> {
    face: &'a Face<E>,
    handle: SlotHandle,
}

impl<'a, E: Engine> GlyphSlot<'a, E> {
    pub(crate) fn new(face: &'a Face<E>, handle: SlotHandle) -> Self {
        Self { face, handle }
    }

    pub fn handle(&self) -> SlotHandle {
        self.handle
    }

    fn record(&self) -> SlotRecord {
        unsafe { self.face.context().engine().slot_record(self.handle.address()) }
    }

    pub fn metrics(&self) -> GlyphMetrics {
        self.record().metrics
    }

    pub fn linear_hori_advance(&self) -> i64 {
        self.record().linear_hori_advance
    }

    pub fn linear_vert_advance(&self) -> i64 {
        self.record().linear_vert_advance
    }

    pub fn advance_x(&self) -> i64 {
        self.record().advance_x
    }

    pub fn advance_y(&self) -> i64 {
        self.record().advance_y
    }

    pub fn format(&self) -> GlyphFormat {
        GlyphFormat(self.record().format)
    }

    /// Bitmap of the slot. Empty until the slot has been rendered.
    pub fn bitmap(&self) -> Bitmap<'a> {
        let record = unsafe { self.face.context().engine().slot_bitmap(self.handle.address()) };
        // The slot bitmap lives until the face is mutably borrowed again.
        unsafe { Bitmap::from_record(record) }
    }

    pub fn bitmap_left(&self) -> i32 {
        self.record().bitmap_left
    }

    pub fn bitmap_top(&self) -> i32 {
        self.record().bitmap_top
    }

    /// Extracts an owned copy of the slot's glyph.
    pub fn get_glyph(&self) -> Result<OutlineGlyph<E>> {
        let ctx = self.face.context();
        let raw = unsafe { ctx.live()?.get_glyph(self.handle.address()) };
        let handle =
            GlyphHandle::from_raw(raw).ok_or_else(|| Error::GlyphExtract(ctx.error_code()))?;
        Ok(OutlineGlyph(OwnedGlyph {
            handle,
            ctx: Rc::clone(ctx),
        }))
    }
}

/// Owned glyph handle. The address is swapped in place by transitions.
struct OwnedGlyph<E: Engine> {
    handle: GlyphHandle,
    ctx: Rc<LibraryContext<E>>,
}

impl<E: Engine> OwnedGlyph<E> {
    fn stroke_border(&mut self, stroker: &Stroker<E>, inside: bool) -> Result<()> {
        let engine = self.ctx.live()?;
        let raw = unsafe {
            engine.glyph_stroke_border(self.handle.address(), stroker.handle().address(), inside)
        };
        self.handle =
            GlyphHandle::from_raw(raw).ok_or_else(|| Error::GlyphStroke(self.ctx.error_code()))?;
        Ok(())
    }

    fn to_bitmap(&mut self, mode: RenderMode) -> Result<()> {
        let engine = self.ctx.live()?;
        let raw = unsafe { engine.glyph_to_bitmap(self.handle.address(), mode.to_raw()) };
        self.handle =
            GlyphHandle::from_raw(raw).ok_or_else(|| Error::GlyphRaster(self.ctx.error_code()))?;
        Ok(())
    }

    fn bitmap(&self) -> Bitmap<'_> {
        let record = unsafe { self.ctx.engine().bitmap_glyph(self.handle.address()) };
        unsafe { Bitmap::from_record(record.bitmap) }
    }

    fn left(&self) -> i32 {
        unsafe { self.ctx.engine().bitmap_glyph(self.handle.address()) }.left
    }

    fn top(&self) -> i32 {
        unsafe { self.ctx.engine().bitmap_glyph(self.handle.address()) }.top
    }
}

impl<E: Engine> Drop for OwnedGlyph<E> {
    fn drop(&mut self) {
        self.ctx.release_glyph(self.handle);
    }
}

/// A glyph extracted from a slot, still in vector form.
pub struct OutlineGlyph<E: Engine>(OwnedGlyph<E>);

impl<E: Engine> OutlineGlyph<E> {
    pub fn handle(&self) -> GlyphHandle {
        self.0.handle
    }

    /// Replaces the outline by its stroked border (or the inside of it).
    pub fn stroke_border(
        mut self,
        stroker: &Stroker<E>,
        inside: bool,
    ) -> std::result::Result<OutlineGlyph<E>, GlyphFailure<E>> {
        match self.0.stroke_border(stroker, inside) {
            Ok(()) => Ok(self),
            Err(error) => Err(GlyphFailure { glyph: self, error }),
        }
    }

    /// Rasterizes the outline. The outline is consumed: its native object is
    /// replaced by the bitmap one.
    pub fn to_bitmap(
        mut self,
        mode: RenderMode,
    ) -> std::result::Result<BitmapGlyph<E>, GlyphFailure<E>> {
        match self.0.to_bitmap(mode) {
            Ok(()) => Ok(BitmapGlyph(self.0)),
            Err(error) => Err(GlyphFailure { glyph: self, error }),
        }
    }

    pub fn dispose(self) {}
}

/// A rasterized glyph.
pub struct BitmapGlyph<E: Engine>(OwnedGlyph<E>);

impl<E: Engine> BitmapGlyph<E> {
    pub fn handle(&self) -> GlyphHandle {
        self.0.handle
    }

    pub fn bitmap(&self) -> Bitmap<'_> {
        self.0.bitmap()
    }

    pub fn left(&self) -> i32 {
        self.0.left()
    }

    pub fn top(&self) -> i32 {
        self.0.top()
    }

    pub fn dispose(self) {}
}

/// A failed glyph transition. The glyph is handed back untouched.
pub struct GlyphFailure<E: Engine> {
    pub glyph: OutlineGlyph<E>,
    pub error: Error,
}

impl<E: Engine> GlyphFailure<E> {
    pub fn into_parts(self) -> (OutlineGlyph<E>, Error) {
        (self.glyph, self.error)
    }
}

impl<E: Engine> fmt::Debug for GlyphFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphFailure")
            .field("glyph", &self.glyph.handle())
            .field("error", &self.error)
            .finish()
    }
}

impl<E: Engine> fmt::Display for GlyphFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<E: Engine> std::error::Error for GlyphFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<E: Engine> From<GlyphFailure<E>> for Error {
    fn from(failure: GlyphFailure<E>) -> Self {
        failure.error
    }
}

/// A glyph whose state is only known at runtime.
///
/// Bitmap accessors fail with [`Error::GlyphState`] until [`Glyph::to_bitmap`]
/// has succeeded.
pub struct Glyph<E: Engine> {
    inner: OwnedGlyph<E>,
    rendered: bool,
}

impl<E: Engine> Glyph<E> {
    pub fn handle(&self) -> GlyphHandle {
        self.inner.handle
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Only outlines can be stroked.
    pub fn stroke_border(&mut self, stroker: &Stroker<E>, inside: bool) -> Result<()> {
        if self.rendered {
            return Err(Error::GlyphState);
        }
        self.inner.stroke_border(stroker, inside)
    }

    /// Rasterizes the glyph. Does nothing if it already is a bitmap.
    pub fn to_bitmap(&mut self, mode: RenderMode) -> Result<()> {
        if self.rendered {
            return Ok(());
        }
        self.inner.to_bitmap(mode)?;
        self.rendered = true;
        Ok(())
    }

    pub fn bitmap(&self) -> Result<Bitmap<'_>> {
        self.ensure_rendered()?;
        Ok(self.inner.bitmap())
    }

    pub fn left(&self) -> Result<i32> {
        self.ensure_rendered()?;
        Ok(self.inner.left())
    }

    pub fn top(&self) -> Result<i32> {
        self.ensure_rendered()?;
        Ok(self.inner.top())
    }

    fn ensure_rendered(&self) -> Result<()> {
        if self.rendered {
            Ok(())
        } else {
            Err(Error::GlyphState)
        }
    }

    /// Typed view of the glyph, or the glyph back if it is still an outline.
    pub fn into_bitmap_glyph(self) -> std::result::Result<BitmapGlyph<E>, Glyph<E>> {
        if self.rendered {
            Ok(BitmapGlyph(self.inner))
        } else {
            Err(self)
        }
    }

    pub fn dispose(self) {}
}

impl<E: Engine> From<OutlineGlyph<E>> for Glyph<E> {
    fn from(glyph: OutlineGlyph<E>) -> Self {
        Self {
            inner: glyph.0,
            rendered: false,
        }
    }
}

impl<E: Engine> From<BitmapGlyph<E>> for Glyph<E> {
    fn from(glyph: BitmapGlyph<E>) -> Self {
        Self {
            inner: glyph.0,
            rendered: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freetype::recording::{Call, GlyphImage, RecordingEngine};
    use crate::freetype::types::{LineCap, LineJoin, LoadFlags};
    use crate::freetype::Library;

    fn setup() -> (RecordingEngine, Library<RecordingEngine>) {
        let engine = RecordingEngine::new()
            .with_glyph('g', GlyphImage::gray(3, 1, vec![10, 20, 30]).with_bearing(1, 7));
        let library = Library::with_engine(engine.clone()).unwrap();
        (engine, library)
    }

    fn outline(face: &mut Face<RecordingEngine>) -> OutlineGlyph<RecordingEngine> {
        face.load_char('g' as u32, LoadFlags::DEFAULT).unwrap();
        face.glyph().unwrap().get_glyph().unwrap()
    }

    #[test]
    fn test_bitmap_accessors_guarded_until_rendered() {
        let (_engine, library) = setup();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        let mut glyph = Glyph::from(outline(&mut face));

        assert_eq!(glyph.left().err(), Some(Error::GlyphState));
        assert_eq!(glyph.top().err(), Some(Error::GlyphState));
        assert!(matches!(glyph.bitmap(), Err(Error::GlyphState)));

        glyph.to_bitmap(RenderMode::Normal).unwrap();
        assert_eq!(glyph.left(), Ok(1));
        assert_eq!(glyph.top(), Ok(7));
        assert_eq!(glyph.bitmap().unwrap().buffer(), &[10, 20, 30]);
    }

    #[test]
    fn test_to_bitmap_replaces_handle_once() {
        let (engine, library) = setup();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        let mut glyph = Glyph::from(outline(&mut face));
        let before = glyph.handle();

        glyph.to_bitmap(RenderMode::Normal).unwrap();
        let after = glyph.handle();
        assert_ne!(before, after);

        glyph.to_bitmap(RenderMode::Normal).unwrap();
        assert_eq!(glyph.handle(), after);
        assert_eq!(engine.calls(Call::ToBitmap), 1);

        drop(glyph);
        assert_eq!(engine.calls(Call::DoneGlyph), 1);
        assert_eq!(engine.live_glyphs(), 0);
    }

    #[test]
    fn test_failed_rasterization_keeps_outline() {
        let (engine, library) = setup();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        let glyph = outline(&mut face);
        let handle = glyph.handle();
        engine.fail(Call::ToBitmap, 19);

        let failure = match glyph.to_bitmap(RenderMode::Normal) {
            Ok(_) => panic!("rasterization should fail"),
            Err(failure) => failure,
        };
        let (glyph, error) = failure.into_parts();
        assert_eq!(error, Error::GlyphRaster(19));
        assert_eq!(glyph.handle(), handle);

        engine.succeed(Call::ToBitmap);
        let rendered = glyph.to_bitmap(RenderMode::Normal).unwrap();
        assert_eq!(rendered.bitmap().width(), 3);
    }

    #[test]
    fn test_stroke_border_swaps_identity() {
        let (engine, library) = setup();
        let mut stroker = library.create_stroker().unwrap();
        stroker.set(2 * 64, LineCap::Round, LineJoin::Round, 0);
        let mut face = library.new_memory_face(b"font", 0).unwrap();

        let glyph = outline(&mut face);
        let before = glyph.handle();
        let stroked = glyph.stroke_border(&stroker, false).unwrap();
        assert_ne!(stroked.handle(), before);
        assert_eq!(engine.live_glyphs(), 1);

        let rendered = stroked.to_bitmap(RenderMode::Normal).unwrap();
        let mut glyph = Glyph::from(rendered);
        assert_eq!(glyph.stroke_border(&stroker, false), Err(Error::GlyphState));
    }

    #[test]
    fn test_slot_metrics() {
        let (_engine, library) = setup();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        face.load_char('g' as u32, LoadFlags::DEFAULT).unwrap();

        let slot = face.glyph().unwrap();
        assert_eq!(slot.metrics().width, 3 * 64);
        assert_eq!(slot.format(), GlyphFormat::OUTLINE);
        assert_eq!(slot.bitmap_left(), 1);
        assert_eq!(slot.bitmap_top(), 7);
    }

    #[test]
    fn test_get_glyph_failure() {
        let (engine, library) = setup();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        face.load_char('g' as u32, LoadFlags::DEFAULT).unwrap();
        engine.fail(Call::GetGlyph, 36);

        let slot = face.glyph().unwrap();
        assert!(matches!(slot.get_glyph(), Err(Error::GlyphExtract(36))));
    }

    #[test]
    fn test_outline_after_library_is_handed_back() {
        let (engine, library) = setup();
        let mut face = library.new_memory_face(b"font", 0).unwrap();
        let glyph = outline(&mut face);
        drop(library);

        let (glyph, error) = match glyph.to_bitmap(RenderMode::Normal) {
            Ok(_) => panic!("library is gone"),
            Err(failure) => failure.into_parts(),
        };
        assert_eq!(error, Error::LibraryDisposed);
        drop(glyph);
        assert_eq!(engine.calls(Call::ToBitmap), 0);
        assert_eq!(engine.calls(Call::DoneGlyph), 0);
    }
}
