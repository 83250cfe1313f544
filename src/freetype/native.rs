//! [`Engine`] backed by the FreeType C library.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ptr;

use ahash::RandomState;
use freetype::ffi;

use super::engine::{
    BitmapGlyphRecord, BitmapRecord, Engine, FaceRecord, GlyphMetrics, MemoryFace, SizeMetrics,
    SlotRecord,
};
use super::handle::RawHandle;

/// FreeType with font bytes kept in engine-owned buffers.
///
/// Font data must outlive its face, so [`Engine::new_memory_face`] copies it
/// into a buffer addressed by the returned [`MemoryFace::buffer`] and keeps it
/// until [`Engine::free`] is called with that address.
#[derive(Debug, Default)]
pub struct FreeTypeEngine {
    last_error: Cell<i32>,
    font_data: RefCell<HashMap<RawHandle, Box<[u8]>, RandomState>>,
}

impl FreeTypeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `err` and reports whether the call succeeded.
    fn check(&self, err: ffi::FT_Error) -> bool {
        self.last_error.set(err as i32);
        err == 0
    }
}

fn bitmap_record(bitmap: &ffi::FT_Bitmap) -> BitmapRecord {
    BitmapRecord {
        rows: bitmap.rows as u32,
        width: bitmap.width as u32,
        pitch: bitmap.pitch as i32,
        num_grays: bitmap.num_grays as u32,
        pixel_mode: bitmap.pixel_mode as u32,
        buffer: bitmap.buffer as RawHandle,
    }
}

impl Engine for FreeTypeEngine {
    fn last_error_code(&self) -> i32 {
        self.last_error.get()
    }

    fn init_library(&self) -> RawHandle {
        let mut library: ffi::FT_Library = ptr::null_mut();
        let err = unsafe { ffi::FT_Init_FreeType(&mut library) };
        if self.check(err) {
            library as RawHandle
        } else {
            0
        }
    }

    unsafe fn done_library(&self, library: RawHandle) {
        let err = unsafe { ffi::FT_Done_FreeType(library as ffi::FT_Library) };
        self.check(err);
    }

    unsafe fn new_memory_face(
        &self,
        library: RawHandle,
        data: &[u8],
        face_index: i64,
    ) -> MemoryFace {
        // A zero-length box has no distinct address.
        let mut copy = vec![0u8; data.len().max(1)].into_boxed_slice();
        copy[..data.len()].copy_from_slice(data);
        let buffer = copy.as_ptr() as RawHandle;
        self.font_data.borrow_mut().insert(buffer, copy);

        let mut face: ffi::FT_Face = ptr::null_mut();
        let err = unsafe {
            ffi::FT_New_Memory_Face(
                library as ffi::FT_Library,
                buffer as *const ffi::FT_Byte,
                data.len() as _,
                face_index as _,
                &mut face,
            )
        };
        let face = if self.check(err) { face as RawHandle } else { 0 };
        MemoryFace { face, buffer }
    }

    unsafe fn free(&self, address: RawHandle) {
        if self.font_data.borrow_mut().remove(&address).is_none() {
            log::warn!("free of unknown font buffer {:#x}", address);
        }
    }

    unsafe fn done_face(&self, face: RawHandle) {
        let err = unsafe { ffi::FT_Done_Face(face as ffi::FT_Face) };
        self.check(err);
    }

    unsafe fn face_record(&self, face: RawHandle) -> FaceRecord {
        let rec = unsafe { &*(face as ffi::FT_Face) };
        FaceRecord {
            face_flags: rec.face_flags as u32,
            style_flags: rec.style_flags as u32,
            num_glyphs: rec.num_glyphs as i64,
            ascender: rec.ascender as i32,
            descender: rec.descender as i32,
            height: rec.height as i32,
            max_advance_width: rec.max_advance_width as i32,
            max_advance_height: rec.max_advance_height as i32,
            underline_position: rec.underline_position as i32,
            underline_thickness: rec.underline_thickness as i32,
        }
    }

    unsafe fn size_metrics(&self, face: RawHandle) -> SizeMetrics {
        let size = unsafe { (*(face as ffi::FT_Face)).size };
        if size.is_null() {
            return SizeMetrics::default();
        }
        let m = unsafe { &(*size).metrics };
        SizeMetrics {
            x_ppem: m.x_ppem as u32,
            y_ppem: m.y_ppem as u32,
            x_scale: m.x_scale as i64,
            y_scale: m.y_scale as i64,
            ascender: m.ascender as i64,
            descender: m.descender as i64,
            height: m.height as i64,
            max_advance: m.max_advance as i64,
        }
    }

    unsafe fn select_size(&self, face: RawHandle, strike_index: i32) -> bool {
        let err = unsafe { ffi::FT_Select_Size(face as ffi::FT_Face, strike_index as _) };
        self.check(err)
    }

    unsafe fn set_char_size(
        &self,
        face: RawHandle,
        char_width: i64,
        char_height: i64,
        horz_resolution: u32,
        vert_resolution: u32,
    ) -> bool {
        let err = unsafe {
            ffi::FT_Set_Char_Size(
                face as ffi::FT_Face,
                char_width as _,
                char_height as _,
                horz_resolution as _,
                vert_resolution as _,
            )
        };
        self.check(err)
    }

    unsafe fn set_pixel_sizes(&self, face: RawHandle, pixel_width: u32, pixel_height: u32) -> bool {
        let err = unsafe {
            ffi::FT_Set_Pixel_Sizes(face as ffi::FT_Face, pixel_width as _, pixel_height as _)
        };
        self.check(err)
    }

    unsafe fn load_glyph(&self, face: RawHandle, glyph_index: u32, load_flags: u32) -> bool {
        let err = unsafe {
            ffi::FT_Load_Glyph(face as ffi::FT_Face, glyph_index as _, load_flags as _)
        };
        self.check(err)
    }

    unsafe fn load_char(&self, face: RawHandle, char_code: u32, load_flags: u32) -> bool {
        let err =
            unsafe { ffi::FT_Load_Char(face as ffi::FT_Face, char_code as _, load_flags as _) };
        self.check(err)
    }

    unsafe fn char_index(&self, face: RawHandle, char_code: u32) -> u32 {
        unsafe { ffi::FT_Get_Char_Index(face as ffi::FT_Face, char_code as _) as u32 }
    }

    unsafe fn select_charmap(&self, face: RawHandle, encoding: u32) -> bool {
        let err = unsafe { ffi::FT_Select_Charmap(face as ffi::FT_Face, encoding as _) };
        self.check(err)
    }

    unsafe fn has_kerning(&self, face: RawHandle) -> bool {
        let flags = unsafe { (*(face as ffi::FT_Face)).face_flags };
        flags & ffi::FT_FACE_FLAG_KERNING != 0
    }

    unsafe fn kerning(&self, face: RawHandle, left: u32, right: u32, mode: u32) -> i64 {
        let mut vector = ffi::FT_Vector { x: 0, y: 0 };
        let err = unsafe {
            ffi::FT_Get_Kerning(face as ffi::FT_Face, left as _, right as _, mode as _, &mut vector)
        };
        if self.check(err) {
            vector.x as i64
        } else {
            0
        }
    }

    unsafe fn glyph_slot(&self, face: RawHandle) -> RawHandle {
        unsafe { (*(face as ffi::FT_Face)).glyph as RawHandle }
    }

    unsafe fn slot_record(&self, slot: RawHandle) -> SlotRecord {
        let rec = unsafe { &*(slot as ffi::FT_GlyphSlot) };
        let m = &rec.metrics;
        SlotRecord {
            metrics: GlyphMetrics {
                width: m.width as i64,
                height: m.height as i64,
                hori_bearing_x: m.horiBearingX as i64,
                hori_bearing_y: m.horiBearingY as i64,
                hori_advance: m.horiAdvance as i64,
                vert_bearing_x: m.vertBearingX as i64,
                vert_bearing_y: m.vertBearingY as i64,
                vert_advance: m.vertAdvance as i64,
            },
            linear_hori_advance: rec.linearHoriAdvance as i64,
            linear_vert_advance: rec.linearVertAdvance as i64,
            advance_x: rec.advance.x as i64,
            advance_y: rec.advance.y as i64,
            format: rec.format as u32,
            bitmap_left: rec.bitmap_left as i32,
            bitmap_top: rec.bitmap_top as i32,
        }
    }

    unsafe fn slot_bitmap(&self, slot: RawHandle) -> BitmapRecord {
        bitmap_record(unsafe { &(*(slot as ffi::FT_GlyphSlot)).bitmap })
    }

    unsafe fn render_glyph(&self, slot: RawHandle, render_mode: u32) -> bool {
        let err = unsafe { ffi::FT_Render_Glyph(slot as ffi::FT_GlyphSlot, render_mode as _) };
        self.check(err)
    }

    unsafe fn get_glyph(&self, slot: RawHandle) -> RawHandle {
        let mut glyph: ffi::FT_Glyph = ptr::null_mut();
        let err = unsafe { ffi::FT_Get_Glyph(slot as ffi::FT_GlyphSlot, &mut glyph) };
        if self.check(err) {
            glyph as RawHandle
        } else {
            0
        }
    }

    unsafe fn done_glyph(&self, glyph: RawHandle) {
        unsafe { ffi::FT_Done_Glyph(glyph as ffi::FT_Glyph) };
    }

    unsafe fn glyph_stroke_border(
        &self,
        glyph: RawHandle,
        stroker: RawHandle,
        inside: bool,
    ) -> RawHandle {
        let mut glyph = glyph as ffi::FT_Glyph;
        let err = unsafe {
            ffi::FT_Glyph_StrokeBorder(&mut glyph, stroker as ffi::FT_Stroker, inside as _, 1)
        };
        if self.check(err) {
            glyph as RawHandle
        } else {
            0
        }
    }

    unsafe fn glyph_to_bitmap(&self, glyph: RawHandle, render_mode: u32) -> RawHandle {
        let mut glyph = glyph as ffi::FT_Glyph;
        let err = unsafe {
            ffi::FT_Glyph_To_Bitmap(&mut glyph, render_mode as _, ptr::null_mut(), 1)
        };
        if self.check(err) {
            glyph as RawHandle
        } else {
            0
        }
    }

    unsafe fn bitmap_glyph(&self, glyph: RawHandle) -> BitmapGlyphRecord {
        let rec = unsafe { &*(glyph as ffi::FT_BitmapGlyph) };
        BitmapGlyphRecord {
            left: rec.left as i32,
            top: rec.top as i32,
            bitmap: bitmap_record(&rec.bitmap),
        }
    }

    unsafe fn stroker_new(&self, library: RawHandle) -> RawHandle {
        let mut stroker: ffi::FT_Stroker = ptr::null_mut();
        let err = unsafe { ffi::FT_Stroker_New(library as ffi::FT_Library, &mut stroker) };
        if self.check(err) {
            stroker as RawHandle
        } else {
            0
        }
    }

    unsafe fn stroker_set(
        &self,
        stroker: RawHandle,
        radius: i64,
        line_cap: u32,
        line_join: u32,
        miter_limit: i64,
    ) {
        unsafe {
            ffi::FT_Stroker_Set(
                stroker as ffi::FT_Stroker,
                radius as _,
                line_cap as _,
                line_join as _,
                miter_limit as _,
            )
        };
    }

    unsafe fn done_stroker(&self, stroker: RawHandle) {
        unsafe { ffi::FT_Stroker_Done(stroker as ffi::FT_Stroker) };
    }
}

impl Drop for FreeTypeEngine {
    fn drop(&mut self) {
        let leaked = self.font_data.get_mut().len();
        if leaked > 0 {
            log::warn!("{} font buffer(s) still owned by the engine at drop", leaked);
        }
    }
}
