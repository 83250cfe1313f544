//! The address-based boundary to the rasterization engine.
//!
//! Every native call takes integers or byte slices and answers with a raw
//! address (`0` on failure), a bool, or a plain record. The error code of the
//! most recent failing call is kept in a register read through
//! [`Engine::last_error_code`].

use super::handle::RawHandle;

/// Result of copying font bytes into engine-visible memory and opening a face
/// on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryFace {
    /// New face, or `0` if the engine rejected the data.
    pub face: RawHandle,
    /// Address of the copy of the font bytes, or `0` if none was made. The
    /// caller owns it in both the success and the failure case.
    pub buffer: RawHandle,
}

/// Face-wide values, in font units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceRecord {
    pub face_flags: u32,
    pub style_flags: u32,
    pub num_glyphs: i64,
    pub ascender: i32,
    pub descender: i32,
    pub height: i32,
    pub max_advance_width: i32,
    pub max_advance_height: i32,
    pub underline_position: i32,
    pub underline_thickness: i32,
}

/// Metrics of the active size. Scales are 16.16, distances 26.6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeMetrics {
    pub x_ppem: u32,
    pub y_ppem: u32,
    pub x_scale: i64,
    pub y_scale: i64,
    pub ascender: i64,
    pub descender: i64,
    pub height: i64,
    pub max_advance: i64,
}

/// Per-glyph metrics in 26.6 pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width: i64,
    pub height: i64,
    pub hori_bearing_x: i64,
    pub hori_bearing_y: i64,
    pub hori_advance: i64,
    pub vert_bearing_x: i64,
    pub vert_bearing_y: i64,
    pub vert_advance: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotRecord {
    pub metrics: GlyphMetrics,
    pub linear_hori_advance: i64,
    pub linear_vert_advance: i64,
    pub advance_x: i64,
    pub advance_y: i64,
    pub format: u32,
    pub bitmap_left: i32,
    pub bitmap_top: i32,
}

/// Raw description of a bitmap living in engine memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitmapRecord {
    pub rows: u32,
    pub width: u32,
    pub pitch: i32,
    pub num_grays: u32,
    pub pixel_mode: u32,
    /// Start of `rows * |pitch|` bytes, or `0` for an empty bitmap.
    pub buffer: RawHandle,
}

impl BitmapRecord {
    pub fn buffer_len(&self) -> usize {
        self.rows as usize * self.pitch.unsigned_abs() as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitmapGlyphRecord {
    pub left: i32,
    pub top: i32,
    pub bitmap: BitmapRecord,
}

/// A rasterization engine context.
///
/// One engine value backs exactly one [`Library`](super::Library). Engines keep
/// process-visible mutable state and are not expected to be `Sync`.
///
/// # Safety
///
/// Every method taking a handle requires that handle to be live: returned by
/// this engine, of the right kind, and not yet released through the matching
/// `done_*`/`free` call or replaced by a glyph transition. The resource
/// wrappers in this crate uphold that through ownership.
pub trait Engine {
    fn last_error_code(&self) -> i32;

    fn init_library(&self) -> RawHandle;
    unsafe fn done_library(&self, library: RawHandle);

    /// Copies `data` into memory the engine can address and opens face
    /// `face_index` of it.
    unsafe fn new_memory_face(
        &self,
        library: RawHandle,
        data: &[u8],
        face_index: i64,
    ) -> MemoryFace;
    /// Releases a buffer returned in [`MemoryFace::buffer`].
    unsafe fn free(&self, address: RawHandle);

    unsafe fn done_face(&self, face: RawHandle);
    unsafe fn face_record(&self, face: RawHandle) -> FaceRecord;
    unsafe fn size_metrics(&self, face: RawHandle) -> SizeMetrics;
    unsafe fn select_size(&self, face: RawHandle, strike_index: i32) -> bool;
    unsafe fn set_char_size(
        &self,
        face: RawHandle,
        char_width: i64,
        char_height: i64,
        horz_resolution: u32,
        vert_resolution: u32,
    ) -> bool;
    unsafe fn set_pixel_sizes(&self, face: RawHandle, pixel_width: u32, pixel_height: u32) -> bool;
    unsafe fn load_glyph(&self, face: RawHandle, glyph_index: u32, load_flags: u32) -> bool;
    unsafe fn load_char(&self, face: RawHandle, char_code: u32, load_flags: u32) -> bool;
    unsafe fn char_index(&self, face: RawHandle, char_code: u32) -> u32;
    /// Makes the face's charmap for `encoding` the active one.
    unsafe fn select_charmap(&self, face: RawHandle, encoding: u32) -> bool;
    unsafe fn has_kerning(&self, face: RawHandle) -> bool;
    unsafe fn kerning(&self, face: RawHandle, left: u32, right: u32, mode: u32) -> i64;
    /// The face's single glyph slot.
    unsafe fn glyph_slot(&self, face: RawHandle) -> RawHandle;

    unsafe fn slot_record(&self, slot: RawHandle) -> SlotRecord;
    unsafe fn slot_bitmap(&self, slot: RawHandle) -> BitmapRecord;
    unsafe fn render_glyph(&self, slot: RawHandle, render_mode: u32) -> bool;
    /// Extracts an owned copy of the slot's glyph.
    unsafe fn get_glyph(&self, slot: RawHandle) -> RawHandle;

    unsafe fn done_glyph(&self, glyph: RawHandle);
    /// Replaces `glyph` by its stroked border. On success the old handle is
    /// released by the engine and the new one returned; on failure `0` is
    /// returned and `glyph` is untouched.
    unsafe fn glyph_stroke_border(
        &self,
        glyph: RawHandle,
        stroker: RawHandle,
        inside: bool,
    ) -> RawHandle;
    /// Same replacement contract as [`Engine::glyph_stroke_border`]. A glyph that
    /// is already a bitmap is returned unchanged.
    unsafe fn glyph_to_bitmap(&self, glyph: RawHandle, render_mode: u32) -> RawHandle;
    /// Only valid on a glyph returned by [`Engine::glyph_to_bitmap`].
    unsafe fn bitmap_glyph(&self, glyph: RawHandle) -> BitmapGlyphRecord;

    unsafe fn stroker_new(&self, library: RawHandle) -> RawHandle;
    unsafe fn stroker_set(
        &self,
        stroker: RawHandle,
        radius: i64,
        line_cap: u32,
        line_join: u32,
        miter_limit: i64,
    );
    unsafe fn done_stroker(&self, stroker: RawHandle);
}
