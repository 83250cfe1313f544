//! An in-process [`Engine`] that records every call.
//!
//! Glyphs are registered up front as ready-made coverage images; loading,
//! rendering, stroking and extraction move those images between slots and
//! glyph objects the way the native engine would. Every allocation and release
//! is tracked so tests can assert that each address is released exactly once.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use ahash::RandomState;

use super::engine::{
    BitmapGlyphRecord, BitmapRecord, Engine, FaceRecord, GlyphMetrics, MemoryFace, SizeMetrics,
    SlotRecord,
};
use super::handle::RawHandle;
use super::types::{Encoding, FaceFlags, GlyphFormat, LoadFlags, PixelMode};

const UNKNOWN_FILE_FORMAT: i32 = 0x02;
const INVALID_ARGUMENT: i32 = 0x06;
const INVALID_GLYPH_INDEX: i32 = 0x10;
const INVALID_GLYPH_FORMAT: i32 = 0x12;
const INVALID_HANDLE: i32 = 0x20;

const FIRST_ADDRESS: RawHandle = 0x1000;
const ADDRESS_STEP: RawHandle = 0x10;
/// Offset of a face's glyph slot from the face itself.
const SLOT_OFFSET: RawHandle = 0x8;

/// Engine entry points that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    InitLibrary,
    DoneLibrary,
    NewMemoryFace,
    Free,
    DoneFace,
    SelectSize,
    SetCharSize,
    SetPixelSizes,
    SelectCharmap,
    LoadGlyph,
    LoadChar,
    RenderGlyph,
    GetGlyph,
    DoneGlyph,
    StrokeBorder,
    ToBitmap,
    StrokerNew,
    StrokerSet,
    DoneStroker,
}

/// Pre-rasterized coverage for one glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphImage {
    pub width: u32,
    pub rows: u32,
    pub pitch: i32,
    pub pixel_mode: PixelMode,
    pub left: i32,
    pub top: i32,
    /// Horizontal advance in whole pixels.
    pub advance: i64,
    data: Rc<[u8]>,
}

impl GlyphImage {
    /// 8-bit coverage, one byte per pixel. `data` is padded or cut to
    /// `width * rows` bytes.
    pub fn gray(width: u32, rows: u32, data: Vec<u8>) -> Self {
        Self::with_layout(width, rows, width as i32, PixelMode::Gray, data)
    }

    /// 1-bit coverage packed MSB first, rows padded to whole bytes.
    pub fn mono(width: u32, rows: u32, data: Vec<u8>) -> Self {
        Self::with_layout(width, rows, width.div_ceil(8) as i32, PixelMode::Mono, data)
    }

    /// A glyph without pixels, such as a space.
    pub fn empty(advance: i64) -> Self {
        Self::with_layout(0, 0, 0, PixelMode::Gray, Vec::new()).with_advance(advance)
    }

    fn with_layout(
        width: u32,
        rows: u32,
        pitch: i32,
        pixel_mode: PixelMode,
        mut data: Vec<u8>,
    ) -> Self {
        data.resize(rows as usize * pitch.unsigned_abs() as usize, 0);
        Self {
            width,
            rows,
            pitch,
            pixel_mode,
            left: 0,
            top: rows as i32,
            advance: width as i64,
            data: data.into(),
        }
    }

    pub fn with_bearing(mut self, left: i32, top: i32) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn with_advance(mut self, advance: i64) -> Self {
        self.advance = advance;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn bitmap_record(&self) -> BitmapRecord {
        BitmapRecord {
            rows: self.rows,
            width: self.width,
            pitch: self.pitch,
            num_grays: if self.pixel_mode == PixelMode::Gray { 256 } else { 0 },
            pixel_mode: self.pixel_mode.to_raw(),
            buffer: if self.rows == 0 || self.data.is_empty() {
                0
            } else {
                self.data.as_ptr() as RawHandle
            },
        }
    }
}

/// Parameters last passed to [`Engine::stroker_set`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrokerParams {
    pub radius: i64,
    pub line_cap: u32,
    pub line_join: u32,
    pub miter_limit: i64,
}

#[derive(Debug, Default)]
struct SlotState {
    glyph_index: Option<u32>,
    rendered: bool,
}

#[derive(Debug)]
struct FaceState {
    size: SizeMetrics,
    slot: SlotState,
    charmap: Encoding,
}

#[derive(Debug)]
struct GlyphObject {
    image: GlyphImage,
    rendered: bool,
}

#[derive(Debug)]
struct State {
    next_address: RawHandle,
    last_error: i32,
    calls: HashMap<Call, usize, RandomState>,
    failures: HashMap<Call, i32, RandomState>,
    copies_font_data: bool,
    face_record: FaceRecord,
    glyphs: Vec<(char, GlyphImage)>,
    charmaps: Vec<Encoding>,
    kerning: HashMap<(char, char), i64, RandomState>,
    library: Option<RawHandle>,
    faces: HashMap<RawHandle, FaceState, RandomState>,
    glyph_objects: HashMap<RawHandle, GlyphObject, RandomState>,
    strokers: HashMap<RawHandle, StrokerParams, RandomState>,
    allocated: Vec<RawHandle>,
    freed: Vec<RawHandle>,
    live_buffers: HashSet<RawHandle, RandomState>,
    invalid_releases: usize,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_address: FIRST_ADDRESS,
            last_error: 0,
            calls: HashMap::default(),
            failures: HashMap::default(),
            copies_font_data: true,
            face_record: FaceRecord::default(),
            glyphs: Vec::new(),
            charmaps: vec![Encoding::UNICODE],
            kerning: HashMap::default(),
            library: None,
            faces: HashMap::default(),
            glyph_objects: HashMap::default(),
            strokers: HashMap::default(),
            allocated: Vec::new(),
            freed: Vec::new(),
            live_buffers: HashSet::default(),
            invalid_releases: 0,
        }
    }
}

impl State {
    /// Counts the call and applies an injected failure. Returns `false` when
    /// the call must fail.
    fn enter(&mut self, call: Call) -> bool {
        *self.calls.entry(call).or_default() += 1;
        match self.failures.get(&call) {
            Some(&code) => {
                self.last_error = code;
                false
            }
            None => {
                self.last_error = 0;
                true
            }
        }
    }

    fn error(&mut self, code: i32) {
        self.last_error = code;
    }

    fn alloc(&mut self) -> RawHandle {
        let address = self.next_address;
        self.next_address += ADDRESS_STEP;
        address
    }

    fn image(&self, index: u32) -> Option<GlyphImage> {
        match index {
            0 => Some(GlyphImage::empty(0)),
            i => self.glyphs.get(i as usize - 1).map(|(_, image)| image.clone()),
        }
    }

    /// Registered glyphs are reachable through the Unicode charmap only.
    fn char_index(&self, face: RawHandle, code: u32) -> u32 {
        match self.faces.get(&face) {
            Some(state) if state.charmap == Encoding::UNICODE => {}
            _ => return 0,
        }
        self.glyphs
            .iter()
            .position(|(c, _)| *c as u32 == code)
            .map_or(0, |i| i as u32 + 1)
    }

    fn face_of_slot(&mut self, slot: RawHandle) -> Option<&mut FaceState> {
        self.faces.get_mut(&slot.wrapping_sub(SLOT_OFFSET))
    }

    fn slot_image(&mut self, slot: RawHandle) -> Option<(GlyphImage, bool)> {
        let state = self.face_of_slot(slot)?;
        let index = state.slot.glyph_index?;
        let rendered = state.slot.rendered;
        self.image(index).map(|image| (image, rendered))
    }

    fn load(&mut self, face: RawHandle, index: u32, flags: u32) -> bool {
        if self.image(index).is_none() {
            self.error(INVALID_GLYPH_INDEX);
            return false;
        }
        match self.faces.get_mut(&face) {
            Some(state) => {
                state.slot = SlotState {
                    glyph_index: Some(index),
                    rendered: LoadFlags::from_bits_truncate(flags).contains(LoadFlags::RENDER),
                };
                true
            }
            None => {
                self.error(INVALID_HANDLE);
                false
            }
        }
    }

    fn resize(&mut self, face: RawHandle, x_ppem: u32, y_ppem: u32) -> bool {
        let Some(state) = self.faces.get_mut(&face) else {
            self.error(INVALID_HANDLE);
            return false;
        };
        let px = y_ppem as i64 * 64;
        state.size = SizeMetrics {
            x_ppem,
            y_ppem,
            x_scale: x_ppem as i64 * 65536 / 1000,
            y_scale: y_ppem as i64 * 65536 / 1000,
            ascender: px * 4 / 5,
            descender: -(px / 5),
            height: px,
            max_advance: x_ppem as i64 * 64,
        };
        true
    }

    fn release(&mut self, live: bool) {
        if !live {
            self.invalid_releases += 1;
        }
    }
}

/// A recording, scriptable engine. Clones share state, so a test can keep one
/// clone for inspection while the library owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    state: Rc<RefCell<State>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a glyph. Glyph indices follow registration order, starting at 1.
    pub fn with_glyph(self, character: char, image: GlyphImage) -> Self {
        self.state.borrow_mut().glyphs.push((character, image));
        self
    }

    /// Adds a charmap to every face. Faces start with only the Unicode one
    /// selected and available.
    pub fn with_charmap(self, encoding: Encoding) -> Self {
        self.state.borrow_mut().charmaps.push(encoding);
        self
    }

    /// Kerning between two registered characters, in 26.6 pixels.
    pub fn with_kerning(self, left: char, right: char, value: i64) -> Self {
        self.state.borrow_mut().kerning.insert((left, right), value);
        self
    }

    /// Record returned for every face.
    pub fn set_face_record(&self, record: FaceRecord) {
        self.state.borrow_mut().face_record = record;
    }

    /// Whether `new_memory_face` hands back a buffer for the caller to free.
    pub fn set_copies_font_data(&self, copies: bool) {
        self.state.borrow_mut().copies_font_data = copies;
    }

    /// Makes every following `call` fail with `code` until [`Self::succeed`].
    pub fn fail(&self, call: Call, code: i32) {
        self.state.borrow_mut().failures.insert(call, code);
    }

    pub fn succeed(&self, call: Call) {
        self.state.borrow_mut().failures.remove(&call);
    }

    pub fn calls(&self, call: Call) -> usize {
        self.state.borrow().calls.get(&call).copied().unwrap_or(0)
    }

    /// Every font buffer handed out, in order.
    pub fn allocated_buffers(&self) -> Vec<RawHandle> {
        self.state.borrow().allocated.clone()
    }

    /// Every font buffer released, in order.
    pub fn freed_buffers(&self) -> Vec<RawHandle> {
        self.state.borrow().freed.clone()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().live_buffers.len()
    }

    /// Releases of addresses that were unknown or already released.
    pub fn invalid_releases(&self) -> usize {
        self.state.borrow().invalid_releases
    }

    pub fn live_faces(&self) -> usize {
        self.state.borrow().faces.len()
    }

    pub fn live_glyphs(&self) -> usize {
        self.state.borrow().glyph_objects.len()
    }

    pub fn live_strokers(&self) -> usize {
        self.state.borrow().strokers.len()
    }

    pub fn stroker_params(&self, stroker: RawHandle) -> Option<StrokerParams> {
        self.state.borrow().strokers.get(&stroker).copied()
    }
}

impl Engine for RecordingEngine {
    fn last_error_code(&self) -> i32 {
        self.state.borrow().last_error
    }

    fn init_library(&self) -> RawHandle {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::InitLibrary) {
            return 0;
        }
        let library = state.alloc();
        state.library = Some(library);
        library
    }

    unsafe fn done_library(&self, library: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.enter(Call::DoneLibrary);
        let live = state.library == Some(library);
        state.release(live);
        if live {
            state.library = None;
            state.faces.clear();
        }
    }

    unsafe fn new_memory_face(
        &self,
        library: RawHandle,
        data: &[u8],
        _face_index: i64,
    ) -> MemoryFace {
        let mut state = self.state.borrow_mut();
        let buffer = if state.copies_font_data {
            let buffer = state.alloc();
            state.allocated.push(buffer);
            state.live_buffers.insert(buffer);
            buffer
        } else {
            0
        };
        if !state.enter(Call::NewMemoryFace) {
            return MemoryFace { face: 0, buffer };
        }
        if state.library != Some(library) {
            state.error(INVALID_HANDLE);
            return MemoryFace { face: 0, buffer };
        }
        if data.is_empty() {
            state.error(UNKNOWN_FILE_FORMAT);
            return MemoryFace { face: 0, buffer };
        }
        let face = state.alloc();
        state.faces.insert(
            face,
            FaceState {
                size: SizeMetrics::default(),
                slot: SlotState::default(),
                charmap: Encoding::UNICODE,
            },
        );
        MemoryFace { face, buffer }
    }

    unsafe fn free(&self, address: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.enter(Call::Free);
        let live = state.live_buffers.remove(&address);
        state.release(live);
        if live {
            state.freed.push(address);
        }
    }

    unsafe fn done_face(&self, face: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.enter(Call::DoneFace);
        let live = state.faces.remove(&face).is_some();
        state.release(live);
    }

    unsafe fn face_record(&self, _face: RawHandle) -> FaceRecord {
        self.state.borrow().face_record
    }

    unsafe fn size_metrics(&self, face: RawHandle) -> SizeMetrics {
        self.state
            .borrow()
            .faces
            .get(&face)
            .map(|state| state.size)
            .unwrap_or_default()
    }

    unsafe fn select_size(&self, _face: RawHandle, _strike_index: i32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::SelectSize) {
            return false;
        }
        // No fixed strikes.
        state.error(INVALID_ARGUMENT);
        false
    }

    unsafe fn set_char_size(
        &self,
        face: RawHandle,
        char_width: i64,
        char_height: i64,
        horz_resolution: u32,
        vert_resolution: u32,
    ) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::SetCharSize) {
            return false;
        }
        let char_width = if char_width == 0 { char_height } else { char_width };
        let char_height = if char_height == 0 { char_width } else { char_height };
        let dpi = |res: u32| if res == 0 { 72 } else { res as i64 };
        let x_ppem = (char_width * dpi(horz_resolution) / 72 + 32) >> 6;
        let y_ppem = (char_height * dpi(vert_resolution) / 72 + 32) >> 6;
        state.resize(face, x_ppem as u32, y_ppem as u32)
    }

    unsafe fn set_pixel_sizes(&self, face: RawHandle, pixel_width: u32, pixel_height: u32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::SetPixelSizes) {
            return false;
        }
        let width = if pixel_width == 0 { pixel_height } else { pixel_width };
        let height = if pixel_height == 0 { pixel_width } else { pixel_height };
        state.resize(face, width, height)
    }

    unsafe fn load_glyph(&self, face: RawHandle, glyph_index: u32, load_flags: u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.enter(Call::LoadGlyph) && state.load(face, glyph_index, load_flags)
    }

    unsafe fn load_char(&self, face: RawHandle, char_code: u32, load_flags: u32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::LoadChar) {
            return false;
        }
        let index = state.char_index(face, char_code);
        state.load(face, index, load_flags)
    }

    unsafe fn char_index(&self, face: RawHandle, char_code: u32) -> u32 {
        self.state.borrow().char_index(face, char_code)
    }

    unsafe fn select_charmap(&self, face: RawHandle, encoding: u32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::SelectCharmap) {
            return false;
        }
        let encoding = Encoding(encoding);
        if encoding == Encoding::NONE || !state.charmaps.contains(&encoding) {
            state.error(INVALID_ARGUMENT);
            return false;
        }
        match state.faces.get_mut(&face) {
            Some(face) => {
                face.charmap = encoding;
                true
            }
            None => {
                state.error(INVALID_HANDLE);
                false
            }
        }
    }

    unsafe fn has_kerning(&self, _face: RawHandle) -> bool {
        FaceFlags::from_bits_truncate(self.state.borrow().face_record.face_flags)
            .contains(FaceFlags::KERNING)
    }

    unsafe fn kerning(&self, _face: RawHandle, left: u32, right: u32, _mode: u32) -> i64 {
        let state = self.state.borrow();
        let character = |index: u32| {
            index
                .checked_sub(1)
                .and_then(|i| state.glyphs.get(i as usize))
                .map(|(c, _)| *c)
        };
        match (character(left), character(right)) {
            (Some(l), Some(r)) => state.kerning.get(&(l, r)).copied().unwrap_or(0),
            _ => 0,
        }
    }

    unsafe fn glyph_slot(&self, face: RawHandle) -> RawHandle {
        if self.state.borrow().faces.contains_key(&face) {
            face + SLOT_OFFSET
        } else {
            0
        }
    }

    unsafe fn slot_record(&self, slot: RawHandle) -> SlotRecord {
        let mut state = self.state.borrow_mut();
        let Some((image, rendered)) = state.slot_image(slot) else {
            return SlotRecord::default();
        };
        SlotRecord {
            metrics: GlyphMetrics {
                width: image.width as i64 * 64,
                height: image.rows as i64 * 64,
                hori_bearing_x: image.left as i64 * 64,
                hori_bearing_y: image.top as i64 * 64,
                hori_advance: image.advance * 64,
                ..Default::default()
            },
            linear_hori_advance: image.advance << 16,
            linear_vert_advance: 0,
            advance_x: image.advance * 64,
            advance_y: 0,
            format: if rendered { GlyphFormat::BITMAP.0 } else { GlyphFormat::OUTLINE.0 },
            bitmap_left: image.left,
            bitmap_top: image.top,
        }
    }

    unsafe fn slot_bitmap(&self, slot: RawHandle) -> BitmapRecord {
        let mut state = self.state.borrow_mut();
        match state.slot_image(slot) {
            Some((image, true)) => image.bitmap_record(),
            _ => BitmapRecord::default(),
        }
    }

    unsafe fn render_glyph(&self, slot: RawHandle, _render_mode: u32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::RenderGlyph) {
            return false;
        }
        let rendered = match state.face_of_slot(slot) {
            Some(face) if face.slot.glyph_index.is_some() => {
                face.slot.rendered = true;
                true
            }
            _ => false,
        };
        if !rendered {
            state.error(INVALID_GLYPH_FORMAT);
        }
        rendered
    }

    unsafe fn get_glyph(&self, slot: RawHandle) -> RawHandle {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::GetGlyph) {
            return 0;
        }
        let Some((image, rendered)) = state.slot_image(slot) else {
            state.error(INVALID_GLYPH_FORMAT);
            return 0;
        };
        let glyph = state.alloc();
        state.glyph_objects.insert(glyph, GlyphObject { image, rendered });
        glyph
    }

    unsafe fn done_glyph(&self, glyph: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.enter(Call::DoneGlyph);
        let live = state.glyph_objects.remove(&glyph).is_some();
        state.release(live);
    }

    unsafe fn glyph_stroke_border(
        &self,
        glyph: RawHandle,
        stroker: RawHandle,
        _inside: bool,
    ) -> RawHandle {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::StrokeBorder) {
            return 0;
        }
        if !state.strokers.contains_key(&stroker) {
            state.error(INVALID_HANDLE);
            return 0;
        }
        let object = match state.glyph_objects.remove(&glyph) {
            Some(object) if !object.rendered => object,
            Some(object) => {
                state.glyph_objects.insert(glyph, object);
                state.error(INVALID_GLYPH_FORMAT);
                return 0;
            }
            None => {
                state.error(INVALID_HANDLE);
                return 0;
            }
        };
        let stroked = state.alloc();
        state.glyph_objects.insert(stroked, object);
        stroked
    }

    unsafe fn glyph_to_bitmap(&self, glyph: RawHandle, _render_mode: u32) -> RawHandle {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::ToBitmap) {
            return 0;
        }
        let Some(object) = state.glyph_objects.remove(&glyph) else {
            state.error(INVALID_HANDLE);
            return 0;
        };
        if object.rendered {
            state.glyph_objects.insert(glyph, object);
            return glyph;
        }
        let bitmap = state.alloc();
        state.glyph_objects.insert(
            bitmap,
            GlyphObject {
                image: object.image,
                rendered: true,
            },
        );
        bitmap
    }

    unsafe fn bitmap_glyph(&self, glyph: RawHandle) -> BitmapGlyphRecord {
        let state = self.state.borrow();
        match state.glyph_objects.get(&glyph) {
            Some(object) if object.rendered => BitmapGlyphRecord {
                left: object.image.left,
                top: object.image.top,
                bitmap: object.image.bitmap_record(),
            },
            _ => BitmapGlyphRecord::default(),
        }
    }

    unsafe fn stroker_new(&self, library: RawHandle) -> RawHandle {
        let mut state = self.state.borrow_mut();
        if !state.enter(Call::StrokerNew) {
            return 0;
        }
        if state.library != Some(library) {
            state.error(INVALID_HANDLE);
            return 0;
        }
        let stroker = state.alloc();
        state.strokers.insert(stroker, StrokerParams::default());
        stroker
    }

    unsafe fn stroker_set(
        &self,
        stroker: RawHandle,
        radius: i64,
        line_cap: u32,
        line_join: u32,
        miter_limit: i64,
    ) {
        let mut state = self.state.borrow_mut();
        state.enter(Call::StrokerSet);
        if let Some(params) = state.strokers.get_mut(&stroker) {
            *params = StrokerParams {
                radius,
                line_cap,
                line_join,
                miter_limit,
            };
        }
    }

    unsafe fn done_stroker(&self, stroker: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.enter(Call::DoneStroker);
        let live = state.strokers.remove(&stroker).is_some();
        state.release(live);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_distinct_and_nonzero() {
        let engine = RecordingEngine::new();
        let library = engine.init_library();
        let a = unsafe { engine.new_memory_face(library, b"a", 0) };
        let b = unsafe { engine.new_memory_face(library, b"b", 0) };

        let all = [library, a.face, a.buffer, b.face, b.buffer];
        assert!(all.iter().all(|&address| address != 0));
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_empty_font_data_is_rejected() {
        let engine = RecordingEngine::new();
        let library = engine.init_library();
        let result = unsafe { engine.new_memory_face(library, &[], 0) };

        assert_eq!(result.face, 0);
        assert_ne!(result.buffer, 0);
        assert_eq!(engine.last_error_code(), UNKNOWN_FILE_FORMAT);
    }

    #[test]
    fn test_double_free_is_flagged() {
        let engine = RecordingEngine::new();
        let library = engine.init_library();
        let face = unsafe { engine.new_memory_face(library, b"a", 0) };
        unsafe {
            engine.free(face.buffer);
            engine.free(face.buffer);
        }
        assert_eq!(engine.invalid_releases(), 1);
        assert_eq!(engine.freed_buffers(), vec![face.buffer]);
    }

    #[test]
    fn test_render_flag_renders_on_load() {
        let engine = RecordingEngine::new().with_glyph('x', GlyphImage::gray(1, 1, vec![9]));
        let library = engine.init_library();
        let face = unsafe { engine.new_memory_face(library, b"a", 0) }.face;
        let slot = unsafe { engine.glyph_slot(face) };

        assert!(unsafe { engine.load_char(face, 'x' as u32, LoadFlags::RENDER.bits()) });
        let bitmap = unsafe { engine.slot_bitmap(slot) };
        assert_eq!(bitmap.rows, 1);
        assert_ne!(bitmap.buffer, 0);
    }

    #[test]
    fn test_image_data_is_sized_to_layout() {
        let image = GlyphImage::mono(10, 2, vec![0xff]);
        assert_eq!(image.pitch, 2);
        assert_eq!(image.data(), &[0xff, 0, 0, 0]);

        let empty = GlyphImage::empty(4);
        assert_eq!(empty.bitmap_record().buffer, 0);
        assert_eq!(empty.advance, 4);
    }
}
