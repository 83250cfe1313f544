//! Safe handles over a FreeType-style rasterization engine.
//!
//! A [`Library`] owns the engine context. Faces, glyphs and strokers created
//! from it hold a shared reference to that context and release their native
//! object on drop. Font bytes copied into engine memory are tracked in a
//! registry keyed by the face that uses them, and are freed with
//! that face or, at the latest, when the library shuts down.

mod bitmap;
mod engine;
mod error;
mod face;
mod glyph;
mod handle;
mod library;
#[cfg(feature = "native")]
mod native;
pub mod recording;
mod registry;
mod stroker;
pub mod types;

pub use bitmap::Bitmap;
pub use engine::{
    BitmapGlyphRecord, BitmapRecord, Engine, FaceRecord, GlyphMetrics, MemoryFace, SizeMetrics,
    SlotRecord,
};
pub use error::{Error, Result};
pub use face::Face;
pub use glyph::{BitmapGlyph, Glyph, GlyphFailure, GlyphSlot, OutlineGlyph};
pub use handle::{
    FaceHandle, GlyphHandle, Handle, HandleKind, LibraryHandle, RawHandle, SlotHandle,
    StrokerHandle,
};
pub use library::Library;
#[cfg(feature = "native")]
pub use native::FreeTypeEngine;
pub use stroker::Stroker;
pub use types::{
    to_int, Encoding, FaceFlags, GlyphFormat, KerningMode, LineCap, LineJoin, LoadFlags,
    PixelMode, RenderMode, StyleFlags,
};
