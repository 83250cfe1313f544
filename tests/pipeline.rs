use freetype_pixmap::freetype::recording::{Call, GlyphImage, RecordingEngine};
use freetype_pixmap::freetype::{Error, Glyph, Library, LoadFlags, PixelMode, RenderMode};
use freetype_pixmap::pixmap::{Color, Format};
use freetype_pixmap::raster::{GlyphRasterizer, RenderSettings, StrokeSettings};

fn engine() -> RecordingEngine {
    RecordingEngine::new()
        .with_glyph(
            'H',
            GlyphImage::gray(3, 2, vec![255, 0, 255, 255, 128, 255]).with_bearing(1, 2),
        )
        .with_glyph(' ', GlyphImage::empty(3))
        .with_glyph('.', GlyphImage::mono(2, 1, vec![0b1000_0000]))
}

#[test]
fn test_pipeline_workflow() {
    let engine = engine();

    // 1. Library and face
    let library = Library::with_engine(engine.clone()).unwrap();
    let mut face = library.new_memory_face(b"font bytes", 0).unwrap();
    assert_eq!(library.tracked_faces(), 1);
    face.set_pixel_sizes(0, 12).unwrap();
    assert_eq!(face.size_metrics().y_ppem, 12);

    // 2. Load, extract and rasterize
    face.load_char('H' as u32, LoadFlags::DEFAULT).unwrap();
    let outline = face.glyph().unwrap().get_glyph().unwrap();
    let mut glyph = Glyph::from(outline);
    assert_eq!(glyph.bitmap().err(), Some(Error::GlyphState));
    glyph.to_bitmap(RenderMode::Normal).unwrap();

    // 3. Convert, fast path
    let bitmap = glyph.bitmap().unwrap();
    assert_eq!(bitmap.pixel_mode(), PixelMode::Gray);
    let alpha = bitmap.to_pixmap(Format::Alpha, Color::WHITE, 1.0);
    assert_eq!(alpha.format(), Format::Alpha);
    assert_eq!(alpha.pixels(), bitmap.buffer());

    // 4. Convert, gamma blend into RGBA
    let tinted = bitmap.to_pixmap(Format::Rgba8888, Color::from_rgba8888(0x2040_60ff), 2.0);
    assert_eq!(tinted.get_pixel(0, 0), 0x2040_60ff);
    assert_eq!(tinted.get_pixel(1, 0), 0x2040_6000);
    assert_eq!(tinted.get_pixel(1, 1), 0x2040_6040);

    // 5. Tear down in reverse order
    drop(glyph);
    drop(face);
    library.dispose();

    assert_eq!(engine.calls(Call::DoneLibrary), 1);
    assert_eq!(engine.live_glyphs(), 0);
    assert_eq!(engine.live_faces(), 0);
    assert_eq!(engine.live_buffers(), 0);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn test_rasterizer_over_text() {
    let engine = engine();
    let library = Library::with_engine(engine.clone()).unwrap();
    let face = library.new_memory_face(b"font bytes", 0).unwrap();
    let settings = RenderSettings {
        size_px: 12,
        color: Color::from_rgba8888(0xffff_ffff),
        gamma: 1.0,
        format: Format::Rgba8888,
        mono: false,
    };
    let mut rasterizer = GlyphRasterizer::new(&library, face, settings, None).unwrap();

    let space = rasterizer.glyph(' ').unwrap();
    assert_eq!(space.pixmap.pixels().len(), 0);
    assert_eq!(space.advance, 3);

    let dot = rasterizer.glyph('.').unwrap();
    assert_eq!(dot.pixmap.get_pixel(0, 0), 0xffff_ffff);
    assert_eq!(dot.pixmap.get_pixel(1, 0), 0);

    // Unmapped characters fall back to the empty glyph 0.
    let missing = rasterizer.glyph('?').unwrap();
    assert_eq!(missing.pixmap.width(), 0);

    assert_eq!(rasterizer.cached(), 3);
    drop(rasterizer);
    drop(library);
    assert_eq!(engine.live_glyphs(), 0);
    assert_eq!(engine.live_buffers(), 0);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn test_stroked_glyph_releases_everything() {
    let engine = engine();
    let library = Library::with_engine(engine.clone()).unwrap();
    let face = library.new_memory_face(b"font bytes", 0).unwrap();
    let stroke = StrokeSettings {
        width: 1.0,
        ..Default::default()
    };
    let mut rasterizer =
        GlyphRasterizer::new(&library, face, RenderSettings::default(), Some(stroke)).unwrap();

    let glyph = rasterizer.rasterize('H').unwrap();
    assert_eq!(glyph.pixmap.width(), 3);
    assert_eq!(engine.calls(Call::StrokeBorder), 1);
    assert_eq!(engine.calls(Call::ToBitmap), 1);

    drop(rasterizer);
    drop(library);
    assert_eq!(engine.live_strokers(), 0);
    assert_eq!(engine.live_glyphs(), 0);
    assert_eq!(engine.calls(Call::DoneGlyph), 1);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn test_failed_font_leaves_nothing_behind() {
    let engine = engine();
    let library = Library::with_engine(engine.clone()).unwrap();
    engine.fail(Call::NewMemoryFace, 3);

    assert!(matches!(library.new_memory_face(b"font", 0), Err(Error::FontLoad(3))));
    engine.succeed(Call::NewMemoryFace);
    let face = library.new_memory_face(b"font", 0).unwrap();

    drop(face);
    drop(library);
    assert_eq!(engine.allocated_buffers().len(), 2);
    assert_eq!(engine.freed_buffers(), engine.allocated_buffers());
    assert_eq!(engine.invalid_releases(), 0);
}
