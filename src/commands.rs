//! The `render` and `info` subcommands, generic over the engine.

use std::error::Error;
use std::io::Write;

use crate::cli::{InfoArgs, RenderArgs};
use crate::config::Config;
use crate::constants::PREVIEW_SHADES;
use crate::freetype::{to_int, Engine, Library};
use crate::pixmap::Color;
use crate::raster::{GlyphRasterizer, RenderSettings, RenderedGlyph, StrokeSettings};

/// A glyph positioned on the pen line.
#[derive(Debug, Clone)]
pub struct PlacedGlyph {
    /// Pen position in pixels.
    pub x: i32,
    pub glyph: RenderedGlyph,
}

/// Config values overridden by command line flags.
pub fn resolve_settings(
    args: &RenderArgs,
    config: &Config,
) -> Result<(RenderSettings, Option<StrokeSettings>), Box<dyn Error>> {
    let mut settings = config.render_settings();
    if let Some(size) = args.size {
        settings.size_px = size;
    }
    if let Some(hex) = &args.color {
        settings.color = Color::from_hex(hex).ok_or_else(|| format!("invalid color: {}", hex))?;
    }
    if let Some(gamma) = args.gamma {
        settings.gamma = gamma;
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    settings.mono |= args.mono;

    let mut stroke = config.stroke_settings();
    if let Some(width) = args.stroke {
        stroke = Some(StrokeSettings {
            width,
            ..stroke.unwrap_or_default()
        });
    }
    Ok((settings, stroke))
}

/// Rasterizes `text` left to right, applying kerning. Characters that fail
/// to render are skipped.
pub fn layout<E: Engine>(rasterizer: &mut GlyphRasterizer<E>, text: &str) -> Vec<PlacedGlyph> {
    let mut placed = Vec::new();
    let mut pen = 0;
    let mut previous = None;

    for character in text.chars() {
        if let Some(previous) = previous {
            pen += rasterizer.kerning(previous, character);
        }
        if let Some(glyph) = rasterizer.glyph(character).cloned() {
            let advance = glyph.advance;
            placed.push(PlacedGlyph { x: pen, glyph });
            pen += advance;
        }
        previous = Some(character);
    }
    placed
}

pub fn summary_line(placed: &PlacedGlyph) -> String {
    let glyph = &placed.glyph;
    let pixmap = &glyph.pixmap;
    format!(
        "{:?} x={} {}x{} {} left={} top={} advance={} bytes={}",
        glyph.character,
        placed.x,
        pixmap.width(),
        pixmap.height(),
        pixmap.format(),
        glyph.left,
        glyph.top,
        glyph.advance,
        pixmap.pixels().len()
    )
}

/// Writes every glyph's pixels back to back.
pub fn write_raw(placed: &[PlacedGlyph], out: &mut impl Write) -> std::io::Result<usize> {
    let mut written = 0;
    for p in placed {
        out.write_all(p.glyph.pixmap.pixels())?;
        written += p.glyph.pixmap.pixels().len();
    }
    Ok(written)
}

/// Draws the line as text, shading by alpha.
pub fn ascii_preview(placed: &[PlacedGlyph], ascender: i32, line_height: i32) -> Vec<String> {
    let width = placed
        .iter()
        .map(|p| (p.x + p.glyph.left + p.glyph.pixmap.width() as i32).max(p.x + p.glyph.advance))
        .max()
        .unwrap_or(0)
        .max(0) as usize;
    let height = line_height.max(1) as usize;
    let mut coverage = vec![0u8; width * height];

    for p in placed {
        let pixmap = &p.glyph.pixmap;
        for py in 0..pixmap.height() {
            let y = ascender - p.glyph.top + py as i32;
            if y < 0 || y as usize >= height {
                continue;
            }
            for px in 0..pixmap.width() {
                let x = p.x + p.glyph.left + px as i32;
                if x < 0 || x as usize >= width {
                    continue;
                }
                let alpha = (pixmap.get_pixel(px, py) & 0xff) as u8;
                let cell = &mut coverage[y as usize * width + x as usize];
                *cell = (*cell).max(alpha);
            }
        }
    }

    let last = PREVIEW_SHADES.len() - 1;
    coverage
        .chunks(width.max(1))
        .take(height)
        .map(|row| {
            row.iter()
                .map(|&a| PREVIEW_SHADES[(a as usize * last + 127) / 255] as char)
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

pub fn render<E: Engine>(
    library: &Library<E>,
    font_data: &[u8],
    args: &RenderArgs,
    config: &Config,
    stdout: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let (settings, stroke) = resolve_settings(args, config)?;
    log::debug!("render settings: {:?}, stroke: {:?}", settings, stroke);

    let face = library.new_memory_face(font_data, 0)?;
    let mut rasterizer = GlyphRasterizer::new(library, face, settings, stroke)?;
    let placed = layout(&mut rasterizer, &args.text);

    match &args.out {
        Some(path) => {
            let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
            let bytes = write_raw(&placed, &mut file)?;
            file.flush()?;
            for p in &placed {
                writeln!(stdout, "{}", summary_line(p))?;
            }
            log::info!("Wrote {} bytes for {} glyphs to {}", bytes, placed.len(), path.display());
        }
        None => {
            for line in ascii_preview(&placed, rasterizer.ascender(), rasterizer.line_height()) {
                writeln!(stdout, "{}", line)?;
            }
        }
    }
    Ok(())
}

pub fn info<E: Engine>(
    library: &Library<E>,
    font_data: &[u8],
    args: &InfoArgs,
    config: &Config,
    stdout: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let mut face = library.new_memory_face(font_data, 0)?;
    let size_px = args.size.unwrap_or(config.render_settings().size_px);
    face.set_pixel_sizes(0, size_px)?;
    let size = face.size_metrics();

    writeln!(stdout, "glyphs:              {}", face.num_glyphs())?;
    writeln!(stdout, "face flags:          {:?}", face.face_flags())?;
    writeln!(stdout, "style flags:         {:?}", face.style_flags())?;
    writeln!(stdout, "ascender:            {}", face.ascender())?;
    writeln!(stdout, "descender:           {}", face.descender())?;
    writeln!(stdout, "height:              {}", face.height())?;
    writeln!(
        stdout,
        "max advance:         {}x{}",
        face.max_advance_width(),
        face.max_advance_height()
    )?;
    writeln!(
        stdout,
        "underline:           {} (thickness {})",
        face.underline_position(),
        face.underline_thickness()
    )?;
    writeln!(stdout, "kerning:             {}", face.has_kerning())?;
    writeln!(stdout, "at {}px:", size_px)?;
    writeln!(stdout, "  ppem:              {}x{}", size.x_ppem, size.y_ppem)?;
    writeln!(stdout, "  ascender:          {}", to_int(size.ascender))?;
    writeln!(stdout, "  descender:         {}", to_int(size.descender))?;
    writeln!(stdout, "  line height:       {}", to_int(size.height))?;
    writeln!(stdout, "  max advance:       {}", to_int(size.max_advance))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::freetype::recording::{GlyphImage, RecordingEngine};
    use crate::pixmap::{Format, Pixmap};

    fn args(text: &str) -> RenderArgs {
        RenderArgs {
            font: PathBuf::from("test.ttf"),
            size: Some(4),
            color: None,
            gamma: Some(1.0),
            format: None,
            mono: false,
            stroke: None,
            out: None,
            text: text.to_string(),
        }
    }

    fn placed(x: i32, left: i32, top: i32, pixmap: Pixmap) -> PlacedGlyph {
        PlacedGlyph {
            x,
            glyph: RenderedGlyph {
                character: 'x',
                advance: pixmap.width() as i32,
                pixmap,
                left,
                top,
            },
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config: Config = toml::from_str(
            r#"
            [render]
            size_px = 30
            color = "00ff00"
            [stroke]
            width = 1.0
            cap = "butt"
        "#,
        )
        .unwrap();
        let mut args = args("a");
        args.stroke = Some(3.0);
        args.format = Some(Format::Alpha);

        let (settings, stroke) = resolve_settings(&args, &config).unwrap();
        assert_eq!(settings.size_px, 4);
        assert_eq!(settings.color.rgba8888(), 0x00ff_00ff);
        assert_eq!(settings.format, Format::Alpha);
        let stroke = stroke.unwrap();
        assert_eq!(stroke.width, 3.0);
        assert_eq!(stroke.cap, crate::freetype::LineCap::Butt);
    }

    #[test]
    fn test_invalid_color_flag_is_an_error() {
        let mut args = args("a");
        args.color = Some("zz".to_string());
        assert!(resolve_settings(&args, &Config::default()).is_err());
    }

    #[test]
    fn test_preview_shades_by_alpha() {
        let mut pixmap = Pixmap::new(2, 1, Format::Alpha);
        pixmap.put_pixels(&[255, 0]);
        let lines = ascii_preview(&[placed(1, 0, 2, pixmap)], 2, 3);

        assert_eq!(lines, vec![" @", "", ""]);
    }

    #[test]
    fn test_write_raw_concatenates() {
        let mut a = Pixmap::new(1, 1, Format::Alpha);
        a.put_pixels(&[1]);
        let mut b = Pixmap::new(2, 1, Format::Alpha);
        b.put_pixels(&[2, 3]);

        let mut out = Vec::new();
        let written = write_raw(&[placed(0, 0, 0, a), placed(1, 0, 0, b)], &mut out).unwrap();
        assert_eq!(written, 3);
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_render_prints_preview() {
        let engine = RecordingEngine::new().with_glyph(
            'i',
            GlyphImage::gray(1, 3, vec![255, 255, 255])
                .with_bearing(0, 3)
                .with_advance(2),
        );
        let library = Library::with_engine(engine).unwrap();

        let mut stdout = Vec::new();
        render(&library, b"font", &args("ii"), &Config::default(), &mut stdout).unwrap();

        let text = String::from_utf8(stdout).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["", "@ @", "@ @", "@ @"]);
    }

    #[test]
    fn test_info_prints_metrics() {
        let engine = RecordingEngine::new();
        let library = Library::with_engine(engine).unwrap();
        let info_args = InfoArgs {
            font: PathBuf::from("test.ttf"),
            size: Some(10),
        };

        let mut stdout = Vec::new();
        info(&library, b"font", &info_args, &Config::default(), &mut stdout).unwrap();
        let text = String::from_utf8(stdout).unwrap();
        assert!(text.contains("ppem:              10x10"));
        assert!(text.contains("line height:       10"));
    }

    #[test]
    fn test_render_surfaces_font_errors() {
        let engine = RecordingEngine::new();
        let library = Library::with_engine(engine).unwrap();

        let mut stdout = Vec::new();
        let result = render(&library, b"", &args("a"), &Config::default(), &mut stdout);
        assert!(result.is_err());
    }
}
