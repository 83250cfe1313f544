use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::pixmap::Format;

#[derive(Parser)]
#[command(name = "ftpix")]
#[command(version)]
#[command(about = "Rasterize glyphs with FreeType into pixmaps", long_about = None)]
#[command(after_help = "\
CONFIG:
    Defaults for render and stroke options are read from
    $XDG_CONFIG_HOME/ftpix/config.toml. Command line flags win.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render each character of TEXT and print or dump the pixmaps
    Render(RenderArgs),
    /// Print face metrics
    Info(InfoArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Font file to load
    #[arg(long)]
    pub font: PathBuf,

    /// Pixel height
    #[arg(long)]
    pub size: Option<u32>,

    /// Glyph color as RRGGBB or RRGGBBAA
    #[arg(long)]
    pub color: Option<String>,

    /// Coverage gamma
    #[arg(long)]
    pub gamma: Option<f32>,

    /// Output pixmap format (alpha, luminance-alpha, rgb565, rgba4444, rgb888, rgba8888)
    #[arg(long)]
    pub format: Option<Format>,

    /// Render 1-bit glyphs
    #[arg(long)]
    pub mono: bool,

    /// Stroke the outline with this border width in pixels
    #[arg(long)]
    pub stroke: Option<f32>,

    /// Write concatenated raw pixels here instead of printing a preview
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Text to render
    pub text: String,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Font file to load
    #[arg(long)]
    pub font: PathBuf,

    /// Pixel height used for size metrics
    #[arg(long)]
    pub size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_minimal() {
        let cli = Cli::parse_from(["ftpix", "render", "--font", "a.ttf", "Hi"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.font, PathBuf::from("a.ttf"));
        assert_eq!(args.text, "Hi");
        assert!(args.size.is_none());
        assert!(!args.mono);
        assert!(args.out.is_none());
    }

    #[test]
    fn test_parse_render_options() {
        let cli = Cli::parse_from([
            "ftpix", "render", "--font", "a.ttf", "--size", "18", "--color", "ff0000",
            "--gamma", "2.2", "--format", "rgb565", "--mono", "--stroke", "1.5", "--out",
            "glyphs.raw", "AV",
        ]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.size, Some(18));
        assert_eq!(args.color.as_deref(), Some("ff0000"));
        assert_eq!(args.gamma, Some(2.2));
        assert_eq!(args.format, Some(Format::Rgb565));
        assert!(args.mono);
        assert_eq!(args.stroke, Some(1.5));
        assert_eq!(args.out, Some(PathBuf::from("glyphs.raw")));
    }

    #[test]
    fn test_parse_info() {
        let cli = Cli::parse_from(["ftpix", "info", "--font", "a.otf"]);
        assert!(matches!(cli.command, Command::Info(InfoArgs { size: None, .. })));
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let result = Cli::try_parse_from([
            "ftpix", "render", "--font", "a.ttf", "--format", "cmyk", "x",
        ]);
        assert!(result.is_err());
    }
}
