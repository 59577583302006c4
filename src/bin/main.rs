use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;
use glyphtrace::editor::EditSession;
use glyphtrace::kurbo::{Rect, Size, Vec2};
use glyphtrace::{render, Outline, RasterBuffer, ThresholdMethod, TraceConfig, VectorGlyph};

#[derive(Parser)]
#[command(name = "glyphtrace", about = "Trace a scanned glyph region into an editable vector outline")]
struct Cli {
    /// Input image path (PNG, JPEG)
    #[arg(short, long)]
    input: PathBuf,

    /// Selection rectangle "x0,y0,x1,y1" in image pixels (whole image if omitted)
    #[arg(short, long)]
    selection: Option<String>,

    /// Fixed brightness threshold (0-255)
    #[arg(long, default_value = "128")]
    threshold: u8,

    /// Pick the threshold automatically from the selection histogram
    #[arg(long)]
    otsu: bool,

    /// Invert foreground/background (for white-on-black scans)
    #[arg(long)]
    invert: bool,

    /// Rounds of corner smoothing to apply after tracing
    #[arg(long, default_value = "0")]
    smooth: usize,

    /// Rounds of point decimation to apply after tracing
    #[arg(long, default_value = "0")]
    simplify: usize,

    /// Write the outline as an SVG document
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write a filled PNG preview
    #[arg(long)]
    png: Option<PathBuf>,

    /// Preview side length in pixels
    #[arg(long, default_value = "256")]
    preview_size: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let img = image::open(&cli.input)?.into_rgba8();
    let buffer = RasterBuffer::from_image(&img);

    let selection = match &cli.selection {
        Some(s) => parse_selection(s)?,
        None => Rect::new(0.0, 0.0, f64::from(img.width()), f64::from(img.height())),
    };

    let config = TraceConfig {
        threshold: if cli.otsu {
            ThresholdMethod::Otsu
        } else {
            ThresholdMethod::Fixed(cli.threshold)
        },
        invert: cli.invert,
        ..TraceConfig::default()
    };

    // Header
    eprintln!();
    eprintln!("  glyphtrace \u{00b7} {}", cli.input.display());
    eprintln!();

    // The CLI shows no scaled-down view, so display space is pixel space.
    let traced = glyphtrace::extract(&buffer, selection, Vec2::new(1.0, 1.0), &config)?;
    let Some(glyph) = traced else {
        eprintln!("  Nothing to trace in the selection");
        eprintln!();
        return Ok(());
    };
    eprintln!("  Trace       {}x{} px region \u{2192} {}", glyph.width, glyph.height, glyph.id);

    let glyph = apply_edits(glyph, cli.smooth, cli.simplify)?;
    let outline = Outline::parse(&glyph.path_description)?;

    if let Some(svg_path) = &cli.svg {
        std::fs::write(svg_path, svg_document(&glyph))?;
        eprintln!("  SVG         {}", svg_path.display());
    }
    if let Some(png_path) = &cli.png {
        let bytes = render::render_preview(&outline, cli.preview_size, cli.preview_size, 8.0)?;
        std::fs::write(png_path, bytes)?;
        eprintln!("  Preview     {}", png_path.display());
    }

    println!("{}", serde_json::to_string_pretty(&glyph)?);

    // Footer
    eprintln!();
    eprintln!("  \u{2713} {} points", outline.len());
    eprintln!();

    Ok(())
}

/// Run the requested smooth/simplify rounds through an editing session.
fn apply_edits(
    glyph: VectorGlyph,
    smooth: usize,
    simplify: usize,
) -> Result<VectorGlyph, glyphtrace::TraceError> {
    if smooth == 0 && simplify == 0 {
        return Ok(glyph);
    }
    let mut session = EditSession::open(glyph, Size::new(800.0, 600.0))?;
    for _ in 0..smooth {
        session.smooth()?;
    }
    for _ in 0..simplify {
        session.simplify()?;
    }
    eprintln!(
        "  Edit        smooth \u{00d7}{} \u{00b7} simplify \u{00d7}{} \u{2192} {} points",
        smooth,
        simplify,
        session.outline().len()
    );
    Ok(session.commit())
}

/// Parse "x0,y0,x1,y1" into a rectangle.
fn parse_selection(s: &str) -> Result<Rect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("bad selection '{s}': {e}"))?;
    match parts[..] {
        [x0, y0, x1, y1] => Ok(Rect::new(x0, y0, x1, y1)),
        _ => Err(format!("bad selection '{s}': expected x0,y0,x1,y1")),
    }
}

/// Minimal SVG document: one filled path. The outline's text form is
/// already valid SVG path data.
fn svg_document(glyph: &VectorGlyph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = glyph.width,
        h = glyph.height,
    );
    let _ = writeln!(out, "  <title>{}</title>", xml_escape(&glyph.name));
    let _ = writeln!(out, r#"  <path d="{}" fill="black"/>"#, glyph.path_description);
    out.push_str("</svg>\n");
    out
}

/// Escape the five XML special characters.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
