//! gob - render an HTML page and its stylesheet to an image.
//!
//! Usage:
//!   gob page.html                       Render at the configured width to gob.png
//!   gob page.html --css style.css -o out.png --width 640
//!   gob page.html --viewport-height 480 --scroll 900
//!                                       Crop to the window a host would show
//!   gob page.html --layout-json         Print the layout tree as JSON
//!   gob page.html --dom                 Print the parsed document tree

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use gob_browser::{EngineConfig, FontSet, Page, RenderOutcome};
use gob_html::format_tree;
use owo_colors::OwoColorize;

/// Render an HTML page and its stylesheet to an image.
#[derive(Debug, Parser)]
#[command(name = "gob", version, about)]
struct Cli {
    /// The HTML file to render.
    page: PathBuf,

    /// External stylesheet, applied before the page's own `<style>` blocks.
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Viewport width in pixels. Overrides the config.
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i32>,

    /// Where to write the image; the format follows the extension.
    #[arg(short, long, value_name = "FILE", default_value = "gob.png")]
    output: PathBuf,

    /// Only write the rows a window this tall would show.
    #[arg(long, value_name = "PIXELS")]
    viewport_height: Option<u32>,

    /// Scroll offset of the window, clamped to the page.
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = 0,
        allow_negative_numbers = true,
        requires = "viewport_height"
    )]
    scroll: i64,

    /// Print the layout tree as JSON instead of rendering.
    #[arg(long, conflicts_with = "dom")]
    layout_json: bool,

    /// Print the parsed document tree instead of rendering.
    #[arg(long)]
    dom: bool,

    /// Engine config (JSON).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Regular font file. Overrides the config.
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Bold font file. Overrides the config.
    #[arg(long, value_name = "FILE")]
    bold_font: Option<PathBuf>,

    /// Measure text with fixed ratios instead of searching for system fonts.
    #[arg(long)]
    no_system_fonts: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(font) = &cli.font {
        config.font_path = Some(font.clone());
    }
    if let Some(bold) = &cli.bold_font {
        config.bold_font_path = Some(bold.clone());
    }
    let width = match cli.width {
        Some(width) => width,
        None => i32::try_from(config.width).context("configured width is too large")?,
    };

    let page = Page::load_files(&cli.page, cli.css.as_deref(), config.clone())?;

    if cli.dom {
        print!("{}", format_tree(page.document()));
        return Ok(());
    }

    let page = match load_fonts(&config, cli.no_system_fonts)? {
        Some(fonts) => page.with_fonts(fonts),
        None => page,
    };

    if cli.layout_json {
        #[allow(clippy::cast_precision_loss)]
        let tree = page.layout(width as f32);
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    let buffer = match page.render(width) {
        RenderOutcome::Painted(buffer) => buffer,
        RenderOutcome::EmptyDocument { width } => {
            let message = format!(
                "{}: empty document, nothing to render at width {width}",
                cli.page.display()
            );
            eprintln!("{}", message.yellow());
            return Ok(());
        }
    };

    let buffer = match cli.viewport_height {
        Some(height) => {
            let offset = config.clamp_scroll(cli.scroll, buffer.height());
            buffer.viewport(offset, height)
        }
        None => buffer,
    };
    if buffer.height() == 0 {
        bail!("nothing visible to write to '{}'", cli.output.display());
    }

    buffer.save(&cli.output)?;
    println!(
        "{} {} ({}x{})",
        "Rendered".green().bold(),
        cli.output.display(),
        buffer.width(),
        buffer.height()
    );
    Ok(())
}

/// Fonts from the config's paths, or the system fonts unless disabled.
fn load_fonts(config: &EngineConfig, no_system_fonts: bool) -> Result<Option<FontSet>> {
    if let Some(regular) = &config.font_path {
        let fonts = FontSet::load(regular, config.bold_font_path.as_deref())?;
        return Ok(Some(fonts));
    }
    if no_system_fonts {
        return Ok(None);
    }
    Ok(FontSet::system())
}
