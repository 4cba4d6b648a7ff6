//! CLI for rendering presentation documents and extracting them from PDF and HTML.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use deck_core::{Presentation, RenderConfig};
use deck_extract::{HtmlExtractor, PdfExtractor};
use deck_html::HtmlRenderer;
use deck_pptx::{AssetResolver, DeckRenderer};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Convert presentation JSON documents to HTML and editable PPTX decks.
#[derive(Parser, Debug)]
#[command(name = "deck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a presentation JSON document as a single HTML file
    Html {
        /// Input presentation JSON
        input: PathBuf,
        /// Output file (default: input with .html extension)
        output: Option<PathBuf>,
    },

    /// Render a presentation JSON document as an editable PPTX deck
    Pptx {
        /// Input presentation JSON
        input: PathBuf,
        /// Output file (default: {stem}_editable.pptx beside the input)
        output: Option<PathBuf>,
        #[command(flatten)]
        options: DeckOptions,
    },

    /// Analyze a PDF into a presentation JSON document
    PdfToJson {
        /// Input PDF
        input: PathBuf,
        /// Output file (default: {stem}.json beside the input)
        output: Option<PathBuf>,
    },

    /// Read a rendered HTML file back into a presentation JSON document
    HtmlToJson {
        /// Input HTML
        input: PathBuf,
        /// Output file (default: presentation.json beside the input)
        output: Option<PathBuf>,
    },

    /// Validate a presentation JSON document
    Check {
        /// Input presentation JSON
        input: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct DeckOptions {
    /// Multiplier applied to every declared font size
    #[arg(long)]
    font_scale: Option<f64>,

    /// Multiplier applied to the base line spacing of 1.2
    #[arg(long)]
    line_spacing_scale: Option<f64>,

    /// Paragraph spacing as a multiple of the scaled font size
    #[arg(long)]
    paragraph_spacing_scale: Option<f64>,

    /// Image corner radius as a fraction of the shorter side
    #[arg(long)]
    corner_ratio: Option<f64>,

    /// Directory holding the Pretendard font files
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Render every slide with the generic layout
    #[arg(long)]
    generic_only: bool,

    /// Never download remote images
    #[arg(long)]
    offline: bool,
}

impl DeckOptions {
    fn to_config(&self) -> RenderConfig {
        let mut config = RenderConfig::default().with_composed_layouts(!self.generic_only);
        if let Some(scale) = self.font_scale {
            config = config.with_font_scale(scale);
        }
        if let Some(scale) = self.line_spacing_scale {
            config = config.with_line_spacing_scale(scale);
        }
        if let Some(scale) = self.paragraph_spacing_scale {
            config = config.with_paragraph_spacing_scale(scale);
        }
        if let Some(ratio) = self.corner_ratio {
            config = config.with_image_corner_ratio(ratio);
        }
        if let Some(dir) = &self.font_dir {
            config = config.with_font_dir(dir);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress lines go to stdout; RUST_LOG overrides the default level.
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stdout)
        .init();

    match &cli.command {
        Command::Html { input, output } => {
            render_html(input, output.as_deref())?;
        }
        Command::Pptx {
            input,
            output,
            options,
        } => {
            render_pptx(input, output.as_deref(), options)?;
        }
        Command::PdfToJson { input, output } => {
            pdf_to_json(input, output.as_deref())?;
        }
        Command::HtmlToJson { input, output } => {
            html_to_json(input, output.as_deref())?;
        }
        Command::Check { input } => check(input)?,
    }

    Ok(())
}

fn load(input: &Path) -> Result<Presentation> {
    ensure_exists(input)?;
    Presentation::load(input).with_context(|| format!("Failed to load {}", input.display()))
}

fn ensure_exists(input: &Path) -> Result<()> {
    if !input.is_file() {
        bail!("Input file not found: {}", input.display());
    }
    Ok(())
}

/// Directory of `path`, `.` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("presentation")
        .to_string()
}

fn render_html(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let presentation = load(input)?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("html"));

    HtmlRenderer::new()
        .render_to_file(&presentation, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Ok(output_path)
}

fn render_pptx(input: &Path, output: Option<&Path>, options: &DeckOptions) -> Result<PathBuf> {
    let presentation = load(input)?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| parent_dir(input).join(format!("{}_editable.pptx", file_stem(input))));

    let config = options.to_config();
    let renderer = DeckRenderer::new(&config)?;

    let assets = if options.offline {
        AssetResolver::offline()
    } else {
        AssetResolver::new(&config)?
    };
    let mut assets = assets.with_base_dir(parent_dir(input));

    let report = renderer
        .render_to_file(&presentation, &mut assets, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    for (number, reason) in report.skipped() {
        log::warn!("Slide {} was not rendered: {}", number, reason);
    }

    if config.available_fonts().is_empty() {
        log::info!("Primary font files not found, deck references {}", config.fallback_font);
    } else {
        let copied = copy_fonts(&config, &parent_dir(&output_path))?;
        log::info!("Copied {} font files", copied);
    }

    Ok(output_path)
}

/// Copy the font files present in the font directory into `fonts/` under `output_dir`.
fn copy_fonts(config: &RenderConfig, output_dir: &Path) -> Result<usize> {
    let fonts = config.available_fonts();
    if fonts.is_empty() {
        return Ok(0);
    }

    let target_dir = output_dir.join("fonts");
    std::fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {}", target_dir.display()))?;

    let mut copied = 0;
    for font in &fonts {
        let Some(name) = font.file_name() else {
            continue;
        };
        let target = target_dir.join(name);
        if target == *font {
            continue;
        }
        std::fs::copy(font, &target).with_context(|| format!("Failed to copy {}", font.display()))?;
        log::debug!("Copied {}", target.display());
        copied += 1;
    }
    Ok(copied)
}

fn pdf_to_json(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    ensure_exists(input)?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| parent_dir(input).join(format!("{}.json", file_stem(input))));

    let value = PdfExtractor::new()
        .extract_file(input)
        .with_context(|| format!("Failed to analyze {}", input.display()))?;
    write_json(&output_path, &value)?;

    log::info!("Analysis complete. Saved to {}", output_path.display());
    Ok(output_path)
}

fn html_to_json(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    ensure_exists(input)?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| parent_dir(input).join("presentation.json"));

    let value = HtmlExtractor::new()
        .extract_file(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    write_json(&output_path, &value)?;

    log::info!(
        "Wrote {} slides to {}",
        value["slides"].as_array().map_or(0, Vec::len),
        output_path.display()
    );
    Ok(output_path)
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    ensure_exists(input)?;
    let text = std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;

    if let Err(e) = serde_json::from_str::<Value>(&text) {
        println!("JSON Decode Error: {}", e);
        for line in error_context(&text, e.line()) {
            println!("{}", line);
        }
        bail!("{} is not valid JSON", input.display());
    }

    let presentation = Presentation::from_json_str(&text)
        .with_context(|| format!("{} is not a valid presentation", input.display()))?;
    println!("JSON is valid ({} slides)", presentation.slides.len());
    Ok(())
}

/// Numbered lines around the 1-based `line`, five on each side.
fn error_context(text: &str, line: usize) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    if line == 0 || lines.is_empty() {
        return Vec::new();
    }
    let start = line.saturating_sub(6);
    let end = (line + 5).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{}: {}", start + i + 1, l))
        .collect()
}
