//! nesting-report - CLI tool to resolve and export steel bar nesting reports.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use nesting_core::generator::{layout_pages, render_dxf, render_svg, PrintBar};
use nesting_core::report::{bill_of_materials, pattern_summaries, BomRow, PatternSummary};
use nesting_core::{
    parse_report_file, validate_patterns, Layout, LayoutCache, Pattern, ResolverConfig,
};

/// Output format for resolved layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Printable A4-landscape pages as SVG
    Svg,
    /// Printable A4-landscape pages as DXF
    Dxf,
    /// Resolved layouts as JSON
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Dxf => "dxf",
            Format::Json => "json",
        }
    }
}

/// Resolve steel bar cutting patterns into printable nesting layouts.
#[derive(Parser, Debug)]
#[command(name = "nesting-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input optimizer response (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (defaults to the input path with the format's extension;
    /// JSON goes to stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Print the bill of materials and per-bar summary as JSON
    #[arg(long)]
    bom: bool,

    /// Resolver thresholds as JSON (fields default when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deviation below which an end is drawn straight (degrees)
    #[arg(long)]
    near_straight: Option<f64>,

    /// Miter below which an end may share a straight cut (degrees)
    #[arg(long)]
    negligible_miter: Option<f64>,

    /// Largest difference between two miters that form one cut (degrees)
    #[arg(long)]
    match_tolerance: Option<f64>,

    /// Threshold for squaring off a negligible second miter (degrees)
    #[arg(long)]
    two_sided_min: Option<f64>,

    /// Threshold for turning the first part on the bar (degrees)
    #[arg(long)]
    anchor_straight: Option<f64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// One resolved bar in JSON output.
#[derive(Serialize)]
struct ResolvedBar<'a> {
    pattern: usize,
    profile: Option<&'a str>,
    layout: &'a Layout,
}

/// BOM output document.
#[derive(Serialize)]
struct BomDocument {
    bill_of_materials: Vec<BomRow>,
    patterns: Vec<PatternSummary>,
}

/// Build resolver thresholds from `--config` and per-threshold flags.
fn build_config(args: &Args) -> Result<ResolverConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid resolver config in {}", path.display()))?
        }
        None => ResolverConfig::default(),
    };

    if let Some(deg) = args.near_straight {
        config = config.with_near_straight(deg);
    }
    if let Some(deg) = args.negligible_miter {
        config = config.with_negligible_miter(deg);
    }
    if let Some(deg) = args.match_tolerance {
        config = config.with_match_tolerance(deg);
    }
    if let Some(deg) = args.two_sided_min {
        config = config.with_two_sided_min(deg);
    }
    if let Some(deg) = args.anchor_straight {
        config = config.with_anchor_straight(deg);
    }

    if !config.is_valid() {
        anyhow::bail!("Resolver thresholds must be finite and non-negative: {:?}", config);
    }
    Ok(config)
}

/// Caption printed above a bar.
fn caption(pattern: &Pattern, number: usize) -> String {
    let profile = pattern.profile_name.as_deref().unwrap_or("unknown profile");
    match pattern.stock_length_mm() {
        Some(stock) => format!(
            "{} | bar {} | stock {:.0} mm | {} part(s)",
            profile,
            number,
            stock,
            pattern.parts.len()
        ),
        None => format!("{} | bar {}", profile, number),
    }
}

fn default_output(input: &Path, format: Format) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension(format.extension());
    path
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Generated: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = build_config(&args)?;

    info!("Processing: {}", args.input.display());

    let report = parse_report_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    let patterns = report.patterns();

    info!(
        "Parsed {} pattern(s) in {} profile(s)",
        patterns.len(),
        report.profiles.len()
    );

    // Validate
    let validation = validate_patterns(&patterns)?;

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    // Validate-only mode
    if args.validate {
        if !validation.passed {
            anyhow::bail!("Validation failed");
        }
        info!("Validation passed");
        return Ok(());
    }

    if args.bom {
        let document = BomDocument {
            bill_of_materials: bill_of_materials(&patterns, &config),
            patterns: pattern_summaries(&patterns),
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    // Resolve
    let mut cache = LayoutCache::new();
    let layouts: Vec<Arc<Layout>> = patterns
        .iter()
        .map(|pattern| cache.resolve(pattern, &config))
        .collect();

    info!(
        "Resolved {} layout(s), {} distinct",
        layouts.len(),
        cache.len()
    );

    match args.format {
        Format::Json => {
            let bars: Vec<ResolvedBar> = patterns
                .iter()
                .zip(&layouts)
                .enumerate()
                .map(|(idx, (pattern, layout))| ResolvedBar {
                    pattern: idx + 1,
                    profile: pattern.profile_name.as_deref(),
                    layout: layout.as_ref(),
                })
                .collect();
            let json = serde_json::to_string_pretty(&bars)?;
            match &args.output {
                Some(path) => write_output(path, &json)?,
                None => println!("{}", json),
            }
        }
        Format::Svg | Format::Dxf => {
            let captions: Vec<String> = patterns
                .iter()
                .enumerate()
                .map(|(idx, pattern)| caption(pattern, idx + 1))
                .collect();
            let bars: Vec<PrintBar> = captions
                .iter()
                .zip(&layouts)
                .map(|(caption, layout)| PrintBar {
                    caption,
                    layout: layout.as_ref(),
                })
                .collect();
            let pages = layout_pages(&bars);
            info!("Laid out {} page(s)", pages.len());

            let content = if args.format == Format::Svg {
                render_svg(&pages)
            } else {
                render_dxf(&pages)
            };
            let output_path = args
                .output
                .clone()
                .unwrap_or_else(|| default_output(&args.input, args.format));
            write_output(&output_path, &content)?;
        }
    }

    Ok(())
}
