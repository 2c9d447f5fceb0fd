//! CLI binary for giordano-catalogue.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `CatalogueConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use giordano_catalogue::{
    generate, CardsPerRow, CatalogueConfig, CatalogueInputs, CatalogueProgressCallback,
    ProgressCallback, DEFAULT_OUTPUT_NAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Terminal progress callback: one bar over the product rows, plus a log
/// line for every row left out for lack of a photo.
struct CliProgressCallback {
    bar: ProgressBar,
    skipped: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_run_start` tells us how many rows there are.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading products and photos…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            skipped: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} rows  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Cards");
    }
}

impl CatalogueProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_rows: usize) {
        self.activate_bar(total_rows);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Building cards for {total_rows} products…"))
        ));
    }

    fn on_card_rendered(&self, _index: usize, _total: usize, model: &str) {
        self.bar.set_message(model.to_string());
        self.bar.inc(1);
    }

    fn on_row_skipped(&self, index: usize, total: usize, model: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} Row {:>4}/{:<4}  {}  {}",
            yellow("–"),
            index,
            total,
            model,
            dim("no photo"),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, cards: usize, pages: usize) {
        self.bar.finish_and_clear();
        let skipped = self.skipped.load(Ordering::SeqCst);
        eprintln!(
            "{} {} cards on {} pages{}",
            green("✔"),
            bold(&cards.to_string()),
            bold(&pages.to_string()),
            if skipped > 0 {
                dim(&format!("  ({skipped} rows without photos)"))
            } else {
                String::new()
            },
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Two cards per row, photos from a ZIP
  catalogue --data products.xlsx --images photos.zip

  # Three per row with a logo on the first page
  catalogue --data products.csv --images photos.zip --logo logo.png --cards-per-row 3

  # Photos already unpacked, extra copy next to the inputs
  catalogue --data products.csv --images ./photos -o ./Catalogue.pdf

  # Run stats as JSON
  catalogue --data products.csv --images photos.zip --json > stats.json

INPUT FORMATS:
  CSV          Header row with Model, EAN, MRP, Discount, CSP, Inventory, Remarks
  xlsx/xls/ods First sheet; six banner rows, then columns
               (skip), Model, EAN, MRP, (skip), Discount, CSP, Inventory, Remarks

  Each product's photo must be named <Model>.jpg. Rows without one are skipped.

OUTPUT:
  <workspace>/output/cards/<Model>.jpg     one card per product
  <workspace>/output/Giordano_Catalogue.pdf
"#;

/// Build a printable product catalogue PDF from a product table and photos.
#[derive(Parser, Debug)]
#[command(
    name = "catalogue",
    version,
    about = "Build a printable product catalogue PDF from a product table and photos",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Product table: CSV, xlsx, xls or ods.
    #[arg(long, env = "CATALOGUE_DATA")]
    data: PathBuf,

    /// ZIP archive of <Model>.jpg photos, or a directory holding them.
    #[arg(long, env = "CATALOGUE_IMAGES")]
    images: PathBuf,

    /// Logo placed at the top of the first page.
    #[arg(long, env = "CATALOGUE_LOGO")]
    logo: Option<PathBuf>,

    /// Cards side by side in each row (2 or 3).
    #[arg(long, env = "CATALOGUE_CARDS_PER_ROW", default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(2..=3))]
    cards_per_row: u8,

    /// Directory holding uploads/ and output/.
    #[arg(long, env = "CATALOGUE_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// File name of the PDF inside output/.
    #[arg(long, env = "CATALOGUE_OUTPUT_NAME", default_value = DEFAULT_OUTPUT_NAME)]
    output_name: String,

    /// Also write the finished PDF to this path.
    #[arg(short, long, env = "CATALOGUE_OUTPUT")]
    output: Option<PathBuf>,

    /// TrueType font for the card text.
    #[arg(long, env = "CATALOGUE_FONT")]
    font: Option<PathBuf>,

    /// Card text size in pixels (8–96).
    #[arg(long, env = "CATALOGUE_FONT_SIZE", default_value_t = 24.0)]
    font_size: f32,

    /// Print run stats as JSON on stdout.
    #[arg(long, env = "CATALOGUE_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "CATALOGUE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CATALOGUE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CATALOGUE_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO logs would interleave with the progress bar; keep them off then.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn CatalogueProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    let mut inputs = CatalogueInputs::new(&cli.data, &cli.images);
    if let Some(ref logo) = cli.logo {
        inputs = inputs.with_logo(logo);
    }

    // ── Run ──────────────────────────────────────────────────────────────
    let output = generate(&inputs, &config).context("Catalogue generation failed")?;

    if let Some(ref dest) = cli.output {
        output
            .copy_to(dest)
            .with_context(|| format!("Failed to copy catalogue to {}", dest.display()))?;
    }

    if cli.json {
        let json =
            serde_json::to_string_pretty(&output.stats).context("Failed to serialise stats")?;
        println!("{json}");
    } else if !cli.quiet {
        if !show_progress {
            eprintln!(
                "Placed {} cards on {} pages ({} rows skipped) in {}ms",
                output.stats.cards_rendered,
                output.stats.pages,
                output.stats.rows_skipped,
                output.stats.total_duration_ms
            );
        }
        eprintln!("   →  {}", bold(&output.path.display().to_string()));
        if let Some(ref dest) = cli.output {
            eprintln!("   →  {}", bold(&dest.display().to_string()));
        }
    }

    Ok(())
}

/// Map CLI args to `CatalogueConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<CatalogueConfig> {
    let cards_per_row = CardsPerRow::try_from(cli.cards_per_row)?;

    let mut builder = CatalogueConfig::builder()
        .cards_per_row(cards_per_row)
        .workspace_root(&cli.workspace)
        .output_name(&cli.output_name)
        .font_size(cli.font_size);

    if let Some(ref font) = cli.font {
        builder = builder.font_path(font);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("catalogue").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--data", "p.csv", "--images", "i.zip"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.cards_per_row, CardsPerRow::Two);
        assert_eq!(config.output_name, DEFAULT_OUTPUT_NAME);
        assert_eq!(config.workspace_root, PathBuf::from("."));
        assert!(config.font_path.is_none());
    }

    #[test]
    fn three_per_row_and_font() {
        let cli = parse(&[
            "--data",
            "p.csv",
            "--images",
            "i.zip",
            "--cards-per-row",
            "3",
            "--font",
            "DejaVuSans.ttf",
            "--font-size",
            "200",
        ]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.cards_per_row, CardsPerRow::Three);
        assert_eq!(config.font_path, Some(PathBuf::from("DejaVuSans.ttf")));
        assert_eq!(config.font_size, 96.0);
    }

    #[test]
    fn rejects_four_per_row() {
        let res = Cli::try_parse_from([
            "catalogue",
            "--data",
            "p.csv",
            "--images",
            "i.zip",
            "--cards-per-row",
            "4",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_non_pdf_name() {
        let cli = parse(&["--data", "p.csv", "--images", "i.zip", "--output-name", "cat.txt"]);
        assert!(build_config(&cli, None).is_err());
    }
}
