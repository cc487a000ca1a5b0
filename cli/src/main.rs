//! unipynb CLI - Jupyter notebook to Markdown conversion tool
//!
//! A command-line tool for converting one or more `.ipynb` files to Markdown.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use unipynb::{BatchConverter, CodeStyle, ConversionReport, ConvertOptions, RenderOptions};

/// Jupyter notebook conversion to Markdown
#[derive(Parser)]
#[command(
    name = "unipynb",
    author = "iyulab",
    version,
    about = "Convert Jupyter notebooks (.ipynb) to Markdown (.md)",
    long_about = "unipynb - Jupyter notebook to Markdown converter.\n\n\
                  Output images are saved to an images/ directory next to the\n\
                  Markdown file unless --embed-images is given.\n\n\
                  Usage:\n  \
                  unipynb notebook.ipynb\n  \
                  unipynb notebook.ipynb -o output.md\n  \
                  unipynb *.ipynb --overwrite"
)]
struct Cli {
    /// Notebook file(s) to convert
    #[arg(required = true)]
    notebooks: Vec<PathBuf>,

    /// Output Markdown file path (only works with a single input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory to save images (default: images/ next to the output file)
    #[arg(long, conflicts_with = "embed_images")]
    image_dir: Option<PathBuf>,

    /// Embed images as base64 data URIs instead of saving files
    #[arg(long)]
    embed_images: bool,

    /// Overwrite existing Markdown files without asking
    #[arg(long)]
    overwrite: bool,

    /// Code fence language (default: the notebook's kernel language)
    #[arg(long)]
    language: Option<String>,

    /// Render code cells as HTML blocks with a copy button
    #[arg(long)]
    html_code: bool,

    /// Strip ANSI escape sequences from streams and tracebacks
    #[arg(long)]
    strip_ansi: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = convert_options(&cli);
    options.validate_batch(cli.notebooks.len())?;
    log::debug!("Converting {} notebook(s)", cli.notebooks.len());

    let stdin = io::stdin();
    let mut converter = BatchConverter::new(&options);

    for notebook in &cli.notebooks {
        let output = options.output_for(notebook);

        if output.exists() && !cli.overwrite && !confirm_overwrite(&output, &mut stdin.lock())? {
            log::debug!("Overwrite declined for {}", output.display());
            println!("Skipping {}", notebook.display());
            continue;
        }

        let pb = create_spinner(&format!("Converting {}...", notebook.display()));
        let result = converter.convert(notebook);
        pb.finish_and_clear();

        let report =
            result.map_err(|e| format!("Error converting '{}': {}", notebook.display(), e))?;
        log::debug!(
            "{}: {} images, {} warnings",
            report.output.display(),
            report.images_written,
            report.warnings.len()
        );
        print_report(&report);
    }

    Ok(())
}

fn convert_options(cli: &Cli) -> ConvertOptions {
    let mut render = RenderOptions::default();
    if let Some(ref language) = cli.language {
        render = render.with_language(language.clone());
    }
    if cli.html_code {
        render = render.with_code_style(CodeStyle::Html);
    }
    if cli.strip_ansi {
        render = render.with_strip_ansi();
    }

    ConvertOptions {
        output: cli.output.clone(),
        image_dir: cli.image_dir.clone(),
        embed_images: cli.embed_images,
        render,
    }
}

/// Asks whether `path` may be overwritten. Anything but y/yes declines.
fn confirm_overwrite<R: BufRead>(path: &Path, input: &mut R) -> io::Result<bool> {
    print!("File '{}' already exists. Overwrite? (y/n): ", path.display());
    io::stdout().flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        println!();
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_report(report: &ConversionReport) {
    for warning in &report.warnings {
        println!("{} {}", "!".yellow().bold(), warning);
    }
    println!(
        "{} Converted '{}' to '{}'",
        "✓".green().bold(),
        report.input.display(),
        report.output.display()
    );
    if let Some(ref image_dir) = report.image_dir {
        if report.images_written > 0 {
            println!(
                "  {} Saved {} images to '{}'",
                "✓".green(),
                report.images_written,
                image_dir.display()
            );
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
