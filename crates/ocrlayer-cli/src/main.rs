mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ocrlayer",
    version,
    about = "Build positional text layers from OCR engine output"
)]
struct Cli {
    /// Log reconciliation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run OCR on a page image and print its text layer
    Ocr {
        /// Path to the page image
        image: PathBuf,

        /// OCR engine: tesseract or cuneiform (overrides the config file)
        #[arg(short, long)]
        engine: Option<String>,

        /// Engine to try if the first one fails (overrides the config file)
        #[arg(short, long)]
        fallback: Option<String>,

        /// JSON config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Write the text layer to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Fit a box file to its plain-text transcript
    Reconcile {
        /// Box file (char xmin ymin xmax ymax [page] per line)
        box_file: PathBuf,

        /// Plain-text transcript of the same page
        text_file: PathBuf,

        /// Drop quote and backslash characters instead of escaping them
        #[arg(long)]
        drop_quotes: bool,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        output: String,
    },
    /// Convert hOCR markup into a text layer
    Markup {
        /// hOCR document
        markup_file: PathBuf,

        /// Page image height in pixels, used to flip the y-axis
        #[arg(long)]
        height: u32,

        /// Drop quote and backslash characters instead of escaping them
        #[arg(long)]
        drop_quotes: bool,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        output: String,
    },
    /// List supported OCR engines and whether they are installed
    Engines,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Ocr {
            image,
            engine,
            fallback,
            config,
            output,
            out,
        } => commands::ocr::run(image, engine, fallback, config, &output, out),
        Commands::Reconcile {
            box_file,
            text_file,
            drop_quotes,
            output,
        } => commands::reconcile::run(box_file, text_file, drop_quotes, &output),
        Commands::Markup {
            markup_file,
            height,
            drop_quotes,
            output,
        } => commands::markup::run(markup_file, height, drop_quotes, &output),
        Commands::Engines => commands::engines::list(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();
}
