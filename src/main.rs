//! # Folio CLI
//!
//! Usage:
//!   folio report.json -o pages.txt
//!   echo '{ ... }' | folio --format json
//!   folio --example > report.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use folio::render::text::TextHost;
use folio::{FolioError, Result};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain-text dump of every page
    Text,
    /// Layout metadata (page numbers, offsets, scale) as JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Paginate pre-measured report blocks into pages")]
struct Cli {
    /// Report definition JSON. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print an example report definition and exit.
    #[arg(long)]
    example: bool,

    /// Log page decisions.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if cli.example {
        print!("{}", example_report_json());
        return;
    }

    match run(&cli) {
        Ok(pages) => {
            log::info!("Wrote {} pages", pages);
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<usize> {
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let definition = folio::parse_json(&input)?;

    let (output, pages) = match cli.format {
        OutputFormat::Text => {
            let pages = folio::render(&definition)?;
            let text: String = pages.iter().map(|p| p.surface.as_str()).collect();
            (text, pages.len())
        }
        OutputFormat::Json => {
            let report = folio::paginate(&definition, &TextHost::default())?;
            let info = report.layout_info(folio::destination(&definition).printable_area())?;
            let json = serde_json::to_string_pretty(&info)
                .map_err(|e| FolioError::Render(e.to_string()))?;
            (json + "\n", report.len())
        }
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &output)?;
            eprintln!("✓ Written {} pages to {}", pages, path.display());
        }
        None => print!("{}", output),
    }
    Ok(pages)
}

fn example_report_json() -> &'static str {
    r##"{
  "title": "Record Card",
  "page": {
    "containerWidth": 700,
    "margin": { "top": 25, "right": 25, "bottom": 25, "left": 25 },
    "orientation": "Portrait",
    "printableArea": "A4"
  },
  "header": "Quarterly inventory",
  "footer": "Page {{pageNumber}} of {{totalPages}}",
  "headerOnlyOnFirstPage": true,
  "footerStartsFromSecondPage": false,
  "destination": "printer",
  "blocks": [
    { "handle": "Card 1", "height": 240, "margin": { "top": 0, "right": 0, "bottom": 10, "left": 0 } },
    { "handle": "Card 2", "height": 240, "margin": { "top": 0, "right": 0, "bottom": 10, "left": 0 } },
    { "handle": "Card 3", "height": 240, "margin": { "top": 0, "right": 0, "bottom": 10, "left": 0 } },
    { "handle": "Card 4", "height": 240, "margin": { "top": 0, "right": 0, "bottom": 10, "left": 0 } },
    { "handle": "Card 5", "height": 240, "margin": { "top": 0, "right": 0, "bottom": 10, "left": 0 } },
    { "handle": "Summary", "height": 120 }
  ]
}
"##
}
