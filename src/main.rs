//! # invoice-render CLI
//!
//! Usage:
//!   invoice-render draft.json -s settings.json -o invoice.pdf
//!   cat draft.json | invoice-render -t compact -o invoice.pdf
//!   invoice-render --example > draft.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use invoice_render::{render_to_path, Document, RenderError, Settings};

#[derive(Parser)]
#[command(name = "invoice-render", version, about = "Render an invoice or quote draft to PDF")]
struct Cli {
    /// Document JSON. Reads stdin when omitted or "-".
    input: Option<PathBuf>,

    /// Settings JSON (company profile, template, page size).
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Template name, overriding the settings file.
    #[arg(short, long)]
    template: Option<String>,

    /// Output PDF path.
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// Log layout decisions to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Print a sample document and exit.
    #[arg(long)]
    example: bool,
}

/// Plain stderr logger. The library only uses the `log` facade.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() {
    let cli = Cli::parse();

    if cli.example {
        print!("{}", example_document_json());
        return;
    }

    let _ = log::set_logger(&LOGGER);
    log::set_max_level(if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });

    match run(&cli) {
        Ok(path) => eprintln!("Written {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf, RenderError> {
    let input = match cli.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let doc: Document = serde_json::from_str(&input)?;

    let mut settings: Settings = match &cli.settings {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };
    if let Some(template) = &cli.template {
        settings.pdf.template = Some(template.clone());
    }

    render_to_path(&doc, &settings, &cli.output)
}

fn example_document_json() -> &'static str {
    r##"{
  "kind": "invoice",
  "client": {
    "name": "Jane Doe",
    "business": "Doe Industries",
    "address": "12 Harbour Road\nPort Elizabeth",
    "email": "jane@doe.example",
    "phone": "+27 41 555 0100"
  },
  "meta": {
    "number": "INV-2024-001",
    "date": "2024-03-01",
    "due_date": "2024-03-31",
    "terms": "Net 30",
    "status": "UNPAID"
  },
  "items": [
    {
      "service": "Consulting",
      "description": "Initial setup\nand configuration",
      "qty": 2,
      "unit_price": 150.0,
      "tax_pct": 8
    },
    {
      "service": "Support",
      "description": "Monthly support retainer covering email and phone assistance",
      "qty": 1,
      "unit_price": 90.0,
      "tax_pct": 8
    }
  ],
  "totals": {
    "subtotal": 390.0,
    "tax": 31.2,
    "grand_total": 421.2
  },
  "notes": "Thank you for your business!\nPayment by bank transfer."
}
"##
}
