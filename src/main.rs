use clap::{Parser, Subcommand};
use metric_mcmaster::config::Settings;
use metric_mcmaster::convert;
use metric_mcmaster::dom::Document;
use metric_mcmaster::scan::{report_json, Scanner};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metric-mcmaster")]
#[command(about = "Annotate imperial measurements in HTML with metric conversions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every measurement in a piece of text
    Convert {
        /// Text to convert (e.g., "2 in and 3 lb")
        text: String,
    },

    /// List the supported unit symbols
    Units,

    /// Annotate an HTML file and write the result
    Scan {
        /// HTML file path
        path: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Settings file (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Treat the input as a fragment rather than a full document
        #[arg(long)]
        fragment: bool,
    },

    /// Print the annotations an HTML file would get, as JSON
    Report {
        /// HTML file path
        path: String,

        /// Settings file (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Treat the input as a fragment rather than a full document
        #[arg(long)]
        fragment: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { text } => {
            println!("{}", convert::convert_inline_text(&text));
            Ok(())
        }
        Commands::Units => {
            list_units();
            Ok(())
        }
        Commands::Scan {
            path,
            output,
            config,
            fragment,
        } => scan_file(&path, output.as_deref(), config.as_deref(), fragment),
        Commands::Report {
            path,
            config,
            fragment,
        } => report_file(&path, config.as_deref(), fragment),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn list_units() {
    for symbol in convert::units::symbols() {
        if let Some(unit) = convert::lookup(symbol) {
            println!("  {:<4} -> {}", symbol, unit.metric_symbol());
        }
    }
}

fn load_document(path: &str, fragment: bool) -> Result<Document, Box<dyn std::error::Error>> {
    let html = std::fs::read_to_string(path)?;
    Ok(if fragment {
        Document::parse_fragment(&html)
    } else {
        Document::parse(&html)
    })
}

fn scan_file(
    path: &str,
    output: Option<&str>,
    config: Option<&str>,
    fragment: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let scanner = Scanner::new(Settings::load_or_default(config)?);
    let mut doc = load_document(path, fragment)?;
    let report = scanner.run_document(&mut doc);

    eprintln!(
        "Annotated {} of {} elements",
        report.annotations.len(),
        report.elements
    );

    let html = doc.to_html();
    if let Some(output_path) = output {
        std::fs::write(output_path, html)?;
        eprintln!("Annotated HTML written to {}", output_path);
    } else {
        println!("{}", html);
    }

    Ok(())
}

fn report_file(
    path: &str,
    config: Option<&str>,
    fragment: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let scanner = Scanner::new(Settings::load_or_default(config)?);
    let mut doc = load_document(path, fragment)?;
    let report = scanner.run_document(&mut doc);

    println!("{}", report_json(&doc, &report)?);

    Ok(())
}
