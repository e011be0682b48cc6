//! docweave CLI - PDF to DOCX conversion tool

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;

use docweave::Docweave;

#[derive(Parser)]
#[command(name = "docweave")]
#[command(version)]
#[command(about = "Convert positioned-text PDFs to structured DOCX", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output DOCX file (defaults to the input name with .docx)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the structure analysis summary as JSON and exit
    #[arg(long)]
    stats: bool,

    /// Fail on any page extraction error instead of degrading
    #[arg(long)]
    strict: bool,

    /// Keep unmapped source font names instead of substituting defaults
    #[arg(long)]
    preserve_fonts: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Err(message) = run(&cli) {
        eprintln!("{} {}", "error:".red().bold(), message);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let data = fs::read(&cli.input)
        .map_err(|e| format!("cannot read {}: {e}", cli.input.display()))?;

    let mut builder = Docweave::new();
    if cli.strict {
        builder = builder.strict();
    }
    if cli.preserve_fonts {
        builder = builder.preserve_original_fonts();
    }

    if cli.stats {
        let analyzed = builder
            .analyze(&data)
            .map_err(|e| format!("[{}] {e}", e.code()))?;
        let summary = serde_json::json!({
            "document_type": analyzed.document_type.as_str(),
            "title": analyzed.title,
            "sections": analyzed.sections.len(),
            "headers": analyzed.headers.len(),
            "paragraphs": analyzed.paragraphs.len(),
            "lists": analyzed.lists.len(),
            "tables": analyzed.tables.len(),
            "images": analyzed.images.len(),
            "footnotes": analyzed.footnotes.len(),
            "notes": analyzed.notes.len(),
            "complexity": analyzed.complexity,
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
        return Ok(());
    }

    let docx = builder
        .convert(&data)
        .map_err(|e| format!("[{}] {e}", e.code()))?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("docx"));
    fs::write(&output, &docx)
        .map_err(|e| format!("cannot write {}: {e}", output.display()))?;

    println!(
        "{} {} {} {} ({} bytes)",
        "converted".green().bold(),
        cli.input.display(),
        "->".dimmed(),
        output.display(),
        docx.len()
    );

    Ok(())
}
