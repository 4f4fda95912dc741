//! # notas-cli
//!
//! Command-line interface for notas.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use notas_core::{
    Artifact, CleanConfig, CleanStats, DateOrder, ExportFormat, Pipeline, PipelineConfig,
    TableExtractor,
};
use notas_pdf::PdfOptions;
use notas_sheet::Sheet;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// notas - exam-score PDF to clean spreadsheet
#[derive(Parser)]
#[command(name = "notas")]
#[command(author, version, about = "Extract, clean and export exam-score tables from PDFs", long_about = None)]
struct Cli {
    /// PDF to process ("-" reads stdin)
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Output file ("-" writes to stdout)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<String>,

    /// Export format (xlsx, csv, json)
    #[arg(short = 'x', long = "export-format", default_value = "xlsx")]
    export_format: ExportArg,

    /// Preview format (table, json, csv)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Only read pages START-END (1-based, inclusive)
    #[arg(long = "pages", value_name = "START-END", value_parser = parse_page_range)]
    pages: Option<(usize, usize)>,

    /// Minimum rows for a detected table
    #[arg(long = "min-rows", default_value_t = 2)]
    min_rows: usize,

    /// Minimum columns for a detected table
    #[arg(long = "min-cols", default_value_t = 2)]
    min_cols: usize,

    /// Read DataNac as mm/dd/yyyy instead of dd/mm/yyyy
    #[arg(long = "month-first")]
    month_first: bool,

    /// Rows shown in previews (0 hides them)
    #[arg(long = "preview-rows", default_value_t = 10)]
    preview_rows: usize,

    /// Start interactive mode
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for previews.
#[derive(Clone, Copy, Debug, Default, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Pretty table output (default)
    #[default]
    Table,
}

/// File format of the exported artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, clap::ValueEnum)]
enum ExportArg {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Xlsx => ExportFormat::Xlsx,
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = build_config(&cli);
    let pipeline = Pipeline::new(config.clone());
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output_name().to_string());
    let console = Console {
        to_stderr: output == "-",
        format: cli.format,
        preview_rows: cli.preview_rows,
    };

    if cli.interactive {
        run_repl(&pipeline, &console, &output)?;
        Ok(ExitCode::SUCCESS)
    } else if let Some(file) = cli.file.as_deref() {
        let pdf = read_input(file)?;
        match process_document(&pipeline, &pdf, &console)? {
            Some(artifact) => {
                write_artifact(&artifact, &output, &console)?;
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        }
    } else {
        // No arguments - show help
        Cli::parse_from(["notas", "--help"]);
        Ok(ExitCode::SUCCESS)
    }
}

/// Map command-line flags onto the pipeline configuration.
fn build_config(cli: &Cli) -> PipelineConfig {
    let mut pdf = PdfOptions::default().with_min_table_size(cli.min_rows, cli.min_cols);
    if let Some((start, end)) = cli.pages {
        pdf = pdf.with_page_range(start, end);
    }

    let date_order = if cli.month_first {
        DateOrder::MonthFirst
    } else {
        DateOrder::DayFirst
    };

    let mut config = PipelineConfig::default()
        .with_pdf_options(pdf)
        .with_clean_config(CleanConfig::default().with_date_order(date_order))
        .with_export_format(cli.export_format.into());
    if let Some(output) = cli.output.as_deref().filter(|o| *o != "-") {
        config = config.with_output_name(output);
    }
    config
}

/// Parse a `START-END` page range.
fn parse_page_range(s: &str) -> Result<(usize, usize), String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("invalid page range '{s}', expected START-END"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start page '{start}'"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end page '{end}'"))?;
    if start == 0 || start > end {
        return Err(format!("invalid page range {start}-{end}"));
    }
    Ok((start, end))
}

/// Read the PDF bytes from a path, or from stdin for "-".
fn read_input(file: &str) -> Result<Vec<u8>> {
    if file == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read(file).with_context(|| format!("Failed to read file: {file}"))
    }
}

/// Status and preview printer. Everything goes to stderr when the artifact
/// itself is written to stdout.
struct Console {
    to_stderr: bool,
    format: OutputFormat,
    preview_rows: usize,
}

impl Console {
    fn say(&self, msg: impl Display) {
        if self.to_stderr {
            eprintln!("{msg}");
        } else {
            println!("{msg}");
        }
    }

    fn error(&self, msg: impl Display) {
        eprintln!("{}", msg.to_string().red());
    }

    fn preview(&self, sheet: &Sheet) -> Result<()> {
        if self.preview_rows == 0 {
            return Ok(());
        }
        if sheet.is_empty() {
            self.say("(tabela vazia)");
            return Ok(());
        }
        self.say(render_preview(sheet, self.format, self.preview_rows)?);
        Ok(())
    }
}

/// Render the first `max_rows` rows of a sheet.
fn render_preview(sheet: &Sheet, format: OutputFormat, max_rows: usize) -> Result<String> {
    let text = match format {
        OutputFormat::Table => sheet.to_pretty_string(max_rows),
        OutputFormat::Json => {
            let records: Vec<_> = sheet.to_records().into_iter().take(max_rows).collect();
            serde_json::to_string_pretty(&records)?
        }
        OutputFormat::Csv => head(sheet, max_rows)?.to_csv_string(),
    };
    Ok(text)
}

fn head(sheet: &Sheet, n: usize) -> Result<Sheet> {
    let rows: Vec<_> = sheet.rows().take(n).cloned().collect();
    Ok(Sheet::from_rows(sheet.column_names().iter().cloned(), rows)?)
}

/// Run every stage on one document, reporting progress as it goes.
///
/// Returns `None` when a stage failed; the failure has been reported.
fn process_document<E: TableExtractor>(
    pipeline: &Pipeline<E>,
    pdf: &[u8],
    console: &Console,
) -> Result<Option<Artifact>> {
    console.say("Arquivo carregado com sucesso!".green());

    let combined = match pipeline.extract(pdf) {
        Ok(combined) => combined,
        Err(e) => {
            console.error(&e);
            console.error("Não foi possível extrair as tabelas do PDF.");
            return Ok(None);
        }
    };
    console.say("Tabela extraída do PDF:".cyan().bold());
    console.preview(&combined)?;

    console.say("Processando e limpando dados...");
    let records = match pipeline.clean(&combined) {
        Ok(records) => records,
        Err(e) => {
            console.error(&e);
            return Ok(None);
        }
    };
    console.say("Dados limpos:".cyan().bold());
    console.preview(&records.to_sheet()?)?;
    console.say(format_stats(&records.stats));

    match pipeline.export(&records) {
        Ok(artifact) => Ok(Some(artifact)),
        Err(e) => {
            console.error(&e);
            Ok(None)
        }
    }
}

fn format_stats(stats: &CleanStats) -> String {
    format!(
        "{} de {} linha(s) mantida(s): {} eliminado(s), {} NroFilho sem valor, {} duplicada(s), {} incompleta(s)",
        stats.output_rows,
        stats.input_rows,
        stats.eliminated,
        stats.nro_filho_defaulted,
        stats.duplicates_removed,
        stats.incomplete_removed
    )
}

/// Write the artifact to `output`, or to stdout for "-".
fn write_artifact(artifact: &Artifact, output: &str, console: &Console) -> Result<()> {
    if output == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&artifact.bytes)?;
        stdout.flush()?;
        return Ok(());
    }

    std::fs::write(output, &artifact.bytes)
        .with_context(|| format!("Failed to write file: {output}"))?;
    console.say(format!(
        "{} {output} ({} bytes)",
        "Planilha salva:".green().bold(),
        artifact.bytes.len()
    ));
    Ok(())
}

/// Run the interactive session: each line is a PDF path.
fn run_repl<E: TableExtractor>(
    pipeline: &Pipeline<E>,
    console: &Console,
    output: &str,
) -> Result<()> {
    println!(
        "{} {} - Interactive Mode",
        "notas".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Type a PDF path to process it, {} for help, {} to exit\n",
        ":help".yellow(),
        ":quit".yellow()
    );

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    // Load history if available
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = "notas> ".green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    match line {
                        ":quit" | ":q" | ":exit" => break,
                        ":help" | ":h" | ":?" => {
                            print_help();
                            continue;
                        }
                        ":clear" => {
                            print!("\x1B[2J\x1B[1;1H");
                            continue;
                        }
                        _ => {
                            println!("{} Unknown command: {}", "Error:".red().bold(), line);
                            continue;
                        }
                    }
                }

                let pdf = match read_input(line) {
                    Ok(pdf) => pdf,
                    Err(e) => {
                        println!("{} {e:#}", "Error:".red().bold());
                        continue;
                    }
                };
                let result = process_document(pipeline, &pdf, console).and_then(|artifact| {
                    artifact.map_or(Ok(()), |a| write_artifact(&a, output, console))
                });
                if let Err(e) = result {
                    println!("{} {e:#}", "Error:".red().bold());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Até logo!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("notas");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}

fn print_help() {
    println!("{}", "notas REPL Commands:".cyan().bold());
    println!("  {}    Show this help", ":help, :h, :?".yellow());
    println!("  {}  Exit the REPL", ":quit, :q, :exit".yellow());
    println!("  {}         Clear screen", ":clear".yellow());
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  resultado_final.pdf");
    println!("  /tmp/notas/pagina_1-3.pdf");
}
