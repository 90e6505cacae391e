//! CLI definition and dispatch.

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, DEFAULT_HEADER_ROW};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::xlsx_adapter::XlsxAdapter;
use crate::adapters::xlsx_report_adapter::{XlsxReportAdapter, DEFAULT_SHEET_NAME};
use crate::domain::category::Category;
use crate::domain::error::ConverterError;
use crate::domain::pipeline::{self, Conversion};
use crate::domain::rules::RuleSet;
use crate::domain::service_row::REQUIRED_COLUMNS;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "to-converter",
    about = "Convert an operations service report into per-category TO summaries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a service report into summary files
    Convert {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Classify and aggregate without writing any file
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the effective classification and charge rules
    Rules {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Everything the convert command needs from configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rules: RuleSet,
    pub header_row: usize,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub sheet_name: String,
    pub autofit: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Convert {
            input,
            config,
            output_dir,
            format,
            dry_run,
        } => run_convert(&input, config.as_ref(), output_dir, format, dry_run),
        Command::Rules { config } => run_rules(config.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            load_config(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, ConverterError> {
    let rules = RuleSet::from_config(config)?;

    let header_row = match config.get_string("input", "header_row") {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConverterError::ConfigInvalid {
                section: "input".into(),
                key: "header_row".into(),
                reason: format!("expected a non-negative row index, got \"{}\"", raw.trim()),
            })?,
        None => DEFAULT_HEADER_ROW,
    };

    let format = match config.get_string("output", "format") {
        Some(raw) => OutputFormat::parse(&raw).ok_or_else(|| ConverterError::ConfigInvalid {
            section: "output".into(),
            key: "format".into(),
            reason: format!("unknown format \"{}\" (expected xlsx or csv)", raw.trim()),
        })?,
        None => OutputFormat::Xlsx,
    };

    let sheet_name = config
        .get_string("output", "sheet_name")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

    Ok(Settings {
        rules,
        header_row,
        output_dir: config
            .get_string("output", "directory")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
        format,
        sheet_name,
        autofit: config.get_bool("output", "autofit", true),
    })
}

/// Pick a reader by file extension; anything that is not CSV goes to the
/// workbook reader.
pub fn data_port_for(input: &Path, header_row: usize) -> Box<dyn DataPort> {
    let is_csv = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvAdapter::new(input.to_path_buf()).with_header_row(header_row))
    } else {
        Box::new(XlsxAdapter::new(input.to_path_buf()).with_header_row(header_row))
    }
}

pub fn report_port_for(settings: &Settings) -> Box<dyn ReportPort> {
    match settings.format {
        OutputFormat::Xlsx => Box::new(
            XlsxReportAdapter::new(settings.output_dir.clone())
                .with_sheet_name(settings.sheet_name.clone())
                .with_autofit(settings.autofit),
        ),
        OutputFormat::Csv => Box::new(CsvReportAdapter::new(settings.output_dir.clone())),
    }
}

/// Read, convert and (unless `dry_run`) write every non-empty category table.
pub fn run_conversion_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    rules: &RuleSet,
    timestamp: NaiveDateTime,
    dry_run: bool,
) -> Result<(Conversion, Vec<PathBuf>), ConverterError> {
    log::info!("reading {}", data_port.source_name());
    let rows = data_port.fetch_rows()?;
    let conversion = pipeline::convert(&rows, rules, timestamp);

    if dry_run {
        return Ok((conversion, Vec::new()));
    }
    let written = report_port.write_all(&conversion.tables)?;
    Ok((conversion, written))
}

fn print_summary(conversion: &Conversion) {
    eprintln!("\n=== Conversion Summary ===");
    eprintln!("Rows classified:   {}", conversion.classified_rows);
    eprintln!("Rows unclassified: {}", conversion.unclassified_rows);
    for category in Category::ALL {
        let containers = conversion.table(category).map_or(0, |t| t.rows.len());
        eprintln!("  {:<26} {} containers", category.label(), containers);
    }
    if !conversion.warnings.is_empty() {
        eprintln!("\n{} containers skipped:", conversion.warnings.len());
        for w in &conversion.warnings {
            eprintln!("  warning: {w}");
        }
    }
}

fn run_convert(
    input: &Path,
    config_path: Option<&PathBuf>,
    output_dir: Option<PathBuf>,
    format: Option<OutputFormat>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load config
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Resolve settings, command line wins over config
    let mut settings = match build_settings(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(dir) = output_dir {
        settings.output_dir = dir;
    }
    if let Some(f) = format {
        settings.format = f;
    }

    // Stage 3: Wire ports
    let data_port = data_port_for(input, settings.header_row);
    let report_port = report_port_for(&settings);

    // Stage 4: Convert and write
    eprintln!("Converting {}", input.display());
    let timestamp = Local::now().naive_local();
    let (conversion, written) = match run_conversion_pipeline(
        data_port.as_ref(),
        report_port.as_ref(),
        &settings.rules,
        timestamp,
        dry_run,
    ) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Report
    print_summary(&conversion);
    if dry_run {
        eprintln!("\nDry run complete: no files written");
    } else if written.is_empty() {
        eprintln!("\nNo classified containers: no files written");
    } else {
        eprintln!("\nFiles written:");
        for path in &written {
            println!("{}", path.display());
        }
    }
    ExitCode::SUCCESS
}

fn run_rules(config_path: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_optional_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let rules = match RuleSet::from_config(&adapter) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print!("{rules}");
    println!("[input]");
    println!("  required columns: {}", REQUIRED_COLUMNS.join(", "));
    ExitCode::SUCCESS
}
