use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
};

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use specscan_cli::{load_scan_file, render, AppConfig, AppResult, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "specscan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Decode Atheros spectral scan dumps (ath9k/ath10k/ath11k)",
    long_about = None,
)]
struct Cli {
    /// Файл, снятый с debugfs (spectral_scan0)
    scanfile: PathBuf,
    /// Формат вывода: json, csv (rtl_power), rtl_power_fftw, summary
    #[arg(short, long, default_value = "json")]
    format: String,
    /// Путь к выходному файлу. По умолчанию: stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Код выхода 2, если декодер выдал предупреждения
    #[arg(short, long)]
    strict: bool,
    /// Тихий режим (только ошибки)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Подробный лог декодера
    #[arg(short, long)]
    verbose: bool,
}

fn run(config: &AppConfig) -> AppResult<usize> {
    let outcome = load_scan_file(&config.input_path)?;

    let written = match &config.output_path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            render(&outcome.records, config.format, &mut out)?
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            render(&outcome.records, config.format, &mut out)?
        }
    };

    info!(
        "{written} of {} records written ({} bytes consumed, {} warnings)",
        outcome.records.len(),
        outcome.bytes_consumed,
        outcome.warnings.len()
    );

    Ok(outcome.warnings.len())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .target(env_logger::Target::Stderr)
        .init();

    warn!("WARNING: Experimental Software! Don't trust anything you see. :)");

    let format: OutputFormat = match cli.format.parse() {
        Ok(f) => f,
        Err(e) => {
            error!("--format: {e}");
            std::process::exit(1);
        }
    };

    let config = AppConfig {
        input_path: cli.scanfile,
        output_path: cli.output,
        format,
        strict: cli.strict,
    };

    match run(&config) {
        Ok(warnings) if config.strict && warnings > 0 => {
            error!("{warnings} decode warnings in strict mode");
            std::process::exit(2);
        }
        Ok(_) => {}
        Err(e) => {
            error!("{:?}: {e}", config.input_path);
            std::process::exit(1);
        }
    }
}
