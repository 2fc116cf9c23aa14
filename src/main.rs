// ==========================================
// 挤压机生产日报分析 - 命令行入口
// ==========================================
// 子命令: analyze / config show / config init
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use press_prod_analyzer::config::ConfigManager;
use press_prod_analyzer::engine::{AnalysisOutcome, PressSheetAnalyzer};
use press_prod_analyzer::report::{default_report_file_name, OutputFormat};
use press_prod_analyzer::{logging, APP_NAME, VERSION};
use std::path::{Path, PathBuf};
use tracing::info;

/// 报表输出格式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    #[default]
    Xlsx,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Parser)]
#[command(name = "press-prod-analyzer")]
#[command(version)]
#[command(about = "Flag underperforming dies in an extrusion press production sheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a production workbook and write the flagged-dies report
    Analyze {
        /// Path to the .xlsx/.xls workbook
        input: PathBuf,

        /// Output file (default: flagged_dies_report_{date}.{ext} next to the input)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Report format
        #[arg(long, short = 'f', value_enum, default_value_t = FormatArg::Xlsx)]
        format: FormatArg,

        /// Configuration file (JSON)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Configuration file (JSON)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Write the default configuration to a file
    Init {
        /// Destination path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    info!("{} v{}", APP_NAME, VERSION);

    match cli.command {
        Commands::Analyze {
            input,
            output,
            format,
            config,
            json,
        } => run_analyze(&input, output, format.into(), config.as_deref(), json),
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => {
                let manager = ConfigManager::load(config.as_deref())?;
                println!("{}", manager.get_config_snapshot()?);
                Ok(())
            }
            ConfigAction::Init { path } => {
                ConfigManager::with_defaults().save_to(&path)?;
                println!("Default configuration written to {}", path.display());
                Ok(())
            }
        },
    }
}

fn run_analyze(
    input: &Path,
    output: Option<PathBuf>,
    format: OutputFormat,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let manager = ConfigManager::load(config_path).context("failed to load configuration")?;
    let analyzer = PressSheetAnalyzer::new(manager.config().clone());
    let outcome = analyzer
        .analyze_file(input)
        .with_context(|| format!("failed to analyze {}", input.display()))?;

    let exporter = format.exporter();
    let written = if outcome.report.is_empty() {
        None
    } else {
        let path = output.unwrap_or_else(|| {
            let name = default_report_file_name(&outcome.header.date, exporter.extension());
            input.with_file_name(name)
        });
        exporter
            .export(&outcome.report.to_table(), &path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        Some(path)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
    } else {
        print_summary(&outcome, written.as_deref());
    }
    Ok(())
}

fn print_summary(outcome: &AnalysisOutcome, written: Option<&Path>) {
    let header = &outcome.header;
    println!("Date:       {}", header.date);
    println!("Press:      {}", header.press);
    println!("Operator:   {}", header.operator);
    println!("Supervisor: {}", header.supervisor);
    println!();
    println!(
        "Records analyzed: {}, flagged: {}",
        outcome.evaluations.len(),
        outcome.flagged_count()
    );

    if outcome.dq_summary.total_warnings > 0 {
        println!("Data-quality warnings: {}", outcome.dq_summary.total_warnings);
        for (kind, count) in &outcome.dq_summary.by_kind {
            println!("  {:?}: {}", kind, count);
        }
    }

    match written {
        Some(path) => println!("Report written to {}", path.display()),
        None => println!("No dies flagged; no report written."),
    }
}
