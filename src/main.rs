use anyhow::Result;
use clap::Parser;
use hpraidmon::alerts::{self, Alert, Severity};
use hpraidmon::collectors::hpacucli;
use hpraidmon::config::Config;
use hpraidmon::models::raid::Controller;
use hpraidmon::util::report;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hpraidmon",
    about = "Nagios check for HP Smart Array controllers: pipe `hpacucli ctrl all show config` into it",
    version
)]
struct Cli {
    /// Read the hpacucli report from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Config file (default: <config dir>/hpraidmon/hpraidmon.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a JSON snapshot of the parsed report and exit
    #[arg(long)]
    json: bool,

    /// Print a human-readable report of all controllers and drives and exit
    #[arg(long)]
    report: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Any failure to read or parse means the array state is unknown.
    let status = match run(&cli) {
        Ok(status) => status,
        Err(e) => {
            error!("{:#}", e);
            println!("{}", unknown_line(&e));
            Severity::Unknown
        }
    };
    std::process::exit(status.exit_code());
}

fn run(cli: &Cli) -> Result<Severity> {
    let cfg = Config::load(cli.config.as_deref())?;
    if cli.print_config {
        print_config(cli, &cfg);
        return Ok(Severity::Ok);
    }

    let text        = hpacucli::read_report(cli.input.as_deref())?;
    let controllers = hpacucli::parse_report(&text)?;
    let active      = alerts::evaluate(&controllers, &cfg.health);

    if cli.json {
        let snapshot = report::snapshot(&controllers, &active);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(Severity::Ok);
    }
    if cli.report {
        print!("{}", report::generate(&controllers, &active));
        return Ok(Severity::Ok);
    }

    for a in &active {
        eprintln!("{}", a);
    }
    let status = alerts::overall(&active);
    println!("{}", summary(status, &controllers, &active));
    Ok(status)
}

fn summary(status: Severity, controllers: &[Controller], active: &[Alert]) -> String {
    if active.is_empty() {
        let arrays: usize = controllers.iter()
            .map(|c| c.arrays.iter().filter(|a| !a.is_unassigned()).count())
            .sum();
        let drives: usize = controllers.iter().map(Controller::drive_count).sum();
        format!(
            "RAID {} - {} controller(s), {} array(s), {} drive(s)",
            status.label(), controllers.len(), arrays, drives
        )
    } else {
        format!("RAID {} - {} drive(s) not OK", status.label(), active.len())
    }
}

fn unknown_line(e: &anyhow::Error) -> String {
    format!("RAID {} - {:#}", Severity::Unknown.label(), e)
}

fn print_config(cli: &Cli, cfg: &Config) {
    let path = cli.config.clone()
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let h = &cfg.health;
    println!("Config: {}", path);
    println!();
    println!("[health]");
    println!("  unassigned       = {}", h.unassigned.label());
    println!("  warning_statuses = {:?}", h.warning_statuses);
}
