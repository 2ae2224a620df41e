//! HVT - hardening audit of saved IOS / IOS-XE running configurations
//!
//! Audits every device in the inventory (or one selected device) and prints
//! a text or JSON compliance report.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hvt_audit::{AuditProfile, ComplianceReport, DeviceAuditor, ParsedConfig};
use hvt_common::logging::{init_logging_with_config, LogConfig};
use hvt_common::Config;
use hvt_core::Device;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// HVT hardening audit
#[derive(Parser, Debug)]
#[command(name = "hvt")]
#[command(version)]
#[command(about = "Score IOS / IOS-XE running configurations against hardening rules", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "hvt.toml", env = "HVT_CONFIG")]
    config: String,

    /// Directory holding `<hostname>_sh_run.cfg` files (overrides config)
    #[arg(short, long)]
    repo: Option<String>,

    /// Audit only this inventory hostname
    #[arg(short, long)]
    device: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Exit non-zero when a device scores below this percentage (overrides config)
    #[arg(long)]
    fail_under: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config_found = std::path::Path::new(&args.config).exists();
    let mut config = if config_found {
        Config::from_file(&args.config)?
    } else {
        Config::default()
    }
    .merge_env()?;

    if let Some(repo) = args.repo {
        config.audit.repo_dir = repo;
    }
    if let Some(pct) = args.fail_under {
        config.audit.fail_under = Some(pct);
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    init_logging_with_config(LogConfig::from_settings(&config.logging)?);

    info!("HVT {} starting", env!("CARGO_PKG_VERSION"));
    if !config_found {
        info!("Config file {} not found, using defaults", args.config);
    }

    let profile = AuditProfile::from_config(&config).context("invalid rule configuration")?;
    let devices = select_devices(&config, args.device.as_deref())?;
    info!(
        "Auditing {} device(s) from {} with {} rules",
        devices.len(),
        config.audit.repo_dir,
        profile.rule_count()
    );

    let mut reports = Vec::with_capacity(devices.len());
    let mut errors = 0usize;
    for device in devices {
        match audit_device(&config, &profile, device) {
            Ok(report) => reports.push(report),
            Err(e) if !e.is_fatal() => {
                error!("{}: audit failed [{}]: {}", device.hostname, e.code(), e);
                errors += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    match args.format {
        OutputFormat::Text => reports.iter().for_each(print_report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    let below: Vec<&str> = match config.audit.fail_under {
        Some(threshold) => reports
            .iter()
            .filter(|r| !r.meets(threshold))
            .map(|r| r.hostname.as_str())
            .collect(),
        None => Vec::new(),
    };
    if !below.is_empty() {
        warn!("Below the required score: {}", below.join(", "));
    }

    Ok(if errors > 0 || !below.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn select_devices<'a>(config: &'a Config, hostname: Option<&str>) -> Result<Vec<&'a Device>> {
    if config.devices.is_empty() {
        anyhow::bail!("no devices in the inventory; add [[devices]] entries to the configuration");
    }
    match hostname {
        Some(name) => {
            let device = config
                .device(name)
                .with_context(|| format!("device {} is not in the inventory", name))?;
            Ok(vec![device])
        }
        None => Ok(config.devices.iter().collect()),
    }
}

fn audit_device(
    config: &Config,
    profile: &AuditProfile,
    device: &Device,
) -> hvt_core::Result<ComplianceReport> {
    let source = ParsedConfig::load(&config.audit.repo_dir, device, &config.audit.config_suffix)?;
    DeviceAuditor::new(device, &source, profile).run_audit()
}

fn print_report(report: &ComplianceReport) {
    let summary = &report.summary;
    println!(
        "{} ({}, {}): {}/{} points ({:.1}%)",
        report.hostname,
        report.kind,
        report.version,
        summary.achieved,
        summary.max_score,
        summary.score_pct
    );

    for (id, outcome) in &report.results {
        let result = &outcome.result;
        let status = if outcome.passed() { "PASS" } else { "FAIL" };
        println!(
            "  [{}] {:<28} {:>2}/{:<2} {}",
            status, id, result.achieved, result.max_weight, outcome.metadata.name
        );
        if !result.evidence.is_empty() {
            println!("         evidence: {}", result.evidence.join(", "));
        }
        if !outcome.passed() {
            if let Some(remediation) = &outcome.metadata.remediation {
                println!("         fix: {}", remediation);
            }
        }
    }

    for (category, score) in &summary.by_category {
        println!("  {:<12} {}/{}", category.as_str(), score.achieved, score.max_score);
    }
    println!();
}
