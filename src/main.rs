use fixmath::accuracy::{self, SweepReport};
use fixmath::config::{config_or_default, read_sweep_config, SweepConfig, DEFAULT_CONFIG_PATH};

use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn setup_file_logging(default_filter: &str) -> Result<String, Box<dyn std::error::Error>> {
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    // Keep only the last 25 runs
    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("fixmath_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);

    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(log_path_str)
}

fn cleanup_old_logs(log_dir: &PathBuf, keep_count: usize) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with("fixmath") && s.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Oldest first
        log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        if log_files.len() > keep_count {
            for file in log_files.iter().take(log_files.len() - keep_count) {
                let _ = fs::remove_file(file.path());
            }
        }
    }
}

fn print_report(report: &SweepReport) {
    println!("{:<6} {:<6} {:<8} {:>12} {:>12} {:>10}", "kernel", "func", "tier", "max err", "mean err", "budget");
    for row in &report.rows {
        let mark = if row.stats.within(row.budget) { "" } else { "  OVER" };
        println!(
            "{:<6} {:<6} {:<8} {:>12.3e} {:>12.3e} {:>10.1e}{}",
            row.kernel.name(),
            row.function.name(),
            row.tier.name(),
            row.stats.max_abs,
            row.stats.mean_abs,
            row.budget,
            mark
        );
    }
    for (kernel, hash) in &report.fingerprints {
        println!("{} fingerprint: {:016x}", kernel.name(), hash);
    }
}

fn main() {
    // Read once; the outcome is logged after the subscriber is up.
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let loaded = read_sweep_config(&config_path);
    let log_filter = match &loaded {
        Ok(config) => config.log_filter.clone(),
        Err(_) => SweepConfig::default().log_filter,
    };

    match setup_file_logging(&log_filter) {
        Ok(log_file) => {
            println!("╔══════════════════════════════════════════════════════════╗");
            println!("║  fixmath accuracy sweep - Logging to file                ║");
            println!("╠══════════════════════════════════════════════════════════╣");
            println!("║  Log file: {:<45} ║", log_file);
            println!("╚══════════════════════════════════════════════════════════╝");
        }
        Err(e) => eprintln!("Failed to set up logging: {}", e),
    }

    let config = config_or_default(&config_path, loaded);
    info!(
        "Sweeping {} kernel(s) x {} function(s), {} samples each, seed {}",
        config.kernels.len(),
        config.functions.len(),
        config.samples,
        config.seed
    );

    let report = accuracy::run_sweep(&config);
    print_report(&report);

    let failures = report.failures().count();
    if failures > 0 {
        warn!("{} row(s) over budget", failures);
    }

    if let Some(path) = &config.snapshot_path {
        match accuracy::save_snapshot(path, &report) {
            Ok(()) => info!("Snapshot written to {}", path),
            Err(e) => error!("Failed to write snapshot {}: {}", path, e),
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
