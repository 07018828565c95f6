//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the bootstrap path (config, logging, store, service) without a UI.
//! - Print a deterministic one-screen summary of the configured gradebook.

use gradebook_core::db::open_db;
use gradebook_core::{core_version, init_logging, AppConfig, GradeService, SqliteGradeRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = AppConfig::from_env();
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("gradebook logging disabled: {err}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("gradebook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let service = GradeService::new(SqliteGradeRepository::new(&conn));
    let stats = service.stats()?;

    println!("gradebook_core version={}", core_version());
    println!("gradebook db={}", config.db_path.display());
    println!(
        "gradebook total={} avg={} max={} min={}",
        stats.total,
        format_score(stats.avg_score),
        format_score(stats.max_score),
        format_score(stats.min_score)
    );
    for subject in &stats.subjects {
        println!(
            "gradebook subject={} count={} avg={:.1}",
            subject.subject, subject.count, subject.avg_score
        );
    }
    Ok(())
}

fn format_score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |score| format!("{score:.1}"))
}
