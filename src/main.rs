use anyhow::{bail, Result};
use po_compiler::config::Config;
use po_compiler::orchestrator::CatalogJob;
use po_compiler::{CatalogStatus, CompilerOrchestrator};
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file (ignored when not present)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("po_compiler=info".parse()?),
        )
        .init();

    info!("🔄 Compiling translation files...");

    // Load configuration from environment
    let config = Config::from_env()?;
    let jobs = CatalogJob::from_config(&config);
    let orchestrator = CompilerOrchestrator::from_config(&config)?;

    let reports = orchestrator.run(&jobs).await;

    let mut failed = 0;
    for report in &reports {
        match &report.status {
            CatalogStatus::Compiled { method, entries, .. } => match entries {
                Some(n) => info!("{}: compiled ({:?}, {} entries)", report.job.language, method, n),
                None => info!("{}: compiled ({:?})", report.job.language, method),
            },
            CatalogStatus::Skipped { reason } => {
                warn!("{}: skipped ({})", report.job.language, reason)
            }
            CatalogStatus::Failed { error } => {
                failed += 1;
                error!("{}: failed ({})", report.job.language, error)
            }
        }
    }

    if std::env::var("REPORT_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if failed > 0 {
        bail!("{} of {} catalogs failed to compile", failed, reports.len());
    }

    info!("✅ Translation compilation complete!");
    Ok(())
}
