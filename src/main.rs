use bloodbank_rules::config::evaluation_time;
use bloodbank_rules::utils::error::{DashboardError, ErrorSeverity};
use bloodbank_rules::utils::{logger, validation::Validate};
use bloodbank_rules::{CliConfig, DashboardPipeline, LocalStorage, ReportEngine};
use clap::Parser;

fn exit_code(e: &DashboardError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 網路錯誤，可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &DashboardError) -> ! {
    tracing::error!(
        "❌ Dashboard report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting bloodbank-report");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let now = match evaluation_time(config.as_of.as_deref()) {
        Ok(now) => now,
        Err(e) => fail(&e),
    };
    tracing::info!("📅 Evaluating eligibility as of {}", now.format("%Y-%m-%d %H:%M UTC"));

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = DashboardPipeline::new(storage, config, now);
    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Dashboard report completed");
            println!("✅ Dashboard report completed");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}
