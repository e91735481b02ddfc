use bloodbank_rules::core::ConfigProvider;
use bloodbank_rules::utils::error::ErrorSeverity;
use bloodbank_rules::utils::{logger, validation::Validate};
use bloodbank_rules::{DashboardPipeline, LocalStorage, ReportEngine, TomlConfig};
use chrono::{DateTime, Utc};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Blood bank dashboard report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "bloodbank-report.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the evaluation date from config (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<String>,

    /// Show what would be fetched without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 先載入配置，日誌格式由配置決定
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based dashboard report");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(as_of) = &args.as_of {
        config.report.as_of = Some(as_of.clone());
        tracing::info!("🔧 Evaluation date overridden to: {}", as_of);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let now = config.evaluation_time()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args, now);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No API calls will be made");
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = DashboardPipeline::new(storage, config, now);
    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Dashboard report completed successfully!");
            println!("✅ Dashboard report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Dashboard report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args, now: DateTime<Utc>) {
    println!("📋 Configuration Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  API: {}", config.api_base());
    println!("  Output: {}/{}", config.output_path(), config.report_filename());
    println!("  Evaluated as of: {}", now.format("%Y-%m-%d %H:%M UTC"));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Endpoints:");
    println!("  Donors: GET {}{}", config.api_base(), config.donors_path());
    println!("  Inventory: GET {}{}", config.api_base(), config.inventory_path());
    match config.campaigns_path() {
        Some(path) => println!("  Campaigns: GET {}{}", config.api_base(), path),
        None => println!("  Campaigns: (not configured)"),
    }

    let headers = config.headers();
    if !headers.is_empty() {
        // 只列出名稱，不印出 token
        let mut names: Vec<&String> = headers.keys().collect();
        names.sort();
        println!("  Headers: {}", names.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(", "));
    }
    if let Some(timeout) = config.timeout_seconds() {
        println!("  Timeout: {}s", timeout);
    }

    println!();
    println!("🔎 Donor Filter:");
    let predicate = config.donor_filter();
    println!(
        "  Search: {}",
        predicate.search.as_deref().filter(|s| !s.is_empty()).unwrap_or("(none)")
    );
    match &predicate.category {
        Some(category) => println!("  Category: {} = {}", category.field, category.value),
        None => println!("  Category: (all)"),
    }
    println!("  Missing dates shown as: {}", config.date_fallback());

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
