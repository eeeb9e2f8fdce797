use anyhow::Context;
use birthday_deals::app::{compare, presenter};
use birthday_deals::config::API_KEY_ENV;
use birthday_deals::utils::error::ErrorSeverity;
use birthday_deals::utils::monitor::ResourceMonitor;
use birthday_deals::utils::{logger, validation::Validate};
use birthday_deals::{
    CliConfig, DealCatalog, DealFinder, FinderError, FinderSettings, GoogleMapsClient,
    OutputFormat, SettingsFile,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.format == OutputFormat::Json);

    let file = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading settings from: {}", path.display());
            SettingsFile::from_file(path).unwrap_or_else(|e| exit_with(&e))
        }
        None => SettingsFile::default(),
    };
    if let Err(e) = file.validate() {
        exit_with(&e);
    }

    let settings = FinderSettings::resolve(&cli, std::env::var(API_KEY_ENV).ok(), &file);

    // 驗證配置
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }

    let mut monitor = ResourceMonitor::new(settings.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let catalog = DealCatalog::from_path(&settings.catalog_path).unwrap_or_else(|e| exit_with(&e));
    tracing::info!(
        "Loaded {} stores from {}",
        catalog.len(),
        settings.catalog_path.display()
    );
    monitor.checkpoint("catalog loaded");

    let api_key = settings.api_key().unwrap_or_else(|e| exit_with(&e));
    let client = GoogleMapsClient::with_endpoint(api_key, &settings.base_url, settings.timeout)
        .unwrap_or_else(|e| exit_with(&e));
    let finder = DealFinder::new(client.clone(), client, catalog, settings.search.clone());

    if settings.compare {
        let comparison = compare::compare_modes(&finder, &settings.location, settings.radius).await;
        monitor.checkpoint("comparison");
        match settings.format {
            OutputFormat::Text => print!(
                "{}",
                compare::render_comparison(&comparison, &settings.location, settings.radius)
            ),
            OutputFormat::Json => {
                let json = compare::render_comparison_json(
                    &comparison,
                    &settings.location,
                    settings.radius,
                )
                .context("failed to serialize comparison")?;
                println!("{}", json);
            }
        }
        monitor.log_summary();
        return Ok(());
    }

    let report = finder.find(&settings.location, settings.radius).await;
    monitor.checkpoint("search");

    match settings.format {
        OutputFormat::Text => {
            print!(
                "{}",
                presenter::render_text(
                    &report,
                    &settings.location,
                    settings.radius,
                    settings.search.unit
                )
            );
            println!(
                "Search completed in {:.2} seconds",
                report.elapsed.as_secs_f64()
            );
        }
        OutputFormat::Json => {
            let json = presenter::render_json(
                &report,
                &settings.location,
                settings.radius,
                settings.search.unit,
            )
            .context("failed to serialize search report")?;
            println!("{}", json);
        }
    }

    monitor.log_summary();
    Ok(())
}

/// Reports a startup error and exits with a code derived from its severity.
fn exit_with(e: &FinderError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
