use clap::Parser;
use paper_harvest::utils::error::{ErrorSeverity, HarvestError};
use paper_harvest::utils::{logger, validation::Validate};
use paper_harvest::{
    ChromiumLauncher, CliConfig, HarvestEngine, HarvestPipeline, LocalStorage, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting paper-harvest");
    if cli.verbose {
        tracing::debug!("CLI flags: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &cli);

    let launcher = ChromiumLauncher::new(config.launch_options());
    let pipeline = HarvestPipeline::new(LocalStorage::new("."), config, launcher);
    let engine = HarvestEngine::new(pipeline);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no paper files will be written");
        match engine.plan().await {
            Ok(planned) => {
                let output_dir = &engine.pipeline().config().output.dir;
                for file in &planned.files {
                    println!("{}/{}", output_dir, file.file_name);
                }
                println!("{} files would be written", planned.files.len());
            }
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Harvest completed successfully!");
            if !report.overwritten.is_empty() {
                tracing::warn!(
                    "⚠️ {} files from an earlier run were overwritten with different content",
                    report.overwritten.len()
                );
            }
            if report.entries == 0 {
                tracing::warn!("⚠️ No papers were found on the page");
            }
            println!(
                "✅ Saved {} papers to '{}' ({} overwritten)",
                report.files_written,
                report.output_dir,
                report.overwritten.len()
            );
            match serde_json::to_string(&report) {
                Ok(json) => tracing::debug!("Run report: {}", json),
                Err(e) => fail(&HarvestError::from(e)),
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, cli: &CliConfig) {
    if config.acquisition.reuse_markup {
        tracing::info!("📄 Reusing markup: {}", config.output.markup_file);
    } else {
        tracing::info!("🌐 Search URL: {}", config.source.url);
        tracing::info!(
            "🔁 Scroll: every {}ms, {} stable read(s), max rounds {}",
            config.acquisition.scroll_interval_ms,
            config.acquisition.stable_reads,
            match config.acquisition.max_scroll_rounds {
                0 => "unbounded".to_string(),
                n => n.to_string(),
            }
        );
    }
    tracing::info!("📁 Output directory: {}", config.output.dir);
    if let Some(path) = &cli.config {
        tracing::info!("⚙️ Config file: {}", path.display());
    }
}

fn fail(e: &HarvestError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Harvest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
