use clap::Parser;
use mensa_etl::adapters::output;
use mensa_etl::utils::{logger, validation::Validate};
use mensa_etl::{CliConfig, HttpSource, LocalStorage, MenuConfig, MenuEngine, MenuError};

fn fail(context: &str, e: &MenuError) -> ! {
    tracing::error!("❌ {}: {}", context, e);
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("{}", e.cli_report());

    // 網路錯誤可以重試
    let exit_code = match e {
        MenuError::HttpError(_) | MenuError::HttpStatus { .. } => 2,
        _ => 1,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting mensa-etl for {}", cli.location);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = cli.validate() {
        fail("Configuration validation failed", &e);
    }

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path);
            MenuConfig::from_file(path).unwrap_or_else(|e| fail("Could not load configuration", &e))
        }
        None => MenuConfig::default(),
    };
    if let Err(e) = file_config.validate() {
        fail("Configuration validation failed", &e);
    }

    let today = chrono::Local::now().date_naive();
    let settings = cli
        .settings(&file_config, today)
        .unwrap_or_else(|e| fail("Configuration validation failed", &e));
    let tables = file_config
        .tables()
        .unwrap_or_else(|e| fail("Configuration validation failed", &e));

    if tables.locations.get(&cli.location).is_none() {
        let known: Vec<&str> = tables.locations.ids().collect();
        eprintln!("❌ Unknown location '{}'", cli.location);
        eprintln!("💡 Known locations: {}", known.join(", "));
        std::process::exit(1);
    }

    tracing::info!("📅 Year {}, week {}", settings.year, settings.week);

    // 建立資料來源、存儲和引擎
    let source = HttpSource::new().unwrap_or_else(|e| fail("Could not create HTTP client", &e));
    let storage = LocalStorage::new(settings.output_path.clone());
    let engine = MenuEngine::new(source, storage, settings.clone(), tables);

    if cli.stdout {
        match engine.collect(&cli.location).await {
            Ok(Some(menus)) => match output::to_json(&menus) {
                Ok(json) => println!("{}", json),
                Err(e) => fail("Could not render menus", &e),
            },
            Ok(None) => std::process::exit(1),
            Err(e) => fail("Extraction failed", &e),
        }
        return Ok(());
    }

    match engine.run(&cli.location).await {
        Ok(Some(written)) => {
            tracing::info!("✅ Extraction completed successfully!");
            println!("✅ Extraction completed successfully!");
            for path in written {
                println!("📁 Output saved to: {}/{}", settings.output_path, path);
            }
        }
        Ok(None) => std::process::exit(1),
        Err(e) => fail("Extraction failed", &e),
    }

    Ok(())
}
