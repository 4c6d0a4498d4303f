use clap::Parser;
use manifest_ocr::adapters::http::server;
use manifest_ocr::utils::{logger, validation::Validate};
use manifest_ocr::{AppState, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 要在解析參數前載入，clap 的 env 後備值才讀得到
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting manifest-ocr");
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }
    if cli.verbose {
        tracing::debug!(
            "CLI flags: backend={:?}, extraction={:?}, config={:?}",
            cli.backend,
            cli.extraction,
            cli.config
        );
    }

    // 合併並驗證設定，失敗就不啟動
    let config = match cli.into_service_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::from_config(&config)?;
    server::serve(&config.server, &config.cors, state).await?;

    Ok(())
}
