use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use biogpt_helper::build_app;
use biogpt_helper::config_manager::Config;
use biogpt_helper::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biogpt_helper=debug,tower_http=debug")),
        )
        .init();

    // Load configuration - try multiple paths
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    let mut loaded_path = String::new();

    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                config = Some(cfg);
                loaded_path = path.clone();
                break;
            }
            Err(e) if std::path::Path::new(path).exists() => {
                return Err(e.context(format!("Invalid configuration in {}", path)));
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {:#}", path, e);
                continue;
            }
        }
    }

    let config = config.ok_or_else(|| anyhow::anyhow!(
        "Could not find a valid config file. Tried: {:?}", config_paths
    ))?;

    info!("Loaded configuration from: {}", loaded_path);

    let app_state = AppState::new(config.clone())?;
    let app = build_app(app_state);

    let addr = config.system_config.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
