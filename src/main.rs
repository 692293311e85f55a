use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use vera_checkin::{
    generator::ChatCompletionClient, responder::ThreadRandom, router, AppState, CheckInService,
    Config, FileRecordStore, RecordStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let store = FileRecordStore::new(config.data_path.clone());
    match store.load().await {
        Ok(entries) => info!(
            path = %config.data_path.display(),
            entries = entries.len(),
            "check-in store ready"
        ),
        Err(err) => error!("{err}; saves will be refused until the file is repaired"),
    }

    let mut checkins = CheckInService::new(Arc::new(store), Arc::new(ThreadRandom));
    match &config.generator {
        Some(settings) => {
            let client = ChatCompletionClient::new(
                settings.base_url.clone(),
                settings.api_key.clone(),
                settings.model.clone(),
            );
            info!(model = client.model(), "generated replies enabled");
            checkins = checkins.with_generator(Arc::new(client), settings.timeout);
        }
        None => warn!("OPENAI_API_KEY not set; generated replies disabled"),
    }

    let app = router(AppState::new(checkins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
