use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_console::{
    AuthClient, ClientConfig, DashboardClient, DeviceExplorer, HttpTransport, QueryCache,
    SessionHandle, SessionState, Transport,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("=== Inventory console starting ===");

    let cfg = ClientConfig::from_env();
    tracing::info!("API: {}", cfg.base_url);

    let session = SessionHandle::new();
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(&cfg.base_url, session.clone())?);
    let cache = Arc::new(QueryCache::new(Arc::clone(&transport), cfg.cache_ttl));

    // Router-guard stand-in: a single subscriber watching for expiry.
    let mut session_rx = session.subscribe();
    tokio::spawn(async move {
        while session_rx.changed().await.is_ok() {
            if *session_rx.borrow() == SessionState::Expired {
                tracing::error!("Session expired — log in again");
            }
        }
    });

    // Log in when credentials are provided; otherwise assume an existing
    // session cookie (the server answers 401 if there is none).
    if let (Ok(username), Ok(password)) = (
        std::env::var("INVENTORY_USERNAME"),
        std::env::var("INVENTORY_PASSWORD"),
    ) {
        AuthClient::new(Arc::clone(&transport), session.clone())
            .login(&username, &password)
            .await?;
    }

    let mut explorer = DeviceExplorer::new(Arc::clone(&transport), Arc::clone(&cache), cfg.debounce);

    if let Ok(hostname) = std::env::var("INVENTORY_FILTER_HOSTNAME") {
        explorer.type_hostname(hostname);
        explorer.settled_edit().await;
    }

    let page = explorer.current_page().await?;
    tracing::info!("{} device(s), showing page {} of {}", page.total, page.page.max(1), page.page_count());
    for device in &page.devices {
        println!(
            "{:<28} {:<22} {:<9} {}",
            device.hostname,
            format!("{} {}", device.os_name, device.os_version),
            device.status.as_str(),
            device.last_seen.to_rfc3339(),
        );
    }

    let stats = DashboardClient::new(cache).stats().await?;
    tracing::info!(
        "dashboard: {} active ({} online, {} offline), {} inactive",
        stats.total,
        stats.online,
        stats.offline,
        stats.inactive,
    );

    if std::env::var("INVENTORY_EXPORT").is_ok() {
        let saved = explorer.export_csv(&cfg.export_dir).await?;
        tracing::info!("exported {} bytes to {}", saved.bytes, saved.path.display());
    }

    Ok(())
}
