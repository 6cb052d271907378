use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biorisk_guard::assessment::build_assessor;
use biorisk_guard::config::AppConfig;
use biorisk_guard::ledger::Ledger;
use biorisk_guard::server;
use biorisk_guard::service::RiskService;
use biorisk_guard::vendors::VendorRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biorisk_guard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting BioRisk Guard");

    let config = AppConfig::load()?;

    let assessor = build_assessor(&config.assessor)?;
    let service = RiskService::new(
        Ledger::new(&config.node_id),
        VendorRegistry::new(VendorRegistry::demo_catalog()),
        assessor,
        config.signatories.clone(),
        config.alert_threshold,
    );
    info!(
        "Risk service ready (alert threshold {:.1})",
        config.alert_threshold
    );

    let app = server::router(service);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
