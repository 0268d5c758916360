use std::sync::Arc;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use simpleotp_core::tracing::init_tracing;
use simpleotp_otp::config::OtpConfig;
use simpleotp_otp::infra::webhook::HttpWebhookNotifier;
use simpleotp_otp::router::build_router;
use simpleotp_otp::state::AppState;
use simpleotp_otp_migration::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = OtpConfig::from_env();

    let db = Database::connect(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
    }

    let state = AppState {
        db,
        notifier: Arc::new(HttpWebhookNotifier::new(reqwest::Client::new())),
        magic_link_host: config.magic_link_host,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.otp_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("otp service listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
