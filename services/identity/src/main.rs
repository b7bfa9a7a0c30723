use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use prestige_core::config::Config;
use prestige_core::tracing::{LogFormat, init_tracing};

use prestige_identity::config::IdentityConfig;
use prestige_identity::infra::mailer::BrevoMailer;
use prestige_identity::router::build_router;
use prestige_identity::state::{AppState, DbRepositories};

#[tokio::main]
async fn main() {
    init_tracing(LogFormat::Json);

    let config = IdentityConfig::from_env().expect("failed to load configuration");
    let secrets = config.secret_codec().expect("invalid AES_SECRET_KEY");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = BrevoMailer {
        client: reqwest::Client::new(),
        api_url: config.brevo_api_url.clone(),
        api_key: config.brevo_api_key.clone(),
        sender: config.mail_sender(),
    };

    let state = AppState {
        repos: DbRepositories { db, mailer },
        tokens: config.token_codec(),
        secrets,
        settings: Arc::new(config.account_settings()),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("identity service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
