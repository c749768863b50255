mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::HeaderValue,
    routing::get,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cupid_api::gateway::{PaymentGateway, RazorpayClient};
use cupid_api::identity::{IdentityProvider, OAuthSessionClient};
use cupid_api::notify::{LogNotifier, Notifier, SmtpNotifier};
use cupid_api::routes::api_router;
use cupid_api::state::{AppState, AppStateInner};
use cupid_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cupid=debug,cupid_api=debug,cupid_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Database::open(&config.db_path)?;

    // Outbound clients, shared for the life of the process
    let http = reqwest::Client::new();
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(OAuthSessionClient::new(http.clone(), &config.auth_session_url));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(RazorpayClient::new(
        http,
        &config.razorpay_api_url,
        &config.razorpay_key_id,
        &config.razorpay_key_secret,
    ));
    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpNotifier::new(
            &smtp.host,
            smtp.port,
            smtp.username.clone(),
            smtp.password.clone(),
            &smtp.from_address,
            &config.app_url,
        )?),
        None => {
            warn!("SMTP_HOST not set, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let state: AppState = Arc::new(AppStateInner {
        db,
        identity,
        gateway,
        notifier,
        payment_secret: config.razorpay_key_secret.clone(),
    });

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({ "status": "ok" })) }))
        .merge(api_router(state))
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Cupid server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Credentialed CORS. With no explicit origins the request origin is
/// mirrored, since a literal `*` cannot be combined with credentials.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let values = origins
            .iter()
            .map(|o| HeaderValue::from_str(o))
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
