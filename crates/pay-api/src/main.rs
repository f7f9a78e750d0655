//! # Blee Checkout
//!
//! Turns a storefront cart into a Mercado Pago Checkout Pro preference.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export MP_ACCESS_TOKEN=TEST-...
//!
//! # Run the server
//! blee-checkout
//! ```

use pay_api::{routes, state::{AppConfig, AppState}};
use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    init_tracing(config.log_json());

    print_banner();

    let state = AppState::from_config(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.strategy.provider_name());
    info!(
        "Checkout policy: currency={}, installments={}, default_origin={}",
        state.builder.policy().currency,
        state.builder.policy().payment_methods.installments,
        state.builder.policy().back_urls.default_origin
    );

    let app = routes::create_router(state);

    info!("🚀 Blee Checkout starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("💳 Checkout: POST http://{}/criar-pagamento", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

fn print_banner() {
    println!(
        r#"
  🐝 Blee Checkout 🐝
  ━━━━━━━━━━━━━━━━━━━━━━━
  Mercado Pago preference service
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
