use finboard::config::Config;
use finboard::server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(version = finboard::VERSION, "Starting finboard on {}", config.address());

    let (host, port) = (config.host.clone(), config.port);
    let (_state, app) = match server::build_app(config) {
        Ok(built) => built,
        Err(e) => {
            tracing::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let (port, handle) = match server::serve(app, &host, port).await {
        Ok(bound) => bound,
        Err(e) => {
            tracing::error!("Failed to bind {}:{}: {}", host, port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{}:{}", host, port);
    handle.await.ok();
}
