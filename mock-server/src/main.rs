use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_compute=info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    match std::env::var("RHINO_COMPUTE_KEY") {
        Ok(key) if !key.is_empty() => mock_compute::run_with_api_key(listener, &key).await,
        _ => mock_compute::run(listener).await,
    }
}
