use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use hash_service::hashing;
use hash_service::service::core::{DELAY_TIME, HashService};
use hash_service::service::executor::TransformFn;
use hash_service::service::handlers::{
    handle_query, handle_shutdown, handle_stats, handle_submit,
};
use hash_service::service::protocol::{ENDPOINT_HASH, ENDPOINT_SHUTDOWN, ENDPOINT_STATS};
use std::net::SocketAddr;
use std::sync::Arc;

const DEFAULT_PORT: u32 = 8080;
const MIN_PORT: u32 = 1024;
const MAX_PORT: u32 = 65535;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut listen_port = DEFAULT_PORT;
    if args.len() > 1 {
        let port: u32 = match args[1].parse() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("Invalid port value '{}'", args[1]);
                std::process::exit(1);
            }
        };
        if port <= MIN_PORT || port > MAX_PORT {
            eprintln!("Port must be in range of 1024 < port < 65536");
            std::process::exit(1);
        }
        listen_port = port;
    }

    // Production transform; tests inject their own closures instead
    let transform: TransformFn = Arc::new(|input: &str| hashing::sha512_base64(input));
    let (service, terminate_rx) = HashService::new(transform, DELAY_TIME);

    let app = Router::new()
        .route(ENDPOINT_HASH, post(handle_submit))
        .route("/hash/:id", get(handle_query))
        .route(ENDPOINT_STATS, get(handle_stats))
        .route(ENDPOINT_SHUTDOWN, get(handle_shutdown))
        .layer(Extension(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port as u16));
    tracing::info!("Starting server on port {}", listen_port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = terminate_rx.await;
        })
        .await?;

    tracing::info!("Service has shut down");
    Ok(())
}
