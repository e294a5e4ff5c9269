use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::sync::Arc;
use student_records::{api, config, logging, records};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "student-records",
    about = "In-memory student record service"
)]
struct Cli {
    /// Address to bind, overriding `SERVER_HOST`.
    #[arg(long)]
    host: Option<IpAddr>,
    /// Port to bind, overriding `SERVER_PORT`.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();
    let loaded = config::init_config().context("failed to load configuration")?;

    let host = cli.host.unwrap_or(loaded.server_host);
    let port = cli.port.or(loaded.server_port);

    let app = api::create_router(Arc::new(records::RecordsService::new()));

    let (listener, port) = bind_listener(host, port)
        .await
        .context("failed to bind listener")?;
    tracing::info!("Listening on http://{}:{}", host, port);
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;
    Ok(())
}

async fn bind_listener(host: IpAddr, port: Option<u16>) -> std::io::Result<(TcpListener, u16)> {
    if let Some(port) = port {
        return TcpListener::bind((host, port))
            .await
            .map(|listener| (listener, port));
    }

    for port in config::DEFAULT_PORT_RANGE {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        format!(
            "No available port found in range {}-{}",
            config::DEFAULT_PORT_RANGE.start(),
            config::DEFAULT_PORT_RANGE.end()
        ),
    ))
}
