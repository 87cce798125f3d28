use anyhow::{anyhow, Context};
use clap::Parser;
use pingora_core::server::configuration::Opt;
use pingora_core::server::Server;
use std::sync::Arc;
use shrinkray::config::Config;
use shrinkray::proxy::ResizeService;
use shrinkray::storage::S3BlobStore;

/// Shrinkray - on-demand S3 image resizing built with Cloudflare's Pingora
#[derive(Parser, Debug)]
#[command(name = "shrinkray")]
#[command(version, about, long_about = None)]
struct Args {
    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging subsystem
    shrinkray::logging::init_subscriber()
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    let args = Args::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!(
        bucket = %config.bucket,
        conf_bucket = %config.conf_bucket,
        conf_file = %config.conf_file,
        url = %config.url,
        listen_address = %config.listen_addr(),
        s3_endpoint = config.s3_endpoint().unwrap_or("default"),
        resize_fit = ?config.resize_fit,
        "Configuration loaded successfully"
    );

    if args.test {
        tracing::info!("Configuration test passed");
        return Ok(());
    }

    // Single-threaded so nothing is lost if pingora daemonizes; the S3 client
    // performs its I/O on whichever runtime awaits it.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build setup runtime")?;
    let store = runtime.block_on(S3BlobStore::from_env(config.s3_endpoint()));

    let opt = Opt {
        daemon: args.daemon,
        ..Default::default()
    };

    // Create Pingora server
    let mut server = Server::new(Some(opt)).context("Failed to create Pingora server")?;
    server.bootstrap();

    let listen_addr = config.listen_addr();
    let service = ResizeService::new(Arc::new(config), Arc::new(store));

    // Create HTTP service
    let mut http_service = pingora_proxy::http_proxy_service(&server.configuration, service);
    http_service.add_tcp(&listen_addr);

    tracing::info!(address = %listen_addr, "Starting Shrinkray");

    server.add_service(http_service);

    // Run server forever (blocks until shutdown)
    server.run_forever();
}
