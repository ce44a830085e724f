use log::{debug, error, info, warn};
use museai::{server, CompletionProxy, MuseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   // Loaded before the logger so .env can set RUST_LOG.
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    match dotenv
    {   Ok(path) => debug!("Loaded {}", path.display())
      , Err(e) if e.not_found() => debug!("No .env file found")
      , Err(e) => warn!("Ignoring .env: {}", e)
    }

    let config = MuseConfig::from_env().map_err(|e| {
      error!("{}", e);
      e
    })?;

    let proxy = CompletionProxy::new(&config.provider)?;
    let app = server::router(proxy, &config.server)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MuseAI listening on http://{}", addr);

    server::serve(listener, app, server::shutdown_signal()).await?;
    info!("MuseAI stopped");
    Ok(())
}
