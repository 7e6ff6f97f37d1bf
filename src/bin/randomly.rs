//! Who's doing it this time? Let the dice decide.
use anyhow::{Context, Result};
use dotenv::dotenv;

use std::net::SocketAddr;
use std::sync::Arc;

use randomly::{router, BotConnector, CardTemplate, Config, Randomly};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    simple_logger::init_with_env().ok();

    let config = Config::from_env();
    let card = CardTemplate::announcement(&config.content_root);
    if !card.path().exists() {
        log::warn!("no announcement card @ {:?}; every pick will fail until one appears", card.path());
    }
    if config.credentials.is_none() {
        log::warn!("no app credentials; connector calls will not be authenticated");
    }

    let connector = BotConnector::new(config.credentials.clone());
    let brain = Randomly::new(Arc::new(connector), &config);
    let app = router(&config.route_prefix, Arc::new(brain));

    let addr: SocketAddr = config
        .address()
        .parse()
        .with_context(|| format!("Unable to parse listen address {}", config.address()))?;
    log::info!("RANDOMLY LISTENING FOR SUMMONS ON {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("server exited")?;

    Ok(())
}
