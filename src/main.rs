use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{debug, error, info};

use pow_ledger::api::{self, AppState};
use pow_ledger::blockchain::ProofOfWork;
use pow_ledger::config::Config;
use pow_ledger::consensus::HttpChainFetcher;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env().map_err(io::Error::other)?;
    let fetcher = HttpChainFetcher::new(config.peer_timeout).map_err(io::Error::other)?;

    let state = web::Data::new(AppState::new(
        config.node_id.clone(),
        ProofOfWork::new(config.difficulty),
        Arc::new(fetcher),
        config.peer_timeout,
        config.mine_timeout,
    ));

    {
        let mut peers = state.peers.lock();
        for peer in &config.bootstrap_peers {
            peers.register(peer).map_err(io::Error::other)?;
        }
        if !peers.is_empty() {
            info!("bootstrap peers: {:?}", peers.addresses());
        }
    }

    if let Some(period) = config.resolve_interval {
        let background = state.clone();
        actix_web::rt::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match background.resolve_conflicts().await {
                    Ok(true) => info!("background resolution adopted a longer chain"),
                    Ok(false) => debug!("background resolution kept the local chain"),
                    Err(e) => error!("background resolution failed: {e}"),
                }
            }
        });
    }

    println!(
        "⛓️ Starting node {} at http://{}:{} (difficulty {})",
        config.node_id, config.host, config.port, config.difficulty
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
