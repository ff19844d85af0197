mod chain;
mod health;
mod mining;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

/// Routes are served at the root so peers can fetch `/chain` directly.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::validate_chain)
        .service(mining::mine)
        .service(tx::new_transaction)
        .service(tx::pending_transactions)
        .service(nodes::register_nodes)
        .service(nodes::list_nodes)
        .service(nodes::resolve_nodes);
}

#[cfg(test)]
pub(crate) fn test_state(difficulty: usize) -> AppState {
    test_state_with(difficulty, crate::consensus::client::testing::StaticFetcher::default())
}

#[cfg(test)]
pub(crate) fn test_state_with(
    difficulty: usize,
    fetcher: crate::consensus::client::testing::StaticFetcher,
) -> AppState {
    use std::sync::Arc;
    use std::time::Duration;

    AppState::new(
        "test-node".into(),
        crate::blockchain::ProofOfWork::new(difficulty),
        Arc::new(fetcher),
        Duration::from_millis(200),
        None,
    )
}
