use actix_web::{HttpResponse, Responder, get, web};
use log::{error, warn};
use tokio_util::sync::CancellationToken;

use super::models::{AppState, MessageResponse, MineResponse};
use crate::blockchain::miner;
use crate::error::LedgerError;

/// Mine a block from the pending pool, crediting this node with the reward.
///
/// The proof search runs on the blocking pool so submissions and chain reads
/// keep being served. It is cancelled when the request goes away or when the
/// configured mining deadline passes.
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    let cancel = CancellationToken::new();
    let _on_drop = cancel.clone().drop_guard();

    let deadline = state.mine_timeout.map(|limit| {
        let cancel = cancel.clone();
        actix_web::rt::spawn(async move {
            tokio::time::sleep(limit).await;
            cancel.cancel();
        })
    });

    let worker = state.clone();
    let token = cancel.clone();
    let outcome =
        web::block(move || miner::mine(&worker.ledger, &worker.pow, &worker.node_id, &token))
            .await;

    if let Some(timer) = deadline {
        timer.abort();
    }

    match outcome {
        Ok(Ok(block)) => HttpResponse::Ok().json(MineResponse::from(block)),
        Ok(Err(LedgerError::MiningCancelled)) => {
            warn!("GET /mine - gave up before a proof was found");
            HttpResponse::ServiceUnavailable()
                .json(MessageResponse::new("Mining deadline passed before a proof was found"))
        }
        Ok(Err(e)) => {
            error!("GET /mine - {e}");
            HttpResponse::InternalServerError().json(MessageResponse::new(e.to_string()))
        }
        Err(e) => {
            error!("GET /mine - mining worker failed: {e}");
            HttpResponse::InternalServerError().json(MessageResponse::new("mining worker failed"))
        }
    }
}
