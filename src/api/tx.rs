use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info, warn};

use super::models::{AppState, MessageResponse, NewTxRequest, NewTxResponse, PendingResponse};

/// Queue a transaction for the next block.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let tx = match body.into_inner().into_transaction() {
        Ok(tx) => tx,
        Err(missing) => {
            warn!("POST /transactions/new - rejected, missing {missing:?}");
            return HttpResponse::BadRequest().json(MessageResponse::new(format!(
                "Missing values: {}",
                missing.join(", ")
            )));
        }
    };

    let target = state.ledger.lock().submit(tx.clone());
    match target {
        Ok(index) => {
            info!(
                "POST /transactions/new - {} -> {} ({}) queued for block #{index}",
                tx.sender, tx.recipient, tx.amount
            );
            HttpResponse::Created().json(NewTxResponse {
                message: format!("Transaction will be added to Block {index}"),
                index,
            })
        }
        Err(e) => {
            error!("POST /transactions/new - {e}");
            HttpResponse::InternalServerError().json(MessageResponse::new(e.to_string()))
        }
    }
}

/// List the pending pool.
#[get("/transactions/pending")]
pub async fn pending_transactions(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock();
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
