use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, ValidateResponse};

/// Get the full chain. Peers fetch this during conflict resolution.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock();
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Validate the local chain.
#[get("/chain/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock();
    let verdict = state.validator().validate(ledger.chain());
    HttpResponse::Ok().json(ValidateResponse {
        valid: verdict.is_ok(),
        length: ledger.len(),
        error: verdict.err().map(|fault| fault.to_string()),
    })
}
