use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info, warn};

use super::models::{
    AppState, MessageResponse, NodesResponse, RegisterNodesRequest, RegisterNodesResponse,
    ResolveResponse,
};
use crate::consensus::peers::parse_peer;

/// Register peers. Either every address parses and all are added, or none is.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let nodes = match body.into_inner().nodes {
        Some(nodes) if !nodes.is_empty() => nodes,
        _ => {
            warn!("POST /nodes/register - empty node list");
            return HttpResponse::BadRequest().json(MessageResponse::new(
                "Error: Please supply a valid list of nodes",
            ));
        }
    };

    let mut parsed = Vec::with_capacity(nodes.len());
    let mut invalid = Vec::new();
    for node in &nodes {
        match parse_peer(node) {
            Ok(peer) => parsed.push(peer),
            Err(_) => invalid.push(node.as_str()),
        }
    }
    if !invalid.is_empty() {
        warn!("POST /nodes/register - invalid addresses {invalid:?}");
        return HttpResponse::BadRequest().json(MessageResponse::new(format!(
            "Invalid node addresses: {}",
            invalid.join(", ")
        )));
    }

    let mut peers = state.peers.lock();
    for peer in parsed {
        if peers.insert(peer.clone()) {
            info!("registered peer {peer}");
        }
    }

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes: peers.addresses(),
    })
}

/// List registered peers.
#[get("/nodes")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock();
    HttpResponse::Ok().json(NodesResponse {
        count: peers.len(),
        nodes: peers.addresses(),
    })
}

/// Run conflict resolution against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve_nodes(state: web::Data<AppState>) -> impl Responder {
    let replaced = match state.resolve_conflicts().await {
        Ok(replaced) => replaced,
        Err(e) => {
            error!("GET /nodes/resolve - {e}");
            return HttpResponse::InternalServerError().json(MessageResponse::new(e.to_string()));
        }
    };

    let ledger = state.ledger.lock();
    HttpResponse::Ok().json(ResolveResponse {
        message: if replaced {
            "Our chain was replaced"
        } else {
            "Our chain is authoritative"
        },
        replaced,
        chain: ledger.chain(),
        length: ledger.len(),
    })
}
