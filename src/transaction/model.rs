use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A value transfer waiting in the pending pool or sealed into a block.
///
/// No balance or signature semantics are attached: duplicates, self-transfers
/// and any numeric amount are accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Number,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: Number) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}
