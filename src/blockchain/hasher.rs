//! Canonical block digests.
//!
//! A block is rendered as compact JSON with object keys sorted at every level,
//! then hashed with SHA-256. Every node must render blocks this exact way or
//! their `previous_hash` links will not agree.

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

use super::Block;
use crate::transaction::Transaction;

/// Lowercase hex SHA-256 of the block's canonical form.
pub fn digest(block: &Block) -> String {
    digest_value(&block_value(block))
}

/// Lowercase hex SHA-256 of any JSON value after key canonicalization.
pub fn digest_value(value: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_bytes(value));
    hex::encode(hasher.finalize())
}

/// Compact JSON bytes with every object's keys in lexicographic order.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    canonicalize(value).to_string().into_bytes()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn block_value(block: &Block) -> Value {
    let mut map = Map::new();
    map.insert("index".into(), Value::from(block.index));
    map.insert(
        "timestamp".into(),
        Number::from_f64(block.timestamp).map_or(Value::Null, Value::Number),
    );
    map.insert(
        "transactions".into(),
        Value::Array(block.transactions.iter().map(transaction_value).collect()),
    );
    map.insert("proof".into(), Value::from(block.proof));
    map.insert(
        "previous_hash".into(),
        Value::String(block.previous_hash.clone()),
    );
    Value::Object(map)
}

fn transaction_value(tx: &Transaction) -> Value {
    let mut map = Map::new();
    map.insert("sender".into(), Value::String(tx.sender.clone()));
    map.insert("recipient".into(), Value::String(tx.recipient.clone()));
    map.insert("amount".into(), Value::Number(tx.amount.clone()));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::{canonical_bytes, digest, digest_value};
    use crate::blockchain::Block;
    use crate::transaction::Transaction;
    use serde_json::{Number, Value, json};

    #[test]
    fn genesis_digest_is_stable() {
        assert_eq!(
            String::from_utf8(canonical_bytes(&serde_json::to_value(Block::genesis()).unwrap()))
                .unwrap(),
            r#"{"index":1,"previous_hash":"1","proof":100,"timestamp":0.0,"transactions":[]}"#
        );
        assert_eq!(
            digest(&Block::genesis()),
            "30a5e9bbfddba2909845c88c93004b73102b618fa492d3a68187a8e5e2d9b349"
        );
    }

    #[test]
    fn field_order_does_not_matter() {
        let a: Block = serde_json::from_str(
            r#"{"index":2,"timestamp":12.5,"transactions":[{"sender":"A","recipient":"B","amount":5}],"proof":42,"previous_hash":"abc"}"#,
        )
        .unwrap();
        let b: Block = serde_json::from_str(
            r#"{"previous_hash":"abc","proof":42,"transactions":[{"amount":5,"recipient":"B","sender":"A"}],"timestamp":12.5,"index":2}"#,
        )
        .unwrap();
        assert_eq!(digest(&a), digest(&b));

        let x: Value = serde_json::from_str(r#"{"b":1,"a":{"d":2,"c":3}}"#).unwrap();
        let y: Value = serde_json::from_str(r#"{"a":{"c":3,"d":2},"b":1}"#).unwrap();
        assert_eq!(digest_value(&x), digest_value(&y));
    }

    #[test]
    fn block_digest_matches_its_serde_form() {
        let block = Block::new(
            3,
            vec![Transaction::new("A", "B", Number::from(5))],
            9,
            "prev".into(),
        );
        assert_eq!(
            digest(&block),
            digest_value(&serde_json::to_value(&block).unwrap())
        );
    }

    #[test]
    fn content_changes_change_the_digest() {
        let mut block = Block::new(2, Vec::new(), 1, "prev".into());
        let before = digest(&block);
        assert_eq!(before.len(), 64);

        block
            .transactions
            .push(Transaction::new("A", "B", Number::from(1)));
        let with_tx = digest(&block);
        assert_ne!(before, with_tx);

        // transaction order is part of the content
        block
            .transactions
            .push(Transaction::new("C", "D", Number::from(2)));
        let ordered = digest(&block);
        block.transactions.reverse();
        assert_ne!(ordered, digest(&block));
        assert_ne!(digest_value(&json!([1, 2])), digest_value(&json!([2, 1])));
    }
}
