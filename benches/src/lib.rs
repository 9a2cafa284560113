//! Synthetic ISS payloads for isshist benchmarks.

use async_trait::async_trait;
use bytes::Bytes;
use isshist_fetch::{ISS_PAGE_SIZE, Transport};
use isshist_types::TransportError;
use serde_json::{Value, json};

/// Builds `n` share rows in the ISS shares layout.
pub fn share_rows(n: usize) -> Vec<Vec<Value>> {
    (0..n)
        .map(|i| {
            let price = 100.0 + (i % 50) as f64 * 0.25;
            vec![
                json!("TQBR"),
                json!("2020-09-08"),
                json!(format!("Share {i}")),
                json!(format!("S{i:05}")),
                json!(1000 + i),
                json!(price * 10_000.0),
                json!(price),
                json!(price - 1.5),
                json!(price + 2.0),
                json!(price + 0.5),
                json!(price + 0.25),
                json!(price + 0.75),
            ]
        })
        .collect()
}

/// Builds `n` bond rows in the ISS bonds layout.
pub fn bond_rows(n: usize) -> Vec<Vec<Value>> {
    (0..n)
        .map(|i| {
            let mut row = vec![Value::Null; 37];
            row[0] = json!("TQCB");
            row[1] = json!("2020-09-08");
            row[2] = json!(format!("Bond {i}"));
            row[3] = json!(format!("RU000A{i:06}"));
            row[4] = json!(i);
            row[5] = json!(1.5e6);
            row[6] = json!(99.1);
            row[7] = json!(101.4);
            row[8] = json!(100.2);
            row[13] = json!(99.8);
            // Every tenth bond is perpetual
            row[21] = if i % 10 == 0 {
                json!("0000-00-00")
            } else {
                json!("2027-03-15")
            };
            row[30] = json!(1000);
            row[36] = json!("SUR");
            row
        })
        .collect()
}

/// Encodes rows as an ISS history response body without cursor metadata.
pub fn history_body(rows: &[Vec<Value>]) -> Bytes {
    Bytes::from(json!({ "history": { "data": rows } }).to_string())
}

/// Transport serving pre-encoded pages by their `start` offset.
///
/// Offsets past the last page get an empty page.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    pages: Vec<Bytes>,
    empty: Bytes,
}

impl MemoryTransport {
    /// Splits `rows` into pages of [`ISS_PAGE_SIZE`] rows.
    pub fn paged(rows: &[Vec<Value>]) -> Self {
        let page_size = ISS_PAGE_SIZE as usize;
        Self {
            pages: rows.chunks(page_size).map(history_body).collect(),
            empty: history_body(&[]),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        let start = url
            .split_once("start=")
            .and_then(|(_, rest)| rest.split('&').next())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        let index = (start / ISS_PAGE_SIZE) as usize;
        Ok(self.pages.get(index).unwrap_or(&self.empty).clone())
    }
}
