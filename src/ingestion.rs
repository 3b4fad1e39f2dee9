//! Boundary between the loosely typed spreadsheet API and the typed core.
//!
//! Remote records may carry numbers as strings, nulls, or not at all. Everything is
//! coerced here, once, so the reconstruction never sees a missing or non-numeric field.

use crate::error::{Result, StockOpnameError};
use crate::schema::{Item, RawDate, Transaction, TransactionKind};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Largest stock or movement quantity accepted from the API. Coerced values are clamped
/// to `-MAX_QUANTITY..=MAX_QUANTITY` so sums over any realistic ledger stay within `i64`.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// Why a ledger record was left out of the typed transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectedTransaction {
    #[error("unrecognized jenis '{0}'")]
    UnknownKind(String),
    #[error("non-positive jumlah {0}")]
    NonPositiveQuantity(i64),
}

/// Response wrapper used by every remote action: `{ success, data, error }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// The payload of a successful response; `None` when the server sent no data.
    pub fn into_result(self) -> Result<Option<T>> {
        if !self.success {
            return Err(StockOpnameError::Api(
                self.error.unwrap_or_else(|| "API failed".to_string()),
            ));
        }
        Ok(self.data)
    }
}

pub fn parse_envelope<T: DeserializeOwned>(json: &str) -> Result<Option<T>> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(json)?;
    envelope.into_result()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub nama: Value,
    #[serde(default)]
    pub kategori: Value,
    #[serde(default)]
    pub satuan: Value,
    #[serde(default)]
    pub stok_a: Value,
    #[serde(default)]
    pub stok_b: Value,
    #[serde(default)]
    pub harga: Value,
}

impl RawItem {
    /// Returns `None` when the record has no id; such a row cannot be referenced.
    pub fn into_item(self) -> Option<Item> {
        let id = coerce_string(&self.id);
        if id.is_empty() {
            return None;
        }
        Some(Item {
            id,
            nama: coerce_string(&self.nama),
            kategori: coerce_string(&self.kategori),
            satuan: coerce_string(&self.satuan),
            stok_a: coerce_quantity(&self.stok_a),
            stok_b: coerce_quantity(&self.stok_b),
            harga: coerce_number(&self.harga),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub id_barang: Value,
    #[serde(default)]
    pub nama_barang: Value,
    #[serde(default)]
    pub jenis: Value,
    #[serde(default)]
    pub jumlah: Value,
    #[serde(default)]
    pub tanggal: Value,
    #[serde(default)]
    pub row_index: Value,
    #[serde(default)]
    pub keterangan: Value,
    #[serde(default)]
    pub petugas: Value,
}

impl RawTransaction {
    /// Fails when the direction is not one of the known spellings or the quantity is not
    /// at least one unit.
    pub fn into_transaction(self) -> std::result::Result<Transaction, RejectedTransaction> {
        let jenis_text = coerce_string(&self.jenis);
        let jenis = TransactionKind::parse(&jenis_text)
            .ok_or(RejectedTransaction::UnknownKind(jenis_text))?;
        let jumlah = coerce_quantity(&self.jumlah);
        if jumlah <= 0 {
            return Err(RejectedTransaction::NonPositiveQuantity(jumlah));
        }
        let row_index = match coerce_number(&self.row_index) {
            n if n >= 1.0 => Some(n as u64),
            _ => None,
        };

        Ok(Transaction {
            id_barang: coerce_string(&self.id_barang),
            nama_barang: coerce_string(&self.nama_barang),
            jenis,
            jumlah,
            tanggal: RawDate::from(&self.tanggal),
            row_index,
            keterangan: coerce_string(&self.keterangan),
            petugas: coerce_string(&self.petugas),
        })
    }
}

pub fn ingest_items(raw: Vec<RawItem>) -> Vec<Item> {
    let total = raw.len();
    let items: Vec<Item> = raw.into_iter().filter_map(RawItem::into_item).collect();
    if items.len() < total {
        warn!("Dropped {} item record(s) without an id", total - items.len());
    }
    debug!("Ingested {} items", items.len());
    items
}

pub fn ingest_transactions(raw: Vec<RawTransaction>) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(raw.len());
    for record in raw {
        let id_barang = coerce_string(&record.id_barang);
        match record.into_transaction() {
            Ok(transaction) => transactions.push(transaction),
            Err(reason) => warn!("Dropped transaction for '{}': {}", id_barang, reason),
        }
    }
    debug!("Ingested {} transactions", transactions.len());
    transactions
}

/// Items from a `getAllBarang` response body.
pub fn items_from_json(json: &str) -> Result<Vec<Item>> {
    let raw: Vec<RawItem> = parse_envelope(json)?.unwrap_or_default();
    Ok(ingest_items(raw))
}

/// Transactions from a `getTransactions` response body.
pub fn transactions_from_json(json: &str) -> Result<Vec<Transaction>> {
    let raw: Vec<RawTransaction> = parse_envelope(json)?.unwrap_or_default();
    Ok(ingest_transactions(raw))
}

pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Numbers and numeric strings; anything else, including NaN, is 0.
pub fn coerce_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

/// Stock and movement quantities are whole units, clamped to [`MAX_QUANTITY`].
pub fn coerce_quantity(value: &Value) -> i64 {
    let limit = MAX_QUANTITY as f64;
    coerce_number(value).round().clamp(-limit, limit) as i64
}
