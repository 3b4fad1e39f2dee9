use crate::error::{Result, StockOpnameError};
use crate::normalizer::DateNormalizer;
use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub enum Warehouse {
    #[schemars(description = "Gudang Kalipucang")]
    A,

    #[schemars(description = "Gudang Troso")]
    B,
}

impl Warehouse {
    pub const ALL: [Warehouse; 2] = [Warehouse::A, Warehouse::B];

    /// Code used by the remote API (`gudang` parameter).
    pub fn code(self) -> &'static str {
        match self {
            Warehouse::A => "A",
            Warehouse::B => "B",
        }
    }

    /// Location name as stored on transaction rows.
    pub fn value(self) -> &'static str {
        match self {
            Warehouse::A => "Kalipucang",
            Warehouse::B => "Troso",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Warehouse::A => "Gudang Kalipucang",
            Warehouse::B => "Gudang Troso",
        }
    }

    /// Accepts either the API code or the location name, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|w| {
                needle.eq_ignore_ascii_case(w.code()) || needle.eq_ignore_ascii_case(w.value())
            })
            .ok_or_else(|| StockOpnameError::UnknownWarehouse(raw.to_string()))
    }
}

impl fmt::Display for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum TransactionKind {
    #[serde(alias = "Masuk", alias = "in", alias = "masuk")]
    #[schemars(description = "Stock received into the warehouse (\"In\" or \"Masuk\")")]
    In,

    #[serde(alias = "Keluar", alias = "out", alias = "keluar")]
    #[schemars(description = "Stock issued from the warehouse (\"Out\" or \"Keluar\")")]
    Out,
}

impl TransactionKind {
    /// Normalizes the upstream spellings (`In`/`Out`, `Masuk`/`Keluar`) in any casing.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "in" | "masuk" => Some(Self::In),
            "out" | "keluar" => Some(Self::Out),
            _ => None,
        }
    }

    /// Indonesian label shown in the transaction log.
    pub fn label(self) -> &'static str {
        match self {
            Self::In => "Masuk",
            Self::Out => "Keluar",
        }
    }

    /// Effect of one movement on the on-hand balance.
    pub fn signed(self, quantity: i64) -> i64 {
        match self {
            Self::In => quantity,
            Self::Out => -quantity,
        }
    }
}

/// A transaction date exactly as the ledger delivered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(untagged)]
pub enum RawDate {
    #[schemars(
        description = "Spreadsheet serial date: days since 1899-12-30, fractional part is the time of day"
    )]
    Serial(f64),

    #[schemars(description = "ISO 8601 timestamp or day-first 'DD/MM/YYYY[ HH:mm[:ss]]' text")]
    Text(String),

    #[default]
    Missing,
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawDate {
    fn from(value: f64) -> Self {
        Self::Serial(value)
    }
}

impl From<&serde_json::Value> for RawDate {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Missing, Self::Serial),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            _ => Self::Missing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[schemars(description = "Unique item id '<CategoryInitial>-<sequence>', e.g. 'ELK-0007'")]
    pub id: String,

    pub nama: String,

    #[serde(default)]
    pub kategori: String,

    #[serde(default)]
    #[schemars(description = "Unit of measure, e.g. 'pcs' or 'box'")]
    pub satuan: String,

    #[serde(default)]
    #[schemars(description = "Current on-hand quantity in Gudang Kalipucang")]
    pub stok_a: i64,

    #[serde(default)]
    #[schemars(description = "Current on-hand quantity in Gudang Troso")]
    pub stok_b: i64,

    #[serde(default)]
    #[schemars(description = "Unit price used for valuation; 0 when unknown")]
    pub harga: f64,
}

impl Item {
    pub fn stock(&self, warehouse: Warehouse) -> i64 {
        match warehouse {
            Warehouse::A => self.stok_a,
            Warehouse::B => self.stok_b,
        }
    }

    pub fn stock_mut(&mut self, warehouse: Warehouse) -> &mut i64 {
        match warehouse {
            Warehouse::A => &mut self.stok_a,
            Warehouse::B => &mut self.stok_b,
        }
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(Item))
    }
}

/// Item category; its initial prefixes every item id in the category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Category {
    pub nama: String,

    #[schemars(description = "Uppercase id prefix of at most 4 characters, e.g. 'ELK'")]
    pub inisial: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[schemars(description = "Id of the moved item (foreign key to Item.id)")]
    pub id_barang: String,

    #[serde(default)]
    pub nama_barang: String,

    pub jenis: TransactionKind,

    #[schemars(description = "Quantity moved, always positive; direction comes from 'jenis'")]
    pub jumlah: i64,

    #[serde(default)]
    pub tanggal: RawDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Ledger row handle used only for deletion")]
    pub row_index: Option<u64>,

    #[serde(default)]
    pub keterangan: String,

    #[serde(default)]
    pub petugas: String,
}

impl Transaction {
    pub fn timestamp(&self, normalizer: &DateNormalizer) -> NaiveDateTime {
        normalizer.normalize(&self.tanggal)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(Transaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_parse_accepts_code_and_name() {
        assert_eq!(Warehouse::parse("a").unwrap(), Warehouse::A);
        assert_eq!(Warehouse::parse("Troso").unwrap(), Warehouse::B);
        assert_eq!(Warehouse::parse(" KALIPUCANG ").unwrap(), Warehouse::A);
        assert!(matches!(
            Warehouse::parse("C"),
            Err(StockOpnameError::UnknownWarehouse(_))
        ));
    }

    #[test]
    fn test_transaction_kind_normalization() {
        assert_eq!(TransactionKind::parse("In"), Some(TransactionKind::In));
        assert_eq!(TransactionKind::parse("MASUK"), Some(TransactionKind::In));
        assert_eq!(TransactionKind::parse(" keluar "), Some(TransactionKind::Out));
        assert_eq!(TransactionKind::parse("Out"), Some(TransactionKind::Out));
        assert_eq!(TransactionKind::parse("retur"), None);
        assert_eq!(TransactionKind::Out.signed(4), -4);
    }

    #[test]
    fn test_transaction_deserializes_both_spellings() {
        let json = r#"[
            {"idBarang": "ELK-0001", "jenis": "Masuk", "jumlah": 3, "tanggal": "05/01/2026 08:00"},
            {"idBarang": "ELK-0001", "jenis": "Out", "jumlah": 1, "tanggal": 46027.5, "rowIndex": 9}
        ]"#;
        let parsed: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].jenis, TransactionKind::In);
        assert_eq!(parsed[0].tanggal, RawDate::from("05/01/2026 08:00"));
        assert_eq!(parsed[1].jenis, TransactionKind::Out);
        assert_eq!(parsed[1].tanggal, RawDate::Serial(46027.5));
        assert_eq!(parsed[1].row_index, Some(9));
    }

    #[test]
    fn test_item_schema_generation() {
        let schema_json = Item::schema_as_json().unwrap();
        assert!(schema_json.contains("stokA"));
        assert!(schema_json.contains("harga"));
    }
}
