use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockOpnameError {
    #[error("Item master is empty: cannot build a stock opname report")]
    EmptyItemMaster,

    #[error("Invalid period selection: {0}")]
    InvalidPeriod(String),

    #[error("Unknown warehouse '{0}': expected A/Kalipucang or B/Troso")]
    UnknownWarehouse(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Reconciliation identity violated for {id}: saldo awal ({saldo_awal}) + masuk ({masuk}) - keluar ({keluar}) != stok akhir ({stok_akhir})")]
    ReconciliationViolation {
        id: String,
        saldo_awal: i64,
        masuk: i64,
        keluar: i64,
        stok_akhir: i64,
    },

    #[error("Validation error for '{field}': {details}")]
    Validation { field: String, details: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StockOpnameError {
    pub(crate) fn validation(field: &str, details: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StockOpnameError>;
