use crate::error::{Result, StockOpnameError};
use crate::normalizer::{is_sentinel, DateNormalizer};
use crate::schema::{Category, Item, RawDate, Transaction, TransactionKind, Warehouse};
use crate::utils::{format_log_timestamp, validate_month};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Longest accepted category initial.
pub const MAX_INITIAL_LEN: usize = 4;

const DEFAULT_CATEGORY: &str = "Umum";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the item id or name.
    pub search: Option<String>,
    /// (year, month) of the local transaction date.
    pub month: Option<(i32, u32)>,
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_month(mut self, year: i32, month: u32) -> Result<Self> {
        validate_month(month)?;
        self.month = Some((year, month));
        Ok(self)
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn matches(&self, transaction: &Transaction, ts: NaiveDateTime) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_id = transaction.id_barang.to_lowercase().contains(&needle);
            let in_name = transaction.nama_barang.to_lowercase().contains(&needle);
            if !in_id && !in_name {
                return false;
            }
        }

        if let Some((year, month)) = self.month {
            if is_sentinel(ts) || ts.year() != year || ts.month() != month {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if transaction.jenis != kind {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry<'a> {
    pub transaction: &'a Transaction,
    pub timestamp: NaiveDateTime,
}

impl LogEntry<'_> {
    /// "Sen, 05 Jan 2026 14:30", or "-" when the date is unknown.
    pub fn display_date(&self) -> String {
        if is_sentinel(self.timestamp) {
            "-".to_string()
        } else {
            format_log_timestamp(self.timestamp)
        }
    }

    /// "+5" for inbound, "-5" for outbound.
    pub fn signed_quantity(&self) -> String {
        match self.transaction.jenis {
            TransactionKind::In => format!("+{}", self.transaction.jumlah),
            TransactionKind::Out => format!("-{}", self.transaction.jumlah),
        }
    }
}

/// Matching transactions, newest first.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
    normalizer: &DateNormalizer,
) -> Vec<LogEntry<'a>> {
    let mut entries: Vec<LogEntry<'a>> = transactions
        .iter()
        .map(|transaction| LogEntry {
            transaction,
            timestamp: transaction.timestamp(normalizer),
        })
        .filter(|entry| filter.matches(entry.transaction, entry.timestamp))
        .collect();

    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

/// A stock-in/stock-out entry as filled in by warehouse staff, before submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub warehouse: Option<Warehouse>,
    pub jenis: Option<TransactionKind>,
    pub id_barang: String,
    pub nama_barang: String,
    pub tanggal: String,
    pub jumlah: i64,
    pub satuan: String,
    pub pic: String,
    pub petugas: String,
    pub keterangan: String,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<()> {
        if self.warehouse.is_none() {
            return Err(StockOpnameError::validation("gudang", "warehouse must be selected"));
        }
        if self.jenis.is_none() {
            return Err(StockOpnameError::validation("jenis", "choose Masuk or Keluar"));
        }
        if self.id_barang.trim().is_empty() {
            return Err(StockOpnameError::validation("idBarang", "select an item first"));
        }
        if self.tanggal.trim().is_empty() {
            return Err(StockOpnameError::validation("tanggal", "transaction date is required"));
        }
        if self.jumlah <= 0 {
            return Err(StockOpnameError::validation(
                "jumlah",
                format!("quantity must be positive, got {}", self.jumlah),
            ));
        }
        if self.pic.trim().is_empty() {
            return Err(StockOpnameError::validation("pic", "PIC is required"));
        }
        if self.petugas.trim().is_empty() {
            return Err(StockOpnameError::validation("petugas", "officer name is required"));
        }
        Ok(())
    }

    pub fn into_transaction(self) -> Result<(Warehouse, Transaction)> {
        self.validate()?;
        let (Some(warehouse), Some(jenis)) = (self.warehouse, self.jenis) else {
            return Err(StockOpnameError::validation("jenis", "incomplete draft"));
        };

        Ok((
            warehouse,
            Transaction {
                id_barang: self.id_barang.trim().to_string(),
                nama_barang: self.nama_barang,
                jenis,
                jumlah: self.jumlah,
                tanggal: RawDate::Text(self.tanggal.trim().to_string()),
                row_index: None,
                keterangan: self.keterangan,
                petugas: self.petugas,
            },
        ))
    }
}

/// Removal of one ledger row, which hands the moved quantity back to the item's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    #[serde(rename = "gudang")]
    pub warehouse: Warehouse,
    pub row_index: u64,
    pub id_barang: String,
    pub jenis: TransactionKind,
    pub jumlah: i64,
}

impl DeleteRequest {
    pub fn from_transaction(warehouse: Warehouse, transaction: &Transaction) -> Result<Self> {
        let Some(row_index) = transaction.row_index else {
            return Err(StockOpnameError::validation(
                "rowIndex",
                "transaction has no ledger row index",
            ));
        };

        let request = Self {
            warehouse,
            row_index,
            id_barang: transaction.id_barang.clone(),
            jenis: transaction.jenis,
            jumlah: transaction.jumlah,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_index == 0 {
            return Err(StockOpnameError::validation("rowIndex", "row index must be positive"));
        }
        if self.id_barang.trim().is_empty() {
            return Err(StockOpnameError::validation("idBarang", "transaction has no item id"));
        }
        if self.jumlah <= 0 {
            return Err(StockOpnameError::validation(
                "jumlah",
                format!("quantity must be positive, got {}", self.jumlah),
            ));
        }
        Ok(())
    }

    /// Change to the current stock once the row is gone: deleting an inbound row takes the
    /// units out again, deleting an outbound row returns them.
    pub fn stock_reversal(&self) -> i64 {
        -self.jenis.signed(self.jumlah)
    }

    /// Reverses the movement on the matching item's stock and returns the new stock.
    pub fn apply_to(&self, items: &mut [Item]) -> Result<i64> {
        self.validate()?;
        let item = items
            .iter_mut()
            .find(|item| item.id == self.id_barang)
            .ok_or_else(|| {
                StockOpnameError::validation(
                    "idBarang",
                    format!("item {} is not in the item master", self.id_barang),
                )
            })?;

        let stock = item.stock_mut(self.warehouse);
        *stock = stock.checked_add(self.stock_reversal()).ok_or_else(|| {
            StockOpnameError::validation("jumlah", "reversed stock is out of range")
        })?;
        Ok(*stock)
    }
}

/// A new item master entry as entered in the add-item form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemDraft {
    pub id_barang: String,
    pub nama: String,
    pub kategori: String,
    pub satuan: String,
    pub stok_awal: i64,
    #[serde(rename = "gudang")]
    pub warehouse: Option<Warehouse>,
}

impl NewItemDraft {
    /// Checks required fields and rejects an id already present in `master`.
    pub fn validate(&self, master: &[Item]) -> Result<()> {
        let id = self.id_barang.trim();
        if id.is_empty() {
            return Err(StockOpnameError::validation("idBarang", "item id must not be empty"));
        }
        if self.nama.trim().is_empty() {
            return Err(StockOpnameError::validation("nama", "item name must not be empty"));
        }
        if let Some(existing) = master.iter().find(|item| item.id == id) {
            return Err(StockOpnameError::validation(
                "idBarang",
                format!("ID {} already exists: {}", id, existing.nama),
            ));
        }
        if self.stok_awal < 0 {
            return Err(StockOpnameError::validation(
                "stokAwal",
                format!("initial stock must not be negative, got {}", self.stok_awal),
            ));
        }
        if self.warehouse.is_none() {
            return Err(StockOpnameError::validation("gudang", "warehouse must be selected"));
        }
        Ok(())
    }

    /// The item to append to `master`, holding the initial stock in the chosen warehouse.
    pub fn into_item(self, master: &[Item]) -> Result<Item> {
        self.validate(master)?;
        let Some(warehouse) = self.warehouse else {
            return Err(StockOpnameError::validation("gudang", "warehouse must be selected"));
        };

        let kategori = match self.kategori.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            name => name.to_string(),
        };
        let mut item = Item {
            id: self.id_barang.trim().to_string(),
            nama: self.nama.trim().to_string(),
            kategori,
            satuan: self.satuan.trim().to_string(),
            stok_a: 0,
            stok_b: 0,
            harga: 0.0,
        };
        *item.stock_mut(warehouse) = self.stok_awal;
        Ok(item)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategoryDraft {
    pub nama: String,
    pub inisial: String,
}

impl NewCategoryDraft {
    pub fn validate(&self) -> Result<()> {
        if self.nama.trim().is_empty() {
            return Err(StockOpnameError::validation("nama", "category name is required"));
        }
        let inisial = self.inisial.trim();
        if inisial.is_empty() {
            return Err(StockOpnameError::validation("inisial", "category initial is required"));
        }
        if inisial.chars().count() > MAX_INITIAL_LEN {
            return Err(StockOpnameError::validation(
                "inisial",
                format!("initial must be at most {} characters", MAX_INITIAL_LEN),
            ));
        }
        Ok(())
    }

    /// Trimmed name and uppercased initial.
    pub fn into_category(self) -> Result<Category> {
        self.validate()?;
        Ok(Category {
            nama: self.nama.trim().to_string(),
            inisial: self.inisial.trim().to_uppercase(),
        })
    }
}
