use crate::error::{Result, StockOpnameError};
use crate::normalizer::{is_sentinel, DateNormalizer};
use crate::period::ReconciliationWindow;
use crate::schema::{Item, Transaction, TransactionKind, Warehouse};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{btree_map::Entry, BTreeMap};

/// One item's reconstructed movement over a cut-off window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoLineItem {
    pub id: String,
    pub nama: String,
    pub kategori: String,
    pub satuan: String,
    pub harga_satuan: f64,
    /// Balance at window start
    pub saldo_awal: i64,
    pub masuk: i64,
    pub keluar: i64,
    /// Balance at window end
    pub stok_akhir: i64,
    pub total_nilai: f64,
}

impl SoLineItem {
    fn opening(item: &Item, stok_akhir: i64) -> Self {
        Self {
            id: item.id.clone(),
            nama: item.nama.clone(),
            kategori: item.kategori.clone(),
            satuan: item.satuan.clone(),
            harga_satuan: item.harga,
            saldo_awal: stok_akhir,
            masuk: 0,
            keluar: 0,
            stok_akhir,
            total_nilai: 0.0,
        }
    }

    /// Any movement or any non-zero balance.
    pub fn is_active(&self) -> bool {
        self.masuk > 0 || self.keluar > 0 || self.stok_akhir > 0 || self.saldo_awal > 0
    }

    pub fn satisfies_identity(&self) -> bool {
        self.saldo_awal
            .checked_add(self.masuk)
            .and_then(|sum| sum.checked_sub(self.keluar))
            == Some(self.stok_akhir)
    }

    fn balances(&self) -> Balances {
        Balances {
            saldo_awal: self.saldo_awal,
            masuk: self.masuk,
            keluar: self.keluar,
            stok_akhir: self.stok_akhir,
        }
    }

    fn set_balances(&mut self, balances: Balances) {
        self.saldo_awal = balances.saldo_awal;
        self.masuk = balances.masuk;
        self.keluar = balances.keluar;
        self.stok_akhir = balances.stok_akhir;
    }
}

#[derive(Debug, Clone, Copy)]
struct Balances {
    saldo_awal: i64,
    masuk: i64,
    keluar: i64,
    stok_akhir: i64,
}

impl Balances {
    /// Balances after one more movement, or `None` if any of them would overflow. The
    /// opening balance is recomputed so the identity holds after every step.
    fn after(mut self, position: Ordering, jenis: TransactionKind, quantity: i64) -> Option<Self> {
        match (position, jenis) {
            (Ordering::Less, _) => return Some(self),
            (Ordering::Equal, TransactionKind::In) => {
                self.masuk = self.masuk.checked_add(quantity)?;
            }
            (Ordering::Equal, TransactionKind::Out) => {
                self.keluar = self.keluar.checked_add(quantity)?;
            }
            // Movements after the cut-off are already reflected in the current stock,
            // so undo them to get the balance at the window end.
            (Ordering::Greater, _) => {
                self.stok_akhir = self.stok_akhir.checked_sub(jenis.signed(quantity))?;
            }
        }
        self.saldo_awal = self
            .stok_akhir
            .checked_sub(self.masuk)?
            .checked_add(self.keluar)?;
        Some(self)
    }
}

pub type LineItems = BTreeMap<String, SoLineItem>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    pub before_window: usize,
    pub within_window: usize,
    pub after_window: usize,
    pub orphaned: usize,
    pub undated: usize,
    /// Zero or negative quantities; a movement always moves at least one unit.
    pub invalid_quantity: usize,
    pub overflowed: usize,
}

/// Rebuilds historical balances by walking the ledger backward from the current stock.
pub struct Reconstructor {
    normalizer: DateNormalizer,
}

impl Reconstructor {
    pub fn new(normalizer: DateNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn reconstruct(
        &self,
        items: &[Item],
        transactions: &[Transaction],
        window: &ReconciliationWindow,
        warehouse: Warehouse,
    ) -> Result<LineItems> {
        self.reconstruct_with_stats(items, transactions, window, warehouse)
            .map(|(lines, _)| lines)
    }

    pub fn reconstruct_with_stats(
        &self,
        items: &[Item],
        transactions: &[Transaction],
        window: &ReconciliationWindow,
        warehouse: Warehouse,
    ) -> Result<(LineItems, ReconstructionStats)> {
        if items.is_empty() {
            return Err(StockOpnameError::EmptyItemMaster);
        }

        let mut lines: LineItems = BTreeMap::new();
        for item in items {
            match lines.entry(item.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(SoLineItem::opening(item, item.stock(warehouse)));
                }
                Entry::Occupied(_) => {
                    warn!(
                        "Duplicate item id {} in item master; keeping first entry",
                        item.id
                    );
                }
            }
        }

        let mut stats = ReconstructionStats::default();

        for transaction in transactions {
            let Some(line) = lines.get_mut(&transaction.id_barang) else {
                stats.orphaned += 1;
                continue;
            };

            if transaction.jumlah <= 0 {
                stats.invalid_quantity += 1;
                continue;
            }

            let ts = transaction.timestamp(&self.normalizer);
            if is_sentinel(ts) {
                stats.undated += 1;
            }

            let position = window.position(ts);
            let moved = line.balances().after(position, transaction.jenis, transaction.jumlah);
            match moved {
                Some(balances) => line.set_balances(balances),
                None => {
                    warn!(
                        "Skipped {} movement of {} for {}: balance out of range",
                        transaction.jenis.label(),
                        transaction.jumlah,
                        transaction.id_barang
                    );
                    stats.overflowed += 1;
                    continue;
                }
            }

            match position {
                Ordering::Less => stats.before_window += 1,
                Ordering::Equal => stats.within_window += 1,
                Ordering::Greater => stats.after_window += 1,
            }
        }

        for line in lines.values_mut() {
            line.total_nilai = line.stok_akhir as f64 * line.harga_satuan;
        }

        if stats.orphaned > 0 {
            warn!(
                "Skipped {} transaction(s) referencing items missing from the item master",
                stats.orphaned
            );
        }
        if stats.invalid_quantity > 0 {
            warn!(
                "Skipped {} transaction(s) with a non-positive quantity",
                stats.invalid_quantity
            );
        }
        if stats.undated > 0 {
            warn!(
                "{} transaction(s) have unparseable dates and were treated as oldest",
                stats.undated
            );
        }
        debug!(
            "Reconstructed {} items for {}: {} before, {} within, {} after window",
            lines.len(),
            warehouse,
            stats.before_window,
            stats.within_window,
            stats.after_window
        );

        Ok((lines, stats))
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new(DateNormalizer::default())
    }
}

pub fn reconstruct(
    items: &[Item],
    transactions: &[Transaction],
    window: &ReconciliationWindow,
    warehouse: Warehouse,
) -> Result<LineItems> {
    Reconstructor::default().reconstruct(items, transactions, window, warehouse)
}
