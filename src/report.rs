use crate::engine::{LineItems, SoLineItem};
use crate::period::ReconciliationWindow;
use crate::schema::Warehouse;
use crate::utils::month_name;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub saldo_awal: i64,
    pub masuk: i64,
    pub keluar: i64,
    pub stok_akhir: i64,
    pub total_nilai: f64,
}

impl Totals {
    /// Quantity columns saturate at the `i64` bounds instead of wrapping.
    fn add(&mut self, line: &SoLineItem) {
        self.saldo_awal = self.saldo_awal.saturating_add(line.saldo_awal);
        self.masuk = self.masuk.saturating_add(line.masuk);
        self.keluar = self.keluar.saturating_add(line.keluar);
        self.stok_akhir = self.stok_akhir.saturating_add(line.stok_akhir);
        self.total_nilai += line.stok_akhir as f64 * line.harga_satuan;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledReport {
    pub rows: Vec<SoLineItem>,
    pub totals: Totals,
}

/// Keeps active lines, orders them by name, and sums every column.
pub fn assemble(balances: &LineItems) -> AssembledReport {
    let mut rows: Vec<SoLineItem> = balances
        .values()
        .filter(|line| line.is_active())
        .cloned()
        .collect();

    rows.sort_by(|a, b| compare_names(&a.nama, &b.nama).then_with(|| a.id.cmp(&b.id)));

    let mut totals = Totals::default();
    for row in &rows {
        totals.add(row);
    }

    AssembledReport { rows, totals }
}

/// Case-insensitive name ordering, falling back to exact ordering for names that differ
/// only by case.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub warehouse: Warehouse,
    pub year: i32,
    pub month: u32,
    pub window: ReconciliationWindow,
    pub generated_at: NaiveDateTime,
    pub rows: Vec<SoLineItem>,
    pub totals: Totals,
    /// Items whose reconstructed opening or closing balance is below zero, including
    /// lines left out of `rows` by the active filter.
    #[serde(default)]
    pub negative_balances: Vec<String>,
}

impl ReportDocument {
    pub fn new(
        warehouse: Warehouse,
        year: i32,
        month: u32,
        window: ReconciliationWindow,
        generated_at: NaiveDateTime,
        assembled: AssembledReport,
    ) -> Self {
        Self {
            warehouse,
            year,
            month,
            window,
            generated_at,
            rows: assembled.rows,
            totals: assembled.totals,
            negative_balances: Vec::new(),
        }
    }

    pub fn with_negative_balances(mut self, ids: Vec<String>) -> Self {
        self.negative_balances = ids;
        self
    }

    pub fn title(&self) -> String {
        format!("LAPORAN STOCK OPNAME - {}", self.warehouse.display_name())
    }

    /// "Januari 2026"
    pub fn period_name(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
