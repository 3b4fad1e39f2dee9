//! # Stock Opname
//!
//! Monthly stock opname (SO) reconciliation for a two-warehouse inventory whose item master
//! and transaction ledger live in a spreadsheet-backed API.
//!
//! ## Core Concepts
//!
//! - **Cut-off window**: the accounting period runs from the 26th of the previous month
//!   00:00:00 through the 25th of the report month 23:59:59
//! - **Backward reconstruction**: the item master only knows today's stock, so the closing
//!   balance of a past window is rebuilt by undoing every movement recorded after it
//! - **Reconciliation identity**: every reported line satisfies
//!   `saldo_awal + masuk - keluar == stok_akhir`
//! - **Lenient ingestion**: malformed dates become an epoch sentinel and orphaned
//!   transactions are skipped, so one bad ledger row never blocks a report
//!
//! ## Example
//!
//! ```rust,ignore
//! use stock_opname::*;
//!
//! let source = InMemorySource::new(items).with_transactions(Warehouse::A, ledger);
//! let report = generate_report(&source, 2026, 1, Warehouse::A)?;
//!
//! let mut file = std::fs::File::create(export::file_name(&report))?;
//! export::write_csv(&report, &ReportConfig::default(), &mut file)?;
//! ```

pub mod balancer;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod ledger;
pub mod normalizer;
pub mod period;
pub mod report;
pub mod schema;
pub mod search;
pub mod source;
pub mod utils;

pub use balancer::{verify_reconciliation_identity, VerificationResult};
pub use config::ReportConfig;
pub use engine::{reconstruct, LineItems, ReconstructionStats, Reconstructor, SoLineItem};
pub use error::{Result, StockOpnameError};
pub use ledger::{
    filter_transactions, DeleteRequest, LogEntry, NewCategoryDraft, NewItemDraft,
    TransactionDraft, TransactionFilter,
};
pub use normalizer::{epoch_sentinel, is_sentinel, normalize, normalize_str, DateNormalizer};
pub use period::{resolve_window, ReconciliationWindow};
pub use report::{assemble, AssembledReport, ReportDocument, Totals};
pub use schema::*;
pub use search::{lookup, next_item_id, search_items, SearchHit, SearchOutcome};
pub use source::{InMemorySource, InventorySource, JsonPayloadSource};
pub use utils::parse_month_selection;

use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};

pub struct StockOpnameProcessor {
    config: ReportConfig,
    normalizer: DateNormalizer,
}

impl StockOpnameProcessor {
    pub fn new(config: ReportConfig) -> Result<Self> {
        let normalizer = DateNormalizer::from_config(&config)?;
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn generate<S: InventorySource + ?Sized>(
        &self,
        source: &S,
        year: i32,
        month: u32,
        warehouse: Warehouse,
    ) -> Result<ReportDocument> {
        self.generate_at(source, year, month, warehouse, Local::now().naive_local())
    }

    pub fn generate_at<S: InventorySource + ?Sized>(
        &self,
        source: &S,
        year: i32,
        month: u32,
        warehouse: Warehouse,
        generated_at: NaiveDateTime,
    ) -> Result<ReportDocument> {
        let window = ReconciliationWindow::for_month(year, month)?;

        info!(
            "Generating stock opname for {} period {}",
            warehouse,
            window.label()
        );

        let items = source.all_items()?;
        if items.is_empty() {
            return Err(StockOpnameError::EmptyItemMaster);
        }
        let transactions = source.transactions(warehouse)?;
        debug!(
            "Loaded {} items and {} transactions",
            items.len(),
            transactions.len()
        );

        let reconstructor = Reconstructor::new(self.normalizer);
        let balances = reconstructor.reconstruct(&items, &transactions, &window, warehouse)?;

        // Every line, including those the active filter will drop.
        let verification = verify_reconciliation_identity(balances.values())?;
        if !verification.is_clean() {
            warn!(
                "Negative balances reconstructed for: {}",
                verification.negative_balances.join(", ")
            );
        }

        let assembled = assemble(&balances);
        let document =
            ReportDocument::new(warehouse, year, month, window, generated_at, assembled)
                .with_negative_balances(verification.negative_balances);

        info!(
            "Stock opname for {} ({}) ready with {} active items",
            warehouse,
            document.period_name(),
            document.rows.len()
        );

        Ok(document)
    }
}

/// Report for `year`/`month` with the default configuration.
pub fn generate_report<S: InventorySource + ?Sized>(
    source: &S,
    year: i32,
    month: u32,
    warehouse: Warehouse,
) -> Result<ReportDocument> {
    StockOpnameProcessor::new(ReportConfig::default())?.generate(source, year, month, warehouse)
}
