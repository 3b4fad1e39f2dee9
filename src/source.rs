use crate::error::Result;
use crate::ingestion::{items_from_json, transactions_from_json};
use crate::schema::{Item, Transaction, Warehouse};
use std::collections::BTreeMap;

/// The remote item master and transaction ledger.
///
/// Implementations own fetching, caching and retries. A report reads one snapshot of each
/// and never writes back.
pub trait InventorySource {
    /// Full item master, including items with zero stock.
    fn all_items(&self) -> Result<Vec<Item>>;

    /// Full transaction history of one warehouse.
    fn transactions(&self, warehouse: Warehouse) -> Result<Vec<Transaction>>;
}

impl<S: InventorySource + ?Sized> InventorySource for &S {
    fn all_items(&self) -> Result<Vec<Item>> {
        (**self).all_items()
    }

    fn transactions(&self, warehouse: Warehouse) -> Result<Vec<Transaction>> {
        (**self).transactions(warehouse)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    items: Vec<Item>,
    ledgers: BTreeMap<Warehouse, Vec<Transaction>>,
}

impl InMemorySource {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ledgers: BTreeMap::new(),
        }
    }

    pub fn with_transactions(
        mut self,
        warehouse: Warehouse,
        transactions: Vec<Transaction>,
    ) -> Self {
        self.ledgers.insert(warehouse, transactions);
        self
    }
}

impl InventorySource for InMemorySource {
    fn all_items(&self) -> Result<Vec<Item>> {
        Ok(self.items.clone())
    }

    fn transactions(&self, warehouse: Warehouse) -> Result<Vec<Transaction>> {
        Ok(self.ledgers.get(&warehouse).cloned().unwrap_or_default())
    }
}

/// Raw response bodies captured from the spreadsheet API, one per action.
#[derive(Debug, Clone, Default)]
pub struct JsonPayloadSource {
    items_body: String,
    transaction_bodies: BTreeMap<Warehouse, String>,
}

impl JsonPayloadSource {
    pub fn new(items_body: impl Into<String>) -> Self {
        Self {
            items_body: items_body.into(),
            transaction_bodies: BTreeMap::new(),
        }
    }

    pub fn with_transactions(mut self, warehouse: Warehouse, body: impl Into<String>) -> Self {
        self.transaction_bodies.insert(warehouse, body.into());
        self
    }
}

impl InventorySource for JsonPayloadSource {
    fn all_items(&self) -> Result<Vec<Item>> {
        items_from_json(&self.items_body)
    }

    fn transactions(&self, warehouse: Warehouse) -> Result<Vec<Transaction>> {
        match self.transaction_bodies.get(&warehouse) {
            Some(body) => transactions_from_json(body),
            None => Ok(Vec::new()),
        }
    }
}
