use crate::engine::SoLineItem;
use crate::error::{Result, StockOpnameError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub checked: usize,
    /// Lines whose closing balance went below zero; the identity holds but the ledger
    /// and the item master disagree.
    pub negative_balances: Vec<String>,
}

impl VerificationResult {
    pub fn is_clean(&self) -> bool {
        self.negative_balances.is_empty()
    }
}

/// Checks `saldo_awal + masuk - keluar == stok_akhir` for every line, failing on the first
/// violation.
pub fn verify_reconciliation_identity<'a, I>(lines: I) -> Result<VerificationResult>
where
    I: IntoIterator<Item = &'a SoLineItem>,
{
    let mut result = VerificationResult::default();

    for line in lines {
        result.checked += 1;

        if !line.satisfies_identity() {
            return Err(StockOpnameError::ReconciliationViolation {
                id: line.id.clone(),
                saldo_awal: line.saldo_awal,
                masuk: line.masuk,
                keluar: line.keluar,
                stok_akhir: line.stok_akhir,
            });
        }

        if line.stok_akhir < 0 || line.saldo_awal < 0 {
            result.negative_balances.push(line.id.clone());
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, saldo_awal: i64, masuk: i64, keluar: i64, stok_akhir: i64) -> SoLineItem {
        SoLineItem {
            id: id.to_string(),
            nama: id.to_string(),
            kategori: String::new(),
            satuan: "pcs".to_string(),
            harga_satuan: 0.0,
            saldo_awal,
            masuk,
            keluar,
            stok_akhir,
            total_nilai: 0.0,
        }
    }

    #[test]
    fn test_balanced_lines_pass() {
        let lines = vec![line("A-0001", 18, 5, 0, 23), line("A-0002", 10, 0, 4, 6)];
        let result = verify_reconciliation_identity(&lines).unwrap();
        assert_eq!(result.checked, 2);
        assert!(result.is_clean());
    }

    #[test]
    fn test_violation_is_reported() {
        let lines = vec![line("A-0001", 18, 5, 0, 22)];
        match verify_reconciliation_identity(&lines) {
            Err(StockOpnameError::ReconciliationViolation { id, stok_akhir, .. }) => {
                assert_eq!(id, "A-0001");
                assert_eq!(stok_akhir, 22);
            }
            other => panic!("expected violation, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_balances_are_flagged() {
        let lines = vec![line("A-0003", -2, 5, 0, 3)];
        let result = verify_reconciliation_identity(&lines).unwrap();
        assert_eq!(result.negative_balances, vec!["A-0003".to_string()]);
        assert!(!result.is_clean());
    }
}
