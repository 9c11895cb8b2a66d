//! Greedy payment allocation across outstanding documents

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::tax::WithholdingRate;

/// TDS attached to a single outstanding document. The amount is computed
/// from the document's taxable amount when the rate is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedWithholding {
    /// The rate that was applied
    pub rate: WithholdingRate,
    /// `taxable_amount * rate / 100`, fixed at attach time
    pub amount: BigDecimal,
}

/// One outstanding document a payment can be allocated against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outstanding {
    /// Document identifier
    pub document_id: String,
    /// Document number, for display
    pub number: u64,
    /// Taxable amount of the document, the TDS basis
    pub taxable_amount: BigDecimal,
    /// Balance still owed on the document
    pub balance: BigDecimal,
    /// TDS deduction attached to this document, if any
    pub applied_tds: Option<AppliedWithholding>,
}

impl Outstanding {
    /// Create an outstanding entry with no TDS
    pub fn new(document_id: String, number: u64, taxable_amount: BigDecimal, balance: BigDecimal) -> Self {
        Self {
            document_id,
            number,
            taxable_amount,
            balance,
            applied_tds: None,
        }
    }

    /// Attach a TDS rate; the deducted amount is taken off the taxable amount
    pub fn apply_tds(&mut self, rate: WithholdingRate) {
        let amount = rate.amount_on(&self.taxable_amount);
        self.applied_tds = Some(AppliedWithholding { rate, amount });
    }

    /// Detach any applied TDS
    pub fn clear_tds(&mut self) {
        self.applied_tds = None;
    }

    /// Balance net of TDS, floored at zero
    pub fn effective_balance(&self) -> BigDecimal {
        let tds_amount = self
            .applied_tds
            .as_ref()
            .map(|applied| applied.amount.clone())
            .unwrap_or_else(|| BigDecimal::from(0));
        let net = &self.balance - &tds_amount;
        if net < BigDecimal::from(0) {
            BigDecimal::from(0)
        } else {
            net
        }
    }
}

/// Allocation outcome for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub document_id: String,
    pub number: u64,
    /// Balance net of TDS at allocation time
    pub effective_balance: BigDecimal,
    /// Portion of the payment settled against this document
    pub amount_settled: BigDecimal,
    /// Balance left on the document after settlement
    pub remaining_balance: BigDecimal,
}

/// Result of allocating one payment across a list of outstanding documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Per-document outcomes, in the input order
    pub entries: Vec<AllocationEntry>,
    /// Sum of settled amounts
    pub total_settled: BigDecimal,
    /// Payment left over after every balance is cleared; informational only,
    /// never represented as change owed back
    pub unapplied: BigDecimal,
}

/// Allocate a payment greedily across outstanding documents in list order.
///
/// List order is the priority: the first-listed document is settled first,
/// a deliberate business policy rather than an incidental tie-break. Each
/// document receives `min(remaining, effective_balance)`; once the payment
/// is exhausted the remaining documents keep a settled amount of zero with
/// their effective balance still visible.
pub fn allocate(payment_amount: &BigDecimal, outstanding: &[Outstanding]) -> Allocation {
    let zero = BigDecimal::from(0);
    let mut remaining = if payment_amount > &zero {
        payment_amount.clone()
    } else {
        zero.clone()
    };

    let mut entries = Vec::with_capacity(outstanding.len());
    let mut total_settled = zero.clone();

    for doc in outstanding {
        let effective = doc.effective_balance();
        let settled = if remaining < effective {
            remaining.clone()
        } else {
            effective.clone()
        };
        remaining -= &settled;
        total_settled += &settled;

        entries.push(AllocationEntry {
            document_id: doc.document_id.clone(),
            number: doc.number,
            remaining_balance: &effective - &settled,
            effective_balance: effective,
            amount_settled: settled,
        });
    }

    tracing::debug!(
        payment = %payment_amount,
        settled = %total_settled,
        unapplied = %remaining,
        documents = outstanding.len(),
        "payment allocated"
    );

    Allocation {
        entries,
        total_settled,
        unapplied: remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::WithholdingKind;

    fn doc(id: &str, number: u64, balance: i64) -> Outstanding {
        Outstanding::new(
            id.to_string(),
            number,
            BigDecimal::from(balance),
            BigDecimal::from(balance),
        )
    }

    fn tds(rate: i64) -> WithholdingRate {
        WithholdingRate::new(
            format!("tds-{rate}"),
            WithholdingKind::Tds,
            "TDS".to_string(),
            "194Q".to_string(),
            BigDecimal::from(rate),
        )
        .unwrap()
    }

    #[test]
    fn test_partial_settlement_of_second_invoice() {
        // 5000 against balances 3000 and 4000
        let docs = vec![doc("a", 1, 3000), doc("b", 2, 4000)];
        let allocation = allocate(&BigDecimal::from(5000), &docs);

        assert_eq!(allocation.entries[0].amount_settled, BigDecimal::from(3000));
        assert_eq!(allocation.entries[0].remaining_balance, BigDecimal::from(0));
        assert_eq!(allocation.entries[1].amount_settled, BigDecimal::from(2000));
        assert_eq!(allocation.entries[1].remaining_balance, BigDecimal::from(2000));
        assert_eq!(allocation.total_settled, BigDecimal::from(5000));
        assert_eq!(allocation.unapplied, BigDecimal::from(0));
    }

    #[test]
    fn test_zero_payment_settles_nothing() {
        let docs = vec![doc("a", 1, 3000)];
        let allocation = allocate(&BigDecimal::from(0), &docs);
        assert_eq!(allocation.total_settled, BigDecimal::from(0));
        assert_eq!(allocation.entries[0].amount_settled, BigDecimal::from(0));
        assert_eq!(allocation.entries[0].effective_balance, BigDecimal::from(3000));
    }

    #[test]
    fn test_excess_payment_is_not_change() {
        let docs = vec![doc("a", 1, 1000)];
        let allocation = allocate(&BigDecimal::from(2500), &docs);
        assert_eq!(allocation.total_settled, BigDecimal::from(1000));
        assert_eq!(allocation.unapplied, BigDecimal::from(1500));
        assert_eq!(allocation.entries[0].remaining_balance, BigDecimal::from(0));
    }

    #[test]
    fn test_total_settled_never_exceeds_effective_total() {
        let docs = vec![doc("a", 1, 700), doc("b", 2, 800), doc("c", 3, 900)];
        let allocation = allocate(&BigDecimal::from(10000), &docs);
        assert_eq!(allocation.total_settled, BigDecimal::from(2400));
        for entry in &allocation.entries {
            assert!(entry.amount_settled <= entry.effective_balance);
        }
    }

    #[test]
    fn test_tds_reduces_effective_balance_before_allocation() {
        // taxable 10000, balance 11800, TDS 1% of taxable = 100
        let mut first = Outstanding::new(
            "a".to_string(),
            1,
            BigDecimal::from(10000),
            BigDecimal::from(11800),
        );
        first.apply_tds(tds(1));
        assert_eq!(first.effective_balance(), BigDecimal::from(11700));

        let allocation = allocate(&BigDecimal::from(11700), &[first]);
        assert_eq!(allocation.entries[0].amount_settled, BigDecimal::from(11700));
        assert_eq!(allocation.entries[0].remaining_balance, BigDecimal::from(0));
    }

    #[test]
    fn test_tds_larger_than_balance_floors_at_zero() {
        let mut doc = Outstanding::new(
            "a".to_string(),
            1,
            BigDecimal::from(10000),
            BigDecimal::from(50),
        );
        doc.apply_tds(tds(1));
        assert_eq!(doc.effective_balance(), BigDecimal::from(0));
    }

    #[test]
    fn test_negative_payment_treated_as_zero() {
        let docs = vec![doc("a", 1, 500)];
        let allocation = allocate(&BigDecimal::from(-100), &docs);
        assert_eq!(allocation.total_settled, BigDecimal::from(0));
    }

    #[test]
    fn test_list_order_is_priority() {
        let docs = vec![doc("late", 9, 4000), doc("early", 1, 3000)];
        let allocation = allocate(&BigDecimal::from(4000), &docs);
        // first-listed wins regardless of number
        assert_eq!(allocation.entries[0].document_id, "late");
        assert_eq!(allocation.entries[0].amount_settled, BigDecimal::from(4000));
        assert_eq!(allocation.entries[1].amount_settled, BigDecimal::from(0));
    }
}
