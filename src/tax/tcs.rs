//! TCS/TDS withholding rates and the TCS charge applied to a document

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{BillingError, BillingResult};

/// Whether a withholding rate is collected or deducted at source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithholdingKind {
    /// Tax Collected at Source, added on top of a sale
    Tcs,
    /// Tax Deducted at Source, subtracted from a settlement
    Tds,
}

/// A reusable TCS or TDS rate. User-creatable: a newly defined rate is
/// persisted and appended to the in-memory rate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithholdingRate {
    /// Backend identifier
    pub id: String,
    /// Collected or deducted at source
    pub kind: WithholdingKind,
    /// Free-form description
    pub description: String,
    /// Statutory section label, e.g. "206C(1H)" or "194Q"
    pub section: String,
    /// Rate percentage
    pub rate: BigDecimal,
}

impl WithholdingRate {
    /// Create a new rate record
    pub fn new(
        id: String,
        kind: WithholdingKind,
        description: String,
        section: String,
        rate: BigDecimal,
    ) -> BillingResult<Self> {
        if rate < BigDecimal::from(0) || rate > BigDecimal::from(100) {
            return Err(BillingError::InvalidRate(format!(
                "Withholding rate must be between 0 and 100, got {}",
                rate
            )));
        }
        Ok(Self {
            id,
            kind,
            description,
            section,
            rate,
        })
    }

    /// Amount withheld on the given basis: `basis * rate / 100`
    pub fn amount_on(&self, basis_amount: &BigDecimal) -> BigDecimal {
        (basis_amount * &self.rate) / BigDecimal::from(100)
    }
}

/// Which aggregate the TCS percentage applies to, selected by a form toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TcsBasis {
    /// The pre-tax taxable amount
    Taxable,
    /// The total amount after GST and cess
    Total,
}

/// TCS applied to a document: one rate, one basis, computed exactly once
/// when the document summary is assembled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcsCharge {
    /// The TCS rate in effect
    pub rate: WithholdingRate,
    /// Basis the percentage applies to
    pub basis: TcsBasis,
}

impl TcsCharge {
    /// Create a TCS charge, rejecting TDS rates
    pub fn new(rate: WithholdingRate, basis: TcsBasis) -> BillingResult<Self> {
        if rate.kind != WithholdingKind::Tcs {
            return Err(BillingError::InvalidRate(format!(
                "Rate '{}' is a TDS rate and cannot be collected at source",
                rate.id
            )));
        }
        Ok(Self { rate, basis })
    }

    /// Compute the TCS amount given both candidate bases. The basis toggle
    /// picks exactly one; the result feeds the grand total in a single place.
    pub fn amount(&self, taxable_amount: &BigDecimal, total_amount: &BigDecimal) -> BigDecimal {
        let basis_amount = match self.basis {
            TcsBasis::Taxable => taxable_amount,
            TcsBasis::Total => total_amount,
        };
        self.rate.amount_on(basis_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_percent_tcs() -> WithholdingRate {
        WithholdingRate::new(
            "tcs1".to_string(),
            WithholdingKind::Tcs,
            "TCS on sale of goods".to_string(),
            "206C(1H)".to_string(),
            BigDecimal::from(1),
        )
        .unwrap()
    }

    #[test]
    fn test_rate_bounds() {
        assert!(WithholdingRate::new(
            "bad".to_string(),
            WithholdingKind::Tds,
            "too high".to_string(),
            "194Q".to_string(),
            BigDecimal::from(101),
        )
        .is_err());
    }

    #[test]
    fn test_tcs_amount_on_taxable_basis() {
        let charge = TcsCharge::new(one_percent_tcs(), TcsBasis::Taxable).unwrap();
        let amount = charge.amount(&BigDecimal::from(10000), &BigDecimal::from(11800));
        assert_eq!(amount, BigDecimal::from(100));
    }

    #[test]
    fn test_tcs_amount_on_total_basis() {
        let charge = TcsCharge::new(one_percent_tcs(), TcsBasis::Total).unwrap();
        let amount = charge.amount(&BigDecimal::from(10000), &BigDecimal::from(11800));
        assert_eq!(amount, BigDecimal::from(118));
    }

    #[test]
    fn test_tds_rate_rejected_for_collection() {
        let tds = WithholdingRate::new(
            "tds1".to_string(),
            WithholdingKind::Tds,
            "TDS on purchase".to_string(),
            "194Q".to_string(),
            BigDecimal::from(1),
        )
        .unwrap();
        assert!(TcsCharge::new(tds, TcsBasis::Taxable).is_err());
    }
}
