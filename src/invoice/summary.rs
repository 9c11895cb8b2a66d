//! Document-level tax summary: a pure calculation over a line snapshot

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::invoice::line_item::LineItem;
use crate::tax::TcsCharge;

/// Per-rate bucket of the tax summary, keyed by the nominal GST percentage.
/// Intra- and inter-state lines at the same nominal rate land in the same
/// bucket; which of the split columns is populated depends on jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateGroup {
    /// Nominal GST percentage the bucket is keyed by
    pub nominal_rate: BigDecimal,
    /// Taxable value accumulated across the bucket's lines
    pub taxable_value: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    /// Cess accumulates independently of jurisdiction
    pub cess_amount: BigDecimal,
}

impl RateGroup {
    fn new(nominal_rate: BigDecimal) -> Self {
        Self {
            nominal_rate,
            taxable_value: BigDecimal::from(0),
            cgst_amount: BigDecimal::from(0),
            sgst_amount: BigDecimal::from(0),
            igst_amount: BigDecimal::from(0),
            cess_amount: BigDecimal::from(0),
        }
    }

    fn absorb(&mut self, line: &LineItem) {
        self.taxable_value += &line.taxable_value;
        self.cgst_amount += &line.cgst_amount;
        self.sgst_amount += &line.sgst_amount;
        self.igst_amount += &line.igst_amount;
        self.cess_amount += &line.cess_amount;
    }
}

/// Aggregate totals for a document, computed in one pass from an immutable
/// line snapshot. TCS enters the grand total exactly here and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Sum of price x quantity before discounts
    pub gross_taxable_amount: BigDecimal,
    /// Sum of per-line discounts, applied before grouping
    pub discount_amount: BigDecimal,
    /// Sum of discounted pre-tax line values
    pub taxable_amount: BigDecimal,
    /// Per-rate buckets, ascending by nominal rate
    pub rate_groups: Vec<RateGroup>,
    /// Sum of final line amounts
    pub total_amount: BigDecimal,
    /// TCS computed on the selected basis, zero when TCS is off
    pub tcs_amount: BigDecimal,
    /// Total amount plus TCS
    pub grand_total: BigDecimal,
}

impl DocumentSummary {
    /// Summarize a line snapshot, optionally applying a TCS charge.
    ///
    /// The calculation has no hidden state: summarizing the same snapshot
    /// twice yields identical output.
    pub fn calculate(lines: &[LineItem], tcs: Option<&TcsCharge>) -> Self {
        let mut gross_taxable_amount = BigDecimal::from(0);
        let mut taxable_amount = BigDecimal::from(0);
        let mut total_amount = BigDecimal::from(0);
        let mut rate_groups: Vec<RateGroup> = Vec::new();

        for line in lines {
            let undiscounted =
                BigDecimal::from(line.quantity) * &line.pre_tax_unit_price;
            gross_taxable_amount += &undiscounted;
            taxable_amount += &line.taxable_value;
            total_amount += &line.line_total;

            match rate_groups
                .iter_mut()
                .find(|group| group.nominal_rate == line.nominal_rate)
            {
                Some(group) => group.absorb(line),
                None => {
                    let mut group = RateGroup::new(line.nominal_rate.clone());
                    group.absorb(line);
                    rate_groups.push(group);
                }
            }
        }

        rate_groups.sort_by(|a, b| a.nominal_rate.cmp(&b.nominal_rate));

        let discount_amount = &gross_taxable_amount - &taxable_amount;
        let tcs_amount = match tcs {
            Some(charge) => charge.amount(&taxable_amount, &total_amount),
            None => BigDecimal::from(0),
        };
        let grand_total = &total_amount + &tcs_amount;

        Self {
            gross_taxable_amount,
            discount_amount,
            taxable_amount,
            rate_groups,
            total_amount,
            tcs_amount,
            grand_total,
        }
    }

    /// Look up the bucket for a nominal rate
    pub fn group(&self, nominal_rate: &BigDecimal) -> Option<&RateGroup> {
        self.rate_groups
            .iter()
            .find(|group| &group.nominal_rate == nominal_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::{TaxJurisdiction, TaxRateEntry, TaxRateTable, TcsBasis, WithholdingKind, WithholdingRate};
    use crate::types::CatalogEntry;

    fn rate_table() -> TaxRateTable {
        TaxRateTable::new(vec![
            TaxRateEntry {
                id: "r5".to_string(),
                label: "GST @ 5%".to_string(),
                rate: BigDecimal::from(5),
                cess_rate: BigDecimal::from(0),
            },
            TaxRateEntry {
                id: "r18".to_string(),
                label: "GST @ 18%".to_string(),
                rate: BigDecimal::from(18),
                cess_rate: BigDecimal::from(0),
            },
        ])
    }

    fn line(price: i64, rate_id: &str, jurisdiction: TaxJurisdiction) -> LineItem {
        let entry = CatalogEntry::item(
            format!("itm-{}-{}", price, rate_id),
            "Goods".to_string(),
            BigDecimal::from(price),
            rate_id.to_string(),
        );
        LineItem::from_catalog(&entry, &rate_table(), jurisdiction).unwrap()
    }

    #[test]
    fn test_grouping_by_nominal_rate() {
        let lines = vec![
            line(1000, "r18", TaxJurisdiction::IntraState),
            line(500, "r18", TaxJurisdiction::IntraState),
            line(200, "r5", TaxJurisdiction::IntraState),
        ];

        let summary = DocumentSummary::calculate(&lines, None);
        assert_eq!(summary.rate_groups.len(), 2);

        let eighteen = summary.group(&BigDecimal::from(18)).unwrap();
        assert_eq!(eighteen.taxable_value, BigDecimal::from(1500));
        assert_eq!(eighteen.cgst_amount, BigDecimal::from(135));
        assert_eq!(eighteen.sgst_amount, BigDecimal::from(135));
        assert_eq!(eighteen.igst_amount, BigDecimal::from(0));

        let five = summary.group(&BigDecimal::from(5)).unwrap();
        assert_eq!(five.cgst_amount, BigDecimal::from(5));
        assert_eq!(five.sgst_amount, BigDecimal::from(5));
    }

    #[test]
    fn test_inter_state_lines_share_bucket_key() {
        let lines = vec![line(1000, "r18", TaxJurisdiction::InterState)];
        let summary = DocumentSummary::calculate(&lines, None);

        let group = summary.group(&BigDecimal::from(18)).unwrap();
        assert_eq!(group.igst_amount, BigDecimal::from(180));
        assert_eq!(group.cgst_amount, BigDecimal::from(0));
    }

    #[test]
    fn test_discount_applied_per_line_before_grouping() {
        let mut discounted = line(1000, "r18", TaxJurisdiction::IntraState);
        discounted.set_discount(BigDecimal::from(10)).unwrap();
        discounted
            .recompute(&rate_table(), TaxJurisdiction::IntraState)
            .unwrap();

        let summary = DocumentSummary::calculate(&[discounted], None);
        assert_eq!(summary.gross_taxable_amount, BigDecimal::from(1000));
        assert_eq!(summary.discount_amount, BigDecimal::from(100));
        assert_eq!(summary.taxable_amount, BigDecimal::from(900));
    }

    #[test]
    fn test_tcs_added_once_into_grand_total() {
        let lines = vec![line(1000, "r18", TaxJurisdiction::IntraState)];
        let tcs = TcsCharge::new(
            WithholdingRate::new(
                "tcs1".to_string(),
                WithholdingKind::Tcs,
                "TCS".to_string(),
                "206C(1H)".to_string(),
                BigDecimal::from(1),
            )
            .unwrap(),
            TcsBasis::Taxable,
        )
        .unwrap();

        let summary = DocumentSummary::calculate(&lines, Some(&tcs));
        assert_eq!(summary.total_amount, BigDecimal::from(1180));
        assert_eq!(summary.tcs_amount, BigDecimal::from(10));
        assert_eq!(summary.grand_total, BigDecimal::from(1190));
    }

    #[test]
    fn test_idempotent_over_unchanged_snapshot() {
        let lines = vec![
            line(1000, "r18", TaxJurisdiction::IntraState),
            line(200, "r5", TaxJurisdiction::IntraState),
        ];
        let first = DocumentSummary::calculate(&lines, None);
        let second = DocumentSummary::calculate(&lines, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_snapshot() {
        let summary = DocumentSummary::calculate(&[], None);
        assert_eq!(summary.taxable_amount, BigDecimal::from(0));
        assert_eq!(summary.grand_total, BigDecimal::from(0));
        assert!(summary.rate_groups.is_empty());
    }
}
