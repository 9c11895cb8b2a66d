//! Line items and their derived tax amounts

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tax::{GstBreakup, GstRate, RateCode, TaxJurisdiction, TaxRateTable};
use crate::types::{BillingError, BillingResult, CatalogEntry, CatalogKind, PricingMode};

/// Reference to the catalog record a line was created from. A line is backed
/// by an item or a service, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSource {
    Item(String),
    Service(String),
}

impl LineSource {
    /// The underlying catalog id
    pub fn catalog_id(&self) -> &str {
        match self {
            LineSource::Item(id) | LineSource::Service(id) => id,
        }
    }
}

/// One row of a document's line-item table.
///
/// The editable fields are quantity, discount, and the rate code; everything
/// below `taxable_value` is derived and refreshed by [`LineItem::recompute`]
/// after every edit, always from the current rate table and jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Client-generated identity, a uuid-suffixed composite of the catalog
    /// id. Distinct from the catalog id so the same entry can appear as
    /// multiple independent lines.
    pub line_id: String,
    /// Catalog record the line came from
    pub source: LineSource,
    /// Display description
    pub description: String,
    /// HSN/SAC code carried from the catalog
    pub hsn_sac: Option<String>,
    /// Units sold, always positive
    pub quantity: u32,
    /// Unit price as entered
    pub unit_price: BigDecimal,
    /// Whether the entered price includes tax
    pub pricing: PricingMode,
    /// Discount percentage, 0 to 100
    pub discount_percent: BigDecimal,
    /// Tax rate selection for this line
    pub rate_code: RateCode,

    /// Pre-tax unit price; back-solved for tax-inclusive pricing
    pub pre_tax_unit_price: BigDecimal,
    /// Tax-inclusive unit price
    pub gross_unit_price: BigDecimal,
    /// Nominal GST percentage, the grouping key for the tax summary
    pub nominal_rate: BigDecimal,
    /// Quantity- and discount-scaled pre-tax value
    pub taxable_value: BigDecimal,
    /// GST on the undiscounted pre-tax unit price
    pub tax_amount: BigDecimal,
    /// Cess on the undiscounted pre-tax unit price
    pub cess_amount: BigDecimal,
    /// CGST share, non-zero only intra-state
    pub cgst_amount: BigDecimal,
    /// SGST share, non-zero only intra-state
    pub sgst_amount: BigDecimal,
    /// IGST share, non-zero only inter-state
    pub igst_amount: BigDecimal,
    /// Final line amount: quantity x gross unit price less discount
    pub line_total: BigDecimal,
}

impl LineItem {
    /// Create a line from a catalog entry with quantity 1 and no discount,
    /// derived for the given jurisdiction
    pub fn from_catalog(
        entry: &CatalogEntry,
        rate_table: &TaxRateTable,
        jurisdiction: TaxJurisdiction,
    ) -> BillingResult<Self> {
        let source = match &entry.kind {
            CatalogKind::Item { .. } => LineSource::Item(entry.id.clone()),
            CatalogKind::Service { .. } => LineSource::Service(entry.id.clone()),
        };

        let rate_code = match rate_table.get(&entry.rate_id) {
            Some(rate) => RateCode::from_label(&rate.id, &rate.label),
            None => RateCode::Rate(entry.rate_id.clone()),
        };

        let mut line = Self {
            line_id: format!("{}-{}", entry.id, Uuid::new_v4().simple()),
            source,
            description: entry.name.clone(),
            hsn_sac: entry.hsn_sac().map(str::to_string),
            quantity: 1,
            unit_price: entry.unit_price.clone(),
            pricing: entry.pricing,
            discount_percent: BigDecimal::from(0),
            rate_code,
            pre_tax_unit_price: BigDecimal::from(0),
            gross_unit_price: BigDecimal::from(0),
            nominal_rate: BigDecimal::from(0),
            taxable_value: BigDecimal::from(0),
            tax_amount: BigDecimal::from(0),
            cess_amount: BigDecimal::from(0),
            cgst_amount: BigDecimal::from(0),
            sgst_amount: BigDecimal::from(0),
            igst_amount: BigDecimal::from(0),
            line_total: BigDecimal::from(0),
        };
        line.recompute(rate_table, jurisdiction)?;
        Ok(line)
    }

    /// Set the quantity, which must stay positive
    pub fn set_quantity(&mut self, quantity: u32) -> BillingResult<()> {
        if quantity == 0 {
            return Err(BillingError::Validation(
                "Quantity must be positive".to_string(),
            ));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Set the discount percentage, 0 to 100
    pub fn set_discount(&mut self, discount_percent: BigDecimal) -> BillingResult<()> {
        if discount_percent < BigDecimal::from(0) || discount_percent > BigDecimal::from(100) {
            return Err(BillingError::Validation(format!(
                "Discount must be between 0 and 100, got {}",
                discount_percent
            )));
        }
        self.discount_percent = discount_percent;
        Ok(())
    }

    /// Re-derive every computed field from the current editable fields, the
    /// current rate table, and the current jurisdiction.
    ///
    /// Tax and cess amounts are carried per unit of the undiscounted pre-tax
    /// price; the taxable value and line total carry quantity and discount.
    pub fn recompute(
        &mut self,
        rate_table: &TaxRateTable,
        jurisdiction: TaxJurisdiction,
    ) -> BillingResult<()> {
        let resolved = rate_table.resolve(&self.rate_code);
        let gst_rate = GstRate::for_jurisdiction(&resolved, jurisdiction);

        // One per-unit breakup; tax-inclusive prices back-solve the base.
        let breakup = match self.pricing {
            PricingMode::TaxInclusive => {
                GstBreakup::reverse_calculate(self.unit_price.clone(), gst_rate)?
            }
            PricingMode::TaxExclusive => GstBreakup::calculate(self.unit_price.clone(), gst_rate)?,
        };

        let hundred = BigDecimal::from(100);
        let discount_factor = (&hundred - &self.discount_percent) / &hundred;
        let quantity = BigDecimal::from(self.quantity);

        self.taxable_value = &quantity * &breakup.base_amount * &discount_factor;
        self.line_total = &quantity * &breakup.total_amount * &discount_factor;

        self.tax_amount = breakup.total_gst_amount;
        self.cess_amount = breakup.cess_amount;
        self.cgst_amount = breakup.cgst_amount;
        self.sgst_amount = breakup.sgst_amount;
        self.igst_amount = breakup.igst_amount;

        self.nominal_rate = resolved.rate;
        self.pre_tax_unit_price = breakup.base_amount;
        self.gross_unit_price = breakup.total_amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::TaxRateEntry;

    fn rate_table() -> TaxRateTable {
        TaxRateTable::new(vec![
            TaxRateEntry {
                id: "r18".to_string(),
                label: "GST @ 18%".to_string(),
                rate: BigDecimal::from(18),
                cess_rate: BigDecimal::from(0),
            },
            TaxRateEntry {
                id: "r28c".to_string(),
                label: "GST @ 28% + cess".to_string(),
                rate: BigDecimal::from(28),
                cess_rate: BigDecimal::from(12),
            },
            TaxRateEntry {
                id: "rnone".to_string(),
                label: "None".to_string(),
                rate: BigDecimal::from(0),
                cess_rate: BigDecimal::from(0),
            },
        ])
    }

    fn widget_1000() -> CatalogEntry {
        CatalogEntry::item(
            "itm1".to_string(),
            "Widget".to_string(),
            BigDecimal::from(1000),
            "r18".to_string(),
        )
    }

    #[test]
    fn test_discounted_multi_unit_intra_state() {
        // price 1000, qty 2, discount 10%, GST 18%, same state
        let table = rate_table();
        let mut line =
            LineItem::from_catalog(&widget_1000(), &table, TaxJurisdiction::IntraState).unwrap();

        line.set_quantity(2).unwrap();
        line.set_discount(BigDecimal::from(10)).unwrap();
        line.recompute(&table, TaxJurisdiction::IntraState).unwrap();

        assert_eq!(line.taxable_value, BigDecimal::from(1800));
        assert_eq!(line.tax_amount, BigDecimal::from(180));
        assert_eq!(line.cgst_amount, BigDecimal::from(90));
        assert_eq!(line.sgst_amount, BigDecimal::from(90));
        assert_eq!(line.igst_amount, BigDecimal::from(0));
    }

    #[test]
    fn test_inter_state_uses_igst_only() {
        let table = rate_table();
        let mut line =
            LineItem::from_catalog(&widget_1000(), &table, TaxJurisdiction::InterState).unwrap();
        line.recompute(&table, TaxJurisdiction::InterState).unwrap();

        assert_eq!(line.igst_amount, BigDecimal::from(180));
        assert_eq!(line.cgst_amount, BigDecimal::from(0));
        assert_eq!(line.sgst_amount, BigDecimal::from(0));
    }

    #[test]
    fn test_line_total_matches_contract() {
        // amount == quantity * gross price * (1 - discount/100)
        let table = rate_table();
        let mut line =
            LineItem::from_catalog(&widget_1000(), &table, TaxJurisdiction::IntraState).unwrap();
        line.set_quantity(2).unwrap();
        line.set_discount(BigDecimal::from(10)).unwrap();
        line.recompute(&table, TaxJurisdiction::IntraState).unwrap();

        // gross 1180, 2 * 1180 * 0.9 = 2124
        assert_eq!(line.gross_unit_price, BigDecimal::from(1180));
        assert_eq!(line.line_total, BigDecimal::from(2124));
    }

    #[test]
    fn test_tax_inclusive_back_solve() {
        let mut entry = widget_1000();
        entry.unit_price = BigDecimal::from(1180);
        entry.pricing = PricingMode::TaxInclusive;

        let table = rate_table();
        let line = LineItem::from_catalog(&entry, &table, TaxJurisdiction::IntraState).unwrap();

        assert_eq!(line.pre_tax_unit_price, BigDecimal::from(1000));
        assert_eq!(line.gross_unit_price, BigDecimal::from(1180));
        assert_eq!(line.tax_amount, BigDecimal::from(180));
    }

    #[test]
    fn test_rate_change_rederives_from_current_rate() {
        let table = rate_table();
        let mut line =
            LineItem::from_catalog(&widget_1000(), &table, TaxJurisdiction::IntraState).unwrap();

        line.rate_code = RateCode::Rate("r28c".to_string());
        line.recompute(&table, TaxJurisdiction::IntraState).unwrap();

        assert_eq!(line.tax_amount, BigDecimal::from(280));
        assert_eq!(line.cess_amount, BigDecimal::from(120));
        assert_eq!(line.nominal_rate, BigDecimal::from(28));
    }

    #[test]
    fn test_sentinel_rate_zeroes_tax_and_cess() {
        let mut entry = widget_1000();
        entry.rate_id = "rnone".to_string();

        let table = rate_table();
        let line = LineItem::from_catalog(&entry, &table, TaxJurisdiction::IntraState).unwrap();

        assert_eq!(line.rate_code, RateCode::None);
        assert_eq!(line.tax_amount, BigDecimal::from(0));
        assert_eq!(line.cess_amount, BigDecimal::from(0));
        assert_eq!(line.line_total, BigDecimal::from(1000));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let table = rate_table();
        let mut line =
            LineItem::from_catalog(&widget_1000(), &table, TaxJurisdiction::IntraState).unwrap();
        assert!(line.set_quantity(0).is_err());
    }

    #[test]
    fn test_recompute_agrees_with_breakup_engine() {
        let table = rate_table();
        let line =
            LineItem::from_catalog(&widget_1000(), &table, TaxJurisdiction::IntraState).unwrap();

        let rate = GstRate::intra_state(BigDecimal::from(18), BigDecimal::from(0));
        let breakup = GstBreakup::calculate(BigDecimal::from(1000), rate).unwrap();

        assert_eq!(line.cgst_amount, breakup.cgst_amount);
        assert_eq!(line.sgst_amount, breakup.sgst_amount);
        assert_eq!(line.tax_amount, breakup.total_gst_amount);
        assert_eq!(line.gross_unit_price, breakup.total_amount);
    }

    #[test]
    fn test_same_catalog_entry_gets_distinct_line_ids() {
        let table = rate_table();
        let entry = widget_1000();
        let a = LineItem::from_catalog(&entry, &table, TaxJurisdiction::IntraState).unwrap();
        let b = LineItem::from_catalog(&entry, &table, TaxJurisdiction::IntraState).unwrap();
        assert_ne!(a.line_id, b.line_id);
        assert!(a.line_id.starts_with("itm1-"));
    }
}
