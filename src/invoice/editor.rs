//! Ordered line-item collection with edit operations that keep every
//! derived amount current

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::invoice::line_item::LineItem;
use crate::tax::{RateCode, TaxJurisdiction, TaxRateTable};
use crate::types::{BillingError, BillingResult, CatalogEntry};

/// Editor over an ordered sequence of line items.
///
/// Every mutation runs the same synchronous per-line recomputation against
/// the editor's rate table and jurisdiction, so derived amounts can never
/// drift behind the editable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemEditor {
    lines: Vec<LineItem>,
    rate_table: TaxRateTable,
    jurisdiction: TaxJurisdiction,
}

impl LineItemEditor {
    /// Create an empty editor over a fetched rate table
    pub fn new(rate_table: TaxRateTable, jurisdiction: TaxJurisdiction) -> Self {
        Self {
            lines: Vec::new(),
            rate_table,
            jurisdiction,
        }
    }

    /// Lines in insertion order
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Jurisdiction currently applied to every line
    pub fn jurisdiction(&self) -> TaxJurisdiction {
        self.jurisdiction
    }

    /// The rate table lines resolve against
    pub fn rate_table(&self) -> &TaxRateTable {
        &self.rate_table
    }

    /// Append a line for a catalog entry, returning its client-generated id
    pub fn add_entry(&mut self, entry: &CatalogEntry) -> BillingResult<String> {
        let line = LineItem::from_catalog(entry, &self.rate_table, self.jurisdiction)?;
        let line_id = line.line_id.clone();
        self.lines.push(line);
        Ok(line_id)
    }

    /// Append one line per entry of a multi-select, in the given order
    pub fn add_entries(&mut self, entries: &[CatalogEntry]) -> BillingResult<Vec<String>> {
        entries.iter().map(|entry| self.add_entry(entry)).collect()
    }

    /// Change a line's quantity and re-derive its amounts
    pub fn set_quantity(&mut self, line_id: &str, quantity: u32) -> BillingResult<()> {
        let jurisdiction = self.jurisdiction;
        let table = self.rate_table.clone();
        let line = self.line_mut(line_id)?;
        line.set_quantity(quantity)?;
        line.recompute(&table, jurisdiction)
    }

    /// Change a line's discount percentage and re-derive its amounts
    pub fn set_discount(&mut self, line_id: &str, discount: BigDecimal) -> BillingResult<()> {
        let jurisdiction = self.jurisdiction;
        let table = self.rate_table.clone();
        let line = self.line_mut(line_id)?;
        line.set_discount(discount)?;
        line.recompute(&table, jurisdiction)
    }

    /// Change a line's tax rate and re-derive its amounts, including the
    /// back-solved unit price for tax-inclusive lines
    pub fn set_rate_code(&mut self, line_id: &str, rate_code: RateCode) -> BillingResult<()> {
        let jurisdiction = self.jurisdiction;
        let table = self.rate_table.clone();
        let line = self.line_mut(line_id)?;
        line.rate_code = rate_code;
        line.recompute(&table, jurisdiction)
    }

    /// Remove a line by its client-generated id
    pub fn remove(&mut self, line_id: &str) -> BillingResult<()> {
        let before = self.lines.len();
        self.lines.retain(|line| line.line_id != line_id);
        if self.lines.len() == before {
            return Err(BillingError::LineNotFound(line_id.to_string()));
        }
        Ok(())
    }

    /// Switch jurisdiction (party change) and re-derive every line under the
    /// new CGST/SGST vs IGST split
    pub fn set_jurisdiction(&mut self, jurisdiction: TaxJurisdiction) -> BillingResult<()> {
        self.jurisdiction = jurisdiction;
        for line in &mut self.lines {
            line.recompute(&self.rate_table, jurisdiction)?;
        }
        Ok(())
    }

    fn line_mut(&mut self, line_id: &str) -> BillingResult<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|line| line.line_id == line_id)
            .ok_or_else(|| BillingError::LineNotFound(line_id.to_string()))
    }
}
