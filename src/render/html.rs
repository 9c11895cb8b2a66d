//! HTML rendering of a document under a theme palette

use askama::Template;
use bigdecimal::{BigDecimal, RoundingMode};

use crate::invoice::Document;
use crate::render::theme::{Palette, ThemeKey};
use crate::types::{BillingError, BillingResult, BusinessProfile};

/// Format a monetary amount for display, two decimals, half-up
pub fn format_money(amount: &BigDecimal) -> String {
    amount.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

/// One row of the rendered line-item table
pub struct LineRow {
    pub index: usize,
    pub description: String,
    pub hsn_sac: String,
    pub quantity: u32,
    pub unit_price: String,
    pub discount_percent: String,
    pub tax_amount: String,
    pub amount: String,
}

/// One row of the rendered per-rate tax table
pub struct GroupRow {
    pub rate_label: String,
    pub taxable_value: String,
    pub cgst_amount: String,
    pub sgst_amount: String,
    pub igst_amount: String,
    pub cess_amount: String,
}

/// Renderable view over a document, a palette, and the issuing business.
/// Amounts are pre-formatted so the template stays presentation-only.
#[derive(Template)]
#[template(path = "invoice.html")]
pub struct InvoiceView {
    pub palette: Palette,
    pub title: String,
    pub number: u64,
    pub date: String,
    pub due_date: String,
    pub business_name: String,
    pub business_gstin: String,
    pub business_address: String,
    pub party_name: String,
    pub party_address: String,
    pub party_gstin: String,
    pub lines: Vec<LineRow>,
    pub groups: Vec<GroupRow>,
    pub taxable_amount: String,
    pub discount_amount: String,
    pub tcs_amount: String,
    pub has_tcs: bool,
    pub grand_total: String,
    pub amount_received: String,
    pub balance: String,
    pub notes: String,
    pub signature_url: String,
}

impl InvoiceView {
    /// Build the view for a document under a theme
    pub fn new(document: &Document, theme: ThemeKey, business: &BusinessProfile) -> Self {
        let lines = document
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| LineRow {
                index: i + 1,
                description: line.description.clone(),
                hsn_sac: line.hsn_sac.clone().unwrap_or_default(),
                quantity: line.quantity,
                unit_price: format_money(&line.unit_price),
                discount_percent: line.discount_percent.to_string(),
                tax_amount: format_money(&line.tax_amount),
                amount: format_money(&line.line_total),
            })
            .collect();

        let groups = document
            .summary
            .rate_groups
            .iter()
            .map(|group| GroupRow {
                rate_label: format!("GST @ {}%", group.nominal_rate),
                taxable_value: format_money(&group.taxable_value),
                cgst_amount: format_money(&group.cgst_amount),
                sgst_amount: format_money(&group.sgst_amount),
                igst_amount: format_money(&group.igst_amount),
                cess_amount: format_money(&group.cess_amount),
            })
            .collect();

        Self {
            palette: theme.palette(),
            title: document.doc_type.label().to_string(),
            number: document.number,
            date: document.date.format("%d-%m-%Y").to_string(),
            due_date: document.due_date.format("%d-%m-%Y").to_string(),
            business_name: business.name.clone(),
            business_gstin: business.gstin.clone().unwrap_or_default(),
            business_address: business.address.clone().unwrap_or_default(),
            party_name: document.party.name.clone(),
            party_address: document.party.address.clone().unwrap_or_default(),
            party_gstin: document.party.gstin.clone().unwrap_or_default(),
            lines,
            groups,
            taxable_amount: format_money(&document.summary.taxable_amount),
            discount_amount: format_money(&document.summary.discount_amount),
            tcs_amount: format_money(&document.summary.tcs_amount),
            has_tcs: document.summary.tcs_amount != BigDecimal::from(0),
            grand_total: format_money(&document.summary.grand_total),
            amount_received: format_money(&document.amount_received),
            balance: format_money(&document.balance),
            notes: document.notes.clone().unwrap_or_default(),
            signature_url: document.signature_url.clone().unwrap_or_default(),
        }
    }
}

/// Render a document to a self-contained HTML page
pub fn render_html(
    document: &Document,
    theme: ThemeKey,
    business: &BusinessProfile,
) -> BillingResult<String> {
    InvoiceView::new(document, theme, business)
        .render()
        .map_err(|e| BillingError::Render(e.to_string()))
}
