//! Transaction documents: invoices, notes, returns, and orders

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::invoice::line_item::LineItem;
use crate::invoice::summary::DocumentSummary;
use crate::types::{
    BillingError, BillingResult, BusinessProfile, DocumentType, Party, PaymentMode,
};

/// A complete transaction document of any [`DocumentType`].
///
/// The sequential number is assigned by storage, never generated client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier for the document
    pub id: String,
    /// Which kind of document this is
    pub doc_type: DocumentType,
    /// Storage-assigned sequential number
    pub number: u64,
    /// Issue date
    pub date: NaiveDate,
    /// Due date: issue date plus the business's payment-term offset
    pub due_date: NaiveDate,
    /// Counterparty
    pub party: Party,
    /// Ordered line items
    pub lines: Vec<LineItem>,
    /// Aggregate totals, including TCS
    pub summary: DocumentSummary,
    /// Amount received at issue time
    pub amount_received: BigDecimal,
    /// Outstanding balance: grand total less amount received
    pub balance: BigDecimal,
    /// Payment instrument for the received amount
    pub payment_mode: PaymentMode,
    /// Bank account the money moved through, required for non-cash modes
    pub bank_account_id: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// URL of an uploaded signature image
    pub signature_url: Option<String>,
    /// When the document was created
    pub created_at: NaiveDateTime,
}

/// Everything a form hands over when a document is submitted
pub struct DocumentDraft {
    pub doc_type: DocumentType,
    pub date: NaiveDate,
    pub party: Party,
    pub lines: Vec<LineItem>,
    pub summary: DocumentSummary,
    pub amount_received: BigDecimal,
    pub payment_mode: PaymentMode,
    pub bank_account_id: Option<String>,
    pub notes: Option<String>,
    pub signature_url: Option<String>,
}

impl Document {
    /// Assemble a document from a validated draft, a storage-assigned number,
    /// and the issuing business's payment terms
    pub fn from_draft(
        id: String,
        number: u64,
        draft: DocumentDraft,
        business: &BusinessProfile,
    ) -> BillingResult<Self> {
        let document = Self {
            id,
            doc_type: draft.doc_type,
            number,
            date: draft.date,
            due_date: business.due_date(draft.date),
            party: draft.party,
            balance: &draft.summary.grand_total - &draft.amount_received,
            lines: draft.lines,
            summary: draft.summary,
            amount_received: draft.amount_received,
            payment_mode: draft.payment_mode,
            bank_account_id: draft.bank_account_id,
            notes: draft.notes,
            signature_url: draft.signature_url,
            created_at: chrono::Utc::now().naive_utc(),
        };
        document.validate()?;
        Ok(document)
    }

    /// Validate the document before it is saved
    pub fn validate(&self) -> BillingResult<()> {
        if self.lines.is_empty() {
            return Err(BillingError::Validation(
                "Document must have at least one line item".to_string(),
            ));
        }

        if self.party.name.trim().is_empty() {
            return Err(BillingError::Validation(
                "Document must name a party".to_string(),
            ));
        }

        if self.amount_received < BigDecimal::from(0) {
            return Err(BillingError::Validation(
                "Amount received cannot be negative".to_string(),
            ));
        }

        if self.amount_received > self.summary.grand_total {
            return Err(BillingError::Validation(format!(
                "Amount received {} exceeds grand total {}",
                self.amount_received, self.summary.grand_total
            )));
        }

        if self.payment_mode.requires_bank_account() && self.bank_account_id.is_none() {
            return Err(BillingError::Validation(format!(
                "Payment mode {:?} requires a bank account",
                self.payment_mode
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::{TaxJurisdiction, TaxRateEntry, TaxRateTable};
    use crate::types::CatalogEntry;

    fn draft(amount_received: i64, payment_mode: PaymentMode) -> DocumentDraft {
        let table = TaxRateTable::new(vec![TaxRateEntry {
            id: "r18".to_string(),
            label: "GST @ 18%".to_string(),
            rate: BigDecimal::from(18),
            cess_rate: BigDecimal::from(0),
        }]);
        let entry = CatalogEntry::item(
            "itm1".to_string(),
            "Widget".to_string(),
            BigDecimal::from(1000),
            "r18".to_string(),
        );
        let line = LineItem::from_catalog(&entry, &table, TaxJurisdiction::IntraState).unwrap();
        let lines = vec![line];
        let summary = DocumentSummary::calculate(&lines, None);

        DocumentDraft {
            doc_type: DocumentType::SalesInvoice,
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            party: Party::new("p1".to_string(), "Sharma Stores".to_string(), "Kerala".to_string()),
            lines,
            summary,
            amount_received: BigDecimal::from(amount_received),
            payment_mode,
            bank_account_id: None,
            notes: None,
            signature_url: None,
        }
    }

    fn business() -> BusinessProfile {
        BusinessProfile::new("Acme Traders".to_string(), "Kerala".to_string())
    }

    #[test]
    fn test_due_date_and_balance() {
        let doc =
            Document::from_draft("d1".to_string(), 42, draft(180, PaymentMode::Cash), &business())
                .unwrap();

        assert_eq!(doc.number, 42);
        assert_eq!(doc.due_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        // grand total 1180, received 180
        assert_eq!(doc.balance, BigDecimal::from(1000));
    }

    #[test]
    fn test_non_cash_requires_bank_account() {
        let result = Document::from_draft(
            "d2".to_string(),
            43,
            draft(0, PaymentMode::Upi),
            &business(),
        );
        assert!(matches!(result, Err(BillingError::Validation(_))));

        let mut ok_draft = draft(0, PaymentMode::Upi);
        ok_draft.bank_account_id = Some("acc1".to_string());
        assert!(Document::from_draft("d3".to_string(), 44, ok_draft, &business()).is_ok());
    }

    #[test]
    fn test_empty_lines_rejected() {
        let mut bad = draft(0, PaymentMode::Cash);
        bad.lines.clear();
        bad.summary = DocumentSummary::calculate(&bad.lines, None);
        assert!(Document::from_draft("d4".to_string(), 45, bad, &business()).is_err());
    }

    #[test]
    fn test_overpayment_rejected() {
        let result = Document::from_draft(
            "d5".to_string(),
            46,
            draft(2000, PaymentMode::Cash),
            &business(),
        );
        assert!(matches!(result, Err(BillingError::Validation(_))));
    }
}
