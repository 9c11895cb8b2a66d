//! Form session for creating a transaction document
//!
//! Models one page mount: the rate table and next document number are
//! fetched once at mount, user edits mutate local state synchronously, and
//! submission posts the assembled document back through storage.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::invoice::document::{Document, DocumentDraft};
use crate::invoice::editor::LineItemEditor;
use crate::invoice::summary::DocumentSummary;
use crate::tax::{
    RateCode, TaxJurisdiction, TcsBasis, TcsCharge, WithholdingKind, WithholdingRate,
};
use crate::traits::{BillingStorage, DefaultDocumentValidator, DocumentValidator};
use crate::types::{
    BillingError, BillingResult, CatalogEntry, DocumentType, Party, PaymentMode, SessionContext,
};

/// One document-creation session over a storage backend
pub struct InvoiceForm<S: BillingStorage> {
    storage: S,
    context: SessionContext,
    validator: Box<dyn DocumentValidator>,
    doc_type: DocumentType,
    date: NaiveDate,
    next_number: u64,
    editor: LineItemEditor,
    party: Option<Party>,
    tcs_rates: Vec<WithholdingRate>,
    tcs: Option<TcsCharge>,
    amount_received: BigDecimal,
    payment_mode: PaymentMode,
    bank_account_id: Option<String>,
    notes: Option<String>,
    signature_url: Option<String>,
}

impl<S: BillingStorage> InvoiceForm<S> {
    /// Mount a form: fetch the rate table and the next document number
    pub async fn mount(
        storage: S,
        context: SessionContext,
        doc_type: DocumentType,
        date: NaiveDate,
    ) -> BillingResult<Self> {
        Self::mount_with_validator(
            storage,
            context,
            doc_type,
            date,
            Box::new(DefaultDocumentValidator),
        )
        .await
    }

    /// Mount with a custom document validator
    pub async fn mount_with_validator(
        storage: S,
        context: SessionContext,
        doc_type: DocumentType,
        date: NaiveDate,
        validator: Box<dyn DocumentValidator>,
    ) -> BillingResult<Self> {
        let rate_table = storage.fetch_rate_table().await?;
        let next_number = storage.next_document_number(doc_type).await?;
        let tcs_rates = storage
            .list_withholding_rates(Some(WithholdingKind::Tcs))
            .await?;

        // No party yet: unselected parties are treated intra-state.
        let editor = LineItemEditor::new(rate_table, TaxJurisdiction::IntraState);

        Ok(Self {
            storage,
            context,
            validator,
            doc_type,
            date,
            next_number,
            editor,
            party: None,
            tcs_rates,
            tcs: None,
            amount_received: BigDecimal::from(0),
            payment_mode: PaymentMode::Cash,
            bank_account_id: None,
            notes: None,
            signature_url: None,
        })
    }

    /// The next number this form's document will take
    pub fn next_number(&self) -> u64 {
        self.next_number
    }

    /// The selected party, if any
    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    /// Jurisdiction in effect for the current party selection
    pub fn jurisdiction(&self) -> TaxJurisdiction {
        self.editor.jurisdiction()
    }

    /// The line editor, read-only
    pub fn editor(&self) -> &LineItemEditor {
        &self.editor
    }

    /// Search parties through storage
    pub async fn search_parties(&self, search: Option<&str>) -> BillingResult<Vec<Party>> {
        self.storage.list_parties(search).await
    }

    /// Search the catalog through storage
    pub async fn search_catalog(&self, search: Option<&str>) -> BillingResult<Vec<CatalogEntry>> {
        self.storage.search_catalog(search).await
    }

    /// Select the counterparty; every line is re-derived under the new
    /// jurisdiction
    pub async fn set_party(&mut self, party_id: &str) -> BillingResult<()> {
        let party = self
            .storage
            .get_party(party_id)
            .await?
            .ok_or_else(|| BillingError::PartyNotFound(party_id.to_string()))?;

        let jurisdiction =
            TaxJurisdiction::between(&self.context.business.state, &party.state);
        self.party = Some(party);
        self.editor.set_jurisdiction(jurisdiction)
    }

    /// Add a catalog entry as a new line, returning the line id
    pub async fn add_catalog_entry(&mut self, entry_id: &str) -> BillingResult<String> {
        let entry = self
            .storage
            .get_catalog_entry(entry_id)
            .await?
            .ok_or_else(|| BillingError::CatalogEntryNotFound(entry_id.to_string()))?;
        self.editor.add_entry(&entry)
    }

    /// Change a line's quantity
    pub fn set_quantity(&mut self, line_id: &str, quantity: u32) -> BillingResult<()> {
        self.editor.set_quantity(line_id, quantity)
    }

    /// Change a line's discount percentage
    pub fn set_discount(&mut self, line_id: &str, discount: BigDecimal) -> BillingResult<()> {
        self.editor.set_discount(line_id, discount)
    }

    /// Change a line's tax rate
    pub fn set_rate_code(&mut self, line_id: &str, rate_code: RateCode) -> BillingResult<()> {
        self.editor.set_rate_code(line_id, rate_code)
    }

    /// Remove a line
    pub fn remove_line(&mut self, line_id: &str) -> BillingResult<()> {
        self.editor.remove(line_id)
    }

    /// Reusable TCS rates, including any defined through this form
    pub fn tcs_rates(&self) -> &[WithholdingRate] {
        &self.tcs_rates
    }

    /// Define a new TCS rate, persist it for reuse, and return its id
    pub async fn define_tcs_rate(
        &mut self,
        description: String,
        section: String,
        rate: BigDecimal,
    ) -> BillingResult<String> {
        let rate = WithholdingRate::new(
            Uuid::new_v4().to_string(),
            WithholdingKind::Tcs,
            description,
            section,
            rate,
        )?;
        self.storage.save_withholding_rate(&rate).await?;
        let id = rate.id.clone();
        self.tcs_rates.push(rate);
        Ok(id)
    }

    /// Charge TCS on this document using a rate from the reusable list
    pub fn apply_tcs(&mut self, rate_id: &str, basis: TcsBasis) -> BillingResult<()> {
        let rate = self
            .tcs_rates
            .iter()
            .find(|rate| rate.id == rate_id)
            .cloned()
            .ok_or_else(|| BillingError::InvalidRate(format!("Unknown TCS rate '{rate_id}'")))?;
        self.tcs = Some(TcsCharge::new(rate, basis)?);
        Ok(())
    }

    /// Apply or clear the document's TCS charge
    pub fn set_tcs(&mut self, tcs: Option<TcsCharge>) {
        self.tcs = tcs;
    }

    /// Record the amount received alongside the document
    pub fn set_amount_received(&mut self, amount: BigDecimal) -> BillingResult<()> {
        if amount < BigDecimal::from(0) {
            return Err(BillingError::Validation(
                "Amount received cannot be negative".to_string(),
            ));
        }
        self.amount_received = amount;
        Ok(())
    }

    /// Choose the payment mode
    pub fn set_payment_mode(&mut self, mode: PaymentMode) {
        self.payment_mode = mode;
    }

    /// Choose the bank account money is received into
    pub async fn set_bank_account(&mut self, account_id: &str) -> BillingResult<()> {
        if self.storage.get_bank_account(account_id).await?.is_none() {
            return Err(BillingError::BankAccountNotFound(account_id.to_string()));
        }
        self.bank_account_id = Some(account_id.to_string());
        Ok(())
    }

    /// Attach free-form notes
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Attach an uploaded signature URL
    pub fn set_signature_url(&mut self, url: Option<String>) {
        self.signature_url = url;
    }

    /// Current totals over the line snapshot
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary::calculate(self.editor.lines(), self.tcs.as_ref())
    }

    /// Validate, assemble, and save the document. On success the next
    /// document number is re-fetched so a following submission from the same
    /// mount picks up the fresh sequence.
    pub async fn submit(&mut self) -> BillingResult<Document> {
        let party = self
            .party
            .clone()
            .ok_or_else(|| BillingError::Validation("Select a party before saving".to_string()))?;

        let draft = DocumentDraft {
            doc_type: self.doc_type,
            date: self.date,
            party,
            lines: self.editor.lines().to_vec(),
            summary: self.summary(),
            amount_received: self.amount_received.clone(),
            payment_mode: self.payment_mode,
            bank_account_id: self.bank_account_id.clone(),
            notes: self.notes.clone(),
            signature_url: self.signature_url.clone(),
        };

        let document = Document::from_draft(
            Uuid::new_v4().to_string(),
            self.next_number,
            draft,
            &self.context.business,
        )?;
        self.validator.validate_document(&document)?;

        self.storage.save_document(&document).await?;
        self.next_number = self.storage.next_document_number(self.doc_type).await?;

        tracing::debug!(
            doc_type = ?document.doc_type,
            number = document.number,
            grand_total = %document.summary.grand_total,
            "document saved"
        );

        Ok(document)
    }
}
