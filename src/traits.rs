//! Traits for storage abstraction and extensibility
//!
//! [`BillingStorage`] is the seam where the remote REST backend sits in
//! production; the crate ships only the in-memory implementation used by
//! tests and demos.

use async_trait::async_trait;

use crate::invoice::Document;
use crate::settlement::{Outstanding, Settlement};
use crate::tax::{TaxRateTable, WithholdingKind, WithholdingRate};
use crate::types::*;

/// Storage abstraction for the billing system.
///
/// One method per backend resource. Document numbers are always assigned by
/// the storage side, never generated by the caller.
#[async_trait]
pub trait BillingStorage: Send + Sync {
    /// List parties, optionally filtered by a case-insensitive name search
    async fn list_parties(&self, search: Option<&str>) -> BillingResult<Vec<Party>>;

    /// Get a party by id
    async fn get_party(&self, party_id: &str) -> BillingResult<Option<Party>>;

    /// Save a party
    async fn save_party(&mut self, party: &Party) -> BillingResult<()>;

    /// List catalog entries, optionally filtered by a name search
    async fn search_catalog(&self, search: Option<&str>) -> BillingResult<Vec<CatalogEntry>>;

    /// Get a catalog entry by id
    async fn get_catalog_entry(&self, entry_id: &str) -> BillingResult<Option<CatalogEntry>>;

    /// Save a catalog entry
    async fn save_catalog_entry(&mut self, entry: &CatalogEntry) -> BillingResult<()>;

    /// Fetch the tax rate table, once per form mount
    async fn fetch_rate_table(&self) -> BillingResult<TaxRateTable>;

    /// List TCS/TDS rates, optionally filtered by kind
    async fn list_withholding_rates(
        &self,
        kind: Option<WithholdingKind>,
    ) -> BillingResult<Vec<WithholdingRate>>;

    /// Persist a user-defined TCS/TDS rate so it can be reused
    async fn save_withholding_rate(&mut self, rate: &WithholdingRate) -> BillingResult<()>;

    /// Next sequential number for a document type
    async fn next_document_number(&self, doc_type: DocumentType) -> BillingResult<u64>;

    /// Save a document
    async fn save_document(&mut self, document: &Document) -> BillingResult<()>;

    /// Get a document by id
    async fn get_document(&self, document_id: &str) -> BillingResult<Option<Document>>;

    /// List documents, optionally filtered by type
    async fn list_documents(&self, doc_type: Option<DocumentType>) -> BillingResult<Vec<Document>>;

    /// Outstanding balances for a party, in document order
    async fn outstanding_for_party(&self, party_id: &str) -> BillingResult<Vec<Outstanding>>;

    /// List bank and cash accounts
    async fn list_bank_accounts(&self) -> BillingResult<Vec<BankAccount>>;

    /// Get a bank account by id
    async fn get_bank_account(&self, account_id: &str) -> BillingResult<Option<BankAccount>>;

    /// Save a settlement and apply it to the settled documents' balances
    async fn save_settlement(&mut self, settlement: &Settlement) -> BillingResult<()>;
}

/// Custom validation hook run before a document is saved
pub trait DocumentValidator: Send + Sync {
    /// Validate a document before saving
    fn validate_document(&self, document: &Document) -> BillingResult<()>;
}

/// Default validator with the document's own structural rules
pub struct DefaultDocumentValidator;

impl DocumentValidator for DefaultDocumentValidator {
    fn validate_document(&self, document: &Document) -> BillingResult<()> {
        document.validate()
    }
}
