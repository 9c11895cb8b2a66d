//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::invoice::Document;
use crate::settlement::{Outstanding, Settlement};
use crate::tax::{TaxRateTable, WithholdingKind, WithholdingRate};
use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    parties: Arc<RwLock<HashMap<String, Party>>>,
    catalog: Arc<RwLock<HashMap<String, CatalogEntry>>>,
    rate_table: Arc<RwLock<TaxRateTable>>,
    withholding_rates: Arc<RwLock<HashMap<String, WithholdingRate>>>,
    documents: Arc<RwLock<HashMap<String, Document>>>,
    counters: Arc<RwLock<HashMap<DocumentType, u64>>>,
    bank_accounts: Arc<RwLock<HashMap<String, BankAccount>>>,
    settlements: Arc<RwLock<HashMap<String, Settlement>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            parties: Arc::new(RwLock::new(HashMap::new())),
            catalog: Arc::new(RwLock::new(HashMap::new())),
            rate_table: Arc::new(RwLock::new(TaxRateTable::new(Vec::new()))),
            withholding_rates: Arc::new(RwLock::new(HashMap::new())),
            documents: Arc::new(RwLock::new(HashMap::new())),
            counters: Arc::new(RwLock::new(HashMap::new())),
            bank_accounts: Arc::new(RwLock::new(HashMap::new())),
            settlements: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Replace the tax rate table served to forms
    pub fn set_rate_table(&self, table: TaxRateTable) {
        *self.rate_table.write().unwrap() = table;
    }

    /// Seed a bank or cash account
    pub fn add_bank_account(&self, account: BankAccount) {
        self.bank_accounts
            .write()
            .unwrap()
            .insert(account.id.clone(), account.clone());
    }

    /// Saved settlements, for assertions
    pub fn settlements(&self) -> Vec<Settlement> {
        self.settlements.read().unwrap().values().cloned().collect()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.parties.write().unwrap().clear();
        self.catalog.write().unwrap().clear();
        self.withholding_rates.write().unwrap().clear();
        self.documents.write().unwrap().clear();
        self.counters.write().unwrap().clear();
        self.bank_accounts.write().unwrap().clear();
        self.settlements.write().unwrap().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_search(name: &str, search: Option<&str>) -> bool {
    match search {
        Some(needle) => name.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl BillingStorage for MemoryStorage {
    async fn list_parties(&self, search: Option<&str>) -> BillingResult<Vec<Party>> {
        let parties = self.parties.read().unwrap();
        let mut filtered: Vec<Party> = parties
            .values()
            .filter(|party| matches_search(&party.name, search))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(filtered)
    }

    async fn get_party(&self, party_id: &str) -> BillingResult<Option<Party>> {
        Ok(self.parties.read().unwrap().get(party_id).cloned())
    }

    async fn save_party(&mut self, party: &Party) -> BillingResult<()> {
        self.parties
            .write()
            .unwrap()
            .insert(party.id.clone(), party.clone());
        Ok(())
    }

    async fn search_catalog(&self, search: Option<&str>) -> BillingResult<Vec<CatalogEntry>> {
        let catalog = self.catalog.read().unwrap();
        let mut filtered: Vec<CatalogEntry> = catalog
            .values()
            .filter(|entry| matches_search(&entry.name, search))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(filtered)
    }

    async fn get_catalog_entry(&self, entry_id: &str) -> BillingResult<Option<CatalogEntry>> {
        Ok(self.catalog.read().unwrap().get(entry_id).cloned())
    }

    async fn save_catalog_entry(&mut self, entry: &CatalogEntry) -> BillingResult<()> {
        self.catalog
            .write()
            .unwrap()
            .insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn fetch_rate_table(&self) -> BillingResult<TaxRateTable> {
        Ok(self.rate_table.read().unwrap().clone())
    }

    async fn list_withholding_rates(
        &self,
        kind: Option<WithholdingKind>,
    ) -> BillingResult<Vec<WithholdingRate>> {
        let rates = self.withholding_rates.read().unwrap();
        let mut filtered: Vec<WithholdingRate> = rates
            .values()
            .filter(|rate| kind.as_ref().is_none_or(|k| &rate.kind == k))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.description.cmp(&b.description));
        Ok(filtered)
    }

    async fn save_withholding_rate(&mut self, rate: &WithholdingRate) -> BillingResult<()> {
        self.withholding_rates
            .write()
            .unwrap()
            .insert(rate.id.clone(), rate.clone());
        Ok(())
    }

    async fn next_document_number(&self, doc_type: DocumentType) -> BillingResult<u64> {
        let counters = self.counters.read().unwrap();
        Ok(counters.get(&doc_type).copied().unwrap_or(0) + 1)
    }

    async fn save_document(&mut self, document: &Document) -> BillingResult<()> {
        {
            let mut counters = self.counters.write().unwrap();
            let counter = counters.entry(document.doc_type).or_insert(0);
            if document.number > *counter {
                *counter = document.number;
            }
        }
        self.documents
            .write()
            .unwrap()
            .insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn get_document(&self, document_id: &str) -> BillingResult<Option<Document>> {
        Ok(self.documents.read().unwrap().get(document_id).cloned())
    }

    async fn list_documents(&self, doc_type: Option<DocumentType>) -> BillingResult<Vec<Document>> {
        let documents = self.documents.read().unwrap();
        let mut filtered: Vec<Document> = documents
            .values()
            .filter(|doc| doc_type.as_ref().is_none_or(|t| &doc.doc_type == t))
            .cloned()
            .collect();
        filtered.sort_by_key(|doc| (doc.doc_type, doc.number));
        Ok(filtered)
    }

    async fn outstanding_for_party(&self, party_id: &str) -> BillingResult<Vec<Outstanding>> {
        use bigdecimal::BigDecimal;

        let documents = self.documents.read().unwrap();
        let mut unpaid: Vec<&Document> = documents
            .values()
            .filter(|doc| doc.party.id == party_id && doc.balance > BigDecimal::from(0))
            .collect();
        unpaid.sort_by_key(|doc| doc.number);
        Ok(unpaid
            .into_iter()
            .map(|doc| {
                Outstanding::new(
                    doc.id.clone(),
                    doc.number,
                    doc.summary.taxable_amount.clone(),
                    doc.balance.clone(),
                )
            })
            .collect())
    }

    async fn list_bank_accounts(&self) -> BillingResult<Vec<BankAccount>> {
        let accounts = self.bank_accounts.read().unwrap();
        let mut all: Vec<BankAccount> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_bank_account(&self, account_id: &str) -> BillingResult<Option<BankAccount>> {
        Ok(self.bank_accounts.read().unwrap().get(account_id).cloned())
    }

    async fn save_settlement(&mut self, settlement: &Settlement) -> BillingResult<()> {
        {
            let mut documents = self.documents.write().unwrap();
            for entry in &settlement.allocation.entries {
                if let Some(document) = documents.get_mut(&entry.document_id) {
                    document.balance = &document.balance - &entry.amount_settled;
                }
            }
        }
        self.settlements
            .write()
            .unwrap()
            .insert(settlement.id.clone(), settlement.clone());
        Ok(())
    }
}
