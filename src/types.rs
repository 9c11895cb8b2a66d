//! Core types and data structures for the billing system

use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Kinds of transaction documents supported by the billing system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Sales invoice issued to a customer
    SalesInvoice,
    /// Credit note against a sales invoice
    CreditNote,
    /// Debit note against a purchase
    DebitNote,
    /// Return of sold goods
    SalesReturn,
    /// Quotation / estimate, not yet a tax document
    Quotation,
    /// Confirmed sales order
    SalesOrder,
    /// Purchase bill received from a supplier
    PurchaseBill,
    /// Purchase order issued to a supplier
    PurchaseOrder,
    /// Return of purchased goods
    PurchaseReturn,
}

impl DocumentType {
    /// Detail-route prefix for this document type, used when a row in a
    /// cross-document report is opened
    pub fn route_prefix(&self) -> &'static str {
        match self {
            DocumentType::SalesInvoice => "/Sales/Sales-Invoice",
            DocumentType::CreditNote => "/Sales/Credit-Note",
            DocumentType::DebitNote => "/Purchase/Debit-Note",
            DocumentType::SalesReturn => "/Sales/Sales-Return",
            DocumentType::Quotation => "/Sales/Quotation",
            DocumentType::SalesOrder => "/Sales/Sales-Order",
            DocumentType::PurchaseBill => "/Purchase/Purchase-Bill",
            DocumentType::PurchaseOrder => "/Purchase/Purchase-Order",
            DocumentType::PurchaseReturn => "/Purchase/Purchase-Return",
        }
    }

    /// Human-readable label used in document headers and reports
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::SalesInvoice => "Tax Invoice",
            DocumentType::CreditNote => "Credit Note",
            DocumentType::DebitNote => "Debit Note",
            DocumentType::SalesReturn => "Sales Return",
            DocumentType::Quotation => "Quotation",
            DocumentType::SalesOrder => "Sales Order",
            DocumentType::PurchaseBill => "Purchase Bill",
            DocumentType::PurchaseOrder => "Purchase Order",
            DocumentType::PurchaseReturn => "Purchase Return",
        }
    }
}

/// Counterparty on a transaction document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Unique identifier for the party
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact number
    pub mobile: Option<String>,
    /// Billing address
    pub address: Option<String>,
    /// State of registration, free-form; compared against the business state
    /// to decide the tax jurisdiction
    pub state: String,
    /// GSTIN if the party is registered
    pub gstin: Option<String>,
}

impl Party {
    /// Create a new party
    pub fn new(id: String, name: String, state: String) -> Self {
        Self {
            id,
            name,
            mobile: None,
            address: None,
            state,
            gstin: None,
        }
    }
}

/// The registered business issuing documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Legal name of the business
    pub name: String,
    /// Business GSTIN
    pub gstin: Option<String>,
    /// Registered address
    pub address: Option<String>,
    /// State of registration, anchor for every jurisdiction decision
    pub state: String,
    /// Default payment term offset applied to document due dates, in days
    pub payment_term_days: i64,
}

impl BusinessProfile {
    /// Create a profile with the default 30-day payment term
    pub fn new(name: String, state: String) -> Self {
        Self {
            name,
            gstin: None,
            address: None,
            state,
            payment_term_days: 30,
        }
    }

    /// Due date for a document issued on `date` under this profile's terms
    pub fn due_date(&self, date: NaiveDate) -> NaiveDate {
        date + Duration::days(self.payment_term_days)
    }
}

/// Explicit request context constructed once at session start and injected
/// into storage implementations, instead of being read from ambient storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Bearer token presented to the backend on every request
    pub access_token: String,
    /// The authenticated business
    pub business: BusinessProfile,
}

impl SessionContext {
    /// Create a new session context
    pub fn new(access_token: String, business: BusinessProfile) -> Self {
        Self {
            access_token,
            business,
        }
    }
}

/// Payment instrument recorded against a document or settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Cheque,
    Upi,
    BankTransfer,
    Card,
}

impl PaymentMode {
    /// Non-cash modes must name the bank account the money moves through
    pub fn requires_bank_account(&self) -> bool {
        !matches!(self, PaymentMode::Cash)
    }
}

/// Whether a bank account record is a cash drawer or an actual bank account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankAccountKind {
    Cash,
    Bank,
}

/// Extended bank details, present only for `BankAccountKind::Bank`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    pub account_number: String,
    pub ifsc: String,
    pub branch: Option<String>,
    pub holder_name: Option<String>,
    pub upi_id: Option<String>,
}

/// Bank or cash account money is received into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Unique identifier for the account
    pub id: String,
    /// Display name
    pub name: String,
    /// Cash drawer or bank account
    pub kind: BankAccountKind,
    /// Balance at the opening date
    pub opening_balance: BigDecimal,
    /// Date the opening balance was taken
    pub as_of: NaiveDate,
    /// Extended details for bank accounts
    pub details: Option<BankDetails>,
}

/// Whether a catalog entry is a physical item or a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogKind {
    /// Goods, identified by an HSN code
    Item { hsn: Option<String> },
    /// Services, identified by a SAC code
    Service { sac: Option<String> },
}

/// How a catalog entry's unit price relates to tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingMode {
    /// Entered price already includes GST and cess
    TaxInclusive,
    /// Entered price is the pre-tax price
    TaxExclusive,
}

/// A sellable item or service from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique identifier for the catalog entry
    pub id: String,
    /// Item or service, with its HSN/SAC code
    pub kind: CatalogKind,
    /// Display name
    pub name: String,
    /// Unit price as entered
    pub unit_price: BigDecimal,
    /// Whether the unit price includes tax
    pub pricing: PricingMode,
    /// Tax rate reference into the fetched rate table
    pub rate_id: String,
    /// When the entry was created
    pub created_at: NaiveDateTime,
}

impl CatalogEntry {
    /// Create a tax-exclusive item entry
    pub fn item(id: String, name: String, unit_price: BigDecimal, rate_id: String) -> Self {
        Self {
            id,
            kind: CatalogKind::Item { hsn: None },
            name,
            unit_price,
            pricing: PricingMode::TaxExclusive,
            rate_id,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Create a tax-exclusive service entry
    pub fn service(id: String, name: String, unit_price: BigDecimal, rate_id: String) -> Self {
        Self {
            id,
            kind: CatalogKind::Service { sac: None },
            name,
            unit_price,
            pricing: PricingMode::TaxExclusive,
            rate_id,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// HSN or SAC code, whichever the kind carries
    pub fn hsn_sac(&self) -> Option<&str> {
        match &self.kind {
            CatalogKind::Item { hsn } => hsn.as_deref(),
            CatalogKind::Service { sac } => sac.as_deref(),
        }
    }
}

/// Errors that can occur in the billing system
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
    #[error("Party not found: {0}")]
    PartyNotFound(String),
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    #[error("Catalog entry not found: {0}")]
    CatalogEntryNotFound(String),
    #[error("Line not found: {0}")]
    LineNotFound(String),
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(String),
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;
