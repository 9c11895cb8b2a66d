//! Form session for receiving a payment and settling it against
//! outstanding documents

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settlement::allocator::{allocate, Allocation, Outstanding};
use crate::tax::{WithholdingKind, WithholdingRate};
use crate::traits::BillingStorage;
use crate::types::{
    BillingError, BillingResult, BusinessProfile, Party, PaymentMode, SessionContext,
};

/// A recorded payment with its allocation across documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier for the settlement
    pub id: String,
    /// Party the payment came from
    pub party: Party,
    /// Date the payment was received
    pub date: NaiveDate,
    /// Amount entered by the user
    pub payment_amount: BigDecimal,
    /// Payment instrument
    pub payment_mode: PaymentMode,
    /// Bank account for non-cash modes
    pub bank_account_id: Option<String>,
    /// How the payment spread across the outstanding documents
    pub allocation: Allocation,
    /// When the settlement was recorded
    pub created_at: NaiveDateTime,
}

/// One payment-receipt session over a storage backend.
///
/// TDS rates are fetched once at mount; a rate defined through the form is
/// persisted and appended to the in-memory list for immediate reuse. The
/// allocation is recomputed from scratch after every TDS or amount change,
/// so it can never reflect a stale deduction.
pub struct SettlementForm<S: BillingStorage> {
    storage: S,
    context: SessionContext,
    date: NaiveDate,
    party: Option<Party>,
    outstanding: Vec<Outstanding>,
    tds_rates: Vec<WithholdingRate>,
    payment_amount: BigDecimal,
    payment_mode: PaymentMode,
    bank_account_id: Option<String>,
}

impl<S: BillingStorage> SettlementForm<S> {
    /// Mount the form: fetch the reusable TDS rate list
    pub async fn mount(
        storage: S,
        context: SessionContext,
        date: NaiveDate,
    ) -> BillingResult<Self> {
        let tds_rates = storage
            .list_withholding_rates(Some(WithholdingKind::Tds))
            .await?;

        Ok(Self {
            storage,
            context,
            date,
            party: None,
            outstanding: Vec::new(),
            tds_rates,
            payment_amount: BigDecimal::from(0),
            payment_mode: PaymentMode::Cash,
            bank_account_id: None,
        })
    }

    /// The business receiving the payment
    pub fn business(&self) -> &BusinessProfile {
        &self.context.business
    }

    /// The selected party, if any
    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    /// Outstanding documents for the selected party, in list order
    pub fn outstanding(&self) -> &[Outstanding] {
        &self.outstanding
    }

    /// Reusable TDS rates, including any defined through this form
    pub fn tds_rates(&self) -> &[WithholdingRate] {
        &self.tds_rates
    }

    /// Select the party and load their outstanding documents
    pub async fn set_party(&mut self, party_id: &str) -> BillingResult<()> {
        let party = self
            .storage
            .get_party(party_id)
            .await?
            .ok_or_else(|| BillingError::PartyNotFound(party_id.to_string()))?;
        self.outstanding = self.storage.outstanding_for_party(party_id).await?;
        self.party = Some(party);
        Ok(())
    }

    /// Enter the payment amount
    pub fn set_payment_amount(&mut self, amount: BigDecimal) {
        self.payment_amount = amount;
    }

    /// Choose the payment mode
    pub fn set_payment_mode(&mut self, mode: PaymentMode) {
        self.payment_mode = mode;
    }

    /// Choose the bank account for non-cash modes
    pub async fn set_bank_account(&mut self, account_id: &str) -> BillingResult<()> {
        if self.storage.get_bank_account(account_id).await?.is_none() {
            return Err(BillingError::BankAccountNotFound(account_id.to_string()));
        }
        self.bank_account_id = Some(account_id.to_string());
        Ok(())
    }

    /// Define a new TDS rate, persist it for reuse, and return its id
    pub async fn define_tds_rate(
        &mut self,
        description: String,
        section: String,
        rate: BigDecimal,
    ) -> BillingResult<String> {
        let rate = WithholdingRate::new(
            Uuid::new_v4().to_string(),
            WithholdingKind::Tds,
            description,
            section,
            rate,
        )?;
        self.storage.save_withholding_rate(&rate).await?;
        let id = rate.id.clone();
        self.tds_rates.push(rate);
        Ok(id)
    }

    /// Attach an existing TDS rate to one outstanding document
    pub fn apply_tds(&mut self, document_id: &str, rate_id: &str) -> BillingResult<()> {
        let rate = self
            .tds_rates
            .iter()
            .find(|rate| rate.id == rate_id)
            .cloned()
            .ok_or_else(|| BillingError::InvalidRate(format!("Unknown TDS rate '{rate_id}'")))?;
        self.outstanding_mut(document_id)?.apply_tds(rate);
        Ok(())
    }

    /// Detach TDS from one outstanding document
    pub fn clear_tds(&mut self, document_id: &str) -> BillingResult<()> {
        self.outstanding_mut(document_id)?.clear_tds();
        Ok(())
    }

    /// Allocation of the entered amount over the current outstanding list,
    /// net of each document's TDS
    pub fn allocation(&self) -> Allocation {
        allocate(&self.payment_amount, &self.outstanding)
    }

    /// Validate and record the settlement
    pub async fn submit(&mut self) -> BillingResult<Settlement> {
        let party = self
            .party
            .clone()
            .ok_or_else(|| BillingError::Validation("Select a party before saving".to_string()))?;

        if self.payment_amount <= BigDecimal::from(0) {
            return Err(BillingError::Validation(
                "Payment amount must be positive".to_string(),
            ));
        }

        if self.payment_mode.requires_bank_account() && self.bank_account_id.is_none() {
            return Err(BillingError::Validation(format!(
                "Payment mode {:?} requires a bank account",
                self.payment_mode
            )));
        }

        let settlement = Settlement {
            id: Uuid::new_v4().to_string(),
            party,
            date: self.date,
            payment_amount: self.payment_amount.clone(),
            payment_mode: self.payment_mode,
            bank_account_id: self.bank_account_id.clone(),
            allocation: self.allocation(),
            created_at: chrono::Utc::now().naive_utc(),
        };

        self.storage.save_settlement(&settlement).await?;

        tracing::debug!(
            settlement = %settlement.id,
            amount = %settlement.payment_amount,
            settled = %settlement.allocation.total_settled,
            "settlement saved"
        );

        Ok(settlement)
    }

    fn outstanding_mut(&mut self, document_id: &str) -> BillingResult<&mut Outstanding> {
        self.outstanding
            .iter_mut()
            .find(|doc| doc.document_id == document_id)
            .ok_or_else(|| BillingError::DocumentNotFound(document_id.to_string()))
    }
}
