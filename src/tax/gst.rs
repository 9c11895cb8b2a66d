//! GST calculation engine: jurisdiction resolution, rate slabs, and
//! per-amount CGST/SGST/IGST/CESS breakups

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{BillingError, BillingResult};

/// Tax jurisdiction of a transaction, decided by comparing the business's
/// registered state with the counterparty's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxJurisdiction {
    /// Same state: tax splits evenly into CGST + SGST
    IntraState,
    /// Different states: tax applies in full as IGST
    InterState,
}

impl TaxJurisdiction {
    /// Compare two free-form state strings, trimmed and case-insensitive.
    ///
    /// An unselected party leaves its state empty, which compares equal to an
    /// empty business state and lands on `IntraState`. Forms rely on that
    /// bias before a party is chosen.
    pub fn between(business_state: &str, party_state: &str) -> Self {
        if business_state.trim().eq_ignore_ascii_case(party_state.trim()) {
            TaxJurisdiction::IntraState
        } else {
            TaxJurisdiction::InterState
        }
    }
}

/// Tax rate selection for a line: either a reference into the fetched rate
/// table or one of the sentinel labels that bypass the table lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateCode {
    /// Id into the rate table fetched at form mount
    Rate(String),
    /// The "None" label: no tax applies
    None,
    /// The "Exempted" label: goods exempt from GST
    Exempted,
    /// The "GST @ 0%" label: zero-rated supply
    ZeroRated,
}

impl RateCode {
    /// Parse a rate label as fetched from the backend. Sentinel labels map to
    /// their variants; anything else is treated as a table reference by id.
    pub fn from_label(id: &str, label: &str) -> Self {
        match label.trim() {
            "None" => RateCode::None,
            "Exempted" => RateCode::Exempted,
            "GST @ 0%" => RateCode::ZeroRated,
            _ => RateCode::Rate(id.to_string()),
        }
    }

    /// Sentinel codes resolve to a flat 0% rate with no cess
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, RateCode::Rate(_))
    }
}

/// One entry of the tax rate table fetched once per form mount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRateEntry {
    /// Backend identifier, referenced from line items
    pub id: String,
    /// Descriptive label, e.g. "GST @ 18%"
    pub label: String,
    /// Nominal GST rate percentage
    pub rate: BigDecimal,
    /// Cess rate percentage levied on top of GST
    pub cess_rate: BigDecimal,
}

/// Nominal GST and cess percentages a line item is taxed at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRate {
    pub rate: BigDecimal,
    pub cess_rate: BigDecimal,
}

impl ResolvedRate {
    /// The 0% / no-cess rate that sentinel codes and missing lookups yield
    pub fn zero() -> Self {
        Self {
            rate: BigDecimal::from(0),
            cess_rate: BigDecimal::from(0),
        }
    }
}

/// Rate table fetched once per form mount and referenced by id from lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxRateTable {
    entries: Vec<TaxRateEntry>,
}

impl TaxRateTable {
    /// Build a table from fetched entries
    pub fn new(entries: Vec<TaxRateEntry>) -> Self {
        Self { entries }
    }

    /// All entries, in fetched order
    pub fn entries(&self) -> &[TaxRateEntry] {
        &self.entries
    }

    /// Look up an entry by id
    pub fn get(&self, rate_id: &str) -> Option<&TaxRateEntry> {
        self.entries.iter().find(|entry| entry.id == rate_id)
    }

    /// Resolve a rate code to its nominal percentages.
    ///
    /// Sentinel codes short-circuit to 0% with no cess. A missing table id
    /// also falls back to 0% rather than failing an edit; the miss is
    /// logged.
    pub fn resolve(&self, code: &RateCode) -> ResolvedRate {
        match code {
            RateCode::None | RateCode::Exempted | RateCode::ZeroRated => ResolvedRate::zero(),
            RateCode::Rate(id) => match self.get(id) {
                Some(entry) => ResolvedRate {
                    rate: entry.rate.clone(),
                    cess_rate: entry.cess_rate.clone(),
                },
                None => {
                    tracing::warn!(rate_id = %id, "tax rate not found, defaulting to 0%");
                    ResolvedRate::zero()
                }
            },
        }
    }
}

/// GST rate structure with the jurisdiction split applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRate {
    /// Total GST rate percentage (e.g. 18.0 for 18%)
    pub total_rate: BigDecimal,
    /// CGST rate percentage (Central GST)
    pub cgst_rate: BigDecimal,
    /// SGST rate percentage (State GST)
    pub sgst_rate: BigDecimal,
    /// IGST rate percentage (Integrated GST)
    pub igst_rate: BigDecimal,
    /// Cess rate percentage, levied independently of jurisdiction
    pub cess_rate: BigDecimal,
}

impl GstRate {
    /// Intra-state rate: CGST and SGST at half the total each
    pub fn intra_state(total_rate: BigDecimal, cess_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            total_rate,
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::from(0),
            cess_rate,
        }
    }

    /// Inter-state rate: IGST at the full total
    pub fn inter_state(total_rate: BigDecimal, cess_rate: BigDecimal) -> Self {
        Self {
            total_rate: total_rate.clone(),
            cgst_rate: BigDecimal::from(0),
            sgst_rate: BigDecimal::from(0),
            igst_rate: total_rate,
            cess_rate,
        }
    }

    /// Split a resolved rate for the given jurisdiction
    pub fn for_jurisdiction(resolved: &ResolvedRate, jurisdiction: TaxJurisdiction) -> Self {
        match jurisdiction {
            TaxJurisdiction::IntraState => {
                Self::intra_state(resolved.rate.clone(), resolved.cess_rate.clone())
            }
            TaxJurisdiction::InterState => {
                Self::inter_state(resolved.rate.clone(), resolved.cess_rate.clone())
            }
        }
    }

    /// Validate that the GST rate structure is internally consistent
    pub fn validate(&self) -> BillingResult<()> {
        let calculated_total = &self.cgst_rate + &self.sgst_rate + &self.igst_rate;

        if calculated_total != self.total_rate {
            return Err(BillingError::InvalidRate(format!(
                "GST components don't add up to total rate: {} != {}",
                calculated_total, self.total_rate
            )));
        }

        if self.igst_rate == BigDecimal::from(0) && self.cgst_rate != self.sgst_rate {
            return Err(BillingError::InvalidRate(
                "CGST and SGST rates must be equal for intra-state transactions".to_string(),
            ));
        }

        if self.igst_rate > BigDecimal::from(0)
            && (self.cgst_rate > BigDecimal::from(0) || self.sgst_rate > BigDecimal::from(0))
        {
            return Err(BillingError::InvalidRate(
                "Only IGST should be applicable for inter-state transactions".to_string(),
            ));
        }

        if self.cess_rate < BigDecimal::from(0) {
            return Err(BillingError::InvalidRate(
                "Cess rate cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Detailed GST breakup for a base amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstBreakup {
    /// Base amount (before GST and cess)
    pub base_amount: BigDecimal,
    /// GST rate used for the calculation
    pub gst_rate: GstRate,
    /// Calculated CGST amount
    pub cgst_amount: BigDecimal,
    /// Calculated SGST amount
    pub sgst_amount: BigDecimal,
    /// Calculated IGST amount
    pub igst_amount: BigDecimal,
    /// Calculated cess amount
    pub cess_amount: BigDecimal,
    /// Total GST amount (CGST + SGST + IGST, excluding cess)
    pub total_gst_amount: BigDecimal,
    /// Total amount including GST and cess
    pub total_amount: BigDecimal,
}

impl GstBreakup {
    /// Calculate the breakup from a pre-tax base amount
    pub fn calculate(base_amount: BigDecimal, gst_rate: GstRate) -> BillingResult<Self> {
        gst_rate.validate()?;

        let cgst_amount = (&base_amount * &gst_rate.cgst_rate) / BigDecimal::from(100);
        let sgst_amount = (&base_amount * &gst_rate.sgst_rate) / BigDecimal::from(100);
        let igst_amount = (&base_amount * &gst_rate.igst_rate) / BigDecimal::from(100);
        let cess_amount = (&base_amount * &gst_rate.cess_rate) / BigDecimal::from(100);

        let total_gst_amount = &cgst_amount + &sgst_amount + &igst_amount;
        let total_amount = &base_amount + &total_gst_amount + &cess_amount;

        Ok(Self {
            base_amount,
            gst_rate,
            cgst_amount,
            sgst_amount,
            igst_amount,
            cess_amount,
            total_gst_amount,
            total_amount,
        })
    }

    /// Back-solve the pre-tax base from a tax-inclusive amount:
    /// `base = gross * 100 / (100 + rate + cess)`
    pub fn reverse_calculate(gross_amount: BigDecimal, gst_rate: GstRate) -> BillingResult<Self> {
        gst_rate.validate()?;

        let divisor = BigDecimal::from(100) + &gst_rate.total_rate + &gst_rate.cess_rate;
        let base_amount = (&gross_amount * BigDecimal::from(100)) / divisor;

        Self::calculate(base_amount, gst_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jurisdiction_case_insensitive_trimmed() {
        assert_eq!(
            TaxJurisdiction::between("Kerala", " kerala "),
            TaxJurisdiction::IntraState
        );
        assert_eq!(
            TaxJurisdiction::between("Kerala", "Tamil Nadu"),
            TaxJurisdiction::InterState
        );
    }

    #[test]
    fn test_unselected_party_defaults_intra_state() {
        // Empty compares equal to empty, biasing unselected parties intra-state.
        assert_eq!(
            TaxJurisdiction::between("", ""),
            TaxJurisdiction::IntraState
        );
    }

    #[test]
    fn test_sentinel_labels_resolve_to_zero() {
        let table = TaxRateTable::new(vec![TaxRateEntry {
            id: "r18".to_string(),
            label: "GST @ 18%".to_string(),
            rate: BigDecimal::from(18),
            cess_rate: BigDecimal::from(0),
        }]);

        for code in [RateCode::None, RateCode::Exempted, RateCode::ZeroRated] {
            assert!(code.is_sentinel());
            assert_eq!(table.resolve(&code), ResolvedRate::zero());
        }
    }

    #[test]
    fn test_missing_rate_id_falls_back_to_zero() {
        let table = TaxRateTable::default();
        let resolved = table.resolve(&RateCode::Rate("missing".to_string()));
        assert_eq!(resolved, ResolvedRate::zero());
    }

    #[test]
    fn test_rate_code_from_label() {
        assert_eq!(RateCode::from_label("r1", "None"), RateCode::None);
        assert_eq!(RateCode::from_label("r2", "Exempted"), RateCode::Exempted);
        assert_eq!(RateCode::from_label("r3", "GST @ 0%"), RateCode::ZeroRated);
        assert_eq!(
            RateCode::from_label("r4", "GST @ 18%"),
            RateCode::Rate("r4".to_string())
        );
    }

    #[test]
    fn test_gst_rate_intra_state() {
        let rate = GstRate::intra_state(BigDecimal::from(18), BigDecimal::from(0));
        assert_eq!(rate.cgst_rate, BigDecimal::from(9));
        assert_eq!(rate.sgst_rate, BigDecimal::from(9));
        assert_eq!(rate.igst_rate, BigDecimal::from(0));
        assert!(rate.validate().is_ok());
    }

    #[test]
    fn test_gst_rate_inter_state() {
        let rate = GstRate::inter_state(BigDecimal::from(18), BigDecimal::from(1));
        assert_eq!(rate.cgst_rate, BigDecimal::from(0));
        assert_eq!(rate.sgst_rate, BigDecimal::from(0));
        assert_eq!(rate.igst_rate, BigDecimal::from(18));
        assert_eq!(rate.cess_rate, BigDecimal::from(1));
        assert!(rate.validate().is_ok());
    }

    #[test]
    fn test_breakup_intra_state() {
        let rate = GstRate::intra_state(BigDecimal::from(18), BigDecimal::from(0));
        let breakup = GstBreakup::calculate(BigDecimal::from(1000), rate).unwrap();

        assert_eq!(breakup.cgst_amount, BigDecimal::from(90));
        assert_eq!(breakup.sgst_amount, BigDecimal::from(90));
        assert_eq!(breakup.igst_amount, BigDecimal::from(0));
        assert_eq!(breakup.total_gst_amount, BigDecimal::from(180));
        assert_eq!(breakup.total_amount, BigDecimal::from(1180));
    }

    #[test]
    fn test_breakup_with_cess() {
        let rate = GstRate::inter_state(BigDecimal::from(28), BigDecimal::from(12));
        let breakup = GstBreakup::calculate(BigDecimal::from(1000), rate).unwrap();

        assert_eq!(breakup.igst_amount, BigDecimal::from(280));
        assert_eq!(breakup.cess_amount, BigDecimal::from(120));
        assert_eq!(breakup.total_amount, BigDecimal::from(1400));
    }

    #[test]
    fn test_reverse_calculation() {
        let rate = GstRate::intra_state(BigDecimal::from(18), BigDecimal::from(0));
        let breakup = GstBreakup::reverse_calculate(BigDecimal::from(1180), rate).unwrap();

        assert_eq!(breakup.base_amount, BigDecimal::from(1000));
        assert_eq!(breakup.total_gst_amount, BigDecimal::from(180));
        assert_eq!(breakup.total_amount, BigDecimal::from(1180));
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let rate = GstRate {
            total_rate: BigDecimal::from(18),
            cgst_rate: BigDecimal::from(9),
            sgst_rate: BigDecimal::from(8),
            igst_rate: BigDecimal::from(0),
            cess_rate: BigDecimal::from(0),
        };
        assert!(rate.validate().is_err());
    }
}
