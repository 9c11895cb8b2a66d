//! Validation utilities

use bigdecimal::BigDecimal;

use crate::invoice::Document;
use crate::traits::DocumentValidator;
use crate::types::{BillingError, BillingResult};

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BillingResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(BillingError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a discount percentage is within 0 to 100
pub fn validate_discount_percent(discount: &BigDecimal) -> BillingResult<()> {
    if *discount < BigDecimal::from(0) || *discount > BigDecimal::from(100) {
        return Err(BillingError::Validation(
            "Discount must be between 0 and 100 percent".to_string(),
        ));
    }
    Ok(())
}

/// Validate the shape of a GSTIN: 15 characters, two-digit state code,
/// ten-character PAN block, then entity code, 'Z', and a check character
pub fn validate_gstin(gstin: &str) -> BillingResult<()> {
    let gstin = gstin.trim();
    if gstin.len() != 15 {
        return Err(BillingError::Validation(
            "GSTIN must be 15 characters".to_string(),
        ));
    }

    let bytes = gstin.as_bytes();
    if !bytes[..2].iter().all(|b| b.is_ascii_digit()) {
        return Err(BillingError::Validation(
            "GSTIN must start with a two-digit state code".to_string(),
        ));
    }

    if !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(BillingError::Validation(
            "GSTIN can only contain alphanumeric characters".to_string(),
        ));
    }

    if bytes[13] != b'Z' {
        return Err(BillingError::Validation(
            "GSTIN must have 'Z' as its fourteenth character".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a party name is valid
pub fn validate_party_name(name: &str) -> BillingResult<()> {
    if name.trim().is_empty() {
        return Err(BillingError::Validation(
            "Party name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(BillingError::Validation(
            "Party name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced document validator with detailed checks
pub struct EnhancedDocumentValidator;

impl DocumentValidator for EnhancedDocumentValidator {
    fn validate_document(&self, document: &Document) -> BillingResult<()> {
        // Basic validation
        document.validate()?;

        // Enhanced validations
        validate_party_name(&document.party.name)?;

        if let Some(gstin) = &document.party.gstin {
            validate_gstin(gstin)?;
        }

        for line in &document.lines {
            validate_positive_amount(&line.unit_price)?;
            validate_discount_percent(&line.discount_percent)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amount() {
        assert!(validate_positive_amount(&BigDecimal::from(1)).is_ok());
        assert!(validate_positive_amount(&BigDecimal::from(0)).is_err());
        assert!(validate_positive_amount(&BigDecimal::from(-5)).is_err());
    }

    #[test]
    fn test_discount_bounds() {
        assert!(validate_discount_percent(&BigDecimal::from(0)).is_ok());
        assert!(validate_discount_percent(&BigDecimal::from(100)).is_ok());
        assert!(validate_discount_percent(&BigDecimal::from(101)).is_err());
        assert!(validate_discount_percent(&BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn test_gstin_shape() {
        assert!(validate_gstin("32AAACC1206D1ZM").is_ok());
        assert!(validate_gstin("32AAACC1206D1Z").is_err()); // too short
        assert!(validate_gstin("XXAAACC1206D1ZM").is_err()); // bad state code
        assert!(validate_gstin("32AAACC1206D1AM").is_err()); // missing Z
    }

    #[test]
    fn test_party_name() {
        assert!(validate_party_name("Sharma Stores").is_ok());
        assert!(validate_party_name("  ").is_err());
        assert!(validate_party_name(&"x".repeat(101)).is_err());
    }
}
