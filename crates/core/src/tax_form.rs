//! Creator tax form rules: TIN validation, masking and review lifecycle.
//!
//! The full taxpayer identification number is never stored. Only the last
//! four digits (for display) and a SHA-256 digest (for duplicate checks)
//! leave this module.

use crate::hashing::sha256_hex;
use crate::state_machine::{self, TransitionTable};

pub const FORM_W9: &str = "w9";
pub const FORM_W8BEN: &str = "w8ben";
pub const FORM_TYPES: &[&str] = &[FORM_W9, FORM_W8BEN];

pub const TIN_SSN: &str = "ssn";
pub const TIN_EIN: &str = "ein";
pub const TIN_FOREIGN: &str = "foreign";

pub const TAX_FORM_SUBMITTED: &str = "submitted";
pub const TAX_FORM_APPROVED: &str = "approved";
pub const TAX_FORM_REJECTED: &str = "rejected";

pub const TAX_FORM_STATUSES: &[&str] = &[TAX_FORM_SUBMITTED, TAX_FORM_APPROVED, TAX_FORM_REJECTED];

pub const TRANSITIONS: TransitionTable = &[
    (TAX_FORM_SUBMITTED, &[TAX_FORM_APPROVED, TAX_FORM_REJECTED]),
    (TAX_FORM_REJECTED, &[TAX_FORM_SUBMITTED]),
    (TAX_FORM_APPROVED, &[]),
];

/// Earliest accepted tax year.
pub const MIN_TAX_YEAR: i32 = 2000;

/// The parts of a TIN that may be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedTin {
    pub tin_type: &'static str,
    pub last4: Option<String>,
    pub hash: Option<String>,
}

pub fn validate_transition(from: &str, to: &str) -> Result<(), String> {
    state_machine::validate_transition("Tax form", TRANSITIONS, from, to)
}

pub fn validate_form_type(form_type: &str) -> Result<(), String> {
    state_machine::validate_status("form", FORM_TYPES, form_type)
}

/// Tax year must lie in `[MIN_TAX_YEAR, current_year + 1]`.
pub fn validate_tax_year(tax_year: i32, current_year: i32) -> Result<(), String> {
    let max = current_year + 1;
    if (MIN_TAX_YEAR..=max).contains(&tax_year) {
        Ok(())
    } else {
        Err(format!("tax_year must be between {MIN_TAX_YEAR} and {max}"))
    }
}

/// Strip the separators people type into TINs.
fn normalize_tin(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

/// Validate a US social security number (9 digits, no separators).
pub fn validate_ssn(digits: &str) -> Result<(), String> {
    if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("SSN must be 9 digits".into());
    }
    let area = &digits[0..3];
    if area == "000" || area == "666" || area.starts_with('9') {
        return Err("SSN area number is invalid".into());
    }
    if &digits[3..5] == "00" {
        return Err("SSN group number is invalid".into());
    }
    if &digits[5..9] == "0000" {
        return Err("SSN serial number is invalid".into());
    }
    Ok(())
}

/// Validate a US employer identification number (9 digits, no separators).
pub fn validate_ein(digits: &str) -> Result<(), String> {
    if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("EIN must be 9 digits".into());
    }
    if &digits[0..2] == "00" {
        return Err("EIN prefix is invalid".into());
    }
    Ok(())
}

/// Validate the TIN for a form and reduce it to its persistable parts.
///
/// W-9 requires an SSN or EIN. W-8BEN takes an optional foreign TIN which
/// is only length-checked.
pub fn mask_tin(form_type: &str, tin_type: &str, tin: Option<&str>) -> Result<MaskedTin, String> {
    validate_form_type(form_type)?;

    let digits = tin.map(normalize_tin).filter(|t| !t.is_empty());

    match form_type {
        FORM_W9 => {
            let digits = digits.ok_or("A W-9 requires a TIN")?;
            let tin_type = match tin_type {
                TIN_SSN => {
                    validate_ssn(&digits)?;
                    TIN_SSN
                }
                TIN_EIN => {
                    validate_ein(&digits)?;
                    TIN_EIN
                }
                other => return Err(format!("A W-9 TIN must be 'ssn' or 'ein', got '{other}'")),
            };
            Ok(MaskedTin {
                tin_type,
                last4: Some(digits[digits.len() - 4..].to_string()),
                hash: Some(sha256_hex(digits.as_bytes())),
            })
        }
        _ => {
            if tin_type != TIN_FOREIGN {
                return Err(format!("A W-8BEN TIN must be 'foreign', got '{tin_type}'"));
            }
            match digits {
                Some(d) if !d.bytes().all(|b| b.is_ascii_alphanumeric()) => {
                    Err("Foreign TIN may only contain letters and digits".into())
                }
                Some(d) if d.len() < 4 || d.len() > 20 => {
                    Err("Foreign TIN must be between 4 and 20 characters".into())
                }
                Some(d) => Ok(MaskedTin {
                    tin_type: TIN_FOREIGN,
                    last4: Some(d[d.len() - 4..].to_string()),
                    hash: Some(sha256_hex(d.as_bytes())),
                }),
                None => Ok(MaskedTin {
                    tin_type: TIN_FOREIGN,
                    last4: None,
                    hash: None,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssn_rules() {
        assert!(validate_ssn("123456789").is_ok());
        assert!(validate_ssn("000456789").is_err());
        assert!(validate_ssn("666456789").is_err());
        assert!(validate_ssn("923456789").is_err());
        assert!(validate_ssn("123006789").is_err());
        assert!(validate_ssn("123450000").is_err());
        assert!(validate_ssn("12345678").is_err());
        assert!(validate_ssn("12345678a").is_err());
    }

    #[test]
    fn ein_rules() {
        assert!(validate_ein("121234567").is_ok());
        assert!(validate_ein("001234567").is_err());
        assert!(validate_ein("1212345678").is_err());
    }

    #[test]
    fn w9_masks_and_hashes_ssn_with_dashes() {
        let masked = mask_tin(FORM_W9, TIN_SSN, Some("123-45-6789")).unwrap();
        assert_eq!(masked.tin_type, TIN_SSN);
        assert_eq!(masked.last4.as_deref(), Some("6789"));
        let hash = masked.hash.unwrap();
        assert_eq!(hash.len(), 64);
        // Separators do not change the digest.
        let again = mask_tin(FORM_W9, TIN_SSN, Some("123 45 6789")).unwrap();
        assert_eq!(again.hash.unwrap(), hash);
    }

    #[test]
    fn w9_requires_tin() {
        assert!(mask_tin(FORM_W9, TIN_SSN, None).is_err());
        assert!(mask_tin(FORM_W9, TIN_EIN, Some("  ")).is_err());
    }

    #[test]
    fn w9_rejects_foreign_tin_type() {
        let err = mask_tin(FORM_W9, TIN_FOREIGN, Some("123456789")).unwrap_err();
        assert!(err.contains("'ssn' or 'ein'"));
    }

    #[test]
    fn w8ben_tin_is_optional() {
        let masked = mask_tin(FORM_W8BEN, TIN_FOREIGN, None).unwrap();
        assert_eq!(masked.last4, None);
        assert_eq!(masked.hash, None);
    }

    #[test]
    fn w8ben_foreign_tin_length() {
        assert!(mask_tin(FORM_W8BEN, TIN_FOREIGN, Some("GB12")).is_ok());
        assert!(mask_tin(FORM_W8BEN, TIN_FOREIGN, Some("GB1")).is_err());
        assert!(mask_tin(FORM_W8BEN, TIN_SSN, Some("123456789")).is_err());
    }

    #[test]
    fn unknown_form_type() {
        assert!(mask_tin("1099", TIN_SSN, Some("123456789")).is_err());
    }

    #[test]
    fn tax_year_window() {
        assert!(validate_tax_year(1999, 2026).is_err());
        assert!(validate_tax_year(2000, 2026).is_ok());
        assert!(validate_tax_year(2027, 2026).is_ok());
        assert!(validate_tax_year(2028, 2026).is_err());
    }

    #[test]
    fn review_lifecycle() {
        assert!(validate_transition(TAX_FORM_SUBMITTED, TAX_FORM_APPROVED).is_ok());
        assert!(validate_transition(TAX_FORM_SUBMITTED, TAX_FORM_REJECTED).is_ok());
        assert!(validate_transition(TAX_FORM_REJECTED, TAX_FORM_SUBMITTED).is_ok());
        assert!(validate_transition(TAX_FORM_APPROVED, TAX_FORM_REJECTED).is_err());
    }
}
