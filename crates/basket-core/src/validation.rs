//! # Validation Module
//!
//! Input checks applied where page data enters the cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront page                                              │
//! │  ├── Product card text ("$12.50", "Green Tea")                         │
//! │  └── Contact form fields                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront command (Rust)                                    │
//! │  └── THIS MODULE: parse prices, presence checks                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart state machine                                           │
//! │  └── Only ever sees well-formed Money and non-blank names              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::validation::parse_price;
//!
//! assert_eq!(parse_price("$12.50").unwrap().cents(), 1250);
//! assert!(parse_price("call us").is_err());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name accepted from a card.
const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// Product Fields
// =============================================================================

/// Validates a product display name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product image reference. Only presence is checked.
pub fn validate_image_ref(image_ref: &str) -> ValidationResult<()> {
    if image_ref.trim().is_empty() {
        return Err(ValidationError::required("image"));
    }
    Ok(())
}

/// Parses a price as printed on a product card.
///
/// ## Accepted
/// `"12.50"`, `"$12.50"`, `"12.5 $"`, `" 7 "`, `"0"`
///
/// ## Rejected
/// - blank text
/// - anything that is not digits with an optional fraction of up to two
///   digits (`"abc"`, `"12.505"`, `"1e3"`, `"NaN"`)
/// - negative prices
/// - prices above 1,000,000.00 ([`MAX_UNIT_PRICE_CENTS`])
///
/// A price that fails here never reaches the cart, so totals cannot turn
/// into NaN.
pub fn parse_price(text: &str) -> ValidationResult<Money> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required("price"));
    }

    let amount = trimmed.trim_matches('$').trim();

    if amount.starts_with('-') {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS / 100,
        });
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(ValidationError::invalid_format(
            "price",
            format!("'{}' is not a number", trimmed),
        ));
    }

    if fraction.len() > 2 {
        return Err(ValidationError::invalid_format(
            "price",
            "at most two decimal places",
        ));
    }

    let too_large = || ValidationError::OutOfRange {
        field: "price".to_string(),
        min: 0,
        max: MAX_UNIT_PRICE_CENTS / 100,
    };

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| too_large())?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| too_large())? * 10,
        _ => fraction.parse().map_err(|_| too_large())?,
    };

    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .filter(|cents| *cents <= MAX_UNIT_PRICE_CENTS)
        .map(Money::from_cents)
        .ok_or_else(too_large)
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// Contact Form
// =============================================================================

/// The storefront contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Returns a copy with every field trimmed.
    pub fn trimmed(&self) -> ContactForm {
        ContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Checks that every contact form field is filled in.
///
/// Presence only: the address format is not inspected. Fields are checked in
/// form order and the first blank one is reported.
pub fn validate_contact_form(form: &ContactForm) -> ValidationResult<ContactForm> {
    let form = form.trimmed();
    let fields = [
        ("name", &form.name),
        ("email", &form.email),
        ("subject", &form.subject),
        ("message", &form.message),
    ];

    if let Some((field, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
        return Err(ValidationError::required(*field));
    }

    Ok(form)
}

// =============================================================================
// Unit Tests
// =============================================================================
