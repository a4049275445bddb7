//! Named format validators.
//!
//! Consistency and validity checks look formats up in this table instead of
//! embedding patterns inline. All patterns match case-insensitively.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A named value format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validator {
    Email,
    /// UK phone number
    Phone,
    Url,
    /// UK postcode
    Postcode,
    /// Sterling amount
    Currency,
    /// Day/month/year date
    Date,
    /// FCA firm reference number
    Frn,
    Numeric,
}

impl Validator {
    /// All validators in table order.
    pub const ALL: [Validator; 8] = [
        Validator::Email,
        Validator::Phone,
        Validator::Url,
        Validator::Postcode,
        Validator::Currency,
        Validator::Date,
        Validator::Frn,
        Validator::Numeric,
    ];

    /// Returns the validator name.
    pub fn name(&self) -> &'static str {
        match self {
            Validator::Email => "email",
            Validator::Phone => "phone",
            Validator::Url => "url",
            Validator::Postcode => "postcode",
            Validator::Currency => "currency",
            Validator::Date => "date",
            Validator::Frn => "frn",
            Validator::Numeric => "numeric",
        }
    }

    /// Returns the pattern source for this validator.
    pub fn pattern(&self) -> &'static str {
        match self {
            Validator::Email => r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
            Validator::Phone => r"^(\+44|0)[\d\s()-]{10,}$",
            Validator::Url => {
                r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$"
            }
            Validator::Postcode => r"^[A-Z]{1,2}[0-9][A-Z0-9]?\s?[0-9][A-Z]{2}$",
            Validator::Currency => r"^£[\d,]+(\.\d{2})?$",
            Validator::Date => r"^\d{1,2}[/-]\d{1,2}[/-]\d{4}$",
            Validator::Frn => r"^\d{6,8}$",
            Validator::Numeric => r"^\d+\.?\d*$",
        }
    }

    /// Validator whose name equals the field name, ignoring case.
    ///
    /// Only `email`, `phone`, `url` and `postcode` fields are format-checked
    /// for consistency.
    pub fn for_field(field: &str) -> Option<Validator> {
        match field.to_lowercase().as_str() {
            "email" => Some(Validator::Email),
            "phone" => Some(Validator::Phone),
            "url" => Some(Validator::Url),
            "postcode" => Some(Validator::Postcode),
            _ => None,
        }
    }
}

/// Pre-compiled validator patterns.
///
/// Uses `OnceLock` for thread-safe lazy initialization.
pub struct ValidatorTable {
    compiled: Vec<(Validator, Regex)>,
}

impl ValidatorTable {
    /// Gets the singleton instance of the compiled table.
    pub fn instance() -> &'static Self {
        static TABLE: OnceLock<ValidatorTable> = OnceLock::new();
        TABLE.get_or_init(Self::compile)
    }

    /// Compiles every validator pattern.
    fn compile() -> Self {
        let compiled = Validator::ALL
            .iter()
            .map(|validator| {
                let regex = Regex::new(&format!("(?i){}", validator.pattern()))
                    .expect("Invalid validator pattern");
                (*validator, regex)
            })
            .collect();
        Self { compiled }
    }

    /// Returns true when the trimmed value matches the validator.
    pub fn matches(&self, validator: Validator, value: &str) -> bool {
        self.compiled
            .iter()
            .find(|(v, _)| *v == validator)
            .is_some_and(|(_, regex)| regex.is_match(value.trim()))
    }
}

/// Shorthand for `ValidatorTable::instance().matches(validator, value)`.
pub fn matches(validator: Validator, value: &str) -> bool {
    ValidatorTable::instance().matches(validator, value)
}
