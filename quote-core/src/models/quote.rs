use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::province::Province;

/// Where the sponsoring client is located. Tax only ever applies to Canada.
///
/// Deserialisation is permissive: anything that is not "Canada" (ignoring
/// case) collapses to [`Country::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Country {
    #[default]
    Canada,
    Other,
}

impl From<String> for Country {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("canada") {
            Self::Canada
        } else {
            Self::Other
        }
    }
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canada => "Canada",
            Self::Other => "Other",
        }
    }
}

/// Header fields of one quotation, excluding line items.
///
/// Every field carries a serde default so partially filled or legacy
/// records still parse; normalisation beyond that happens at the store
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    /// Displayed reference, `Quote NNNN-YY` once one has been minted.
    pub reference: String,
    pub issue_date: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    /// Sponsor (client) name; the only field required at save time.
    pub sponsor: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub contact_info: String,
    pub country: Country,
    /// Province code as entered; interpreted through [`Province::parse`].
    pub province: String,
    /// Percentage in [0, 100]; out-of-range values are clamped when totals
    /// are computed, not here.
    pub discount_percent: Decimal,
}

impl Default for Quote {
    fn default() -> Self {
        Self {
            reference: String::new(),
            issue_date: None,
            valid_until: None,
            sponsor: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            contact_info: String::new(),
            country: Country::Canada,
            province: "QC".to_string(),
            discount_percent: Decimal::ZERO,
        }
    }
}

impl Quote {
    /// Tax rate for this header: province lookup when the country is
    /// Canada, zero otherwise or when the province code is unknown.
    pub fn tax_rate(&self) -> Decimal {
        match self.country {
            Country::Canada => Province::parse(&self.province)
                .map(|p| p.tax_rate())
                .unwrap_or(Decimal::ZERO),
            Country::Other => Decimal::ZERO,
        }
    }
}
