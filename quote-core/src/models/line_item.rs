use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fresh_id;

/// One priced row within a quotation: a test or service with a unit price
/// and a sample count.
///
/// Numeric fields default to zero and `time_days` to blank; identifiers are
/// minted on construction so every row is addressable from the moment it
/// exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub id: String,
    pub type_of_test: String,
    pub description: String,
    pub panel: String,
    /// Estimated turnaround in business days, or blank.
    pub time_days: Option<Decimal>,
    pub unit_price: Decimal,
    pub samples: Decimal,
}

impl Default for LineItem {
    fn default() -> Self {
        Self::blank()
    }
}

impl LineItem {
    /// A new empty row with a freshly minted identifier.
    pub fn blank() -> Self {
        Self {
            id: fresh_id(),
            type_of_test: String::new(),
            description: String::new(),
            panel: String::new(),
            time_days: None,
            unit_price: Decimal::ZERO,
            samples: Decimal::ZERO,
        }
    }

    /// Assigns a fresh identifier when the stored record carried none.
    pub(crate) fn ensure_id(&mut self) {
        if self.id.trim().is_empty() {
            self.id = fresh_id();
        }
    }
}
