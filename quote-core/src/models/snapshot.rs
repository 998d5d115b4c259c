use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{LineItem, Quote, fresh_id};

/// An immutable saved copy of a quote, its line items, and the totals
/// computed at save time. Only the reference can change after creation,
/// through the history store's rename operation.
///
/// The serde defaults double as import normalisation: records that arrive
/// without an identifier or timestamp are minted fresh ones while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSnapshot {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    pub subtotal: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
    pub quote: Quote,
    pub lines: Vec<LineItem>,
}

impl Default for QuoteSnapshot {
    fn default() -> Self {
        Self {
            id: fresh_id(),
            saved_at: Utc::now(),
            subtotal: Decimal::ZERO,
            taxes: Decimal::ZERO,
            total: Decimal::ZERO,
            quote: Quote::default(),
            lines: Vec::new(),
        }
    }
}

impl QuoteSnapshot {
    /// Store-boundary normalisation: guarantees a non-empty identifier and
    /// at least one line, each line with an identifier of its own.
    pub fn normalize(&mut self) {
        if self.id.trim().is_empty() {
            self.id = fresh_id();
        }
        if self.lines.is_empty() {
            self.lines.push(LineItem::blank());
        }
        for line in &mut self.lines {
            line.ensure_id();
        }
    }
}

/// The single "last saved" record: the live quote and lines as of the most
/// recent save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LastSaved {
    pub quote: Quote,
    pub lines: Vec<LineItem>,
    pub saved_at: DateTime<Utc>,
}

impl Default for LastSaved {
    fn default() -> Self {
        Self {
            quote: Quote::default(),
            lines: Vec::new(),
            saved_at: Utc::now(),
        }
    }
}
