//! Derived totals for a quotation.
//!
//! The pipeline mirrors the client-facing totals panel:
//!
//! | Step | Value |
//! |------|-------|
//! | 1 | per-line subtotal = unit price × samples, inputs clamped to ≥ 0 |
//! | 2 | subtotal = sum of per-line subtotals |
//! | 3 | discount amount = subtotal × clamped discount% ÷ 100 |
//! | 4 | after discount = max(0, subtotal − discount amount) |
//! | 5 | tax rate = province lookup, Canada only |
//! | 6 | taxes = after discount × tax rate |
//! | 7 | total = max(0, after discount + taxes) |
//!
//! Arithmetic keeps full decimal precision throughout; rounding to the
//! two-decimal display precision happens only when amounts are formatted.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use quote_core::calculations::compute;
//! use quote_core::models::{LineItem, Quote};
//!
//! let quote = Quote {
//!     discount_percent: dec!(10),
//!     province: "QC".to_string(),
//!     ..Quote::default()
//! };
//! let line = LineItem {
//!     unit_price: dec!(100),
//!     samples: dec!(3),
//!     ..LineItem::blank()
//! };
//!
//! let totals = compute(&quote, &[line]);
//!
//! assert_eq!(totals.subtotal, dec!(300));
//! assert_eq!(totals.discount_amount, dec!(30));
//! assert_eq!(totals.taxes, dec!(40.4325));
//! assert_eq!(totals.total, dec!(310.4325));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::common::{clamp_non_negative, clamp_percent, max};
use crate::models::{LineItem, Quote};

/// Subtotal of a single line, keyed by the line's identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSubtotal {
    pub line_id: String,
    pub amount: Decimal,
}

/// Everything the totals panel displays, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTotals {
    /// Per-line subtotals in line order.
    pub line_subtotals: Vec<LineSubtotal>,
    pub subtotal: Decimal,
    /// Discount percentage after clamping into [0, 100].
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub after_discount: Decimal,
    pub tax_rate: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

/// Subtotal of one line: unit price × sample count, both clamped to ≥ 0.
pub fn line_subtotal(line: &LineItem) -> Decimal {
    clamp_non_negative(line.unit_price) * clamp_non_negative(line.samples)
}

/// Computes the full set of derived totals for a quote and its lines.
pub fn compute(
    quote: &Quote,
    lines: &[LineItem],
) -> DerivedTotals {
    let line_subtotals: Vec<LineSubtotal> = lines
        .iter()
        .map(|line| LineSubtotal {
            line_id: line.id.clone(),
            amount: line_subtotal(line),
        })
        .collect();

    let subtotal: Decimal = line_subtotals.iter().map(|l| l.amount).sum();

    let discount_percent = clamp_percent(quote.discount_percent);
    let discount_amount = subtotal * discount_percent / Decimal::ONE_HUNDRED;
    let after_discount = max(subtotal - discount_amount, Decimal::ZERO);

    let tax_rate = quote.tax_rate();
    let taxes = after_discount * tax_rate;
    let total = max(after_discount + taxes, Decimal::ZERO);

    DerivedTotals {
        line_subtotals,
        subtotal,
        discount_percent,
        discount_amount,
        after_discount,
        tax_rate,
        taxes,
        total,
    }
}
