mod line_item;
mod province;
mod quote;
mod snapshot;

use uuid::Uuid;

pub use line_item::LineItem;
pub use province::Province;
pub use quote::{Country, Quote};
pub use snapshot::{LastSaved, QuoteSnapshot};

/// Mints an opaque unique identifier for snapshots and line items.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}
