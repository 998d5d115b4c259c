pub mod calculations;
pub mod db;
pub mod history;
pub mod models;
pub mod reference;

pub use db::store::{QuoteStore, StoreError};
pub use history::{HistoryError, HistoryStore};
pub use models::*;
