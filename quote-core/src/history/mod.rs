//! The saved-quotation history and its backup format.

mod backup;
mod store;

pub use backup::{BACKUP_SCHEMA, BackupBundle};
pub use store::{HistoryError, HistoryStore};
