use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LastSaved, QuoteSnapshot};

/// Schema tag written into every export file.
pub const BACKUP_SCHEMA: &str = "hibalogique_quotes_backup_v1";

/// Portable backup document: the full history plus the in-progress quote.
///
/// On import only `history` is required; every other field is defaulted.
/// `history` stays an `Option` so a structurally valid document without a
/// history collection can be told apart from one that failed to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupBundle {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Option<Vec<QuoteSnapshot>>,
    #[serde(default)]
    pub last: Option<LastSaved>,
}

fn default_schema() -> String {
    BACKUP_SCHEMA.to_string()
}

impl BackupBundle {
    pub fn new(
        history: Vec<QuoteSnapshot>,
        last: Option<LastSaved>,
    ) -> Self {
        Self {
            schema: BACKUP_SCHEMA.to_string(),
            exported_at: Utc::now(),
            history: Some(history),
            last,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
