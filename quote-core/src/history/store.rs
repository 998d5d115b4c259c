use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::DerivedTotals;
use crate::db::store::{HISTORY_KEY, LAST_SAVED_KEY, QuoteStore, StoreError};
use crate::models::{LastSaved, LineItem, Quote, QuoteSnapshot, fresh_id};
use crate::reference;

use super::backup::BackupBundle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// Rename target was blank after trimming.
    #[error("reference must not be empty")]
    EmptyReference,

    /// Rename target collides with another snapshot's reference.
    #[error("a quotation with reference '{0}' already exists")]
    DuplicateReference(String),

    /// No record under the requested key or identifier.
    #[error("record not found")]
    NotFound,

    /// Persisted or imported content failed to parse.
    #[error("stored data is corrupted: {0}")]
    CorruptData(String),

    /// An import document without a history collection.
    #[error("invalid backup format: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The persisted collection of saved quotation snapshots, newest first,
/// plus the single last-saved record.
///
/// The in-memory list always tracks the collaborator's last known-good
/// value: every mutation serializes and persists the next state first and
/// commits it to memory only after the store accepts it.
pub struct HistoryStore {
    store: Box<dyn QuoteStore>,
    snapshots: Vec<QuoteSnapshot>,
}

impl HistoryStore {
    /// Opens the history collection from the collaborator. A missing key is
    /// an empty history; an unparseable one is [`HistoryError::CorruptData`]
    /// and the stored value is left untouched.
    pub async fn open(store: Box<dyn QuoteStore>) -> Result<Self, HistoryError> {
        let snapshots = match store.get(HISTORY_KEY).await? {
            Some(raw) => {
                let mut parsed: Vec<QuoteSnapshot> = serde_json::from_str(&raw)
                    .map_err(|e| HistoryError::CorruptData(e.to_string()))?;
                for snapshot in &mut parsed {
                    snapshot.normalize();
                }
                parsed
            }
            None => Vec::new(),
        };

        debug!(count = snapshots.len(), "opened quotation history");
        Ok(Self { store, snapshots })
    }

    /// Saved snapshots, most recently saved first.
    pub fn list(&self) -> &[QuoteSnapshot] {
        &self.snapshots
    }

    pub fn get(&self, id: &str) -> Option<&QuoteSnapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    /// References of every snapshot, for uniqueness checks and generation.
    pub fn references(&self) -> impl Iterator<Item = &str> + '_ {
        self.snapshots.iter().map(|s| s.quote.reference.as_str())
    }

    async fn persist(&self, snapshots: &[QuoteSnapshot]) -> Result<(), HistoryError> {
        let raw = serde_json::to_string(snapshots)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        self.store.set(HISTORY_KEY, &raw).await?;
        Ok(())
    }

    /// Creates and prepends a snapshot of the given quote, lines and
    /// totals, then persists the collection. Returns the created snapshot.
    pub async fn save(
        &mut self,
        quote: &Quote,
        lines: &[LineItem],
        totals: &DerivedTotals,
    ) -> Result<QuoteSnapshot, HistoryError> {
        let snapshot = QuoteSnapshot {
            id: fresh_id(),
            saved_at: Utc::now(),
            subtotal: totals.subtotal,
            taxes: totals.taxes,
            total: totals.total,
            quote: quote.clone(),
            lines: lines.to_vec(),
        };

        let mut next = Vec::with_capacity(self.snapshots.len() + 1);
        next.push(snapshot.clone());
        next.extend(self.snapshots.iter().cloned());

        self.persist(&next).await?;
        self.snapshots = next;

        info!(reference = %quote.reference, "quotation saved to history");
        Ok(snapshot)
    }

    /// Copies a snapshot under a freshly generated reference for the given
    /// year suffix. Returns the new snapshot.
    pub async fn duplicate(
        &mut self,
        id: &str,
        year_suffix: &str,
    ) -> Result<QuoteSnapshot, HistoryError> {
        let mut copy = self.get(id).ok_or(HistoryError::NotFound)?.clone();
        copy.id = fresh_id();
        copy.saved_at = Utc::now();
        copy.quote.reference = reference::next_reference(self.references(), None, year_suffix);

        let mut next = Vec::with_capacity(self.snapshots.len() + 1);
        next.push(copy.clone());
        next.extend(self.snapshots.iter().cloned());

        self.persist(&next).await?;
        self.snapshots = next;

        info!(reference = %copy.quote.reference, "quotation duplicated");
        Ok(copy)
    }

    /// Renames one snapshot's reference in place. The new reference is
    /// trimmed, must be non-empty, and must not collide with any other
    /// snapshot's reference (case-insensitive).
    pub async fn rename(
        &mut self,
        id: &str,
        new_reference: &str,
    ) -> Result<(), HistoryError> {
        let trimmed = new_reference.trim();
        if trimmed.is_empty() {
            return Err(HistoryError::EmptyReference);
        }

        let lowered = trimmed.to_lowercase();
        if self
            .snapshots
            .iter()
            .any(|s| s.id != id && s.quote.reference.trim().to_lowercase() == lowered)
        {
            return Err(HistoryError::DuplicateReference(trimmed.to_string()));
        }

        let position = self
            .snapshots
            .iter()
            .position(|s| s.id == id)
            .ok_or(HistoryError::NotFound)?;

        let mut next = self.snapshots.clone();
        next[position].quote.reference = trimmed.to_string();

        self.persist(&next).await?;
        self.snapshots = next;

        info!(reference = %trimmed, "quotation renamed");
        Ok(())
    }

    /// Removes one snapshot; an absent identifier is a no-op.
    pub async fn delete(&mut self, id: &str) -> Result<(), HistoryError> {
        if !self.snapshots.iter().any(|s| s.id == id) {
            return Ok(());
        }

        let next: Vec<QuoteSnapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();

        self.persist(&next).await?;
        self.snapshots = next;

        info!(id, "quotation deleted from history");
        Ok(())
    }

    /// Empties the entire collection. Destructive and non-recoverable;
    /// callers must obtain explicit user confirmation first.
    pub async fn clear(&mut self) -> Result<(), HistoryError> {
        self.persist(&[]).await?;
        self.snapshots.clear();

        warn!("quotation history cleared");
        Ok(())
    }

    /// Subset of the history matching a text query and a date window.
    ///
    /// An empty query matches everything; otherwise the reference or the
    /// sponsor must contain it, case-insensitively. Date bounds compare
    /// against the snapshot's quote issue date; a snapshot without one
    /// never matches a present bound.
    pub fn filter(
        &self,
        query: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Vec<&QuoteSnapshot> {
        let needle = query.trim().to_lowercase();

        self.snapshots
            .iter()
            .filter(|s| {
                let text_match = needle.is_empty()
                    || s.quote.reference.to_lowercase().contains(&needle)
                    || s.quote.sponsor.to_lowercase().contains(&needle);

                let date = s.quote.issue_date;
                let from_match = date_from.is_none_or(|from| date.is_some_and(|d| d >= from));
                let to_match = date_to.is_none_or(|to| date.is_some_and(|d| d <= to));

                text_match && from_match && to_match
            })
            .collect()
    }

    /// Bundles the full history plus the in-progress quote for export.
    pub fn export_all(
        &self,
        quote: &Quote,
        lines: &[LineItem],
    ) -> BackupBundle {
        BackupBundle::new(
            self.snapshots.clone(),
            Some(LastSaved {
                quote: quote.clone(),
                lines: lines.to_vec(),
                saved_at: Utc::now(),
            }),
        )
    }

    /// Replaces the whole collection from a backup document — not a merge.
    /// Records missing identifiers or timestamps get fresh ones and every
    /// imported snapshot is normalized to carry at least one identified
    /// line. Returns the number of imported snapshots.
    pub async fn import_all(&mut self, raw: &str) -> Result<usize, HistoryError> {
        let bundle: BackupBundle =
            serde_json::from_str(raw).map_err(|e| HistoryError::CorruptData(e.to_string()))?;

        let Some(mut history) = bundle.history else {
            return Err(HistoryError::InvalidFormat(
                "missing history collection".to_string(),
            ));
        };

        for snapshot in &mut history {
            snapshot.normalize();
        }

        self.persist(&history).await?;
        self.snapshots = history;

        if let Some(last) = &bundle.last {
            self.write_last(last).await?;
        }

        info!(count = self.snapshots.len(), "history replaced from backup");
        Ok(self.snapshots.len())
    }

    /// Persists the last-saved record from the live quote and lines.
    pub async fn save_last(
        &self,
        quote: &Quote,
        lines: &[LineItem],
    ) -> Result<(), HistoryError> {
        self.write_last(&LastSaved {
            quote: quote.clone(),
            lines: lines.to_vec(),
            saved_at: Utc::now(),
        })
        .await
    }

    async fn write_last(&self, record: &LastSaved) -> Result<(), HistoryError> {
        let raw =
            serde_json::to_string(record).map_err(|e| StoreError::Database(e.to_string()))?;
        self.store.set(LAST_SAVED_KEY, &raw).await?;
        Ok(())
    }

    /// Loads the last-saved record. [`HistoryError::NotFound`] when nothing
    /// was ever saved, [`HistoryError::CorruptData`] when the stored value
    /// does not parse.
    pub async fn load_last(&self) -> Result<LastSaved, HistoryError> {
        let raw = self
            .store
            .get(LAST_SAVED_KEY)
            .await?
            .ok_or(HistoryError::NotFound)?;

        let mut record: LastSaved =
            serde_json::from_str(&raw).map_err(|e| HistoryError::CorruptData(e.to_string()))?;
        if record.lines.is_empty() {
            record.lines.push(LineItem::blank());
        }

        Ok(record)
    }
}
