//! The live editing session for one quotation.
//!
//! Exactly one quote header and one ordered line list are live at a time;
//! totals are recomputed from them on demand and never stored. Persistence
//! goes through the history store, and every failure is converted into an
//! auto-dismissing notice at the action that triggered it — nothing
//! escapes the session.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use quote_core::calculations::{self, DerivedTotals};
use quote_core::history::{BackupBundle, HistoryError, HistoryStore};
use quote_core::models::{LineItem, Quote, QuoteSnapshot};
use quote_core::reference;

use crate::notice::{NoticeCenter, NoticeLevel};

/// Whether the user is editing the form or viewing the printable preview.
/// The only transitions are the explicit ones between the two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Editing,
    Previewing,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Saving requires a sponsor name.
    #[error("sponsor name is required before saving")]
    MissingSponsor,

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Owns the live quote, its line items, the dirty flag and the
/// edit/preview state machine.
pub struct QuoteSession {
    history: HistoryStore,
    quote: Quote,
    lines: Vec<LineItem>,
    dirty: bool,
    mode: DisplayMode,
    notices: NoticeCenter,
}

impl QuoteSession {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            history,
            quote: Quote::default(),
            lines: vec![LineItem::blank()],
            dirty: false,
            mode: DisplayMode::Editing,
            notices: NoticeCenter::default(),
        }
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn notices_mut(&mut self) -> &mut NoticeCenter {
        &mut self.notices
    }

    /// Derived totals for the live quote, recomputed on every call.
    pub fn totals(&self) -> DerivedTotals {
        calculations::compute(&self.quote, &self.lines)
    }

    fn report(&mut self, error: HistoryError) -> SessionError {
        self.notices.show(NoticeLevel::Error, error.to_string());
        SessionError::History(error)
    }

    // ── editing ──────────────────────────────────────────────────────────

    /// Resets the header to defaults and the lines to a single blank row.
    /// The displayed reference number is deliberately kept; a fresh one is
    /// only ever minted on save.
    pub fn new_quote(&mut self) {
        let reference = std::mem::take(&mut self.quote.reference);
        self.quote = Quote {
            reference,
            ..Quote::default()
        };
        self.lines = vec![LineItem::blank()];
        self.dirty = false;
    }

    pub fn add_line(&mut self) {
        self.lines.push(LineItem::blank());
        self.dirty = true;
    }

    /// Removes a line unless it is the last remaining one. Returns `false`
    /// (leaving state untouched) when the line is absent or the quote
    /// would end up empty.
    pub fn remove_line(&mut self, id: &str) -> bool {
        if self.lines.len() <= 1 {
            return false;
        }
        let Some(position) = self.lines.iter().position(|l| l.id == id) else {
            return false;
        };
        self.lines.remove(position);
        self.dirty = true;
        true
    }

    pub fn update_header(&mut self, edit: impl FnOnce(&mut Quote)) {
        edit(&mut self.quote);
        self.dirty = true;
    }

    /// Edits one line in place; `false` when the id is unknown.
    pub fn update_line(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut LineItem),
    ) -> bool {
        match self.lines.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                edit(line);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole live state, e.g. from a quote document on disk.
    pub fn replace_live(
        &mut self,
        quote: Quote,
        mut lines: Vec<LineItem>,
    ) {
        if lines.is_empty() {
            lines.push(LineItem::blank());
        }
        self.quote = quote;
        self.lines = lines;
        self.dirty = true;
    }

    // ── persistence actions ──────────────────────────────────────────────

    /// Validates, mints the next reference for `today`, snapshots to
    /// history, rewrites the last-saved record, and adopts the minted
    /// reference. Returns the minted reference.
    pub async fn save(&mut self, today: NaiveDate) -> Result<String, SessionError> {
        if self.quote.sponsor.trim().is_empty() {
            self.notices
                .show(NoticeLevel::Error, "Sponsor name is required before saving.");
            return Err(SessionError::MissingSponsor);
        }

        let suffix = reference::year_suffix(today);
        let minted = reference::next_reference(
            self.history.references(),
            Some(&self.quote.reference),
            &suffix,
        );

        let mut quote = self.quote.clone();
        quote.reference = minted.clone();
        let totals = calculations::compute(&quote, &self.lines);

        if let Err(error) = self.history.save(&quote, &self.lines, &totals).await {
            return Err(self.report(error));
        }
        if let Err(error) = self.history.save_last(&quote, &self.lines).await {
            return Err(self.report(error));
        }

        self.quote = quote;
        self.dirty = false;
        self.notices
            .show(NoticeLevel::Success, format!("Saved {minted}."));
        info!(reference = %minted, "quotation saved");
        Ok(minted)
    }

    /// Replaces the live state from the persisted last-saved record.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        match self.history.load_last().await {
            Ok(record) => {
                self.quote = record.quote;
                self.lines = record.lines;
                self.dirty = false;
                self.notices
                    .show(NoticeLevel::Info, "Loaded last saved quotation.");
                Ok(())
            }
            Err(error) => Err(self.report(error)),
        }
    }

    /// Replaces the live state from one history snapshot; the history
    /// itself is untouched.
    pub fn open_from_history(&mut self, id: &str) -> Result<(), SessionError> {
        let Some(snapshot) = self.history.get(id).cloned() else {
            return Err(self.report(HistoryError::NotFound));
        };

        let QuoteSnapshot { quote, lines, .. } = snapshot;
        self.replace_live(quote, lines);
        self.dirty = false;
        self.notices.show(
            NoticeLevel::Info,
            format!("Opened {}.", self.quote.reference),
        );
        Ok(())
    }

    // ── history actions ──────────────────────────────────────────────────

    pub async fn duplicate_snapshot(
        &mut self,
        id: &str,
        today: NaiveDate,
    ) -> Result<QuoteSnapshot, SessionError> {
        let suffix = reference::year_suffix(today);
        match self.history.duplicate(id, &suffix).await {
            Ok(copy) => {
                self.notices.show(
                    NoticeLevel::Success,
                    format!("Duplicated as {}.", copy.quote.reference),
                );
                Ok(copy)
            }
            Err(error) => Err(self.report(error)),
        }
    }

    pub async fn rename_snapshot(
        &mut self,
        id: &str,
        new_reference: &str,
    ) -> Result<(), SessionError> {
        match self.history.rename(id, new_reference).await {
            Ok(()) => {
                self.notices
                    .show(NoticeLevel::Success, "Reference updated.");
                Ok(())
            }
            Err(error) => Err(self.report(error)),
        }
    }

    pub async fn delete_snapshot(&mut self, id: &str) -> Result<(), SessionError> {
        match self.history.delete(id).await {
            Ok(()) => {
                self.notices.show(NoticeLevel::Info, "Quotation deleted.");
                Ok(())
            }
            Err(error) => Err(self.report(error)),
        }
    }

    /// Destructive; the caller must have obtained explicit confirmation.
    pub async fn clear_history(&mut self) -> Result<(), SessionError> {
        match self.history.clear().await {
            Ok(()) => {
                self.notices
                    .show(NoticeLevel::Info, "History cleared.");
                Ok(())
            }
            Err(error) => Err(self.report(error)),
        }
    }

    // ── export / import ──────────────────────────────────────────────────

    /// The full history plus the live quote, ready to serialize.
    pub fn export_bundle(&self) -> BackupBundle {
        self.history.export_all(&self.quote, &self.lines)
    }

    /// Replaces the history wholesale from a backup document.
    pub async fn import_bundle(&mut self, raw: &str) -> Result<usize, SessionError> {
        match self.history.import_all(raw).await {
            Ok(count) => {
                self.notices
                    .show(NoticeLevel::Success, format!("Imported {count} quotation(s)."));
                Ok(count)
            }
            Err(error) => Err(self.report(error)),
        }
    }

    // ── display mode ─────────────────────────────────────────────────────

    /// `editing → previewing` on an explicit request; a no-op otherwise.
    pub fn enter_preview(&mut self) -> bool {
        if self.mode == DisplayMode::Editing {
            self.mode = DisplayMode::Previewing;
            true
        } else {
            false
        }
    }

    /// `previewing → editing` on an explicit request; a no-op otherwise.
    pub fn back_to_edit(&mut self) -> bool {
        if self.mode == DisplayMode::Previewing {
            self.mode = DisplayMode::Editing;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use quote_core::db::MemoryStore;
    use quote_core::models::Country;

    use super::*;

    async fn session() -> QuoteSession {
        let history = HistoryStore::open(Box::new(MemoryStore::new()))
            .await
            .unwrap();
        QuoteSession::new(history)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn fill_quebec_quote(session: &mut QuoteSession) {
        session.update_header(|q| {
            q.sponsor = "Acme Research".to_string();
            q.country = Country::Canada;
            q.province = "QC".to_string();
            q.discount_percent = dec!(10);
        });
        let id = session.lines()[0].id.clone();
        session.update_line(&id, |l| {
            l.type_of_test = "PCR panel".to_string();
            l.unit_price = dec!(100);
            l.samples = dec!(3);
        });
    }

    // =========================================================================
    // line management tests
    // =========================================================================

    #[tokio::test]
    async fn a_new_session_has_one_blank_line() {
        let session = session().await;

        assert_eq!(session.lines().len(), 1);
        assert!(!session.dirty());
    }

    #[tokio::test]
    async fn removing_the_last_line_is_a_noop() {
        let mut session = session().await;
        let id = session.lines()[0].id.clone();

        assert!(!session.remove_line(&id));
        assert_eq!(session.lines().len(), 1);
        assert!(!session.dirty(), "a refused removal is not an edit");
    }

    #[tokio::test]
    async fn lines_can_be_added_and_removed_down_to_one() {
        let mut session = session().await;
        session.add_line();
        session.add_line();
        assert_eq!(session.lines().len(), 3);

        let second = session.lines()[1].id.clone();
        assert!(session.remove_line(&second));
        assert_eq!(session.lines().len(), 2);

        let ids: Vec<String> = session.lines().iter().map(|l| l.id.clone()).collect();
        for id in &ids {
            session.remove_line(id);
        }
        assert_eq!(session.lines().len(), 1, "never below one line");
    }

    #[tokio::test]
    async fn removing_an_unknown_line_is_a_noop() {
        let mut session = session().await;
        session.add_line();

        assert!(!session.remove_line("unknown"));
        assert_eq!(session.lines().len(), 2);
    }

    // =========================================================================
    // dirty flag tests
    // =========================================================================

    #[tokio::test]
    async fn edits_set_the_dirty_flag() {
        let mut session = session().await;

        session.update_header(|q| q.sponsor = "Acme".to_string());

        assert!(session.dirty());
    }

    #[tokio::test]
    async fn save_clears_the_dirty_flag() {
        let mut session = session().await;
        fill_quebec_quote(&mut session);
        assert!(session.dirty());

        session.save(today()).await.unwrap();

        assert!(!session.dirty());
    }

    #[tokio::test]
    async fn new_quote_clears_the_dirty_flag() {
        let mut session = session().await;
        session.update_header(|q| q.sponsor = "Acme".to_string());

        session.new_quote();

        assert!(!session.dirty());
    }

    // =========================================================================
    // new_quote tests
    // =========================================================================

    #[tokio::test]
    async fn new_quote_keeps_the_displayed_reference() {
        let mut session = session().await;
        fill_quebec_quote(&mut session);
        let minted = session.save(today()).await.unwrap();

        session.new_quote();

        assert_eq!(session.quote().reference, minted);
        assert_eq!(session.quote().sponsor, "");
        assert_eq!(session.lines().len(), 1);
        assert_eq!(session.lines()[0].unit_price, dec!(0));
    }

    // =========================================================================
    // save tests
    // =========================================================================

    #[tokio::test]
    async fn save_without_sponsor_fails_with_a_notice_and_no_state_change() {
        let mut session = session().await;

        let result = session.save(today()).await;

        assert!(matches!(result, Err(SessionError::MissingSponsor)));
        assert!(session.history().list().is_empty());
        let notice = session.notices_mut().active(Instant::now()).unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn save_mints_sequential_references() {
        let mut session = session().await;
        fill_quebec_quote(&mut session);

        let first = session.save(today()).await.unwrap();
        let second = session.save(today()).await.unwrap();

        assert_eq!(first, "Quote 0001-26");
        assert_eq!(second, "Quote 0002-26");
        assert_eq!(session.quote().reference, "Quote 0002-26");
        assert_eq!(session.history().list().len(), 2);
    }

    #[tokio::test]
    async fn save_snapshots_carry_the_cached_totals() {
        let mut session = session().await;
        fill_quebec_quote(&mut session);

        session.save(today()).await.unwrap();

        let snapshot = &session.history().list()[0];
        assert_eq!(snapshot.subtotal, dec!(300));
        assert_eq!(snapshot.taxes, dec!(40.4325));
        assert_eq!(snapshot.total, dec!(310.4325));
    }

    // =========================================================================
    // load / open tests
    // =========================================================================

    #[tokio::test]
    async fn load_without_a_prior_save_reports_not_found() {
        let mut session = session().await;

        let result = session.load().await;

        assert!(matches!(
            result,
            Err(SessionError::History(HistoryError::NotFound))
        ));
    }

    #[tokio::test]
    async fn load_restores_the_last_saved_state() {
        let mut session = session().await;
        fill_quebec_quote(&mut session);
        let minted = session.save(today()).await.unwrap();

        session.new_quote();
        assert_eq!(session.quote().sponsor, "");

        session.load().await.unwrap();

        assert_eq!(session.quote().sponsor, "Acme Research");
        assert_eq!(session.quote().reference, minted);
        assert!(!session.dirty());
    }

    #[tokio::test]
    async fn open_from_history_replaces_live_state_without_touching_history() {
        let mut session = session().await;
        fill_quebec_quote(&mut session);
        session.save(today()).await.unwrap();
        let snapshot_id = session.history().list()[0].id.clone();

        session.new_quote();
        session.open_from_history(&snapshot_id).unwrap();

        assert_eq!(session.quote().sponsor, "Acme Research");
        assert_eq!(session.history().list().len(), 1);
        assert!(!session.dirty());
    }

    #[tokio::test]
    async fn open_from_history_with_unknown_id_reports_not_found() {
        let mut session = session().await;

        let result = session.open_from_history("nope");

        assert!(matches!(
            result,
            Err(SessionError::History(HistoryError::NotFound))
        ));
    }

    // =========================================================================
    // display mode tests
    // =========================================================================

    #[tokio::test]
    async fn display_mode_walks_the_two_state_machine() {
        let mut session = session().await;
        assert_eq!(session.mode(), DisplayMode::Editing);

        assert!(session.enter_preview());
        assert_eq!(session.mode(), DisplayMode::Previewing);

        assert!(!session.enter_preview(), "already previewing");

        assert!(session.back_to_edit());
        assert_eq!(session.mode(), DisplayMode::Editing);

        assert!(!session.back_to_edit(), "already editing");
    }

    // =========================================================================
    // totals recomputation tests
    // =========================================================================

    #[tokio::test]
    async fn totals_follow_every_edit() {
        let mut session = session().await;
        fill_quebec_quote(&mut session);
        assert_eq!(session.totals().subtotal, dec!(300));

        let id = session.lines()[0].id.clone();
        session.update_line(&id, |l| l.samples = dec!(4));

        assert_eq!(session.totals().subtotal, dec!(400));
    }
}
