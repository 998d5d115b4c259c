//! Transient user notices.
//!
//! One notice is visible at a time. Showing a new notice replaces the
//! current one and restarts the dismissal clock; an expired notice
//! disappears on the next poll. The dismissal deadline lives here, owned
//! by the session, rather than in some shared timer.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Owner of the single notice slot and its dismissal deadline.
#[derive(Debug)]
pub struct NoticeCenter {
    current: Option<(Notice, Instant)>,
    ttl: Duration,
}

impl Default for NoticeCenter {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl NoticeCenter {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    /// Shows a notice, replacing (and thereby cancelling the timer of) any
    /// currently visible one.
    pub fn show(
        &mut self,
        level: NoticeLevel,
        message: impl Into<String>,
    ) {
        self.show_at(level, message, Instant::now());
    }

    fn show_at(
        &mut self,
        level: NoticeLevel,
        message: impl Into<String>,
        now: Instant,
    ) {
        self.current = Some((
            Notice {
                level,
                message: message.into(),
            },
            now + self.ttl,
        ));
    }

    /// The visible notice, if its deadline has not passed. Expired notices
    /// are dropped on the way through.
    pub fn active(&mut self, now: Instant) -> Option<&Notice> {
        if let Some((_, deadline)) = &self.current {
            if *deadline <= now {
                self.current = None;
            }
        }
        self.current.as_ref().map(|(notice, _)| notice)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn notice_is_visible_before_its_deadline() {
        let mut notices = NoticeCenter::new(Duration::from_secs(4));
        let start = Instant::now();

        notices.show_at(NoticeLevel::Info, "saved", start);

        let visible = notices.active(start + Duration::from_secs(3)).unwrap();
        assert_eq!(visible.message, "saved");
        assert_eq!(visible.level, NoticeLevel::Info);
    }

    #[test]
    fn notice_expires_at_its_deadline() {
        let mut notices = NoticeCenter::new(Duration::from_secs(4));
        let start = Instant::now();

        notices.show_at(NoticeLevel::Info, "saved", start);

        assert_eq!(notices.active(start + Duration::from_secs(4)), None);
        assert_eq!(
            notices.active(start),
            None,
            "expiry drops the notice for good"
        );
    }

    #[test]
    fn showing_a_new_notice_replaces_and_reschedules() {
        let mut notices = NoticeCenter::new(Duration::from_secs(4));
        let start = Instant::now();

        notices.show_at(NoticeLevel::Info, "first", start);
        notices.show_at(NoticeLevel::Error, "second", start + Duration::from_secs(3));

        // The first notice's deadline has passed but the second is live.
        let visible = notices.active(start + Duration::from_secs(5)).unwrap();
        assert_eq!(visible.message, "second");
        assert_eq!(visible.level, NoticeLevel::Error);
    }

    #[test]
    fn dismiss_clears_immediately() {
        let mut notices = NoticeCenter::new(Duration::from_secs(4));
        let start = Instant::now();

        notices.show_at(NoticeLevel::Success, "done", start);
        notices.dismiss();

        assert_eq!(notices.active(start), None);
    }
}
