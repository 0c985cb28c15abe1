//! Toast notifications.
//!
//! Every toast owns its own deadline; there is no shared timer. Frontends call
//! [`NotificationCenter::prune`] on their tick to drop expired ones.

use std::time::{Duration, Instant};

/// Lifetime used by the convenience constructors.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "info-circle",
            Self::Success => "check-circle",
            Self::Warning => "exclamation-triangle",
            Self::Error => "exclamation-circle",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Handle returned by [`NotificationCenter::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    /// `None` = stays until dismissed.
    pub expires_at: Option<Instant>,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast. A zero `duration` keeps it until [`dismiss`](Self::dismiss).
    pub fn show(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> NotificationId {
        self.show_at(Instant::now(), message, kind, duration)
    }

    pub fn show_at(
        &mut self,
        now: Instant,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        let message = message.into();
        log::debug!("notification #{} [{}] {}", id.0, kind.label(), message);
        self.active.push(Notification {
            id,
            message,
            kind,
            expires_at: (!duration.is_zero()).then(|| now + duration),
        });
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Info, DEFAULT_DURATION)
    }

    pub fn success(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Success, DEFAULT_DURATION)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Warning, DEFAULT_DURATION)
    }

    pub fn error(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Error, DEFAULT_DURATION)
    }

    /// Close one toast. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Close the most recent toast, if any.
    pub fn dismiss_latest(&mut self) -> bool {
        self.active.pop().is_some()
    }

    /// Drop every toast whose deadline has passed.
    pub fn prune(&mut self, now: Instant) {
        self.active.retain(|n| !n.is_expired(now));
    }

    /// Visible toasts, oldest first.
    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_independently() {
        let mut center = NotificationCenter::new();
        let t0 = Instant::now();
        let short = center.show_at(t0, "short", NotificationKind::Info, Duration::from_millis(100));
        let long = center.show_at(t0, "long", NotificationKind::Error, Duration::from_millis(500));

        center.prune(t0 + Duration::from_millis(99));
        assert_eq!(center.active().len(), 2);

        center.prune(t0 + Duration::from_millis(100));
        let ids: Vec<_> = center.active().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![long]);
        assert!(!center.dismiss(short));
    }

    #[test]
    fn zero_duration_persists_until_dismissed() {
        let mut center = NotificationCenter::new();
        let t0 = Instant::now();
        let sticky = center.show_at(t0, "sticky", NotificationKind::Warning, Duration::ZERO);

        center.prune(t0 + Duration::from_secs(3600));
        assert_eq!(center.active().len(), 1);

        assert!(center.dismiss(sticky));
        assert!(center.is_empty());
    }

    #[test]
    fn dismiss_leaves_others_alone() {
        let mut center = NotificationCenter::new();
        let a = center.info("a");
        let b = center.success("b");
        let c = center.error("c");
        assert!(center.dismiss(b));
        let ids: Vec<_> = center.active().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn default_duration_is_four_seconds() {
        let mut center = NotificationCenter::new();
        let before = Instant::now();
        center.warning("heads up");
        let deadline = center.active()[0].expires_at.unwrap();
        assert!(deadline >= before + DEFAULT_DURATION);
    }

    #[test]
    fn kinds_have_icons() {
        assert_eq!(NotificationKind::Success.icon(), "check-circle");
        assert_eq!(NotificationKind::Error.icon(), "exclamation-circle");
        assert_eq!(NotificationKind::Warning.icon(), "exclamation-triangle");
        assert_eq!(NotificationKind::Info.icon(), "info-circle");
    }
}
