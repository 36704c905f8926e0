use std::any::Any;

use chrono::{DateTime, TimeDelta, Utc};
use roster_states::{State, state_assign_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Message raised by a completed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    /// Visible for `duration` after it was raised, whatever happens meanwhile.
    pub fn is_visible(&self, now: DateTime<Utc>, duration: TimeDelta) -> bool {
        now.signed_duration_since(self.raised_at) < duration
    }
}

/// The single notification slot. A newer notification replaces the current
/// one and starts its own timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastState {
    current: Option<Notification>,
}

impl ToastState {
    pub fn raise(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) {
        self.current = Some(Notification {
            message: message.into(),
            severity,
            raised_at: now,
        });
    }

    pub fn success(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.raise(message, Severity::Success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.raise(message, Severity::Error, now);
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn visible(&self, now: DateTime<Utc>, duration: TimeDelta) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|notification| notification.is_visible(now, duration))
    }

    /// Whether `expire` would drop the current notification.
    pub fn is_expired(&self, now: DateTime<Utc>, duration: TimeDelta) -> bool {
        self.current.is_some() && self.visible(now, duration).is_none()
    }

    pub fn expire(&mut self, now: DateTime<Utc>, duration: TimeDelta) {
        if self.is_expired(now, duration) {
            self.current = None;
        }
    }
}

impl State for ToastState {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + TimeDelta::milliseconds(ms)
    }

    #[test]
    fn visibility_ends_after_duration() {
        let duration = TimeDelta::milliseconds(2500);
        let mut toast = ToastState::default();
        toast.success("User added", at_ms(0));

        assert!(toast.visible(at_ms(0), duration).is_some());
        assert!(toast.visible(at_ms(2499), duration).is_some());
        assert!(toast.visible(at_ms(2500), duration).is_none());
        assert!(toast.is_expired(at_ms(2500), duration));

        toast.expire(at_ms(2500), duration);
        assert!(toast.current().is_none());
    }

    #[test]
    fn newer_notification_restarts_timer() {
        let duration = TimeDelta::milliseconds(2500);
        let mut toast = ToastState::default();
        toast.success("User added", at_ms(0));
        toast.error("Failed to delete user", at_ms(2000));

        let visible = toast.visible(at_ms(4000), duration).unwrap();
        assert_eq!(visible.severity, Severity::Error);
        assert_eq!(visible.message, "Failed to delete user");
    }

    #[test]
    fn expire_keeps_visible_notification() {
        let duration = TimeDelta::milliseconds(2500);
        let mut toast = ToastState::default();
        toast.success("User deleted", at_ms(0));

        toast.expire(at_ms(1000), duration);
        assert!(toast.current().is_some());
    }
}
