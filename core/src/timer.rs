use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies one armed timer. Tokens are never reused, so a token held by the
/// host can only ever match the timer it was issued for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

impl TimerToken {
    fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// Asks the host to call back into the game with `token` after `delay_ms`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub delay_ms: u32,
}

/// A single pending timeout carrying a payload for when it fires.
#[derive(Clone, Debug)]
pub struct TimerSlot<T> {
    pending: Option<(TimerToken, T)>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> TimerSlot<T> {
    /// Arms the slot, invalidating whatever was pending before.
    pub fn arm(&mut self, payload: T, delay_ms: u32) -> TimerRequest {
        let token = TimerToken::next();
        if self.pending.replace((token, payload)).is_some() {
            log::trace!("timer re-armed before firing");
        }
        TimerRequest { token, delay_ms }
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the payload if `token` is the one currently armed; stale tokens yield `None`.
    pub fn fire(&mut self, token: TimerToken) -> Option<T> {
        match self.pending.take() {
            Some((armed, payload)) if armed == token => Some(payload),
            other => {
                self.pending = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_with_matching_token() {
        let mut slot = TimerSlot::default();
        let request = slot.arm((3, 4), 420);

        assert_eq!(request.delay_ms, 420);
        assert_eq!(slot.fire(request.token), Some((3, 4)));
        assert_eq!(slot.fire(request.token), None);
    }

    #[test]
    fn cancelled_token_is_ignored() {
        let mut slot = TimerSlot::default();
        let request = slot.arm("payload", 10);

        assert!(slot.cancel());
        assert_eq!(slot.fire(request.token), None);
    }

    #[test]
    fn rearming_invalidates_previous_token() {
        let mut slot = TimerSlot::default();
        let first = slot.arm(1, 10);
        let second = slot.arm(2, 10);

        assert_ne!(first.token, second.token);
        assert_eq!(slot.fire(first.token), None);
        assert!(slot.is_armed());
        assert_eq!(slot.fire(second.token), Some(2));
    }

    #[test]
    fn tokens_are_unique_across_slots() {
        let mut a = TimerSlot::default();
        let mut b = TimerSlot::default();
        let token = a.arm((), 1).token;
        b.arm((), 1);

        assert_eq!(b.fire(token), None);
    }
}
