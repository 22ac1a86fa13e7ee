//! Failover gate guarding the primary history provider.
//!
//! A single primary fetch failure opens the gate; while open, every history
//! request goes straight to the secondary provider. The gate closes again
//! once the cooldown window elapses: there is no half-open probing, the
//! first request after the window simply tries the primary again.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Gate state: `Closed` routes to the primary provider, `Open` bypasses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Closed,
    Open,
}

#[derive(Debug)]
struct GateInner {
    state: GateState,
    opened_at: Option<Instant>,
}

/// Thread-safe two-state failover gate.
#[derive(Debug)]
pub struct FailoverGate {
    cooldown: Duration,
    inner: Mutex<GateInner>,
}

impl FailoverGate {
    /// Default cooldown after a primary failure: one hour.
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60 * 60);

    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            inner: Mutex::new(GateInner {
                state: GateState::Closed,
                opened_at: None,
            }),
        }
    }

    /// Whether the next history request may use the primary provider.
    /// An open gate whose cooldown has elapsed closes here.
    pub fn allow_primary(&self) -> bool {
        let mut inner = self.inner.lock().expect("failover gate lock is not poisoned");
        match inner.state {
            GateState::Closed => true,
            GateState::Open => {
                let lapsed = inner
                    .opened_at
                    .map(|opened_at| opened_at.elapsed() >= self.cooldown)
                    .unwrap_or(true);

                if lapsed {
                    inner.state = GateState::Closed;
                    inner.opened_at = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a primary fetch failure, opening (or re-arming) the gate.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().expect("failover gate lock is not poisoned");
        inner.state = GateState::Open;
        inner.opened_at = Some(Instant::now());
    }

    pub fn state(&self) -> GateState {
        let inner = self.inner.lock().expect("failover gate lock is not poisoned");
        inner.state
    }
}

impl Default for FailoverGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let gate = FailoverGate::default();
        assert_eq!(gate.state(), GateState::Closed);
        assert!(gate.allow_primary());
    }

    #[test]
    fn single_failure_opens_the_gate() {
        let gate = FailoverGate::new(Duration::from_secs(60));
        gate.record_failure();
        assert_eq!(gate.state(), GateState::Open);
        assert!(!gate.allow_primary());
    }

    #[test]
    fn gate_lapses_after_cooldown() {
        let gate = FailoverGate::new(Duration::from_millis(1));
        gate.record_failure();
        assert!(!matches!(gate.state(), GateState::Closed));

        std::thread::sleep(Duration::from_millis(2));
        assert!(gate.allow_primary());
        assert_eq!(gate.state(), GateState::Closed);
    }

    #[test]
    fn failure_while_open_rearms_the_window() {
        let gate = FailoverGate::new(Duration::from_secs(60));
        gate.record_failure();
        gate.record_failure();
        assert!(!gate.allow_primary());
    }
}
