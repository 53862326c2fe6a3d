use std::time::{Duration, Instant};

use crate::config::{REFRESH_COOLDOWN, TURBO_COOLDOWN, TURBO_THRESHOLD};

/// Outcome of asking a gate for permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshGate {
    Allowed,
    /// Refused; the remaining wait before the gate opens again.
    CoolingDown(Duration),
}

impl RefreshGate {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, RefreshGate::Allowed)
    }
}

/// One wall-clock cooldown timer. Unarmed until first use.
#[derive(Debug, Clone)]
struct Cooldown {
    window: Duration,
    armed_at: Option<Instant>,
}

impl Cooldown {
    fn new(window: Duration) -> Self {
        Self {
            window,
            armed_at: None,
        }
    }

    fn ready(&self) -> bool {
        match self.armed_at {
            Some(at) => at.elapsed() > self.window,
            None => true,
        }
    }

    fn remaining(&self) -> Duration {
        match self.armed_at {
            Some(at) => self.window.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        }
    }

    fn arm(&mut self) {
        self.armed_at = Some(Instant::now());
    }
}

/// Gates how often the upstream API may be hit with fresh (non-append)
/// fetches and with bulk turbo loads.
///
/// Two independent timers, both wall-clock based and untied to request
/// completion: the refresh timer arms the moment a refresh is allowed; the
/// turbo timer arms only after a turbo load finishes with the total loaded
/// coin count at or past the threshold — below it, turbo stays free so a
/// small local universe can still be grown quickly.
pub struct RefreshCoordinator {
    refresh: Cooldown,
    turbo: Cooldown,
    turbo_threshold: usize,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::with_config(REFRESH_COOLDOWN, TURBO_COOLDOWN, TURBO_THRESHOLD)
    }

    /// Build with explicit windows and threshold (tests, alternate tiers).
    pub fn with_config(
        refresh_cooldown: Duration,
        turbo_cooldown: Duration,
        turbo_threshold: usize,
    ) -> Self {
        Self {
            refresh: Cooldown::new(refresh_cooldown),
            turbo: Cooldown::new(turbo_cooldown),
            turbo_threshold,
        }
    }

    /// Would a refresh be allowed right now?
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh.ready()
    }

    /// Gate a non-append refresh. On `Allowed` the timer is armed and the
    /// caller must proceed with the fetch; on `CoolingDown` nothing changed.
    pub fn try_refresh(&mut self) -> RefreshGate {
        if !self.refresh.ready() {
            return RefreshGate::CoolingDown(self.refresh.remaining());
        }
        self.refresh.arm();
        RefreshGate::Allowed
    }

    /// Would a turbo load be allowed right now?
    #[must_use]
    pub fn can_turbo(&self) -> bool {
        self.turbo.ready()
    }

    /// Gate a turbo load. Does not arm the timer — arming is decided by
    /// `complete_turbo` once the post-load total is known.
    #[must_use]
    pub fn try_turbo(&self) -> RefreshGate {
        if !self.turbo.ready() {
            return RefreshGate::CoolingDown(self.turbo.remaining());
        }
        RefreshGate::Allowed
    }

    /// Record a finished turbo load. Arms the turbo timer once the locally
    /// loaded universe has crossed the threshold.
    pub fn complete_turbo(&mut self, total_loaded: usize) {
        if total_loaded >= self.turbo_threshold {
            self.turbo.arm();
        }
    }

    /// Remaining wait before the next refresh is allowed.
    #[must_use]
    pub fn refresh_remaining(&self) -> Duration {
        self.refresh.remaining()
    }

    /// Remaining wait before the next turbo load is allowed.
    #[must_use]
    pub fn turbo_remaining(&self) -> Duration {
        self.turbo.remaining()
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
