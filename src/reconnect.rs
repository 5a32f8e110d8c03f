//! Connection bookkeeping: handle ids, the attempt cooldown and retry backoff.
//!
//! Nothing here touches the network. The viewer component asks
//! [`ConnectionTracker::should_attempt`] whenever it re-evaluates, and arms a
//! timer for [`ConnectionTracker::retry_in`] so a disconnected viewer always
//! gets another evaluation once the cooldown expires.

use serde::Deserialize;

use crate::error::{Result, ViewerError};

/// Longest delay a browser timer accepts; larger values wrap to zero.
pub const MAX_TIMER_MS: u32 = i32::MAX as u32;

/// Timing of reconnect attempts.
///
/// The wait after an attempt is `min_interval_ms * multiplier^failures`,
/// capped at `max_interval_ms`, where `failures` counts consecutive attempts
/// that closed without ever opening.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconnectPolicy {
    pub min_interval_ms: u32,
    pub max_interval_ms: u32,
    pub multiplier: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            min_interval_ms: 1_000,
            max_interval_ms: 30_000,
            multiplier: 2.0,
        }
    }
}

impl ReconnectPolicy {
    /// A fixed cooldown with no backoff.
    pub fn fixed(interval_ms: u32) -> Self {
        Self {
            min_interval_ms: interval_ms,
            max_interval_ms: interval_ms,
            multiplier: 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_interval_ms == 0 {
            return Err(ViewerError::Policy(
                "minIntervalMs must be greater than zero".into(),
            ));
        }
        if self.max_interval_ms < self.min_interval_ms {
            return Err(ViewerError::Policy(format!(
                "maxIntervalMs ({}) is below minIntervalMs ({})",
                self.max_interval_ms, self.min_interval_ms
            )));
        }
        if self.max_interval_ms > MAX_TIMER_MS {
            return Err(ViewerError::Policy(format!(
                "maxIntervalMs ({}) exceeds the timer limit of {MAX_TIMER_MS}",
                self.max_interval_ms
            )));
        }
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err(ViewerError::Policy(format!(
                "multiplier must be at least 1.0, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }

    /// Cooldown in milliseconds after `failures` consecutive failed attempts.
    pub fn cooldown_ms(&self, failures: u32) -> f64 {
        let min = f64::from(self.min_interval_ms);
        let max = f64::from(self.max_interval_ms);
        let exponent = i32::try_from(failures).unwrap_or(i32::MAX);
        (min * self.multiplier.powi(exponent)).min(max)
    }
}

/// Timer delay for a retry `wait_ms` away: rounded up, one tick past the
/// strict cooldown boundary, and never above [`MAX_TIMER_MS`].
pub fn timer_delay_ms(wait_ms: f64) -> u32 {
    let wait = wait_ms.ceil().clamp(0.0, f64::from(MAX_TIMER_MS)) as u32;
    wait.saturating_add(1).min(MAX_TIMER_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Identifies one connection attempt. Events carrying a stale id are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionTracker {
    state: ConnectionState,
    handle: Option<ConnectionId>,
    opened: bool,
    last_attempt_ms: Option<f64>,
    failures: u32,
    next_id: u64,
}

impl ConnectionTracker {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn handle(&self) -> Option<ConnectionId> {
        self.handle
    }

    pub fn last_attempt_ms(&self) -> Option<f64> {
        self.last_attempt_ms
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Id the next attempt will be registered under.
    pub fn next_id(&self) -> ConnectionId {
        ConnectionId(self.next_id)
    }

    pub fn is_current(&self, id: ConnectionId) -> bool {
        self.handle == Some(id)
    }

    /// True when no connection exists and the cooldown since the previous
    /// attempt has elapsed, or no attempt was ever made.
    pub fn should_attempt(&self, now_ms: f64, policy: &ReconnectPolicy) -> bool {
        if self.handle.is_some() {
            return false;
        }
        match self.last_attempt_ms {
            None => true,
            Some(last) => now_ms > last + policy.cooldown_ms(self.failures),
        }
    }

    /// Milliseconds until an attempt becomes eligible. `None` while a
    /// connection exists.
    pub fn retry_in(&self, now_ms: f64, policy: &ReconnectPolicy) -> Option<f64> {
        if self.handle.is_some() {
            return None;
        }
        let wait = match self.last_attempt_ms {
            None => 0.0,
            Some(last) => last + policy.cooldown_ms(self.failures) - now_ms,
        };
        Some(wait.max(0.0))
    }

    /// Registers an attempt whose socket was created as `id`.
    pub fn begin(&mut self, id: ConnectionId, now_ms: f64) {
        self.handle = Some(id);
        self.opened = false;
        self.last_attempt_ms = Some(now_ms);
        self.next_id = self.next_id.max(id.0 + 1);
    }

    /// Registers an attempt that failed before a socket existed.
    pub fn fail(&mut self, now_ms: f64) {
        self.last_attempt_ms = Some(now_ms);
        self.failures = self.failures.saturating_add(1);
    }

    /// Returns false if `id` is not the current connection.
    pub fn opened(&mut self, id: ConnectionId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.state = ConnectionState::Connected;
        self.opened = true;
        self.failures = 0;
        true
    }

    /// Returns false if `id` is not the current connection.
    pub fn closed(&mut self, id: ConnectionId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        if !self.opened {
            self.failures = self.failures.saturating_add(1);
        }
        self.state = ConnectionState::Disconnected;
        self.handle = None;
        self.opened = false;
        true
    }
}
