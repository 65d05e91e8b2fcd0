//! Timing primitives for room actors: the one-shot deadline timer that
//! drives skip-on-timeout (and the replay-vote window), and the 1 Hz
//! cadence behind `timer-update` broadcasts.
//!
//! Both types are designed to sit inside a room actor's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = mailbox.recv() => { /* handle commands */ }
//!         fire = turn_timer.wait() => { /* skip the timed-out seat */ }
//!         _ = ticker.wait() => { /* broadcast remaining time */ }
//!     }
//! }
//! ```
//!
//! A disarmed timer (or stopped ticker) pends forever — `select!` simply
//! never takes that branch, so the actor needs no special casing.

use std::future::pending;
use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::trace;

// ---------------------------------------------------------------------------
// DeadlineTimer
// ---------------------------------------------------------------------------

/// A single-shot deadline carrying an arbitrary token.
///
/// The token is returned when the deadline fires and is how stale fires
/// are detected: the room arms the turn timer with `(seat, epoch)` and
/// ignores any fire whose epoch no longer matches the current turn.
/// Re-arming or cancelling simply replaces the pending deadline — the
/// old one can never fire.
#[derive(Debug)]
pub struct DeadlineTimer<T> {
    armed: Option<(T, Instant)>,
}

impl<T: Clone> DeadlineTimer<T> {
    /// A disarmed timer.
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// Arms (or re-arms) the timer to fire `after` from now.
    pub fn arm(&mut self, token: T, after: Duration) {
        self.armed = Some((token, Instant::now() + after));
    }

    /// Disarms the timer. A disarmed timer never fires.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Time left until the deadline. Zero when disarmed or already due.
    pub fn remaining(&self) -> Duration {
        match &self.armed {
            Some((_, deadline)) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }

    /// Waits for the deadline, then disarms and returns the token.
    /// Pends forever while disarmed.
    pub async fn wait(&mut self) -> T {
        let deadline = match &self.armed {
            Some((_, deadline)) => *deadline,
            None => {
                pending::<()>().await;
                unreachable!()
            }
        };
        time::sleep_until(deadline).await;
        let (token, _) = self.armed.take().expect("armed checked above");
        trace!("deadline fired");
        token
    }
}

impl<T: Clone> Default for DeadlineTimer<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// UpdateTicker
// ---------------------------------------------------------------------------

/// Maximum random delay added to a ticker's first tick.
///
/// Rooms created in the same instant would otherwise broadcast their
/// timer updates in lockstep; the jitter spreads that load out.
const INITIAL_JITTER_MS: u64 = 250;

/// A periodic cadence for broadcast work, typically 1 Hz.
///
/// Stopped by default; the room starts it when a match begins and stops
/// it on any terminal transition. Missed ticks are skipped, never
/// replayed: the next tick is always scheduled from *now*, so a stalled
/// actor cannot build up a burst of catch-up broadcasts.
#[derive(Debug)]
pub struct UpdateTicker {
    period: Duration,
    next: Option<Instant>,
}

impl UpdateTicker {
    /// A stopped ticker with the given period.
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Starts the cadence. The first tick lands one period from now,
    /// plus up to [`INITIAL_JITTER_MS`] of random jitter. Restarting a
    /// running ticker just reschedules it.
    pub fn start(&mut self) {
        let jitter = Duration::from_millis(rand::rng().random_range(0..=INITIAL_JITTER_MS));
        self.next = Some(Instant::now() + self.period + jitter);
    }

    /// Stops the cadence; `wait` pends until the next `start`.
    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Whether the cadence is running.
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Waits for the next tick. Pends forever while stopped.
    pub async fn wait(&mut self) {
        let next = match self.next {
            Some(next) => next,
            None => {
                pending::<()>().await;
                unreachable!()
            }
        };
        time::sleep_until(next).await;
        self.next = Some(Instant::now() + self.period);
    }
}
