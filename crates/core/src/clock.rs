// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! The Phaser and lifecycle timestamps all go through a [`Clock`] rather than
//! calling `Utc::now()` directly, so coordination-phase tests can advance
//! time deterministically instead of sleeping.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// A clock that provides the current time.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Utc::now())),
        }
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(instant)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        *self.current.lock() += duration;
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

/// A `Clock` behind an `Arc<dyn ...>`-free boxed trait object, for call sites
/// that need dynamic dispatch (e.g. storing a clock in a non-generic struct).
pub type BoxClock = std::sync::Arc<dyn DynClock>;

/// Object-safe clock, implemented for anything implementing [`Clock`].
pub trait DynClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock> DynClock for C {
    fn now(&self) -> DateTime<Utc> {
        Clock::now(self)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
