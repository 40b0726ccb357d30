//! Render request coalescing.

use std::time::{Duration, Instant};

/// Coalesces bursts of render requests into one delayed trigger.
///
/// At most one deadline is armed at a time: requests made while a
/// deadline is pending are absorbed by it. The throttle is polled from
/// the orchestrator's step function rather than owning a timer thread,
/// so everything stays on the surface context.
#[derive(Debug)]
pub struct RenderThrottle {
    delay: Duration,
    deadline: Option<Instant>,
}

impl RenderThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the coalescing window. A deadline already armed keeps its
    /// original fire time.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Arms the trigger unless one is already pending. Returns true if
    /// this call armed it.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.delay);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fires if the armed deadline has passed, disarming it. Returns true
    /// exactly once per armed request window.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Cancels any pending trigger.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }
}
