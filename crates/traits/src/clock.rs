//! Clock abstraction used to sequence CSS transitions.
//!
//! Transition waits exist only so that fades finish before the DOM changes under
//! them. Routing them through a trait lets tests run the whole navigation
//! sequence without wall-clock delays.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[allow(async_fn_in_trait)]
pub trait Clock {
    /// Resolves once `duration` has elapsed.
    async fn sleep(&self, duration: Duration);

    /// Resolves on the next paint frame.
    async fn next_frame(&self);
}

/// A clock whose waits resolve immediately while recording what was requested.
#[derive(Debug, Clone, Default)]
pub struct ImmediateClock {
    sleeps: Rc<RefCell<Vec<Duration>>>,
    frames: Rc<Cell<usize>>,
}

impl ImmediateClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    /// Sum of every requested sleep.
    pub fn total_slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }

    pub fn frames(&self) -> usize {
        self.frames.get()
    }
}

impl Clock for ImmediateClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }

    async fn next_frame(&self) {
        self.frames.set(self.frames.get() + 1);
    }
}
