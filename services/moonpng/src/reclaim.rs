//! Scoped ownership of scarce per-request resources.
//!
//! Open datasets hold file handles and renderer canvases hold drawing
//! surfaces. Both are wrapped in a [`Scoped`] guard whose release action
//! runs exactly once: on [`Scoped::release`], or on drop for every other
//! exit path including `?` returns and unwinding.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// A value with a release action bound to its scope.
pub struct Scoped<T, F>
where
    F: FnOnce(T),
{
    label: &'static str,
    slot: Option<(T, F)>,
}

impl<T, F> Scoped<T, F>
where
    F: FnOnce(T),
{
    pub fn new(label: &'static str, value: T, release: F) -> Self {
        debug!(resource = label, "Acquired");
        Self {
            label,
            slot: Some((value, release)),
        }
    }

    /// Release now instead of at end of scope.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some((value, release)) = self.slot.take() {
            release(value);
            debug!(resource = self.label, "Released");
        }
    }
}

impl<T, F> Deref for Scoped<T, F>
where
    F: FnOnce(T),
{
    type Target = T;

    fn deref(&self) -> &T {
        match &self.slot {
            Some((value, _)) => value,
            // The slot is only emptied by `release(self)` and `drop`.
            None => unreachable!("scoped resource accessed after release"),
        }
    }
}

impl<T, F> DerefMut for Scoped<T, F>
where
    F: FnOnce(T),
{
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.slot {
            Some((value, _)) => value,
            None => unreachable!("scoped resource accessed after release"),
        }
    }
}

impl<T, F> Drop for Scoped<T, F>
where
    F: FnOnce(T),
{
    fn drop(&mut self) {
        self.run_release();
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Scoped<T, F>
where
    F: FnOnce(T),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scoped")
            .field("label", &self.label)
            .field("value", &self.slot.as_ref().map(|(value, _)| value))
            .finish()
    }
}

/// Acquire/release counters of one resource class.
#[derive(Debug, Default)]
pub struct ResourceCounter {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl ResourceCounter {
    pub fn acquired(&self) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn released(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> (usize, usize) {
        (
            self.acquired.load(Ordering::Relaxed),
            self.released.load(Ordering::Relaxed),
        )
    }

    /// Resources acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        let (acquired, released) = self.snapshot();
        acquired.saturating_sub(released)
    }
}

/// Lifetime counters of the datasets and canvases a pipeline has handled.
#[derive(Debug, Default)]
pub struct ResourceStats {
    pub datasets: ResourceCounter,
    pub canvases: ResourceCounter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_release_on_drop() {
        let calls = Cell::new(0);
        {
            let guard = Scoped::new("test", 7, |v| {
                assert_eq!(v, 7);
                calls.set(calls.get() + 1);
            });
            assert_eq!(*guard, 7);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_explicit_release_runs_once() {
        let calls = Cell::new(0);
        let guard = Scoped::new("test", String::from("x"), |_| calls.set(calls.get() + 1));
        guard.release();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_release_on_early_return() {
        fn fails(calls: &Cell<usize>) -> Result<(), &'static str> {
            let mut guard = Scoped::new("test", vec![1], |_| calls.set(calls.get() + 1));
            guard.push(2);
            if guard.len() == 2 {
                return Err("boom");
            }
            guard.release();
            Ok(())
        }

        let calls = Cell::new(0);
        assert!(fails(&calls).is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_counter_outstanding() {
        let counter = ResourceCounter::default();
        counter.acquired();
        counter.acquired();
        counter.released();
        assert_eq!(counter.snapshot(), (2, 1));
        assert_eq!(counter.outstanding(), 1);
    }
}
