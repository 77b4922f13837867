//! A calculator session shared between a UI thread and a frame driver.

use std::sync::{Arc, RwLock};

use super::Calculator;
use crate::error::GraphError;
use crate::evaluation::output::TickReport;
use crate::presentation::{Headless, Presentation};

/// Cloneable handle to a [`Calculator`] behind a lock.
///
/// Ticks take the write lock, so an edit and a tick never overlap.
pub struct SharedCalculator<P: Presentation = Headless> {
    inner: Arc<RwLock<Calculator<P>>>,
}

impl<P: Presentation> Clone for SharedCalculator<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Presentation> SharedCalculator<P> {
    pub fn new(calculator: Calculator<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(calculator)),
        }
    }

    /// Execute a function with a read lock on the session.
    pub fn with_read<F, R>(&self, f: F) -> Result<R, GraphError>
    where
        F: FnOnce(&Calculator<P>) -> Result<R, GraphError>,
    {
        let calc = self.inner.read().map_err(|_| GraphError::LockPoisoned)?;
        f(&calc)
    }

    /// Execute a function with a write lock on the session.
    pub fn with_write<F, R>(&self, f: F) -> Result<R, GraphError>
    where
        F: FnOnce(&mut Calculator<P>) -> Result<R, GraphError>,
    {
        let mut calc = self.inner.write().map_err(|_| GraphError::LockPoisoned)?;
        f(&mut calc)
    }

    pub fn tick(&self, now: f64) -> Result<TickReport, GraphError> {
        self.with_write(|calc| Ok(calc.tick(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{NodeKind, NodeParams};
    use std::thread;

    #[test]
    fn test_ticks_from_another_thread_are_visible() {
        let shared = SharedCalculator::new(Calculator::headless(0.0));
        let time = shared
            .with_write(|calc| calc.create(NodeKind::Time, NodeParams::default()))
            .unwrap();

        let driver = shared.clone();
        thread::spawn(move || {
            for frame in 1..=3 {
                driver.tick(frame as f64).unwrap();
            }
        })
        .join()
        .unwrap();

        let (ticks, value) = shared
            .with_read(|calc| Ok((calc.tick_count(), calc.value(time)?)))
            .unwrap();
        assert_eq!(ticks, 3);
        assert_eq!(value, Some(3.0));
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let shared = SharedCalculator::new(Calculator::headless(0.0));
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            poisoner
                .with_write(|_| -> Result<(), GraphError> { panic!("editor crashed") })
                .ok();
        })
        .join();

        assert!(matches!(
            shared.tick(1.0),
            Err(GraphError::LockPoisoned)
        ));
    }
}
