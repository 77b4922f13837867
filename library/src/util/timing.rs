use std::borrow::Cow;
use std::time::Instant;

use log::{self, Level};

/// Logs how long a scope took when dropped.
pub struct ScopedTimer {
    label: Option<Cow<'static, str>>,
    level: Level,
    start: Option<Instant>,
}

impl ScopedTimer {
    pub fn with_level(label: impl Into<Cow<'static, str>>, level: Level) -> Self {
        Self {
            label: Some(label.into()),
            level,
            start: Some(Instant::now()),
        }
    }

    /// Builds the label only when debug logging is enabled.
    pub fn debug_lazy<F>(label_gen: F) -> Self
    where
        F: FnOnce() -> String,
    {
        if log::log_enabled!(Level::Debug) {
            Self::with_level(label_gen(), Level::Debug)
        } else {
            Self {
                label: None,
                level: Level::Debug,
                start: None,
            }
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let (Some(label), Some(start)) = (&self.label, self.start) {
            let micros = start.elapsed().as_micros();
            log::log!(self.level, "{} took {} us", label, micros);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_timer_skips_label() {
        // No logger is installed in unit tests, so debug is disabled.
        let timer = ScopedTimer::debug_lazy(|| panic!("label should not be built"));
        assert!(timer.label.is_none());
        assert!(timer.start.is_none());
    }

    #[test]
    fn test_enabled_timer_keeps_label() {
        let timer = ScopedTimer::with_level("scope", Level::Trace);
        assert_eq!(timer.label.as_deref(), Some("scope"));
        assert!(timer.start.is_some());
    }
}
