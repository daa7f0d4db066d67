//! Stage timing.

use std::time::Instant;
use tracing::info;

/// Logs `PROFILING: <stage>` with the elapsed time when dropped.
#[derive(Debug)]
pub struct StageTimer {
    stage: &'static str,
    started: Instant,
}

impl StageTimer {
    pub fn start(stage: &'static str) -> Self {
        Self {
            stage,
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        info!(
            stage = self.stage,
            duration_ms = self.elapsed_ms(),
            "PROFILING: {}",
            self.stage
        );
    }
}

/// Run `f` under a [`StageTimer`].
pub fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    let _timer = StageTimer::start(stage);
    f()
}
