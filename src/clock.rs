use docs_nav_traits::Clock;
use std::time::Duration;

/// Frame interval used by [`TokioClock::next_frame`], roughly 60 Hz.
const FRAME: Duration = Duration::from_millis(16);

/// A [`Clock`] on tokio timers.
///
/// Under a paused runtime (`#[tokio::test(start_paused = true)]`) the waits
/// advance virtual time, so debounce windows can be tested exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn next_frame(&self) {
        tokio::time::sleep(FRAME).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_waits_advance_virtual_time() {
        let start = Instant::now();
        TokioClock.sleep(Duration::from_millis(200)).await;
        TokioClock.next_frame().await;
        assert_eq!(start.elapsed(), Duration::from_millis(216));
    }
}
