use std::time::Duration;

/// Cap on ticks run for a single frame.
pub const MAX_SUBSTEPS: u32 = 5;

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(ticks_per_second: u32) -> Self {
        let hz = ticks_per_second.max(1);
        Self {
            step: Duration::from_secs(1) / hz,
            accumulator: Duration::ZERO,
        }
    }

    /// Add `elapsed` wall time and return how many ticks are due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS && self.accumulator >= self.step {
            // Drop the backlog instead of replaying it later
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_hz_needs_six_frames() {
        let mut step = FixedStep::new(10);
        let frame = Duration::from_millis(17);
        let ticks: u32 = (0..6).map(|_| step.advance(frame)).sum();
        assert_eq!(ticks, 1);
    }

    #[test]
    fn test_sixty_hz_runs_about_once_per_frame() {
        let mut step = FixedStep::new(60);
        let ticks: u32 = (0..60).map(|_| step.advance(Duration::from_micros(16_667))).sum();
        assert!((59..=60).contains(&ticks));
    }

    #[test]
    fn test_stall_is_capped() {
        let mut step = FixedStep::new(60);
        assert_eq!(step.advance(Duration::from_secs(2)), MAX_SUBSTEPS);
        assert_eq!(step.advance(Duration::ZERO), 0);
    }
}
