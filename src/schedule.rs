//! Cooperative startup loop.
//!
//! Every repaint signal goes through [`FrameScheduler::on_repaint`]. Until
//! the [`ReadinessGate`] opens, the signal is answered with
//! [`Repaint::Rescheduled`] and the host re-arms its next-frame callback.
//! Once open, every repaint hands control to the renderer exactly once.

use std::time::Duration;

use instant::Instant;

use crate::readiness::ReadinessGate;

#[derive(Debug, PartialEq, Eq)]
pub enum Repaint<R> {
    /// The renderer ran and produced `R`.
    Drawn(R),
    /// The gate is still closed, ask again on the next frame.
    Rescheduled,
}

#[derive(Debug)]
pub struct FrameScheduler {
    waiting_since: Instant,
    stall_warning: Duration,
    warned: bool,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(stall_warning: Duration) -> Self {
        Self {
            waiting_since: Instant::now(),
            stall_warning,
            warned: false,
            frames: 0,
        }
    }

    /// Whether the first frame has been drawn.
    pub fn has_started(&self) -> bool {
        self.frames > 0
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    pub fn on_repaint<R>(&mut self, gate: &ReadinessGate, draw: impl FnOnce() -> R) -> Repaint<R> {
        if !gate.is_satisfied() {
            if !self.warned && self.waiting_since.elapsed() >= self.stall_warning {
                self.warned = true;
                log::warn!(
                    "still waiting for {} of {} textures after {:?}, nothing will be drawn until they arrive",
                    gate.required() - gate.loaded(),
                    gate.required(),
                    self.stall_warning
                );
            }
            return Repaint::Rescheduled;
        }
        if self.frames == 0 {
            log::info!(
                "all {} textures ready after {:?}, drawing the first frame",
                gate.required(),
                self.waiting_since.elapsed()
            );
        }
        self.frames += 1;
        Repaint::Drawn(draw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_with(loaded: usize) -> ReadinessGate {
        let mut gate = ReadinessGate::new(2);
        for _ in 0..loaded {
            gate.on_resource_ready();
        }
        gate
    }

    #[test]
    fn closed_gate_reschedules_without_drawing() {
        let mut scheduler = FrameScheduler::new(Duration::from_secs(60));
        let mut draws = 0;
        for loaded in [0, 1] {
            let gate = gate_with(loaded);
            assert_eq!(scheduler.on_repaint(&gate, || draws += 1), Repaint::Rescheduled);
        }
        assert_eq!(draws, 0);
        assert!(!scheduler.has_started());
    }

    #[test]
    fn open_gate_draws_once_per_repaint() {
        let mut scheduler = FrameScheduler::new(Duration::from_secs(60));
        let gate = gate_with(2);
        let mut draws = 0;

        assert_eq!(scheduler.on_repaint(&gate, || draws += 1), Repaint::Drawn(()));
        assert_eq!(draws, 1);
        assert!(scheduler.has_started());

        assert_eq!(scheduler.on_repaint(&gate, || draws += 1), Repaint::Drawn(()));
        assert_eq!(draws, 2);
        assert_eq!(scheduler.frames_drawn(), 2);
    }

    #[test]
    fn stalled_gate_keeps_waiting_after_the_warning() {
        let mut scheduler = FrameScheduler::new(Duration::ZERO);
        let gate = gate_with(1);
        for _ in 0..3 {
            assert_eq!(scheduler.on_repaint(&gate, || ()), Repaint::Rescheduled);
        }
        assert!(scheduler.warned);
    }

    #[test]
    fn renderer_result_is_passed_through() {
        let mut scheduler = FrameScheduler::new(Duration::from_secs(60));
        let gate = gate_with(2);
        let outcome: Repaint<Result<(), &str>> = scheduler.on_repaint(&gate, || Err("lost"));
        assert_eq!(outcome, Repaint::Drawn(Err("lost")));
    }
}
