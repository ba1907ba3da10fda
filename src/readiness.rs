//! Startup barrier for asynchronously loaded resources.
//!
//! The first frame must not be drawn before every texture is decoded and
//! uploaded. [`ReadinessGate`] counts completions; nothing else is tracked.
//! There is no timeout: a resource that never completes keeps the gate closed.

/// Counts finished resources up to a fixed requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessGate {
    loaded: usize,
    required: usize,
}

impl ReadinessGate {
    pub fn new(required: usize) -> Self {
        Self {
            loaded: 0,
            required,
        }
    }

    /// Records one finished resource.
    ///
    /// Each resource reports exactly once. Extra reports are ignored so the
    /// count never exceeds the requirement.
    pub fn on_resource_ready(&mut self) {
        if self.loaded < self.required {
            self.loaded += 1;
            log::debug!("resource ready ({}/{})", self.loaded, self.required);
        } else {
            log::warn!(
                "ignoring resource report, all {} resources already loaded",
                self.required
            );
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.loaded == self.required
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn required(&self) -> usize {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_exactly_the_required_reports() {
        let mut gate = ReadinessGate::new(2);
        assert!(!gate.is_satisfied());
        gate.on_resource_ready();
        assert!(!gate.is_satisfied());
        gate.on_resource_ready();
        assert!(gate.is_satisfied());
    }

    #[test]
    fn count_never_exceeds_requirement() {
        let mut gate = ReadinessGate::new(2);
        for _ in 0..5 {
            gate.on_resource_ready();
        }
        assert_eq!(gate.loaded(), 2);
        assert!(gate.is_satisfied());
    }

    #[test]
    fn empty_requirement_is_open_immediately() {
        assert!(ReadinessGate::new(0).is_satisfied());
    }
}
