/// When a surface gets redrawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Redraw only after an input changed.
    #[default]
    OnDemand,
    /// Redraw on every tick regardless of input changes.
    EveryFrame,
}

/// Tracks pending redraws for one surface.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    policy: SchedulePolicy,
    dirty: bool,
    passes: u64,
}

impl Scheduler {
    /// New scheduler. On-demand schedulers start dirty so the first frame is drawn.
    pub fn new(policy: SchedulePolicy) -> Self {
        Self {
            policy,
            dirty: true,
            passes: 0,
        }
    }

    /// Policy in effect.
    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    /// Mark the surface stale.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether a pass would run if taken now.
    pub fn is_due(&self) -> bool {
        self.dirty || self.policy == SchedulePolicy::EveryFrame
    }

    /// Consume the pending redraw. Returns `true` when the caller should render.
    pub fn take_due(&mut self) -> bool {
        let due = self.is_due();
        self.dirty = false;
        if due {
            self.passes += 1;
        }
        due
    }

    /// Passes handed out so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/schedule.rs"]
mod tests;
