use std::time::Instant;

/** decides when a search should stop (polled by the driver and at every choice point) */
pub trait StoppingCriterion {
    /// true if the search should stop now
    fn is_finished(&self) -> bool;
}

/// never stops: the search runs to completion
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStoppingCriterion {}

impl StoppingCriterion for NeverStoppingCriterion {
    fn is_finished(&self) -> bool { false }
}

/// stops once a wall-clock budget (in seconds) is spent
#[derive(Debug, Clone, Copy)]
pub struct TimeStoppingCriterion {
    /// time at which the criterion was created
    start: Instant,
    /// budget in seconds
    time_limit: f32,
}

impl TimeStoppingCriterion {
    /// creates a criterion with a budget of `time_limit` seconds starting now
    pub fn new(time_limit:f32) -> Self {
        Self { start: Instant::now(), time_limit }
    }

    /// seconds elapsed since creation
    pub fn elapsed(&self) -> f32 { self.start.elapsed().as_secs_f32() }
}

impl StoppingCriterion for TimeStoppingCriterion {
    fn is_finished(&self) -> bool { self.elapsed() >= self.time_limit }
}

/// optional time budget (`None`: never stops)
impl StoppingCriterion for Option<TimeStoppingCriterion> {
    fn is_finished(&self) -> bool {
        self.as_ref().map_or(false, |s| s.is_finished())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria() {
        assert!(!NeverStoppingCriterion::default().is_finished());
        assert!(TimeStoppingCriterion::new(0.).is_finished());
        assert!(!TimeStoppingCriterion::new(3600.).is_finished());
        let none:Option<TimeStoppingCriterion> = None;
        assert!(!none.is_finished());
        assert!(Some(TimeStoppingCriterion::new(0.)).is_finished());
    }
}
