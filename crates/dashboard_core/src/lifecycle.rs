use std::fmt;

/// Processing state of a job as reported by the analysis service.
///
/// `Queued -> Running -> Completed | Error`. The two terminal states accept
/// no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    #[default]
    Queued,
    Running,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Running => 1,
            JobStatus::Completed | JobStatus::Error => 2,
        }
    }

    /// Whether a report of `next` may replace a locally observed `self`.
    ///
    /// Re-reporting the same status is accepted. Anything that moves
    /// backwards, or away from a terminal state, is a stale report.
    pub fn accepts(self, next: JobStatus) -> bool {
        if self == next {
            return true;
        }
        !self.is_terminal() && next.rank() > self.rank()
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Running => "Running",
            JobStatus::Completed => "Completed",
            JobStatus::Error => "Error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::JobStatus::*;

    #[test]
    fn forward_transitions_are_accepted() {
        assert!(Queued.accepts(Running));
        assert!(Queued.accepts(Completed));
        assert!(Running.accepts(Completed));
        assert!(Running.accepts(Error));
        assert!(Running.accepts(Running));
    }

    #[test]
    fn backward_and_terminal_transitions_are_rejected() {
        assert!(!Running.accepts(Queued));
        assert!(!Completed.accepts(Running));
        assert!(!Completed.accepts(Error));
        assert!(!Error.accepts(Completed));
        assert!(!Error.accepts(Queued));
    }
}
