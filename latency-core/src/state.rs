//! Poll loop state machine.
//!
//! The loop alternates `Idle → Scanning → Sleeping → Scanning → …` until it
//! is cancelled (or, when bounded, until the last cycle completes). This
//! module only decides transitions; `latency-monitor` performs the scan,
//! prints the heartbeat and sleeps.

use std::time::Duration;

/// When and how often the loop scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Sleep between the end of one scan and the start of the next.
    pub interval: Duration,
    /// Stop after this many cycles. `None` runs until cancelled.
    pub max_cycles: Option<u64>,
}

impl PollSchedule {
    /// Unbounded schedule with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_cycles: None,
        }
    }

    /// Stop after `cycles` completed scans.
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    fn is_last(&self, cycle: u64) -> bool {
        self.max_cycles.is_some_and(|max| cycle >= max)
    }
}

/// Where the poll loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Not started.
    Idle,
    /// Running scan number `cycle` (1-based).
    Scanning {
        /// Current cycle number.
        cycle: u64,
    },
    /// Waiting after scan number `cycle`.
    Sleeping {
        /// Last completed cycle number.
        cycle: u64,
    },
    /// Finished; no further actions.
    Stopped,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    /// Begin polling.
    Start,
    /// The current scan finished.
    ScanCompleted,
    /// The sleep interval elapsed.
    IntervalElapsed,
    /// Shutdown was requested.
    CancelRequested,
}

/// Work the driver must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    /// Run one directory scan.
    Scan,
    /// Print the progress marker.
    Heartbeat,
    /// Sleep, then report [`PollEvent::IntervalElapsed`].
    Sleep(Duration),
    /// Leave the loop.
    Stop,
}

impl PollPhase {
    /// Create a state machine in the Idle phase.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new phase plus actions to execute.
    pub fn on_event(self, event: PollEvent, schedule: &PollSchedule) -> (Self, Vec<PollAction>) {
        match (self, event) {
            (Self::Stopped, _) => (Self::Stopped, vec![]),

            (_, PollEvent::CancelRequested) => (Self::Stopped, vec![PollAction::Stop]),

            (Self::Idle, PollEvent::Start) => (Self::Scanning { cycle: 1 }, vec![PollAction::Scan]),

            (Self::Scanning { cycle }, PollEvent::ScanCompleted) => {
                if schedule.is_last(cycle) {
                    (
                        Self::Stopped,
                        vec![PollAction::Heartbeat, PollAction::Stop],
                    )
                } else {
                    (
                        Self::Sleeping { cycle },
                        vec![PollAction::Heartbeat, PollAction::Sleep(schedule.interval)],
                    )
                }
            }

            (Self::Sleeping { cycle }, PollEvent::IntervalElapsed) => (
                Self::Scanning {
                    cycle: cycle.saturating_add(1),
                },
                vec![PollAction::Scan],
            ),

            // Invalid transitions - stay in current phase
            (phase, _) => (phase, vec![]),
        }
    }

    /// Whether the loop has finished.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl Default for PollPhase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> PollSchedule {
        PollSchedule::new(Duration::from_millis(50))
    }

    #[test]
    fn start_triggers_first_scan() {
        let (phase, actions) = PollPhase::new().on_event(PollEvent::Start, &schedule());
        assert_eq!(phase, PollPhase::Scanning { cycle: 1 });
        assert_eq!(actions, vec![PollAction::Scan]);
    }

    #[test]
    fn completed_scan_heartbeats_then_sleeps() {
        let (phase, actions) =
            PollPhase::Scanning { cycle: 1 }.on_event(PollEvent::ScanCompleted, &schedule());
        assert_eq!(phase, PollPhase::Sleeping { cycle: 1 });
        assert_eq!(
            actions,
            vec![
                PollAction::Heartbeat,
                PollAction::Sleep(Duration::from_millis(50))
            ]
        );
    }

    #[test]
    fn elapsed_interval_starts_next_cycle() {
        let (phase, actions) =
            PollPhase::Sleeping { cycle: 3 }.on_event(PollEvent::IntervalElapsed, &schedule());
        assert_eq!(phase, PollPhase::Scanning { cycle: 4 });
        assert_eq!(actions, vec![PollAction::Scan]);
    }

    #[test]
    fn cancel_while_sleeping_stops() {
        let (phase, actions) =
            PollPhase::Sleeping { cycle: 2 }.on_event(PollEvent::CancelRequested, &schedule());
        assert!(phase.is_stopped());
        assert_eq!(actions, vec![PollAction::Stop]);
    }

    #[test]
    fn cancel_before_start_stops() {
        let (phase, actions) = PollPhase::Idle.on_event(PollEvent::CancelRequested, &schedule());
        assert!(phase.is_stopped());
        assert_eq!(actions, vec![PollAction::Stop]);
    }

    #[test]
    fn stopped_ignores_everything() {
        for event in [
            PollEvent::Start,
            PollEvent::ScanCompleted,
            PollEvent::IntervalElapsed,
            PollEvent::CancelRequested,
        ] {
            let (phase, actions) = PollPhase::Stopped.on_event(event, &schedule());
            assert!(phase.is_stopped());
            assert!(actions.is_empty());
        }
    }

    #[test]
    fn bounded_schedule_stops_after_last_cycle() {
        let schedule = schedule().with_max_cycles(2);

        let (phase, _) =
            PollPhase::Scanning { cycle: 1 }.on_event(PollEvent::ScanCompleted, &schedule);
        assert_eq!(phase, PollPhase::Sleeping { cycle: 1 });

        let (phase, actions) =
            PollPhase::Scanning { cycle: 2 }.on_event(PollEvent::ScanCompleted, &schedule);
        assert!(phase.is_stopped());
        assert_eq!(actions, vec![PollAction::Heartbeat, PollAction::Stop]);
    }

    #[test]
    fn invalid_transitions_are_ignored() {
        let (phase, actions) =
            PollPhase::Idle.on_event(PollEvent::ScanCompleted, &schedule());
        assert_eq!(phase, PollPhase::Idle);
        assert!(actions.is_empty());

        let (phase, actions) =
            PollPhase::Scanning { cycle: 1 }.on_event(PollEvent::Start, &schedule());
        assert_eq!(phase, PollPhase::Scanning { cycle: 1 });
        assert!(actions.is_empty());
    }

    #[test]
    fn full_unbounded_sequence() {
        let schedule = schedule();
        let mut phase = PollPhase::new();
        let mut scans = 0;
        let mut event = PollEvent::Start;

        for _ in 0..9 {
            let (next, actions) = phase.on_event(event, &schedule);
            phase = next;
            event = match actions.last() {
                Some(PollAction::Scan) => {
                    scans += 1;
                    PollEvent::ScanCompleted
                }
                Some(PollAction::Sleep(_)) => PollEvent::IntervalElapsed,
                other => panic!("unexpected action {:?}", other),
            };
        }

        assert_eq!(scans, 5);
        assert!(!phase.is_stopped());
    }
}
