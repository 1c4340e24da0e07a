#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic deadline scheduler that drives the session clock.
//!
//! The scheduler owns a simulated clock that only moves when its owner asks
//! for due work. Deadlines are absolute offsets on that clock, and tasks that
//! share a deadline fire in the order they were scheduled, so replaying the
//! same sequence of frame deltas and events always yields the same commands.

use std::time::Duration;

use maze_sprint_core::{BonusKind, Event, TICK_PERIOD};

/// Default delay before a collection flag is cleared.
pub const DEFAULT_COLLECTED_FLAG_DELAY: Duration = Duration::from_millis(3_000);

/// Default delay before a finished round restarts on its own.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(3_000);

/// Work item whose deadline has been reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Due {
    /// One countdown period elapsed.
    Tick,
    /// The presentation flag of a collected item should be cleared.
    ClearCollected {
        /// Item whose flag should be cleared.
        kind: BonusKind,
        /// Round in which the collection happened.
        round: u32,
    },
    /// A finished round should be followed by a fresh one.
    Restart {
        /// Round that finished.
        after_round: u32,
    },
}

/// Delays used when scheduling one-shot work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Delay between a collection and the clearing of its flag.
    pub collected_flag_delay: Duration,
    /// Delay between the end of a round and the automatic restart.
    pub restart_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            collected_flag_delay: DEFAULT_COLLECTED_FLAG_DELAY,
            restart_delay: DEFAULT_RESTART_DELAY,
        }
    }
}

/// Pure system that converts world events into timed work.
#[derive(Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
    clock: Duration,
    next_sequence: u64,
    pending: Vec<Task>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    /// Creates a scheduler whose clock starts at zero.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            clock: Duration::ZERO,
            next_sequence: 0,
            pending: Vec::new(),
        }
    }

    /// Current position of the simulated clock.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock
    }

    /// Number of tasks waiting for their deadline.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Consumes world events, scheduling and cancelling work relative to [`Self::now`].
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::RoundStarted { round } => {
                    self.pending.clear();
                    self.schedule(TICK_PERIOD, Due::Tick);
                    log::trace!("countdown armed for round {round}");
                }
                Event::RoundEnded { round, .. } => {
                    self.cancel(|due| matches!(due, Due::Tick | Due::ClearCollected { .. }));
                    self.schedule(
                        self.config.restart_delay,
                        Due::Restart {
                            after_round: *round,
                        },
                    );
                    log::trace!("restart of round {round} scheduled");
                }
                Event::BonusCollected { kind, round, .. } => {
                    let kind = *kind;
                    self.cancel(|due| {
                        matches!(due, Due::ClearCollected { kind: pending, .. } if *pending == kind)
                    });
                    self.schedule(
                        self.config.collected_flag_delay,
                        Due::ClearCollected {
                            kind,
                            round: *round,
                        },
                    );
                }
                _ => {}
            }
        }
    }

    /// Removes and returns the earliest task due no later than `until`.
    ///
    /// The clock jumps to the deadline of the returned task, so follow-up
    /// events fed through [`Self::handle`] are scheduled from the moment the
    /// task fired. When nothing is due the clock moves to `until` instead.
    /// Countdown ticks re-arm themselves one period after they fire.
    pub fn pop_due(&mut self, until: Duration) -> Option<Due> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, task)| task.deadline <= until)
            .min_by_key(|(_, task)| (task.deadline, task.sequence))
            .map(|(position, _)| position);

        let Some(position) = position else {
            self.clock = self.clock.max(until);
            return None;
        };

        let task = self.pending.swap_remove(position);
        self.clock = self.clock.max(task.deadline);
        if task.due == Due::Tick {
            self.schedule(TICK_PERIOD, Due::Tick);
        }
        Some(task.due)
    }

    fn schedule(&mut self, delay: Duration, due: Due) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pending.push(Task {
            deadline: self.clock.saturating_add(delay),
            sequence,
            due,
        });
    }

    fn cancel<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&Due) -> bool,
    {
        self.pending.retain(|task| !predicate(&task.due));
    }
}

#[derive(Clone, Copy, Debug)]
struct Task {
    deadline: Duration,
    sequence: u64,
    due: Due,
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_sprint_core::{CellCoord, RoundOutcome};

    fn drain(scheduler: &mut Scheduler, until: Duration) -> Vec<(Duration, Due)> {
        let mut fired = Vec::new();
        while let Some(due) = scheduler.pop_due(until) {
            fired.push((scheduler.now(), due));
        }
        fired
    }

    fn round_ended(round: u32) -> Event {
        Event::RoundEnded {
            round,
            outcome: RoundOutcome::TimedOut,
            final_score: 0,
            high_score: 0,
        }
    }

    fn collected(kind: BonusKind, round: u32) -> Event {
        Event::BonusCollected {
            kind,
            cell: CellCoord::new(1, 1),
            round,
        }
    }

    #[test]
    fn idle_scheduler_only_moves_the_clock() {
        let mut scheduler = Scheduler::default();
        assert_eq!(scheduler.pop_due(Duration::from_secs(5)), None);
        assert_eq!(scheduler.now(), Duration::from_secs(5));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn round_start_arms_a_recurring_tick() {
        let mut scheduler = Scheduler::default();
        scheduler.handle(&[Event::RoundStarted { round: 1 }]);

        let fired = drain(&mut scheduler, Duration::from_millis(3_500));
        assert_eq!(
            fired,
            vec![
                (Duration::from_secs(1), Due::Tick),
                (Duration::from_secs(2), Due::Tick),
                (Duration::from_secs(3), Due::Tick),
            ]
        );
        assert_eq!(scheduler.now(), Duration::from_millis(3_500));
    }

    #[test]
    fn round_end_stops_ticks_and_schedules_restart() {
        let mut scheduler = Scheduler::default();
        scheduler.handle(&[Event::RoundStarted { round: 1 }]);
        let _ = drain(&mut scheduler, Duration::from_secs(2));
        scheduler.handle(&[round_ended(1)]);

        let fired = drain(&mut scheduler, Duration::from_secs(10));
        assert_eq!(
            fired,
            vec![(Duration::from_secs(5), Due::Restart { after_round: 1 })]
        );
    }

    #[test]
    fn early_round_start_cancels_restart() {
        let mut scheduler = Scheduler::default();
        scheduler.handle(&[round_ended(1)]);
        let _ = scheduler.pop_due(Duration::from_secs(1));
        scheduler.handle(&[Event::RoundStarted { round: 2 }]);

        let fired = drain(&mut scheduler, Duration::from_secs(4));
        assert!(fired.iter().all(|(_, due)| *due == Due::Tick));
        assert_eq!(fired.len(), 3);
    }

    #[test]
    fn collected_flag_clears_after_configured_delay() {
        let mut scheduler = Scheduler::new(SchedulerConfig {
            collected_flag_delay: Duration::from_millis(1_500),
            restart_delay: DEFAULT_RESTART_DELAY,
        });
        scheduler.handle(&[collected(BonusKind::IceCream, 4)]);

        assert_eq!(scheduler.pop_due(Duration::from_millis(1_499)), None);
        assert_eq!(
            scheduler.pop_due(Duration::from_millis(1_500)),
            Some(Due::ClearCollected {
                kind: BonusKind::IceCream,
                round: 4,
            })
        );
    }

    #[test]
    fn round_end_cancels_pending_clears() {
        let mut scheduler = Scheduler::default();
        scheduler.handle(&[collected(BonusKind::Lollipop, 1), round_ended(1)]);
        let fired = drain(&mut scheduler, Duration::from_secs(60));
        assert_eq!(
            fired,
            vec![(DEFAULT_RESTART_DELAY, Due::Restart { after_round: 1 })]
        );
    }

    #[test]
    fn simultaneous_deadlines_fire_in_schedule_order() {
        let mut scheduler = Scheduler::new(SchedulerConfig {
            collected_flag_delay: TICK_PERIOD,
            restart_delay: DEFAULT_RESTART_DELAY,
        });
        scheduler.handle(&[
            Event::RoundStarted { round: 1 },
            collected(BonusKind::Lollipop, 1),
            collected(BonusKind::IceCream, 1),
        ]);
        let fired: Vec<_> = drain(&mut scheduler, TICK_PERIOD)
            .into_iter()
            .map(|(_, due)| due)
            .collect();
        assert_eq!(
            fired,
            vec![
                Due::Tick,
                Due::ClearCollected {
                    kind: BonusKind::Lollipop,
                    round: 1,
                },
                Due::ClearCollected {
                    kind: BonusKind::IceCream,
                    round: 1,
                },
            ]
        );
    }

    #[test]
    fn events_are_scheduled_from_the_firing_deadline() {
        let mut scheduler = Scheduler::default();
        scheduler.handle(&[Event::RoundStarted { round: 1 }]);
        // The first tick fires at 1 s even though the frame ends at 1.9 s.
        assert_eq!(scheduler.pop_due(Duration::from_millis(1_900)), Some(Due::Tick));
        scheduler.handle(&[collected(BonusKind::Lollipop, 1)]);
        let fired = drain(&mut scheduler, Duration::from_secs(4));
        assert!(fired.contains(&(
            Duration::from_secs(4),
            Due::ClearCollected {
                kind: BonusKind::Lollipop,
                round: 1,
            }
        )));
    }
}
