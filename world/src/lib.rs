#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Maze Sprint.
//!
//! [`apply`] is a pure transition function: it never mutates the state it is
//! handed, and returns the next state together with the events describing
//! what changed. Commands that are not applicable in the current phase
//! return an identical state and emit nothing.

use std::sync::Arc;

use maze_sprint_core::{
    BonusItem, BonusKind, CellCoord, Command, Direction, Event, Maze, Phase, RoundOutcome,
    RoundSetup, FINAL_SCORE_MULTIPLIER, MOVE_POINTS, ROUND_TIME_SECONDS,
};

/// Represents the authoritative Maze Sprint session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    phase: Phase,
    maze: Option<Arc<Maze>>,
    current_cell: Option<CellCoord>,
    round: u32,
    score: u64,
    high_score: u64,
    time_remaining: Option<u32>,
    bonuses: Option<Bonuses>,
}

impl SessionState {
    /// Creates an idle session with no maze and no running timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            maze: None,
            current_cell: None,
            round: 0,
            score: 0,
            high_score: 0,
            time_remaining: None,
            bonuses: None,
        }
    }

    fn start_round(&mut self, setup: RoundSetup, out_events: &mut Vec<Event>) {
        if self.phase == Phase::Running {
            return;
        }

        self.current_cell = Some(setup.maze.start());
        self.bonuses = Some(Bonuses::from_setup(&setup));
        self.maze = Some(setup.maze);
        self.time_remaining = Some(ROUND_TIME_SECONDS);
        self.round = self.round.saturating_add(1);
        self.phase = Phase::Running;
        out_events.push(Event::RoundStarted { round: self.round });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(time) = self.time_remaining.filter(|time| *time > 0) else {
            return;
        };

        let remaining = time - 1;
        self.time_remaining = Some(remaining);
        out_events.push(Event::TimeAdvanced { remaining });

        if let Some(bonuses) = self.bonuses.as_mut() {
            for kind in BonusKind::ALL {
                let slot = bonuses.slot_mut(kind);
                if remaining == kind.spawn_threshold() && !slot.threshold_fired {
                    slot.threshold_fired = true;
                    slot.item.visible = true;
                    out_events.push(Event::BonusSpawned {
                        kind,
                        cell: slot.item.location,
                    });
                    break;
                }
            }
        }

        if remaining == 0 {
            self.end_round(RoundOutcome::TimedOut, out_events);
        }
    }

    fn step(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Running {
            return;
        }
        let (Some(maze), Some(from)) = (self.maze.as_ref(), self.current_cell) else {
            return;
        };
        let Some(to) = maze.passage(from, direction) else {
            return;
        };
        let reached_end = to == maze.end();

        self.current_cell = Some(to);
        self.score = self.score.saturating_add(MOVE_POINTS);
        out_events.push(Event::PlayerMoved { from, to });

        if reached_end {
            self.end_round(RoundOutcome::Won, out_events);
        }
    }

    fn collect(&mut self, kind: BonusKind, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(cell) = self.current_cell else {
            return;
        };
        let Some(slot) = self.bonuses.as_mut().map(|bonuses| bonuses.slot_mut(kind)) else {
            return;
        };
        if !slot.item.visible || slot.item.location != cell {
            return;
        }

        slot.item.visible = false;
        slot.item.just_collected = true;
        self.score = self.score.saturating_add(kind.score_award());
        self.time_remaining = self
            .time_remaining
            .map(|time| time.saturating_add(kind.time_award()));
        out_events.push(Event::BonusCollected {
            kind,
            cell,
            round: self.round,
        });
    }

    fn clear_collected(&mut self, kind: BonusKind, round: u32, out_events: &mut Vec<Event>) {
        if round != self.round {
            return;
        }
        let Some(slot) = self.bonuses.as_mut().map(|bonuses| bonuses.slot_mut(kind)) else {
            return;
        };
        if !slot.item.just_collected {
            return;
        }

        slot.item.just_collected = false;
        out_events.push(Event::CollectedFlagCleared { kind });
    }

    fn end_round(&mut self, outcome: RoundOutcome, out_events: &mut Vec<Event>) {
        let time_at_trigger = u64::from(self.time_remaining.unwrap_or(0));
        let final_score = u64::from(self.round)
            .saturating_mul(time_at_trigger)
            .saturating_mul(FINAL_SCORE_MULTIPLIER);

        self.high_score = self.high_score.max(self.score);
        self.score = final_score;
        self.time_remaining = Some(0);
        self.phase = Phase::RoundEnd;
        if let Some(bonuses) = self.bonuses.as_mut() {
            bonuses.reset();
        }

        out_events.push(Event::RoundEnded {
            round: self.round,
            outcome,
            final_score,
            high_score: self.high_score,
        });
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the state that follows `state` once `command` is applied.
///
/// Events describing the transition are appended to `out_events`. The input
/// state is left untouched, so callers can keep publishing it until they
/// swap in the returned value.
#[must_use]
pub fn apply(state: &SessionState, command: Command, out_events: &mut Vec<Event>) -> SessionState {
    let mut next = state.clone();
    match command {
        Command::StartRound { setup } => next.start_round(setup, out_events),
        Command::Tick => next.tick(out_events),
        Command::Move { direction } => next.step(direction, out_events),
        Command::Collect { kind } => next.collect(kind, out_events),
        Command::ClearCollectedFlag { kind, round } => {
            next.clear_collected(kind, round, out_events);
        }
    }
    next
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::sync::Arc;

    use super::SessionState;
    use maze_sprint_core::{
        BonusItem, BonusKind, CellCoord, Maze, Phase, SessionSnapshot, WELCOME_BANNER,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner() -> &'static str {
        WELCOME_BANNER
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(state: &SessionState) -> Phase {
        state.phase
    }

    /// Number of rounds started so far.
    #[must_use]
    pub fn round(state: &SessionState) -> u32 {
        state.round
    }

    /// Maze of the current or most recent round.
    #[must_use]
    pub fn maze(state: &SessionState) -> Option<&Arc<Maze>> {
        state.maze.as_ref()
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn current_cell(state: &SessionState) -> Option<CellCoord> {
        state.current_cell
    }

    /// State of the bonus item of `kind` in the current round.
    #[must_use]
    pub fn bonus(state: &SessionState, kind: BonusKind) -> Option<BonusItem> {
        state.bonuses.as_ref().map(|bonuses| bonuses.slot(kind).item)
    }

    /// Reports whether the spawn threshold of `kind` already fired this round.
    #[must_use]
    pub fn threshold_fired(state: &SessionState, kind: BonusKind) -> bool {
        state
            .bonuses
            .as_ref()
            .map_or(false, |bonuses| bonuses.slot(kind).threshold_fired)
    }

    /// Captures the read-only snapshot published to presenters.
    #[must_use]
    pub fn snapshot(state: &SessionState) -> SessionSnapshot {
        SessionSnapshot {
            phase: state.phase,
            maze: state.maze.clone(),
            current_cell: state.current_cell,
            score: state.score,
            high_score: state.high_score,
            round: state.round,
            time_remaining: state.time_remaining,
            lollipop: bonus(state, BonusKind::Lollipop),
            ice_cream: bonus(state, BonusKind::IceCream),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Bonuses {
    lollipop: BonusSlot,
    ice_cream: BonusSlot,
}

impl Bonuses {
    fn from_setup(setup: &RoundSetup) -> Self {
        Self {
            lollipop: BonusSlot::at(setup.location(BonusKind::Lollipop)),
            ice_cream: BonusSlot::at(setup.location(BonusKind::IceCream)),
        }
    }

    fn slot(&self, kind: BonusKind) -> &BonusSlot {
        match kind {
            BonusKind::Lollipop => &self.lollipop,
            BonusKind::IceCream => &self.ice_cream,
        }
    }

    fn slot_mut(&mut self, kind: BonusKind) -> &mut BonusSlot {
        match kind {
            BonusKind::Lollipop => &mut self.lollipop,
            BonusKind::IceCream => &mut self.ice_cream,
        }
    }

    fn reset(&mut self) {
        for kind in BonusKind::ALL {
            let slot = self.slot_mut(kind);
            slot.item.visible = false;
            slot.item.just_collected = false;
            slot.threshold_fired = false;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BonusSlot {
    item: BonusItem,
    threshold_fired: bool,
}

impl BonusSlot {
    const fn at(location: CellCoord) -> Self {
        Self {
            item: BonusItem::hidden_at(location),
            threshold_fired: false,
        }
    }
}
