//! Owner of the session: feeds commands through the world and routes events
//! to systems, the log and the audio sink.

use std::{sync::Arc, time::Duration};

use maze_sprint_core::{
    Command, Event, Intent, Phase, RoundSetup, SessionSnapshot, GRID_COLUMNS, GRID_ROWS,
};
use maze_sprint_system_bonus_placement::BonusPlacement;
use maze_sprint_system_maze_generator::generate;
use maze_sprint_system_pickup::Pickup;
use maze_sprint_system_scheduler::{Due, Scheduler, SchedulerConfig};
use maze_sprint_world::{self as world, query, SessionState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::audio::AudioSink;

/// Generates a gameplay maze and places its bonus items.
pub(crate) fn plan_round<R>(placement: &BonusPlacement, rng: &mut R) -> RoundSetup
where
    R: Rng + ?Sized,
{
    let maze = Arc::new(generate(GRID_COLUMNS, GRID_ROWS, rng));
    placement.plan(maze, rng)
}

/// Single-writer owner of the session state and its systems.
#[derive(Debug)]
pub(crate) struct Simulation<A> {
    state: SessionState,
    rng: ChaCha8Rng,
    placement: BonusPlacement,
    pickup: Pickup,
    scheduler: Scheduler,
    audio: A,
}

impl<A> Simulation<A>
where
    A: AudioSink,
{
    /// Creates an idle session whose mazes are drawn from `seed`.
    pub(crate) fn new(seed: u64, timing: SchedulerConfig, audio: A) -> Self {
        Self {
            state: SessionState::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            placement: BonusPlacement::default(),
            pickup: Pickup::default(),
            scheduler: Scheduler::new(timing),
            audio,
        }
    }

    /// Banner greeting the player when the experience boots.
    pub(crate) fn welcome_banner(&self) -> &'static str {
        query::welcome_banner()
    }

    /// Read-only view of the session.
    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        query::snapshot(&self.state)
    }

    /// Applies a player intent; intents that do not fit the current phase are dropped.
    pub(crate) fn handle_intent(&mut self, intent: Intent) {
        match intent.direction() {
            Some(direction) => self.dispatch(Command::Move { direction }),
            None => {
                if query::phase(&self.state) != Phase::Running {
                    self.start_round();
                }
            }
        }
    }

    /// Advances the simulated clock by `dt`, firing every task that falls due.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now().saturating_add(dt);
        while let Some(due) = self.scheduler.pop_due(until) {
            match due {
                Due::Tick => self.dispatch(Command::Tick),
                Due::ClearCollected { kind, round } => {
                    self.dispatch(Command::ClearCollectedFlag { kind, round });
                }
                Due::Restart { after_round } => {
                    let finished = query::phase(&self.state) == Phase::RoundEnd
                        && query::round(&self.state) == after_round;
                    if finished {
                        self.start_round();
                    }
                }
            }
        }
    }

    fn start_round(&mut self) {
        let setup = plan_round(&self.placement, &mut self.rng);
        self.dispatch(Command::StartRound { setup });
    }

    fn dispatch(&mut self, command: Command) {
        let mut pending = vec![command];

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                self.state = world::apply(&self.state, command, &mut events);
            }
            if events.is_empty() {
                break;
            }

            for event in &events {
                log_event(event);
                if let Some(cue) = event.audio_cue() {
                    self.audio.play(cue);
                }
            }
            self.scheduler.handle(&events);
            self.pickup
                .handle(&events, &query::snapshot(&self.state), &mut pending);
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::RoundStarted { round } => log::info!("round {round} started"),
        Event::RoundEnded {
            round,
            outcome,
            final_score,
            high_score,
        } => log::info!(
            "round {round} ended ({outcome:?}): score {final_score}, high score {high_score}"
        ),
        Event::TimeAdvanced { remaining } => log::trace!("{remaining}s remaining"),
        Event::PlayerMoved { from, to } => log::debug!("player moved {from:?} -> {to:?}"),
        Event::BonusSpawned { kind, cell } => log::debug!("{kind:?} appeared at {cell:?}"),
        Event::BonusCollected { kind, cell, .. } => {
            log::debug!("{kind:?} collected at {cell:?}");
        }
        Event::CollectedFlagCleared { kind } => log::trace!("{kind:?} award text cleared"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_sprint_core::{AudioCue, BonusKind, CellCoord, Direction, Maze, ROUND_TIME_SECONDS};
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    struct RecordingSink(Vec<AudioCue>);

    impl AudioSink for RecordingSink {
        fn play(&mut self, cue: AudioCue) {
            self.0.push(cue);
        }
    }

    fn simulation() -> Simulation<RecordingSink> {
        Simulation::new(42, SchedulerConfig::default(), RecordingSink::default())
    }

    fn intent_for(direction: Direction) -> Intent {
        match direction {
            Direction::North => Intent::MoveUp,
            Direction::East => Intent::MoveRight,
            Direction::South => Intent::MoveDown,
            Direction::West => Intent::MoveLeft,
        }
    }

    fn route(maze: &Maze, from: CellCoord, to: CellCoord) -> Vec<Direction> {
        let mut previous = vec![None; maze.cells().len()];
        let mut seen = vec![false; maze.cells().len()];
        let mut queue = VecDeque::from([from]);
        seen[maze.index(from).expect("inside maze")] = true;

        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                if let Some(next) = maze.passage(cell, direction) {
                    let index = maze.index(next).expect("inside maze");
                    if !seen[index] {
                        seen[index] = true;
                        previous[index] = Some((cell, direction));
                        queue.push_back(next);
                    }
                }
            }
        }

        let mut steps = Vec::new();
        let mut cursor = to;
        while let Some((cell, direction)) = previous[maze.index(cursor).expect("inside maze")] {
            steps.push(direction);
            cursor = cell;
        }
        steps.reverse();
        steps
    }

    fn walk_to(simulation: &mut Simulation<RecordingSink>, target: CellCoord) {
        let snapshot = simulation.snapshot();
        let maze = snapshot.maze.expect("maze installed");
        let from = snapshot.current_cell.expect("player placed");
        for direction in route(&maze, from, target) {
            simulation.handle_intent(intent_for(direction));
        }
    }

    #[test]
    fn idle_session_ignores_moves_and_time() {
        let mut simulation = simulation();
        simulation.handle_intent(Intent::MoveRight);
        simulation.advance(Duration::from_secs(10));
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.round, 0);
        assert!(simulation.audio.0.is_empty());
    }

    #[test]
    fn confirm_start_begins_a_round_with_music() {
        let mut simulation = simulation();
        simulation.handle_intent(Intent::ConfirmStart);
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.time_remaining, Some(ROUND_TIME_SECONDS));
        assert_eq!(simulation.audio.0, vec![AudioCue::RoundStarted]);

        simulation.handle_intent(Intent::ConfirmStart);
        assert_eq!(simulation.snapshot().round, 1, "running round is not restarted");
    }

    #[test]
    fn countdown_follows_accumulated_frame_time() {
        let mut simulation = simulation();
        simulation.handle_intent(Intent::ConfirmStart);
        simulation.advance(Duration::from_millis(600));
        assert_eq!(simulation.snapshot().time_remaining, Some(60));
        simulation.advance(Duration::from_millis(600));
        assert_eq!(simulation.snapshot().time_remaining, Some(59));
        simulation.advance(Duration::from_millis(2_800));
        assert_eq!(simulation.snapshot().time_remaining, Some(56));
    }

    #[test]
    fn timeout_ends_round_and_restarts_after_delay() {
        let mut simulation = simulation();
        simulation.handle_intent(Intent::ConfirmStart);
        simulation.advance(Duration::from_secs(60));
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.phase, Phase::RoundEnd);
        assert_eq!(snapshot.score, 0);
        assert_eq!(
            simulation.audio.0,
            vec![AudioCue::RoundStarted, AudioCue::RoundEnded]
        );

        simulation.advance(Duration::from_millis(2_999));
        assert_eq!(simulation.snapshot().phase, Phase::RoundEnd);
        simulation.advance(Duration::from_millis(1));
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.round, 2);
    }

    #[test]
    fn manual_restart_cancels_the_automatic_one() {
        let mut simulation = simulation();
        simulation.handle_intent(Intent::ConfirmStart);
        simulation.advance(Duration::from_secs(61));
        simulation.handle_intent(Intent::ConfirmStart);
        assert_eq!(simulation.snapshot().round, 2);

        simulation.advance(Duration::from_secs(5));
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.round, 2);
        assert_eq!(snapshot.time_remaining, Some(55));
    }

    #[test]
    fn reaching_the_exit_immediately_scores_full_time() {
        let mut simulation = simulation();
        simulation.handle_intent(Intent::ConfirmStart);
        let maze = simulation.snapshot().maze.expect("maze installed");
        walk_to(&mut simulation, maze.end());

        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.phase, Phase::RoundEnd);
        assert_eq!(snapshot.score, u64::from(ROUND_TIME_SECONDS) * 100);
    }

    /// Started simulation whose path from start to the lollipop avoids the exit.
    fn simulation_with_reachable_lollipop() -> Simulation<RecordingSink> {
        (0..64)
            .map(|seed| {
                let mut simulation =
                    Simulation::new(seed, SchedulerConfig::default(), RecordingSink::default());
                simulation.handle_intent(Intent::ConfirmStart);
                simulation
            })
            .find(|simulation| {
                let snapshot = simulation.snapshot();
                let maze = snapshot.maze.as_ref().expect("maze installed");
                let target = snapshot.bonus(BonusKind::Lollipop).expect("lollipop").location;
                let mut cell = maze.start();
                route(maze, cell, target).into_iter().all(|direction| {
                    cell = maze.passage(cell, direction).expect("route follows passages");
                    cell != maze.end()
                })
            })
            .expect("some seed keeps the exit off the lollipop path")
    }

    #[test]
    fn walking_onto_a_spawned_lollipop_collects_it() {
        let mut simulation = simulation_with_reachable_lollipop();
        simulation.advance(Duration::from_secs(30));
        let lollipop = simulation
            .snapshot()
            .bonus(BonusKind::Lollipop)
            .expect("lollipop planned");
        assert!(lollipop.visible);

        let score_before = simulation.snapshot().score;
        walk_to(&mut simulation, lollipop.location);
        let snapshot = simulation.snapshot();
        let item = snapshot.bonus(BonusKind::Lollipop).expect("lollipop planned");
        assert!(!item.visible);
        assert!(item.just_collected);
        assert!(snapshot.score >= score_before + 5_000);
        assert_eq!(snapshot.time_remaining, Some(45));

        simulation.advance(Duration::from_secs(3));
        let item = simulation
            .snapshot()
            .bonus(BonusKind::Lollipop)
            .expect("lollipop planned");
        assert!(!item.just_collected);
    }

    #[test]
    fn second_round_spawns_lollipop_away_from_landmarks() {
        let mut simulation = simulation();
        simulation.handle_intent(Intent::ConfirmStart);
        simulation.advance(Duration::from_secs(60));
        simulation.handle_intent(Intent::ConfirmStart);
        simulation.advance(Duration::from_secs(29));
        assert!(!simulation
            .snapshot()
            .bonus(BonusKind::Lollipop)
            .expect("lollipop planned")
            .visible);

        simulation.advance(Duration::from_secs(1));
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.round, 2);
        assert_eq!(snapshot.time_remaining, Some(30));
        let maze = snapshot.maze.as_ref().expect("maze installed");
        let lollipop = snapshot.bonus(BonusKind::Lollipop).expect("lollipop");
        let ice_cream = snapshot.bonus(BonusKind::IceCream).expect("ice cream");
        assert!(lollipop.visible);
        assert!(!ice_cream.visible);
        assert_ne!(lollipop.location, maze.start());
        assert_ne!(lollipop.location, maze.end());
        assert_ne!(lollipop.location, ice_cream.location);
    }

    #[test]
    fn same_seed_plans_the_same_rounds() {
        let placement = BonusPlacement::default();
        let first = plan_round(&placement, &mut ChaCha8Rng::seed_from_u64(9));
        let second = plan_round(&placement, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(first, second);
    }
}
