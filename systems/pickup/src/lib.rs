#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns player steps onto visible bonus items into
//! collection commands.

use maze_sprint_core::{BonusKind, Command, Event, Phase, SessionSnapshot};

/// Reacts to movement events and requests collection of co-located items.
#[derive(Debug, Default)]
pub struct Pickup;

impl Pickup {
    /// Consumes world events and the latest snapshot to emit collection commands.
    ///
    /// Only the final movement in `events` matters: the player can stand on
    /// one cell at a time, so earlier steps of the same batch are superseded.
    pub fn handle(&mut self, events: &[Event], snapshot: &SessionSnapshot, out: &mut Vec<Command>) {
        if snapshot.phase != Phase::Running {
            return;
        }

        let Some(arrived) = events.iter().rev().find_map(|event| match event {
            Event::PlayerMoved { to, .. } => Some(*to),
            _ => None,
        }) else {
            return;
        };

        if snapshot.current_cell != Some(arrived) {
            return;
        }

        for kind in BonusKind::ALL {
            let waiting = snapshot
                .bonus(kind)
                .map_or(false, |item| item.visible && item.location == arrived);
            if waiting {
                out.push(Command::Collect { kind });
            }
        }
    }
}
