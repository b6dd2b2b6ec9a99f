use serde::Serialize;
use warren_core::{DeathCause, Species};

use crate::behavior::Action;

/// Deaths broken down by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CauseTally {
    pub starved: u64,
    pub desiccated: u64,
    pub frozen: u64,
    pub boiled: u64,
    pub eaten: u64,
}

impl CauseTally {
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::Starved => self.starved += 1,
            DeathCause::Desiccated => self.desiccated += 1,
            DeathCause::Frozen => self.frozen += 1,
            DeathCause::Boiled => self.boiled += 1,
            DeathCause::Eaten => self.eaten += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.starved + self.desiccated + self.frozen + self.boiled + self.eaten
    }
}

/// How often each behaviour won a decision cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovementTally {
    pub random_walk: u64,
    pub forage: u64,
    pub find_water: u64,
    pub wait: u64,
}

impl MovementTally {
    pub fn record(&mut self, action: Action) {
        match action {
            Action::RandomWalk => self.random_walk += 1,
            Action::Forage => self.forage += 1,
            Action::FindWater => self.find_water += 1,
            Action::Wait => self.wait += 1,
        }
    }
}

/// Cumulative counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub plants_eaten: u64,
    pub plants_died: u64,
    /// Herbivores removed by the daily sweep. Predation shows up in `deaths.eaten`.
    pub herbivores_died: u64,
    pub carnivores_died: u64,
    pub deaths: CauseTally,
    pub times_drunk: u64,
    pub times_rained: u64,
    pub rabbit_moves: MovementTally,
    pub fox_moves: MovementTally,
}

impl Statistics {
    pub fn record_move(&mut self, species: Species, action: Action) {
        match species {
            Species::Rabbit => self.rabbit_moves.record(action),
            Species::Fox => self.fox_moves.record(action),
        }
    }

    pub fn moves(&self, species: Species) -> &MovementTally {
        match species {
            Species::Rabbit => &self.rabbit_moves,
            Species::Fox => &self.fox_moves,
        }
    }
}
