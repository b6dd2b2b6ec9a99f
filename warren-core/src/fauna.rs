use crate::entity::{Occupant, Payout};
use crate::grid::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Rabbit,
    Fox,
}

/// What an animal is able to eat. Replaces a herbivore/carnivore class split:
/// a fox is simply fauna that eats both plants and other fauna.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Diet {
    eats_plants: bool,
    eats_fauna: bool,
}

impl Diet {
    pub const HERBIVORE: Diet = Diet { eats_plants: true, eats_fauna: false };
    pub const OMNIVORE: Diet = Diet { eats_plants: true, eats_fauna: true };

    pub fn eats_plants(self) -> bool {
        self.eats_plants
    }

    pub fn eats_fauna(self) -> bool {
        self.eats_fauna
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathCause {
    Starved,
    Desiccated,
    Frozen,
    Boiled,
    Eaten,
}

/// Per-species constants and the thresholds derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaunaTraits {
    pub species: Species,
    pub diet: Diet,
    pub max_energy: f64,
    pub max_water: f64,
    pub drink_amount: f64,
    pub natural_temp: f64,
    pub hungry: f64,
    pub starve: f64,
    pub thirsty: f64,
    pub desiccate: f64,
    pub froze: f64,
    pub boiled: f64,
    pub energy_move_cost: f64,
    pub water_move_cost: f64,
    pub energy_wait_cost: f64,
    pub water_wait_cost: f64,
    pub temp_transfer: f64,
    /// Most energy a predator gets from eating this animal.
    pub energy_value: f64,
    /// Most water a predator gets from eating this animal.
    pub water_value: f64,
    /// Decision cycles per simulated hour.
    pub steps_per_hour: u32,
}

/// A rabbit or fox.
#[derive(Debug, Clone, Serialize)]
pub struct Fauna {
    position: Position,
    energy: f64,
    water: f64,
    temp: f64,
    alive: bool,
    cause: Option<DeathCause>,
    #[serde(skip)]
    traits: FaunaTraits,
}

impl Fauna {
    /// A fully fed and watered animal at its species' natural temperature.
    pub fn new(position: Position, traits: FaunaTraits) -> Self {
        Fauna {
            position,
            energy: traits.max_energy,
            water: traits.max_water,
            temp: traits.natural_temp,
            alive: true,
            cause: None,
            traits,
        }
    }

    pub fn species(&self) -> Species {
        self.traits.species
    }

    pub fn diet(&self) -> Diet {
        self.traits.diet
    }

    pub fn traits(&self) -> &FaunaTraits {
        &self.traits
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn water(&self) -> f64 {
        self.water
    }

    pub fn temp(&self) -> f64 {
        self.temp
    }

    pub fn cause(&self) -> Option<DeathCause> {
        self.cause
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy.min(self.traits.max_energy);
    }

    pub fn set_water(&mut self, water: f64) {
        self.water = water.min(self.traits.max_water);
    }

    pub fn set_temp(&mut self, temp: f64) {
        self.temp = temp;
    }

    pub fn is_hungry(&self) -> bool {
        self.energy <= self.traits.hungry
    }

    pub fn is_thirsty(&self) -> bool {
        self.water <= self.traits.thirsty
    }

    /// Pay the cost of moving one cell and drift body temperature toward
    /// `ambient`. The drift is a fraction of the gap, so it never overshoots.
    pub fn exert(&mut self, ambient: f64) {
        self.temp += (ambient - self.temp) * self.traits.temp_transfer;
        self.energy -= self.traits.energy_move_cost;
        self.water -= self.traits.water_move_cost;
    }

    /// Pay the (smaller) cost of staying put.
    pub fn rest(&mut self) {
        self.energy -= self.traits.energy_wait_cost;
        self.water -= self.traits.water_wait_cost;
    }

    pub fn drink(&mut self) {
        self.water = (self.water + self.traits.drink_amount).min(self.traits.max_water);
    }

    /// Credit a meal, capped at the species maxima.
    pub fn feed(&mut self, payout: Payout) {
        self.energy = (self.energy + payout.energy).min(self.traits.max_energy);
        self.water = (self.water + payout.water).min(self.traits.max_water);
    }

    /// Eaten by a predator.
    pub fn consumed(&mut self) -> Payout {
        self.alive = false;
        self.cause = Some(DeathCause::Eaten);
        Payout::new(
            self.energy.max(0.0).min(self.traits.energy_value),
            self.water.max(0.0).min(self.traits.water_value),
        )
    }

    /// Returns the cause of death if any threshold has been breached. The
    /// first breach is remembered, so repeated calls agree.
    pub fn health_check(&mut self) -> Option<DeathCause> {
        if self.alive {
            let t = &self.traits;
            let cause = if self.energy < t.starve {
                Some(DeathCause::Starved)
            } else if self.water < t.desiccate {
                Some(DeathCause::Desiccated)
            } else if self.temp <= t.froze {
                Some(DeathCause::Frozen)
            } else if self.temp >= t.boiled {
                Some(DeathCause::Boiled)
            } else {
                None
            };
            if cause.is_some() {
                self.alive = false;
                self.cause = cause;
            }
        }
        self.cause
    }
}

impl Occupant for Fauna {
    fn position(&self) -> Position {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn place(&mut self, position: Position) {
        self.position = position;
    }
}
