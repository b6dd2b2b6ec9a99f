use crate::entity::{Occupant, Payout};
use crate::grid::Position;
use rand::Rng;
use serde::Serialize;

/// Species constants for a plant, resolved once from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloraTraits {
    pub init_size: (f64, f64),
    /// Initial energy range per unit of size.
    pub init_energy: (f64, f64),
    /// Initial water range per unit of size.
    pub init_water: (f64, f64),
    pub max_units: f64,
    pub unit_energy_cost: f64,
    pub unit_extra_energy: f64,
    pub energy_per_unit: f64,
    pub unit_water_cost: f64,
    pub unit_extra_water: f64,
    pub water_per_unit: f64,
}

impl FloraTraits {
    /// Energy reserve ceiling for a plant of `size` units.
    pub fn energy_cap(&self, size: f64) -> f64 {
        (self.unit_extra_energy + self.unit_energy_cost) * size
    }

    /// Water reserve ceiling for a plant of `size` units.
    pub fn water_cap(&self, size: f64) -> f64 {
        (self.unit_extra_water + self.unit_water_cost) * size
    }
}

/// A patch of grass occupying one cell.
#[derive(Debug, Clone, Serialize)]
pub struct Flora {
    position: Position,
    size: f64,
    energy: f64,
    water: f64,
    alive: bool,
    #[serde(skip)]
    traits: FloraTraits,
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

impl Flora {
    /// Seed a plant with a random size and reserves drawn from the trait ranges.
    pub fn new<R: Rng + ?Sized>(position: Position, traits: FloraTraits, rng: &mut R) -> Self {
        let size = sample(rng, traits.init_size);
        let energy = sample(rng, (traits.init_energy.0 * size, traits.init_energy.1 * size));
        let water = sample(rng, (traits.init_water.0 * size, traits.init_water.1 * size));
        Self::with_reserves(position, traits, size, energy, water)
    }

    /// Plant with explicit size and reserves; reserves are capped to the size.
    pub fn with_reserves(
        position: Position,
        traits: FloraTraits,
        size: f64,
        energy: f64,
        water: f64,
    ) -> Self {
        let size = size.clamp(0.0, traits.max_units);
        Flora {
            position,
            size,
            energy: energy.clamp(0.0, traits.energy_cap(size)),
            water: water.clamp(0.0, traits.water_cap(size)),
            alive: size > 0.0,
            traits,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn water(&self) -> f64 {
        self.water
    }

    pub fn traits(&self) -> &FloraTraits {
        &self.traits
    }

    /// Gain `amount` energy, capped by the size-scaled reserve.
    pub fn photosynth(&mut self, amount: f64) {
        self.energy = (self.energy + amount.max(0.0)).min(self.traits.energy_cap(self.size));
    }

    /// Gain `amount` water, capped by the size-scaled reserve.
    pub fn drink(&mut self, amount: f64) {
        self.water = (self.water + amount.max(0.0)).min(self.traits.water_cap(self.size));
    }

    /// Daily growth: pay one unit's cost and grow when affordable, otherwise
    /// wither by one unit.
    pub fn growth(&mut self) {
        let t = self.traits;
        if self.energy >= t.unit_energy_cost && self.water >= t.unit_water_cost {
            if self.size < t.max_units {
                self.energy -= t.unit_energy_cost;
                self.water -= t.unit_water_cost;
                self.size = (self.size + 1.0).min(t.max_units);
            }
        } else {
            self.size = (self.size - 1.0).max(0.0);
            self.recap();
        }
    }

    /// Marks the plant dead once it has no size left. Returns whether it lives.
    pub fn health_check(&mut self) -> bool {
        if self.alive && self.size <= 0.0 {
            self.alive = false;
        }
        self.alive
    }

    /// Eat up to `units` of the plant. Taking everything kills it.
    pub fn consumed(&mut self, units: f64) -> Payout {
        let t = self.traits;
        if units >= self.size {
            let payout = Payout::new(self.size * t.energy_per_unit, self.size * t.water_per_unit);
            self.size = 0.0;
            self.alive = false;
            self.recap();
            payout
        } else {
            self.size -= units;
            self.recap();
            Payout::new(units * t.energy_per_unit, units * t.water_per_unit)
        }
    }

    fn recap(&mut self) {
        self.energy = self.energy.min(self.traits.energy_cap(self.size));
        self.water = self.water.min(self.traits.water_cap(self.size));
    }
}

impl Occupant for Flora {
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
