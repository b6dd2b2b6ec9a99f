//! Resolves the per-species tables of a [`Config`] into the plain trait
//! structs the entities carry.

use warren_config::{Config, SpeciesSettings};
use warren_core::{Diet, FaunaTraits, FloraTraits, Species};

const HOURS_PER_DAY: f64 = 24.0;

/// Traits for every species in a run, resolved once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesTable {
    pub rabbit: FaunaTraits,
    pub fox: FaunaTraits,
    pub grass: FloraTraits,
}

impl SpeciesTable {
    pub fn from_config(config: &Config) -> Self {
        SpeciesTable {
            rabbit: fauna_traits(config, Species::Rabbit),
            fox: fauna_traits(config, Species::Fox),
            grass: grass_traits(config),
        }
    }

    pub fn fauna(&self, species: Species) -> FaunaTraits {
        match species {
            Species::Rabbit => self.rabbit,
            Species::Fox => self.fox,
        }
    }
}

pub fn fauna_traits(config: &Config, species: Species) -> FaunaTraits {
    let f = &config.fauna;
    let (table, diet, steps_per_hour): (&SpeciesSettings, Diet, u32) = match species {
        Species::Rabbit => (&f.rabbit, Diet::HERBIVORE, 1),
        Species::Fox => (&f.fox, Diet::OMNIVORE, f.extra_fox_steps),
    };

    // Costs are per decision cycle, so a fox stepping several times an hour
    // burns the same amount per hour as a rabbit of equal size.
    let cycles_per_day = HOURS_PER_DAY * steps_per_hour as f64;
    let energy_move_cost = table.max_energy / (cycles_per_day * f.energy_move_factor);
    let water_move_cost = table.max_water / (cycles_per_day * f.water_move_factor);

    FaunaTraits {
        species,
        diet,
        max_energy: table.max_energy,
        max_water: table.max_water,
        drink_amount: table.drink_amount,
        natural_temp: table.natural_temp,
        hungry: table.max_energy * f.hungry_percent,
        starve: table.max_energy * f.starve_percent,
        thirsty: table.max_water * f.thirsty_percent,
        desiccate: table.max_water * f.desiccate_percent,
        froze: table.natural_temp + f.froze_offset,
        boiled: table.natural_temp + f.boiled_offset,
        energy_move_cost,
        water_move_cost,
        energy_wait_cost: energy_move_cost / f.energy_wait_reduce,
        water_wait_cost: water_move_cost / f.water_wait_reduce,
        temp_transfer: f.temp_transfer,
        energy_value: table.max_energy * f.energy_percent,
        water_value: table.max_water * f.water_percent,
        steps_per_hour,
    }
}

pub fn grass_traits(config: &Config) -> FloraTraits {
    let g = &config.flora.grass;
    FloraTraits {
        init_size: (g.init_size_min, g.init_size_max),
        init_energy: (g.init_energy_min, g.init_energy_max),
        init_water: (g.init_water_min, g.init_water_max),
        max_units: g.max_units,
        unit_energy_cost: g.unit_energy_cost,
        unit_extra_energy: g.unit_extra_energy,
        energy_per_unit: g.unit_energy_cost * g.energy_loss,
        unit_water_cost: g.unit_water_cost,
        unit_extra_water: g.unit_extra_water,
        water_per_unit: g.unit_water_cost * g.water_loss,
    }
}
