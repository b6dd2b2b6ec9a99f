//! The warren engine: rabbits, foxes and grass on a grid of light, water,
//! temperature and scent, advanced hour by hour.

pub mod behavior;
pub mod environment;
pub mod species;
pub mod stats;
pub mod world;

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use warren_config::{Config, ConfigError};
use warren_core::{Fauna, Flora, Population, Position, RegistryError, Species};

pub use behavior::Action;
pub use environment::{EnvironmentField, Weather};
pub use species::SpeciesTable;
pub use stats::{CauseTally, MovementTally, Statistics};
pub use world::{Category, World};

pub const HOURS_PER_DAY: u64 = 24;
pub const DAYS_PER_WEEK: u64 = 7;
pub const WEEKS_PER_MONTH: u64 = 4;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A running simulation. Single-threaded and deterministic for a given RNG.
#[derive(Debug)]
pub struct Simulation<R: Rng = ChaCha8Rng> {
    config: Config,
    world: World,
    rng: R,
    hours: u64,
}

impl Simulation<ChaCha8Rng> {
    /// Seed from `config.seed`, or from entropy when no seed is set.
    pub fn new(config: Config) -> Result<Self, SimError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Validate `config`, lay out water and burrows, then seed grass,
    /// rabbits and foxes.
    pub fn with_rng(config: Config, mut rng: R) -> Result<Self, SimError> {
        config.validate()?;

        let mut world = World::new(&config);
        world.env.init_water(&mut rng);
        world.env.place_burrows(config.fauna.num_burrows, &mut rng);
        let plants = behavior::seed_plants(&mut world, config.flora.plant_chance, &mut rng);
        let rabbits = behavior::spawn_rabbits(&mut world, &mut rng);
        let foxes = behavior::place_foxes(&mut world, config.fauna.num_foxes, &mut rng);

        debug!(
            "New {}x{} world: {} plants, {} rabbits, {} foxes",
            config.grid.length, config.grid.width, plants, rabbits, foxes
        );

        Ok(Simulation {
            config,
            world,
            rng,
            hours: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn environment(&self) -> &EnvironmentField {
        &self.world.env
    }

    pub fn plants(&self) -> &Population<Flora> {
        &self.world.plants
    }

    pub fn herbivores(&self) -> &Population<Fauna> {
        &self.world.herbivores
    }

    pub fn carnivores(&self) -> &Population<Fauna> {
        &self.world.carnivores
    }

    pub fn stats(&self) -> &Statistics {
        &self.world.stats
    }

    /// Hours simulated so far.
    pub fn clock(&self) -> u64 {
        self.hours
    }

    /// Whole days simulated so far.
    pub fn day(&self) -> u64 {
        self.hours / HOURS_PER_DAY
    }

    /// Put a fresh animal of `species` on `pos`.
    pub fn place_fauna(&mut self, species: Species, pos: Position) -> Result<&mut Fauna, SimError> {
        let traits = self.world.species.fauna(species);
        let population = self.world.population_mut(Category::of(traits.diet));
        let index = population.insert(Fauna::new(pos, traits))?;
        population
            .get_mut(index)
            .ok_or(SimError::Registry(RegistryError::MissingMember(index)))
    }

    /// Put a freshly seeded grass plant on `pos`.
    pub fn place_flora(&mut self, pos: Position) -> Result<&mut Flora, SimError> {
        let plant = Flora::new(pos, self.world.species.grass, &mut self.rng);
        let index = self.world.plants.insert(plant)?;
        self.world
            .plants
            .get_mut(index)
            .ok_or(SimError::Registry(RegistryError::MissingMember(index)))
    }

    /// Every animal takes its decision cycles, then eating, scent and
    /// photosynthesis run once.
    pub fn run_hour(&mut self) {
        let world = &mut self.world;
        let rng = &mut self.rng;

        for index in 0..world.herbivores.len() {
            behavior::step(world, Category::Herbivore, index, rng);
        }
        for index in 0..world.carnivores.len() {
            let steps = world.carnivores.get(index).map_or(1, |fox| fox.traits().steps_per_hour);
            for _ in 0..steps {
                behavior::step(world, Category::Carnivore, index, rng);
            }
        }

        self.animals_eat();
        self.update_scent();
        self.plants_absorb();

        self.hours += 1;
        trace!("Hour {} done", self.hours);
        debug_assert!(self.world.is_coherent(), "grid and list disagree after hour {}", self.hours);
    }

    /// 24 hours, then weather, temperature, plant growth and the death sweep.
    pub fn run_day(&mut self) {
        for _ in 0..HOURS_PER_DAY {
            self.run_hour();
        }

        self.weather_tick();
        self.world.env.update_temperature();
        self.check_plant_growth();
        self.check_starved();

        debug!(
            "Day {}: {} plants, {} rabbits, {} foxes",
            self.day(),
            self.world.plants.len(),
            self.world.herbivores.len(),
            self.world.carnivores.len()
        );
    }

    /// Seven days, then a chance of new grass on every empty cell.
    pub fn run_week(&mut self) {
        for _ in 0..DAYS_PER_WEEK {
            self.run_day();
        }
        self.repopulate_flora();
    }

    /// Four weeks, then the burrows breed.
    pub fn run_month(&mut self) {
        for _ in 0..WEEKS_PER_MONTH {
            self.run_week();
        }
        self.spawn_rabbits();
    }

    /// One day on the calendar: the day itself plus the weekly and monthly
    /// events that fall on its end. Twenty-eight calls match one
    /// [`run_month`](Self::run_month).
    pub fn advance_day(&mut self) {
        self.run_day();
        let day = self.day();
        if day % DAYS_PER_WEEK == 0 {
            self.repopulate_flora();
        }
        if day % (DAYS_PER_WEEK * WEEKS_PER_MONTH) == 0 {
            self.spawn_rabbits();
        }
    }

    pub fn animals_eat(&mut self) {
        behavior::animals_eat(&mut self.world);
    }

    pub fn update_scent(&mut self) {
        let world = &mut self.world;
        world
            .env
            .update_scent(world.herbivores.occupancy(), world.carnivores.occupancy());
    }

    pub fn plants_absorb(&mut self) {
        behavior::plants_absorb(&mut self.world);
    }

    /// Roll the day's weather and count rain.
    pub fn weather_tick(&mut self) -> Weather {
        let weather = self.world.env.weather_tick(&mut self.rng);
        if weather == Weather::Rain {
            self.world.stats.times_rained += 1;
        }
        weather
    }

    pub fn check_plant_growth(&mut self) {
        behavior::check_plant_growth(&mut self.world);
    }

    pub fn check_starved(&mut self) {
        behavior::check_starved(&mut self.world);
    }

    pub fn repopulate_flora(&mut self) -> usize {
        behavior::repopulate_flora(&mut self.world, &mut self.rng)
    }

    pub fn spawn_rabbits(&mut self) -> usize {
        behavior::spawn_rabbits(&mut self.world, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_core::Occupant;

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = Config::default();
        config.grid.width = 0;
        assert!(matches!(Simulation::new(config), Err(SimError::Config(_))));
    }

    #[test]
    fn same_seed_same_world() {
        let mut config = Config::default();
        config.seed = Some(99);
        let mut a = Simulation::new(config.clone()).unwrap();
        let mut b = Simulation::new(config).unwrap();
        a.run_day();
        b.run_day();
        assert_eq!(a.plants().len(), b.plants().len());
        assert_eq!(a.herbivores().len(), b.herbivores().len());
        assert_eq!(a.stats(), b.stats());
        assert_eq!(a.environment().light(), b.environment().light());
    }

    #[test]
    fn default_world_is_populated() {
        let mut config = Config::default();
        config.seed = Some(1);
        let sim = Simulation::new(config).unwrap();
        assert_eq!(sim.carnivores().len(), 3);
        assert!(!sim.herbivores().is_empty() && sim.herbivores().len() <= 25);
        assert!(sim.plants().len() > 1000);
        assert_eq!(sim.environment().burrow().count(), 5);
        assert!(sim.world().is_coherent());
        assert!(sim.plants().iter().all(|plant| {
            let env = sim.environment();
            !env.is_water_body(plant.position()) && !env.is_burrow(plant.position())
        }));
    }

    #[test]
    fn grass_never_grows_on_burrows() {
        for seed in 0..10 {
            let mut config = Config::default();
            config.seed = Some(seed);
            config.flora.plant_chance = 1.0;
            config.flora.plant_repop_chance = 1.0;
            let mut sim = Simulation::new(config).unwrap();
            sim.repopulate_flora();
            let env = sim.environment();
            assert_eq!(env.burrow().count(), 5);
            assert!(sim.plants().iter().all(|plant| !env.is_burrow(plant.position())));
        }
    }

    #[test]
    fn placement_rejects_a_taken_cell() {
        let mut config = Config::default();
        config.seed = Some(2);
        config.fauna.num_burrows = 0;
        config.fauna.num_foxes = 0;
        let mut sim = Simulation::new(config).unwrap();

        sim.place_fauna(Species::Fox, Position::new(0, 0)).unwrap();
        assert!(matches!(
            sim.place_fauna(Species::Fox, Position::new(0, 0)),
            Err(SimError::Registry(RegistryError::Occupied(_)))
        ));
        assert!(matches!(
            sim.place_fauna(Species::Rabbit, Position::new(50, 0)),
            Err(SimError::Registry(RegistryError::OutOfBounds(_)))
        ));
        // A rabbit may share the fox's cell.
        assert!(sim.place_fauna(Species::Rabbit, Position::new(0, 0)).is_ok());
    }

    #[test]
    fn calendar_days_match_a_month() {
        let mut config = Config::default();
        config.seed = Some(4);
        config.grid.length = 15;
        config.grid.width = 15;
        config.fauna.num_burrows = 2;
        let mut by_month = Simulation::new(config.clone()).unwrap();
        let mut by_day = Simulation::new(config).unwrap();

        by_month.run_month();
        for _ in 0..28 {
            by_day.advance_day();
        }

        assert_eq!(by_month.clock(), by_day.clock());
        assert_eq!(by_month.stats(), by_day.stats());
        assert_eq!(by_month.plants().len(), by_day.plants().len());
        assert_eq!(by_month.herbivores().len(), by_day.herbivores().len());
    }

    #[test]
    fn clock_counts_hours() {
        let mut config = Config::default();
        config.seed = Some(3);
        config.grid.length = 12;
        config.grid.width = 12;
        config.water.has_lake = false;
        config.fauna.num_burrows = 1;
        let mut sim = Simulation::new(config).unwrap();
        sim.run_hour();
        assert_eq!(sim.clock(), 1);
        sim.run_day();
        assert_eq!(sim.clock(), 25);
        assert_eq!(sim.day(), 1);
    }
}
