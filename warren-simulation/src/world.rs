use serde::Serialize;
use warren_config::{Config, FaunaSettings, FloraSettings};
use warren_core::{Diet, Fauna, Flora, Population};

use crate::environment::EnvironmentField;
use crate::species::SpeciesTable;
use crate::stats::Statistics;

/// Which fauna population an animal lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Herbivore,
    Carnivore,
}

impl Category {
    /// Anything that eats other fauna is tracked as a carnivore.
    pub fn of(diet: Diet) -> Self {
        if diet.eats_fauna() {
            Category::Carnivore
        } else {
            Category::Herbivore
        }
    }
}

/// All simulation state except the clock and the random source.
#[derive(Debug, Clone)]
pub struct World {
    pub env: EnvironmentField,
    pub plants: Population<Flora>,
    pub herbivores: Population<Fauna>,
    pub carnivores: Population<Fauna>,
    pub stats: Statistics,
    pub species: SpeciesTable,
    pub flora: FloraSettings,
    pub fauna: FaunaSettings,
}

impl World {
    pub fn new(config: &Config) -> Self {
        let (length, width) = (config.grid.length, config.grid.width);
        World {
            env: EnvironmentField::new(config),
            plants: Population::new(length, width),
            herbivores: Population::new(length, width),
            carnivores: Population::new(length, width),
            stats: Statistics::default(),
            species: SpeciesTable::from_config(config),
            flora: config.flora.clone(),
            fauna: config.fauna.clone(),
        }
    }

    pub fn population(&self, category: Category) -> &Population<Fauna> {
        match category {
            Category::Herbivore => &self.herbivores,
            Category::Carnivore => &self.carnivores,
        }
    }

    pub fn population_mut(&mut self, category: Category) -> &mut Population<Fauna> {
        match category {
            Category::Herbivore => &mut self.herbivores,
            Category::Carnivore => &mut self.carnivores,
        }
    }

    pub fn fauna_mut(&mut self, category: Category, index: usize) -> Option<&mut Fauna> {
        self.population_mut(category).get_mut(index)
    }

    /// Grid and list agree for every population.
    pub fn is_coherent(&self) -> bool {
        self.plants.is_coherent() && self.herbivores.is_coherent() && self.carnivores.is_coherent()
    }
}
