//! Per-animal decisions and the collective passes that run each hour and day.

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use warren_core::{Fauna, Flora, Neighbors, Occupant, Position};

use crate::world::{Category, World};

/// What an animal did with one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    FindWater,
    Forage,
    RandomWalk,
    Wait,
}

/// One decision cycle: seek water, else forage or track, else wander.
pub fn step<R: Rng + ?Sized>(world: &mut World, category: Category, index: usize, rng: &mut R) -> Action {
    let action = find_water(world, category, index)
        .or_else(|| forage(world, category, index, rng))
        .unwrap_or_else(|| random_walk(world, category, index, rng));

    if let Some(species) = world.population(category).get(index).map(Fauna::species) {
        world.stats.record_move(species, action);
    }
    action
}

/// Relocate through the registry and pay for the move. A rejected move
/// (target taken) costs a rest instead.
fn move_or_rest(world: &mut World, category: Category, index: usize, to: Position) -> bool {
    match world.population_mut(category).relocate(index, to) {
        Ok(()) => {
            let ambient = world.env.temperature()[to];
            if let Some(animal) = world.fauna_mut(category, index) {
                animal.exert(ambient);
            }
            true
        }
        Err(err) => {
            trace!("{:?} {} stays put: {}", category, index, err);
            if let Some(animal) = world.fauna_mut(category, index) {
                animal.rest();
            }
            false
        }
    }
}

/// A thirsty animal steps toward the nearest open water and drinks.
pub fn find_water(world: &mut World, category: Category, index: usize) -> Option<Action> {
    let animal = world.population(category).get(index)?;
    if !animal.is_thirsty() {
        return None;
    }
    let here = animal.position();
    let target = world.env.nearest_full_water(here)?;

    let next = here.step_toward(&target);
    if next == here {
        world.fauna_mut(category, index)?.rest();
    } else {
        move_or_rest(world, category, index, next);
    }

    world.fauna_mut(category, index)?.drink();
    world.stats.times_drunk += 1;
    Some(Action::FindWater)
}

/// A hungry animal moves toward food: herbivores to a neighbouring plant,
/// carnivores up the scent gradient.
pub fn forage<R: Rng + ?Sized>(
    world: &mut World,
    category: Category,
    index: usize,
    rng: &mut R,
) -> Option<Action> {
    let animal = world.population(category).get(index)?;
    if !animal.is_hungry() {
        return None;
    }
    let neighbors = world.env.scent().moore_neighbors(animal.position());

    let candidates: Neighbors = match category {
        Category::Herbivore => neighbors
            .into_iter()
            .filter(|&cell| world.plants.is_occupied(cell) && !world.herbivores.is_occupied(cell))
            .collect(),
        Category::Carnivore => strongest_scent(world, &neighbors),
    };

    let target = candidates.choose(rng).copied()?;
    move_or_rest(world, category, index, target);
    Some(Action::Forage)
}

/// Free neighbours holding the highest positive scent.
fn strongest_scent(world: &World, neighbors: &[Position]) -> Neighbors {
    let scent = world.env.scent();
    let mut best = 0.0;
    let mut candidates = Neighbors::new();
    for &cell in neighbors {
        if world.carnivores.is_occupied(cell) {
            continue;
        }
        let value = scent[cell];
        if value > best {
            best = value;
            candidates.clear();
            candidates.push(cell);
        } else if value == best && best > 0.0 {
            candidates.push(cell);
        }
    }
    candidates
}

/// Wander to a free neighbour with probability `1 - move_chance`, else wait.
pub fn random_walk<R: Rng + ?Sized>(
    world: &mut World,
    category: Category,
    index: usize,
    rng: &mut R,
) -> Action {
    let here = match world.population(category).get(index) {
        Some(animal) => animal.position(),
        None => return Action::Wait,
    };

    if rng.gen_bool(1.0 - world.fauna.move_chance) {
        let population = world.population(category);
        let free: Neighbors = population
            .occupancy()
            .moore_neighbors(here)
            .into_iter()
            .filter(|&cell| !population.is_occupied(cell))
            .collect();
        if let Some(&to) = free.choose(rng) {
            return if move_or_rest(world, category, index, to) {
                Action::RandomWalk
            } else {
                Action::Wait
            };
        }
    }

    if let Some(animal) = world.fauna_mut(category, index) {
        animal.rest();
    }
    Action::Wait
}

/// Hungry herbivores graze; hungry carnivores hunt first and graze if
/// there is nothing to catch.
pub fn animals_eat(world: &mut World) {
    for index in 0..world.herbivores.len() {
        if world.herbivores.get(index).map_or(false, Fauna::is_hungry) {
            eat_plant(world, Category::Herbivore, index);
        }
    }
    for index in 0..world.carnivores.len() {
        if world.carnivores.get(index).map_or(false, Fauna::is_hungry)
            && !carnivore_eat(world, index)
        {
            eat_plant(world, Category::Carnivore, index);
        }
    }
}

/// Catch a herbivore on the carnivore's cell or any of its eight
/// neighbours. The prey leaves the population immediately.
pub fn carnivore_eat(world: &mut World, index: usize) -> bool {
    let here = match world.carnivores.get(index) {
        Some(hunter) => hunter.position(),
        None => return false,
    };
    let prey_index = std::iter::once(here)
        .chain(world.herbivores.occupancy().moore_neighbors(here))
        .find_map(|cell| world.herbivores.index_at(cell));
    let prey_index = match prey_index {
        Some(prey_index) => prey_index,
        None => return false,
    };

    let mut prey = world.herbivores.remove(prey_index);
    let payout = prey.consumed();
    if let Some(cause) = prey.cause() {
        world.stats.deaths.record(cause);
    }
    if let Some(hunter) = world.carnivores.get_mut(index) {
        hunter.feed(payout);
    }
    trace!("Carnivore {} ate the herbivore at {:?}", index, prey.position());
    true
}

/// Eat from the plant on the animal's own cell. A plant eaten down to
/// nothing is removed.
pub fn eat_plant(world: &mut World, category: Category, index: usize) -> bool {
    let here = match world.population(category).get(index) {
        Some(animal) => animal.position(),
        None => return false,
    };
    let plant_index = match world.plants.index_at(here) {
        Some(plant_index) => plant_index,
        None => return false,
    };

    let units = world.flora.plant_units_to_eat;
    let (payout, finished) = match world.plants.get_mut(plant_index) {
        Some(plant) => {
            let payout = plant.consumed(units);
            (payout, !plant.is_alive())
        }
        None => return false,
    };
    if finished {
        world.plants.remove(plant_index);
        world.stats.plants_eaten += 1;
    }
    if let Some(animal) = world.fauna_mut(category, index) {
        animal.feed(payout);
    }
    true
}

/// Hourly photosynthesis and root uptake.
pub fn plants_absorb(world: &mut World) {
    let light = world.env.light();
    let water = world.env.water();
    let energy_factor = world.flora.energy_absorb_factor;
    let water_factor = world.flora.water_absorb_factor;
    for plant in world.plants.iter_mut() {
        let pos = plant.position();
        plant.photosynth(light[pos] * energy_factor);
        plant.drink(water[pos] * water_factor);
    }
}

pub fn check_plant_growth(world: &mut World) {
    world.plants.iter_mut().for_each(Flora::growth);
}

/// Daily death sweep over every population.
pub fn check_starved(world: &mut World) {
    let plants = world.plants.sweep(|plant| plant.health_check());
    world.stats.plants_died += plants.len() as u64;

    let herbivores = world.herbivores.sweep(|animal| animal.health_check().is_none());
    let carnivores = world.carnivores.sweep(|animal| animal.health_check().is_none());
    for animal in herbivores.iter().chain(carnivores.iter()) {
        if let Some(cause) = animal.cause() {
            world.stats.deaths.record(cause);
        }
    }
    world.stats.herbivores_died += herbivores.len() as u64;
    world.stats.carnivores_died += carnivores.len() as u64;

    debug!(
        "Sweep removed {} plants, {} herbivores, {} carnivores",
        plants.len(),
        herbivores.len(),
        carnivores.len()
    );
}

/// Each burrow puts rabbits on its free dry neighbours until the burrow
/// quota or the population cap is reached.
pub fn spawn_rabbits<R: Rng + ?Sized>(world: &mut World, rng: &mut R) -> usize {
    let burrows: Vec<Position> = world
        .env
        .burrow()
        .iter()
        .filter(|(_, is_burrow)| **is_burrow)
        .map(|(pos, _)| pos)
        .collect();
    let traits = world.species.rabbit;
    let per_burrow = world.fauna.rabbits_per_burrow;
    let cap = world.fauna.max_rabbits;

    let mut spawned = 0;
    'burrows: for burrow in burrows {
        let mut cells = world.env.burrow().moore_neighbors(burrow);
        cells.shuffle(rng);
        let mut placed = 0;
        for cell in cells {
            if world.herbivores.len() >= cap {
                break 'burrows;
            }
            if placed == per_burrow {
                break;
            }
            if world.env.is_water_body(cell) || world.herbivores.is_occupied(cell) {
                continue;
            }
            if world.herbivores.insert(Fauna::new(cell, traits)).is_ok() {
                placed += 1;
                spawned += 1;
            }
        }
    }

    debug!("Spawned {} rabbits ({} total)", spawned, world.herbivores.len());
    spawned
}

/// Roll `chance` for every empty dry cell that is not a burrow and plant
/// grass where it hits.
pub fn seed_plants<R: Rng + ?Sized>(world: &mut World, chance: f64, rng: &mut R) -> usize {
    let traits = world.species.grass;
    let mut planted = 0;
    for pos in world.env.water().positions() {
        if world.env.is_water_body(pos) || world.env.is_burrow(pos) || world.plants.is_occupied(pos) {
            continue;
        }
        if rng.gen_bool(chance) && world.plants.insert(Flora::new(pos, traits, rng)).is_ok() {
            planted += 1;
        }
    }
    planted
}

pub fn repopulate_flora<R: Rng + ?Sized>(world: &mut World, rng: &mut R) -> usize {
    let chance = world.flora.plant_repop_chance;
    let planted = seed_plants(world, chance, rng);
    debug!("Repopulated {} plants ({} total)", planted, world.plants.len());
    planted
}

/// Put up to `count` foxes on random dry cells.
pub fn place_foxes<R: Rng + ?Sized>(world: &mut World, count: usize, rng: &mut R) -> usize {
    let candidates: Vec<Position> = world
        .env
        .water()
        .positions()
        .filter(|&pos| !world.env.is_water_body(pos) && !world.carnivores.is_occupied(pos))
        .collect();
    let traits = world.species.fox;
    let mut placed = 0;
    for &pos in candidates.choose_multiple(rng, count) {
        if world.carnivores.insert(Fauna::new(pos, traits)).is_ok() {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use warren_config::Config;
    use warren_core::Grid;

    fn empty_world(length: usize, width: usize) -> World {
        let mut config = Config::default();
        config.grid.length = length;
        config.grid.width = width;
        World::new(&config)
    }

    fn add(world: &mut World, category: Category, y: usize, x: usize) -> usize {
        let traits = match category {
            Category::Herbivore => world.species.rabbit,
            Category::Carnivore => world.species.fox,
        };
        world
            .population_mut(category)
            .insert(Fauna::new(Position::new(y, x), traits))
            .unwrap()
    }

    fn add_plant(world: &mut World, y: usize, x: usize, size: f64) {
        let traits = world.species.grass;
        world
            .plants
            .insert(Flora::with_reserves(Position::new(y, x), traits, size, 1000.0, 1000.0))
            .unwrap();
    }

    #[test]
    fn full_animal_does_not_seek_water_or_food() {
        let mut world = empty_world(5, 5);
        add(&mut world, Category::Herbivore, 2, 2);
        assert_eq!(find_water(&mut world, Category::Herbivore, 0), None);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(forage(&mut world, Category::Herbivore, 0, &mut rng), None);
    }

    #[test]
    fn thirsty_animal_steps_toward_water_and_drinks() {
        let mut world = empty_world(10, 10);
        world.env.paint_water_body(0, 9, 0, 9, 0);
        let index = add(&mut world, Category::Herbivore, 5, 5);
        world.herbivores.get_mut(index).unwrap().set_water(100.0);

        let action = find_water(&mut world, Category::Herbivore, index);

        assert_eq!(action, Some(Action::FindWater));
        let rabbit = world.herbivores.get(index).unwrap();
        assert_eq!(rabbit.position(), Position::new(4, 6));
        assert!(rabbit.water() > 190.0);
        assert_eq!(world.stats.times_drunk, 1);
        assert!(world.is_coherent());
    }

    #[test]
    fn blocked_step_still_drinks() {
        let mut world = empty_world(10, 10);
        world.env.paint_water_body(5, 9, 5, 9, 0);
        let index = add(&mut world, Category::Herbivore, 5, 5);
        add(&mut world, Category::Herbivore, 5, 6);
        world.herbivores.get_mut(index).unwrap().set_water(100.0);

        assert_eq!(find_water(&mut world, Category::Herbivore, index), Some(Action::FindWater));
        let rabbit = world.herbivores.get(index).unwrap();
        assert_eq!(rabbit.position(), Position::new(5, 5));
        assert!(rabbit.water() > 190.0);
    }

    #[test]
    fn no_open_water_means_no_action() {
        let mut world = empty_world(6, 6);
        let index = add(&mut world, Category::Herbivore, 3, 3);
        world.herbivores.get_mut(index).unwrap().set_water(50.0);
        assert_eq!(find_water(&mut world, Category::Herbivore, index), None);
    }

    #[test]
    fn hungry_herbivore_moves_onto_a_plant() {
        let mut world = empty_world(6, 6);
        add_plant(&mut world, 1, 2, 3.0);
        let index = add(&mut world, Category::Herbivore, 2, 2);
        world.herbivores.get_mut(index).unwrap().set_energy(600.0);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(forage(&mut world, Category::Herbivore, index, &mut rng), Some(Action::Forage));
        assert_eq!(world.herbivores.get(index).unwrap().position(), Position::new(1, 2));
    }

    #[test]
    fn herbivores_do_not_forage_into_each_other() {
        let mut world = empty_world(6, 6);
        add_plant(&mut world, 1, 2, 3.0);
        let index = add(&mut world, Category::Herbivore, 2, 2);
        add(&mut world, Category::Herbivore, 1, 2);
        world.herbivores.get_mut(index).unwrap().set_energy(600.0);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(forage(&mut world, Category::Herbivore, index, &mut rng), None);
    }

    #[test]
    fn carnivore_tracks_the_strongest_scent() {
        let mut world = empty_world(10, 10);
        add(&mut world, Category::Herbivore, 2, 2);
        let fox = add(&mut world, Category::Carnivore, 4, 4);
        world.carnivores.get_mut(fox).unwrap().set_energy(1000.0);
        let herbivores = world.herbivores.occupancy().clone();
        world.env.update_scent(&herbivores, &Grid::new(10, 10, false));

        // Only (3, 3) is within one ring of the rabbit.
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert_eq!(forage(&mut world, Category::Carnivore, fox, &mut rng), Some(Action::Forage));
        assert_eq!(world.carnivores.get(fox).unwrap().position(), Position::new(3, 3));
    }

    #[test]
    fn herbivore_picks_any_tied_plant() {
        let tied = [Position::new(1, 1), Position::new(1, 3), Position::new(3, 2)];
        let mut picked = Vec::new();
        for seed in 0..64 {
            let mut world = empty_world(6, 6);
            for cell in tied {
                add_plant(&mut world, cell.y, cell.x, 3.0);
            }
            let index = add(&mut world, Category::Herbivore, 2, 2);
            world.herbivores.get_mut(index).unwrap().set_energy(600.0);

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(forage(&mut world, Category::Herbivore, index, &mut rng), Some(Action::Forage));
            let pos = world.herbivores.get(index).unwrap().position();
            assert!(tied.contains(&pos), "moved to {:?}", pos);
            if !picked.contains(&pos) {
                picked.push(pos);
            }
        }
        assert_eq!(picked.len(), tied.len());
    }

    #[test]
    fn carnivore_picks_any_tied_maximum_scent() {
        // A scent source at (2, 4) reaches the fox's top row at full spread
        // and its middle row one ring further out.
        let tied = [Position::new(3, 3), Position::new(3, 4), Position::new(3, 5)];
        let mut picked = Vec::new();
        for seed in 0..64 {
            let mut config = Config::default();
            config.grid.length = 10;
            config.grid.width = 10;
            config.scent.scent_spread = 2;
            let mut world = World::new(&config);
            let mut source = Grid::new(10, 10, false);
            source[Position::new(2, 4)] = true;
            world.env.update_scent(&source, &Grid::new(10, 10, false));
            let weaker = world.env.scent()[Position::new(4, 3)];
            assert!(weaker > 0.0 && weaker < world.env.scent()[Position::new(3, 3)]);

            let fox = add(&mut world, Category::Carnivore, 4, 4);
            world.carnivores.get_mut(fox).unwrap().set_energy(1000.0);

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(forage(&mut world, Category::Carnivore, fox, &mut rng), Some(Action::Forage));
            let pos = world.carnivores.get(fox).unwrap().position();
            assert!(tied.contains(&pos), "moved to {:?}", pos);
            if !picked.contains(&pos) {
                picked.push(pos);
            }
        }
        assert_eq!(picked.len(), tied.len());
    }

    #[test]
    fn no_positive_scent_means_no_track() {
        let mut world = empty_world(10, 10);
        let fox = add(&mut world, Category::Carnivore, 4, 4);
        world.carnivores.get_mut(fox).unwrap().set_energy(1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert_eq!(forage(&mut world, Category::Carnivore, fox, &mut rng), None);
    }

    #[test]
    fn random_walk_at_a_corner_stays_on_the_grid() {
        let mut world = empty_world(5, 5);
        world.fauna.move_chance = 0.0;
        let index = add(&mut world, Category::Herbivore, 0, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            assert_eq!(random_walk(&mut world, Category::Herbivore, index, &mut rng), Action::RandomWalk);
            let pos = world.herbivores.get(index).unwrap().position();
            assert!(pos.y < 5 && pos.x < 5);
        }
    }

    #[test]
    fn surrounded_animal_waits() {
        let mut world = empty_world(2, 2);
        world.fauna.move_chance = 0.0;
        let index = add(&mut world, Category::Herbivore, 0, 0);
        add(&mut world, Category::Herbivore, 0, 1);
        add(&mut world, Category::Herbivore, 1, 0);
        add(&mut world, Category::Herbivore, 1, 1);
        let energy = world.herbivores.get(index).unwrap().energy();

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(random_walk(&mut world, Category::Herbivore, index, &mut rng), Action::Wait);
        let rabbit = world.herbivores.get(index).unwrap();
        assert_eq!(rabbit.position(), Position::new(0, 0));
        assert!(rabbit.energy() < energy);
    }

    #[test]
    fn step_records_the_action() {
        let mut world = empty_world(5, 5);
        world.fauna.move_chance = 1.0;
        add(&mut world, Category::Herbivore, 2, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(step(&mut world, Category::Herbivore, 0, &mut rng), Action::Wait);
        assert_eq!(world.stats.rabbit_moves.wait, 1);
        assert_eq!(world.stats.fox_moves.wait, 0);
    }

    #[test]
    fn carnivore_catches_a_neighbour() {
        let mut world = empty_world(6, 6);
        add(&mut world, Category::Herbivore, 3, 4);
        let fox = add(&mut world, Category::Carnivore, 2, 3);
        world.carnivores.get_mut(fox).unwrap().set_energy(1000.0);

        assert!(carnivore_eat(&mut world, fox));
        assert!(world.herbivores.is_empty());
        assert_eq!(world.stats.deaths.eaten, 1);
        assert_eq!(world.carnivores.get(fox).unwrap().energy(), 1300.0);
        assert!(world.is_coherent());
    }

    #[test]
    fn hungry_fox_with_no_prey_grazes() {
        let mut world = empty_world(6, 6);
        add_plant(&mut world, 2, 2, 1.0);
        let fox = add(&mut world, Category::Carnivore, 2, 2);
        world.carnivores.get_mut(fox).unwrap().set_energy(1000.0);

        animals_eat(&mut world);
        assert!(world.plants.is_empty());
        assert_eq!(world.stats.plants_eaten, 1);
        assert_eq!(world.carnivores.get(fox).unwrap().energy(), 1450.0);
    }

    #[test]
    fn partial_graze_leaves_the_plant() {
        let mut world = empty_world(6, 6);
        add_plant(&mut world, 2, 2, 4.0);
        let index = add(&mut world, Category::Herbivore, 2, 2);
        world.herbivores.get_mut(index).unwrap().set_energy(600.0);

        assert!(eat_plant(&mut world, Category::Herbivore, index));
        assert_eq!(world.plants.get(0).unwrap().size(), 2.0);
        assert_eq!(world.stats.plants_eaten, 0);
        assert_eq!(world.herbivores.get(index).unwrap().energy(), 1000.0);
    }

    #[test]
    fn sweep_counts_causes_once() {
        let mut world = empty_world(6, 6);
        let index = add(&mut world, Category::Herbivore, 1, 1);
        add(&mut world, Category::Carnivore, 3, 3);
        world.herbivores.get_mut(index).unwrap().set_water(10.0);
        add_plant(&mut world, 4, 4, 0.0);

        check_starved(&mut world);
        check_starved(&mut world);

        assert_eq!(world.stats.herbivores_died, 1);
        assert_eq!(world.stats.carnivores_died, 0);
        assert_eq!(world.stats.plants_died, 1);
        assert_eq!(world.stats.deaths.desiccated, 1);
        assert_eq!(world.stats.deaths.total(), 1);
        assert!(world.is_coherent());
    }

    #[test]
    fn burrows_respect_quota_and_cap() {
        let mut world = empty_world(20, 20);
        world.fauna.rabbits_per_burrow = 8;
        world.fauna.max_rabbits = 10;
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        world.env.place_burrows(3, &mut rng);

        let spawned = spawn_rabbits(&mut world, &mut rng);
        assert_eq!(spawned, world.herbivores.len());
        assert!(world.herbivores.len() <= 10);
        for rabbit in world.herbivores.iter() {
            assert!(!world.env.is_water_body(rabbit.position()));
        }
        assert!(world.is_coherent());

        assert_eq!(spawn_rabbits(&mut world, &mut rng), 0);
    }

    #[test]
    fn capped_burrow_still_counts_its_rabbits() {
        let mut world = empty_world(20, 20);
        world.fauna.rabbits_per_burrow = 8;
        world.fauna.max_rabbits = 3;
        world.env.place_burrows(1, &mut ChaCha8Rng::seed_from_u64(2));

        let spawned = spawn_rabbits(&mut world, &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(spawned, 3);
        assert_eq!(world.herbivores.len(), 3);
    }

    #[test]
    fn seeding_skips_water_and_burrows() {
        let mut world = empty_world(12, 12);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        world.env.paint_water_body(0, 0, 0, 0, 0);
        let burrows = world.env.place_burrows(4, &mut rng);

        let planted = seed_plants(&mut world, 1.0, &mut rng);

        assert_eq!(planted, 144 - 1 - burrows.len());
        for burrow in burrows {
            assert!(!world.plants.is_occupied(burrow));
        }
        assert!(!world.plants.is_occupied(Position::new(0, 0)));
    }

    #[test]
    fn plants_absorb_up_to_their_caps() {
        let mut world = empty_world(4, 4);
        add_plant(&mut world, 1, 1, 2.0);
        plants_absorb(&mut world);
        let plant = world.plants.get(0).unwrap();
        assert_eq!(plant.energy(), 2000.0);
        assert_eq!(plant.water(), 1250.0);
    }
}
