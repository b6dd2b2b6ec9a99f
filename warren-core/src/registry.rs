use crate::entity::Occupant;
use crate::grid::{Grid, Position};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("position {0:?} is outside the grid")]
    OutOfBounds(Position),

    #[error("cell {0:?} is already occupied")]
    Occupied(Position),

    #[error("no member at index {0}")]
    MissingMember(usize),
}

/// One category of living things: the member list plus an occupancy grid
/// that mirrors it. Every mutation goes through here so the two never
/// disagree, and a cell holds at most one member.
#[derive(Debug, Clone)]
pub struct Population<T> {
    members: Vec<T>,
    occupancy: Grid<bool>,
}

impl<T: Occupant> Population<T> {
    pub fn new(length: usize, width: usize) -> Self {
        Population {
            members: Vec::new(),
            occupancy: Grid::new(length, width, false),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.members.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.members.get_mut(index)
    }

    pub fn occupancy(&self) -> &Grid<bool> {
        &self.occupancy
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupancy.get(pos).copied().unwrap_or(false)
    }

    /// Index of the member standing on `pos`, if any.
    pub fn index_at(&self, pos: Position) -> Option<usize> {
        if !self.is_occupied(pos) {
            return None;
        }
        self.members.iter().position(|m| m.position() == pos)
    }

    fn check_free(&self, pos: Position) -> Result<(), RegistryError> {
        if !self.occupancy.contains(pos) {
            return Err(RegistryError::OutOfBounds(pos));
        }
        if self.occupancy[pos] {
            return Err(RegistryError::Occupied(pos));
        }
        Ok(())
    }

    /// Add a member at its current position.
    pub fn insert(&mut self, member: T) -> Result<usize, RegistryError> {
        let pos = member.position();
        self.check_free(pos)?;
        self.occupancy[pos] = true;
        self.members.push(member);
        Ok(self.members.len() - 1)
    }

    /// Move a member to `to`, updating grid and member together.
    pub fn relocate(&mut self, index: usize, to: Position) -> Result<(), RegistryError> {
        let from = self
            .members
            .get(index)
            .map(|m| m.position())
            .ok_or(RegistryError::MissingMember(index))?;
        if from == to {
            return Ok(());
        }
        self.check_free(to)?;
        debug_assert!(self.occupancy[from], "member {} not on the occupancy grid", index);
        self.occupancy[from] = false;
        self.occupancy[to] = true;
        self.members[index].place(to);
        Ok(())
    }

    /// Take a member out of the population. Order of the rest is preserved.
    pub fn remove(&mut self, index: usize) -> T {
        let member = self.members.remove(index);
        self.occupancy[member.position()] = false;
        member
    }

    /// Run `keep` over every member and remove the ones it rejects,
    /// returning them in list order.
    pub fn sweep(&mut self, mut keep: impl FnMut(&mut T) -> bool) -> Vec<T> {
        let mut kept = Vec::with_capacity(self.members.len());
        let mut removed = Vec::new();
        for mut member in self.members.drain(..) {
            if keep(&mut member) {
                kept.push(member);
            } else {
                self.occupancy[member.position()] = false;
                removed.push(member);
            }
        }
        self.members = kept;
        removed
    }

    /// True when the occupancy grid marks exactly the members' cells and
    /// no two members share a cell.
    pub fn is_coherent(&self) -> bool {
        if self.occupancy.count() != self.members.len() {
            return false;
        }
        self.members
            .iter()
            .all(|m| self.occupancy.get(m.position()).copied().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fauna::tests::rabbit;
    use crate::fauna::Fauna;
    use crate::flora::tests::grass;
    use crate::flora::Flora;

    fn rabbits(cells: &[(usize, usize)]) -> Population<Fauna> {
        let mut population = Population::new(5, 5);
        for &(y, x) in cells {
            population.insert(Fauna::new(Position::new(y, x), rabbit())).unwrap();
        }
        population
    }

    #[test]
    fn insert_marks_grid_and_rejects_doubles() {
        let mut population = rabbits(&[(1, 1)]);
        assert!(population.is_occupied(Position::new(1, 1)));
        assert_eq!(
            population.insert(Fauna::new(Position::new(1, 1), rabbit())),
            Err(RegistryError::Occupied(Position::new(1, 1)))
        );
        assert_eq!(
            population.insert(Fauna::new(Position::new(5, 0), rabbit())),
            Err(RegistryError::OutOfBounds(Position::new(5, 0)))
        );
        assert_eq!(population.len(), 1);
        assert!(population.is_coherent());
    }

    #[test]
    fn relocate_moves_grid_and_member_together() {
        let mut population = rabbits(&[(0, 0), (2, 2)]);
        population.relocate(0, Position::new(1, 1)).unwrap();
        assert!(!population.is_occupied(Position::new(0, 0)));
        assert!(population.is_occupied(Position::new(1, 1)));
        assert_eq!(population.get(0).unwrap().position(), Position::new(1, 1));
        assert_eq!(population.index_at(Position::new(1, 1)), Some(0));

        assert_eq!(
            population.relocate(0, Position::new(2, 2)),
            Err(RegistryError::Occupied(Position::new(2, 2)))
        );
        assert_eq!(population.get(0).unwrap().position(), Position::new(1, 1));
        assert!(population.is_coherent());
    }

    #[test]
    fn remove_clears_cell_and_keeps_order() {
        let mut population = rabbits(&[(0, 0), (1, 1), (2, 2)]);
        let removed = population.remove(1);
        assert_eq!(removed.position(), Position::new(1, 1));
        assert!(!population.is_occupied(Position::new(1, 1)));
        assert_eq!(population.get(1).unwrap().position(), Position::new(2, 2));
        assert!(population.is_coherent());
    }

    #[test]
    fn sweep_removes_the_dead_once() {
        let mut plants = Population::new(3, 3);
        plants
            .insert(Flora::with_reserves(Position::new(0, 0), grass(), 0.0, 0.0, 0.0))
            .unwrap();
        plants
            .insert(Flora::with_reserves(Position::new(1, 1), grass(), 3.0, 100.0, 100.0))
            .unwrap();

        let dead = plants.sweep(|p| p.health_check());
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].position(), Position::new(0, 0));
        assert!(plants.sweep(|p| p.health_check()).is_empty());
        assert_eq!(plants.len(), 1);
        assert!(plants.is_coherent());
    }
}
