use crate::grid::Position;
use serde::Serialize;

/// Anything that lives on a single grid cell.
pub trait Occupant {
    fn position(&self) -> Position;

    fn is_alive(&self) -> bool;

    /// Overwrite the stored position. Only `Population` calls this, so the
    /// occupancy grid is updated in the same step.
    fn place(&mut self, position: Position);
}

/// Energy and water handed to whoever eats an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Payout {
    pub energy: f64,
    pub water: f64,
}

impl Payout {
    pub fn new(energy: f64, water: f64) -> Self {
        Payout { energy, water }
    }
}
