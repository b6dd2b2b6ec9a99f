//! Building blocks of the warren simulation: the grid, the living things
//! that occupy it, and the populations that keep both in sync.

pub mod entity;
pub mod fauna;
pub mod flora;
pub mod grid;
pub mod registry;

pub use entity::{Occupant, Payout};
pub use fauna::{DeathCause, Diet, Fauna, FaunaTraits, Species};
pub use flora::{Flora, FloraTraits};
pub use grid::{Grid, Neighbors, Position};
pub use registry::{Population, RegistryError};
