//! Simulation state and its persistence

pub mod persistence;
pub mod simulation;

pub use persistence::{FileStore, MemoryStore, SaveStore, DEFAULT_SAVE_SLOT};
pub use simulation::{HistoryEntry, Penalties, SimulationState, TaskPool};
