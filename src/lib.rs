//! A game of life engine on a bounded grid.
//!
//! - [`Grid`] owns the population and computes generations atomically.
//! - [`RuleSet`] maps a cell's state and neighbor count to its next state.
//! - [`Driver`] adds the start/pause/reset lifecycle on a repeating schedule, and
//!   [`Sim`] runs it on its own thread behind a [`SimHandle`].
//!
//! ```
//! use golife::{Grid, Population, RuleSet};
//!
//! let blinker = Population::from_rows(&[[0, 0, 0], [1, 1, 1], [0, 0, 0]]).unwrap();
//! let mut grid = Grid::built(3, 3).unwrap();
//! grid.set_population(Some(&blinker)).unwrap();
//! grid.apply_rule(&RuleSet::Standard).unwrap();
//! assert_eq!(
//!     grid.population().unwrap().to_rows(),
//!     vec![vec![0, 1, 0], vec![0, 1, 0], vec![0, 1, 0]]
//! );
//! ```

pub use utils::Pos;
mod utils;

pub use error::{Error, Result};
mod error;

pub use population::{Cell, Population};
mod population;

pub use grid::Grid;
mod grid;

pub use rules::{identity_rule, standard_rule, LifeLikeRule, Rule, RuleSet};
pub mod rules;

pub use presets::PresetCatalog;
mod presets;

pub use config::{SimConfig, DEFAULT_INTERVAL};
pub mod config;

pub use sim::{Driver, Schedule, Sim, SimCmd, SimHandle, Status};
mod sim;
