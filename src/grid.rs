use log::{debug, info};
use rand::Rng;

use crate::{pos, Cell, Error, Population, Pos, Result, Rule};

/// A bounded board owning the only mutable copy of its population.
///
/// Dimensions may be changed with [`Grid::set_rows`]/[`Grid::set_cols`] but only
/// take effect on the next [`Grid::build`]. Every read hands out an independent copy.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    population: Option<Population>,
    simulating: bool,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            population: None,
            simulating: false,
        }
    }

    /// Shorthand for `Grid::new(rows, cols)` followed by [`Grid::build`].
    pub fn built(rows: usize, cols: usize) -> Result<Self> {
        let mut grid = Self::new(rows, cols);
        grid.build(rows, cols)?;
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    pub fn set_cols(&mut self, cols: usize) {
        self.cols = cols;
    }

    pub fn is_built(&self) -> bool {
        self.population.is_some()
    }

    /// (Re)initializes storage to `rows x cols` dead cells, discarding prior state.
    pub fn build(&mut self, rows: usize, cols: usize) -> Result<()> {
        let population = Population::new(rows, cols)?;
        self.rows = rows;
        self.cols = cols;
        self.population = Some(population);
        info!("built {rows}x{cols} grid");
        Ok(())
    }

    /// Rebuilds with the dimensions currently set on the grid.
    pub fn rebuild(&mut self) -> Result<()> {
        self.build(self.rows, self.cols)
    }

    /// Releases the population; reads fail with [`Error::NotBuilt`] until rebuilt.
    pub fn dispose(&mut self) {
        self.population = None;
        self.simulating = false;
        debug!("disposed grid");
    }

    /// Copies `model` into the grid, or randomizes every cell when `model` is `None`.
    pub fn set_population(&mut self, model: Option<&Population>) -> Result<()> {
        match model {
            Some(model) => {
                let current = self.population_ref()?;
                if model.rows() != current.rows() || model.cols() != current.cols() {
                    return Err(Error::DimensionMismatch {
                        rows: current.rows(),
                        cols: current.cols(),
                        found_rows: model.rows(),
                        found_cols: model.cols(),
                    });
                }
                self.population = Some(model.clone());
                Ok(())
            }
            None => self.randomize_with(&mut rand::thread_rng()),
        }
    }

    /// Makes every cell independently alive with probability one half.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let (rows, cols) = {
            let current = self.population_ref()?;
            (current.rows(), current.cols())
        };
        let mut next = Population::new(rows, cols)?;
        for y in 0..rows {
            for x in 0..cols {
                next.set(pos!(x, y), Cell::from(rng.gen_bool(0.5)))?;
            }
        }
        self.population = Some(next);
        Ok(())
    }

    pub fn population(&self) -> Result<Population> {
        self.population_ref().cloned()
    }

    pub fn cell(&self, pos: Pos) -> Result<Cell> {
        self.population_ref()?
            .get(pos)
            .ok_or(Error::OutOfBounds(pos))
    }

    pub fn set_cell(&mut self, pos: Pos, alive: bool) -> Result<()> {
        self.population
            .as_mut()
            .ok_or(Error::NotBuilt)?
            .set(pos, Cell::from(alive))
    }

    /// Counts alive cells in the 3x3 block centered on `(x, y)`, the cell itself
    /// included. The block is clamped to the board: edges do not wrap.
    pub fn num_neighbors(&self, x: usize, y: usize) -> Result<u8> {
        let population = self.population_ref()?;
        if x >= population.cols() || y >= population.rows() {
            return Err(Error::OutOfBounds(Pos::saturating(x, y)));
        }
        Ok(count_block(population, x, y))
    }

    /// Computes the next generation under `rule` from the current one and
    /// commits it in a single swap. No cell sees another cell's new state.
    pub fn apply_rule<R: Rule + ?Sized>(&mut self, rule: &R) -> Result<()> {
        let current = self.population_ref()?;
        let mut next = Population::new(current.rows(), current.cols())?;
        for y in 0..current.rows() {
            for x in 0..current.cols() {
                let pos = pos!(x, y);
                let alive = current.is_alive(pos);
                let n = count_block(current, x, y);
                if rule.next(alive, n) {
                    next.set(pos, Cell::active())?;
                }
            }
        }
        self.population = Some(next);
        Ok(())
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn set_simulating(&mut self, simulating: bool) {
        self.simulating = simulating;
    }

    fn population_ref(&self) -> Result<&Population> {
        self.population.as_ref().ok_or(Error::NotBuilt)
    }
}

fn count_block(population: &Population, x: usize, y: usize) -> u8 {
    let x_range = x.saturating_sub(1)..=(x + 1).min(population.cols() - 1);
    let y_range = y.saturating_sub(1)..=(y + 1).min(population.rows() - 1);
    let mut count = 0;
    for ny in y_range {
        for nx in x_range.clone() {
            if population.is_alive(pos!(nx, ny)) {
                count += 1;
            }
        }
    }
    count
}
