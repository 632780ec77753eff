use std::fmt;

use crate::{pos, Error, Pos, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    active: bool,
}

impl Cell {
    pub fn active() -> Self {
        Self { active: true }
    }

    pub fn inactive() -> Self {
        Self { active: false }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl From<bool> for Cell {
    fn from(active: bool) -> Self {
        Self { active }
    }
}

impl From<u8> for Cell {
    fn from(value: u8) -> Self {
        Self::from(value != 0)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::from(value != 0)
    }
}

/// The alive/dead state of every cell of a `rows x cols` board, stored row-major.
///
/// A `Population` is a plain value: cloning it never shares storage, so a copy
/// handed out by the grid can be mutated freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Population {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Population {
    /// An all-dead population.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimension { rows, cols });
        }
        let cells = vec![Cell::inactive(); rows * cols];
        Ok(Self { rows, cols, cells })
    }

    /// Builds a population from a matrix of truthy values (`0`/`1` or booleans).
    /// Every row must have the same length.
    pub fn from_rows<R, T>(matrix: &[R]) -> Result<Self>
    where
        R: AsRef<[T]>,
        T: Copy + Into<Cell>,
    {
        let rows = matrix.len();
        let cols = matrix.first().map_or(0, |row| row.as_ref().len());
        let mut population = Self::new(rows, cols)?;
        for (y, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::RaggedPopulation {
                    row: y,
                    len: row.len(),
                    cols,
                });
            }
            let start = y * cols;
            for (slot, &value) in population.cells[start..start + cols].iter_mut().zip(row) {
                *slot = value.into();
            }
        }
        Ok(population)
    }

    /// Parses a plaintext pattern: `#` or `O` is alive, anything else is dead.
    /// Lines starting with `!` are comments; short lines are padded with dead cells.
    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| !line.starts_with('!'))
            .collect();
        let rows = lines.len();
        let cols = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let mut population = Self::new(rows, cols)?;
        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                if matches!(c, '#' | 'O') {
                    population.cells[y * cols + x] = Cell::active();
                }
            }
        }
        Ok(population)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        pos.index_in(self.rows, self.cols).map(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<()> {
        let index = pos
            .index_in(self.rows, self.cols)
            .ok_or(Error::OutOfBounds(pos))?;
        self.cells[index] = cell;
        Ok(())
    }

    pub fn is_alive(&self, pos: Pos) -> bool {
        self.get(pos).is_some_and(|cell| cell.is_active())
    }

    pub fn actives(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_active())
            .map(|(i, _)| pos!(i % self.cols, i / self.cols))
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_active()).count()
    }

    /// The population as a fresh `rows x cols` matrix of `0`/`1`.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| u8::from(cell.is_active())).collect())
            .collect()
    }

    /// Copies this pattern into the middle of an all-dead `rows x cols` population,
    /// cropping whatever does not fit.
    pub fn centered_in(&self, rows: usize, cols: usize) -> Result<Self> {
        let mut target = Self::new(rows, cols)?;
        let offset = pos!(
            (cols as i32 - self.cols as i32) / 2,
            (rows as i32 - self.rows as i32) / 2
        );
        for active in self.actives() {
            let shifted = active + offset;
            if let Some(i) = shifted.index_in(rows, cols) {
                target.cells[i] = Cell::active();
            }
        }
        Ok(target)
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                f.write_str(if cell.is_active() { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_dead() {
        let population = Population::new(3, 4).unwrap();
        assert_eq!(population.to_rows(), vec![vec![0; 4]; 3]);
        assert_eq!(population.alive_count(), 0);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            Population::new(0, 4),
            Err(Error::InvalidDimension { rows: 0, cols: 4 })
        ));
        assert!(matches!(
            Population::new(2, 0),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_from_rows_truthy() {
        let population = Population::from_rows(&[[0, 1, 0], [2, 0, 1]]).unwrap();
        assert_eq!(population.to_rows(), vec![vec![0, 1, 0], vec![1, 0, 1]]);

        let booleans = Population::from_rows(&[vec![true, false], vec![false, true]]).unwrap();
        assert_eq!(booleans.to_rows(), vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_from_rows_ragged() {
        let matrix = vec![vec![0, 1, 0], vec![1, 0]];
        assert!(matches!(
            Population::from_rows(&matrix),
            Err(Error::RaggedPopulation { row: 1, len: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_copies_do_not_alias() {
        let original = Population::from_rows(&[[1, 0], [0, 1]]).unwrap();
        let mut copy = original.clone();
        copy.set(pos!(0, 0), Cell::inactive()).unwrap();
        assert!(original.is_alive(pos!(0, 0)));
        assert!(!copy.is_alive(pos!(0, 0)));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut population = Population::new(2, 2).unwrap();
        assert!(matches!(
            population.set(pos!(2, 0), Cell::active()),
            Err(Error::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_from_text() {
        let population = Population::from_text("! glider\n.#\n..#\n###\n").unwrap();
        assert_eq!(
            population.to_rows(),
            vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 1, 1]]
        );
        assert_eq!(population.to_string(), ".#.\n..#\n###\n");
    }

    #[test]
    fn test_actives_order() {
        let population = Population::from_rows(&[[0, 1], [1, 0]]).unwrap();
        let actives: Vec<Pos> = population.actives().collect();
        assert_eq!(actives, vec![pos!(1, 0), pos!(0, 1)]);
    }

    #[test]
    fn test_centered_in() {
        let block = Population::from_rows(&[[1, 1], [1, 1]]).unwrap();
        let centered = block.centered_in(4, 6).unwrap();
        assert_eq!(
            centered.to_rows(),
            vec![
                vec![0, 0, 0, 0, 0, 0],
                vec![0, 0, 1, 1, 0, 0],
                vec![0, 0, 1, 1, 0, 0],
                vec![0, 0, 0, 0, 0, 0],
            ]
        );

        let cropped = block.centered_in(1, 1).unwrap();
        assert_eq!(cropped.to_rows(), vec![vec![1]]);
    }
}
