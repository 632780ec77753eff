use std::ops::{Add, Sub};

/// A cell coordinate, `x` being the column and `y` the row.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[macro_export]
macro_rules! pos {
    ($x:expr, $y:expr) => {
        $crate::Pos {
            x: $x as i32,
            y: $y as i32,
        }
    };
}

impl Pos {
    /// Converts unsigned coordinates, clamping each to `i32::MAX`.
    pub fn saturating(x: usize, y: usize) -> Self {
        Self {
            x: i32::try_from(x).unwrap_or(i32::MAX),
            y: i32::try_from(y).unwrap_or(i32::MAX),
        }
    }

    /// Row-major index of this position in a `rows x cols` store, if it lies inside.
    pub fn index_in(self, rows: usize, cols: usize) -> Option<usize> {
        let (x, y) = (usize::try_from(self.x).ok()?, usize::try_from(self.y).ok()?);
        (x < cols && y < rows).then_some(y * cols + x)
    }
}

impl Add for Pos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        pos!(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        pos!(self.x - rhs.x, self.y - rhs.y)
    }
}

#[test]
fn test_index_in() {
    assert_eq!(pos!(0, 0).index_in(6, 10), Some(0));
    assert_eq!(pos!(9, 5).index_in(6, 10), Some(59));
    assert_eq!(pos!(3, 2).index_in(6, 10), Some(23));
    assert_eq!(pos!(10, 0).index_in(6, 10), None);
    assert_eq!(pos!(0, 6).index_in(6, 10), None);
    assert_eq!(pos!(-1, 0).index_in(6, 10), None);
}

#[test]
fn test_saturating() {
    assert_eq!(Pos::saturating(3, 2), pos!(3, 2));
    assert_eq!(Pos::saturating((1usize << 32) + 3, 0), pos!(i32::MAX, 0));
}
