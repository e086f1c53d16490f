use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for bomb counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether two positions touch, including diagonally. A cell counts as its own neighbor here.
pub const fn is_neighbor(a: Coord2, b: Coord2) -> bool {
    (a.0.abs_diff(b.0) <= 1) && (a.1.abs_diff(b.1) <= 1)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (width, height) = self.dim();
        let bounds = (
            Coord::try_from(width).unwrap_or(Coord::MAX),
            Coord::try_from(height).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, bounds)
    }
}

/// Walks the 3x3 window around `center` row by row, skipping the center itself.
///
/// The window is clipped to `x ∈ [0, width - 1]` and `y ∈ [0, height - 1]`, there is no wraparound.
/// A center outside the bounds has no neighbors.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    x_min: Coord,
    x_max: Coord,
    y_max: Coord,
    cursor: Option<Coord2>,
}

impl NeighborIter {
    pub fn new(center: Coord2, (width, height): Coord2) -> Self {
        let (x, y) = center;
        let x_min = x.saturating_sub(1);
        let y_min = y.saturating_sub(1);
        let x_max = x.saturating_add(1).min(width.saturating_sub(1));
        let y_max = y.saturating_add(1).min(height.saturating_sub(1));
        let cursor = (x < width && y < height).then_some((x_min, y_min));

        Self {
            center,
            x_min,
            x_max,
            y_max,
            cursor,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current @ (x, y) = self.cursor?;

            self.cursor = if x < self.x_max {
                Some((x + 1, y))
            } else if y < self.y_max {
                Some((self.x_min, y + 1))
            } else {
                None
            };

            if current != self.center {
                return Some(current);
            }
        }
    }
}
