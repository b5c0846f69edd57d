//! Seeded 2D gradient noise used to lay down the initial terrain.

use std::array;

use super::grid::Grid;
use super::seed::{ChaChaSource, RandomSource};
use crate::types::{CellState, Pos};

const TABLE_SIZE: usize = 256;

/// Gradient noise over a 256-entry permutation lattice, repeated every 256 units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseField {
    perm: [u8; TABLE_SIZE * 2],
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; TABLE_SIZE] = array::from_fn(|i| i as u8);
        let mut rng = ChaChaSource::seeded(seed);
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.next_int(0, i as i32) as usize;
            table.swap(i, j);
        }

        let perm = array::from_fn(|i| table[i % TABLE_SIZE]);
        Self { perm }
    }

    /// Noise value at `(x, y)`, normalized into `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = (x_floor as i64 & 255) as usize;
        let yi = (y_floor as i64 & 255) as usize;
        let xf = x - x_floor;
        let yf = y - y_floor;

        let u = fade(xf);
        let v = fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let bottom = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let top = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        let value = lerp(bottom, top, v);

        ((value + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Low three bits pick one of eight diagonal gradients.
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 7;
    let (u, v) = if h < 4 { (x, y) } else { (y, x) };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// Thresholds the field into an initial grid: strictly above `threshold` is NoiseActive.
pub fn seed_grid(
    field: &NoiseField,
    width: usize,
    height: usize,
    scale: f64,
    threshold: f64,
) -> Grid {
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = field.sample(x as f64 * scale, y as f64 * scale);
            if value > threshold {
                grid.set(Pos { y: y as i32, x: x as i32 }, CellState::NoiseActive);
            }
        }
    }
    grid
}
