use crate::core::utils::random::RandomSource;
use nalgebra::{Point3, Vector3};

/// Orthorhombic periodic cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox {
    pub lengths: Vector3<f64>,
}

impl SimulationBox {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            lengths: Vector3::new(a, b, c),
        }
    }

    pub fn cubic(length: f64) -> Self {
        Self::new(length, length, length)
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.lengths.x * self.lengths.y * self.lengths.z
    }

    /// Wraps a separation vector into the nearest periodic image.
    #[inline]
    pub fn minimum_image(&self, dr: Vector3<f64>) -> Vector3<f64> {
        dr.zip_map(&self.lengths, |d, l| d - l * (d / l).round())
    }

    /// Squared minimum-image distance between two points.
    #[inline]
    pub fn distance_squared(&self, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
        self.minimum_image(a - b).norm_squared()
    }

    /// Uniform position inside the cell; draws x, y and z in that order.
    pub fn random_position<R: RandomSource + ?Sized>(&self, random: &mut R) -> Point3<f64> {
        let x = random.uniform() * self.lengths.x;
        let y = random.uniform() * self.lengths.y;
        let z = random.uniform() * self.lengths.z;
        Point3::new(x, y, z)
    }

    /// Half of the shortest box edge, the largest cutoff the minimum-image
    /// convention supports.
    pub fn max_cutoff(&self) -> f64 {
        0.5 * self.lengths.min()
    }
}
