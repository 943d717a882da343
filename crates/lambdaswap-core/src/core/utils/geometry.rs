use super::random::RandomSource;
use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};
use std::f64::consts::TAU;

/// Draws a uniformly distributed rotation from three deviates (Shoemake).
pub fn random_orientation<R: RandomSource + ?Sized>(random: &mut R) -> UnitQuaternion<f64> {
    let u1 = random.uniform();
    let u2 = random.uniform();
    let u3 = random.uniform();

    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    let (s2, c2) = (TAU * u2).sin_cos();
    let (s3, c3) = (TAU * u3).sin_cos();

    UnitQuaternion::from_quaternion(Quaternion::new(b * c3, a * s2, a * c2, b * s3))
}

/// Places a rigid body template at `center` with the given orientation.
pub fn place_rigid_body(
    template: &[Vector3<f64>],
    center: &Point3<f64>,
    orientation: &UnitQuaternion<f64>,
) -> Vec<Point3<f64>> {
    template
        .iter()
        .map(|offset| center + orientation.transform_vector(offset))
        .collect()
}

/// Mass-weighted centroid of a set of points; falls back to the plain centroid
/// when all masses are zero.
pub fn center_of_mass(positions: &[Point3<f64>], masses: &[f64]) -> Point3<f64> {
    let total: f64 = masses.iter().sum();
    if positions.is_empty() {
        return Point3::origin();
    }
    if total <= 0.0 {
        let sum = positions.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        return Point3::from(sum / positions.len() as f64);
    }
    let weighted = positions
        .iter()
        .zip(masses)
        .fold(Vector3::zeros(), |acc, (p, m)| acc + p.coords * *m);
    Point3::from(weighted / total)
}
