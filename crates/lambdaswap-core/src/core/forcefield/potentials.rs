pub const COULOMB_CONSTANT: f64 = 167101.0; // In K·Å/e²

/// Soft-core Lennard-Jones energy for a pair whose combined van der Waals
/// scaling is `scaling`. Reduces to the plain 12-6 form at `scaling = 1`.
#[inline]
pub fn soft_core_lennard_jones(dist_sq: f64, epsilon: f64, sigma: f64, scaling: f64) -> f64 {
    if scaling <= 0.0 || epsilon == 0.0 {
        return 0.0;
    }
    let rho6 = (dist_sq / (sigma * sigma)).powi(3);
    let shift = 0.5 * (1.0 - scaling) * (1.0 - scaling);
    let denominator = shift + rho6;
    if denominator < 1e-12 {
        return 1e10;
    }
    let inverse = 1.0 / denominator;
    scaling * 4.0 * epsilon * (inverse * inverse - inverse)
}

/// Real-space electrostatic energy of two (already scaled) charges.
///
/// With `alpha` set, the interaction is screened by `erfc(alpha r)` as in the
/// Ewald real-space sum; without it the bare Coulomb law is used.
#[inline]
pub fn coulomb_real_space(dist: f64, q1: f64, q2: f64, alpha: Option<f64>) -> f64 {
    if q1 == 0.0 || q2 == 0.0 {
        return 0.0;
    }
    if dist < 1e-6 {
        return q1.signum() * q2.signum() * 1e10;
    }
    let screening = alpha.map_or(1.0, |a| erfc(a * dist));
    COULOMB_CONSTANT * q1 * q2 * screening / dist
}

/// Complementary error function, fractional error below 1.2e-7.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * poly.exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

#[inline]
pub fn erf(x: f64) -> f64 {
    1.0 - erfc(x)
}

/// `∫_rc^∞ r² u_LJ(r) dr` for an unshifted 12-6 potential.
#[inline]
pub fn lennard_jones_tail_integral(epsilon: f64, sigma: f64, cutoff: f64) -> f64 {
    let ratio3 = (sigma / cutoff).powi(3);
    let ratio9 = ratio3 * ratio3 * ratio3;
    4.0 * epsilon * sigma.powi(3) * (ratio9 / 9.0 - ratio3 / 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn soft_core_at_full_scaling_matches_plain_lennard_jones_minimum() {
        let sigma: f64 = 3.0;
        let r_min = 2f64.powf(1.0 / 6.0) * sigma;
        let energy = soft_core_lennard_jones(r_min * r_min, 120.0, sigma, 1.0);
        assert!(f64_approx_equal(energy, -120.0));
    }

    #[test]
    fn soft_core_at_sigma_is_zero_for_full_scaling() {
        let energy = soft_core_lennard_jones(9.0, 120.0, 3.0, 1.0);
        assert!(f64_approx_equal(energy, 0.0));
    }

    #[test]
    fn soft_core_with_zero_scaling_vanishes() {
        assert_eq!(soft_core_lennard_jones(0.01, 120.0, 3.0, 0.0), 0.0);
    }

    #[test]
    fn soft_core_stays_finite_at_overlap_for_partial_scaling() {
        let energy = soft_core_lennard_jones(0.0, 100.0, 3.0, 0.5);
        // shift = 0.125, so 0.5 * 4 * 100 * (64 - 8)
        assert!(f64_approx_equal(energy, 11200.0));
    }

    #[test]
    fn coulomb_without_screening_is_bare_coulomb_law() {
        let energy = coulomb_real_space(2.0, 1.0, -1.0, None);
        assert!(f64_approx_equal(energy, -COULOMB_CONSTANT / 2.0));
    }

    #[test]
    fn coulomb_with_screening_is_damped_by_erfc() {
        let bare = coulomb_real_space(3.0, 0.5, 0.5, None);
        let screened = coulomb_real_space(3.0, 0.5, 0.5, Some(0.3));
        assert!((screened - bare * erfc(0.9)).abs() < 1e-6);
        assert!(screened < bare);
    }

    #[test]
    fn coulomb_with_zero_charge_is_zero() {
        assert_eq!(coulomb_real_space(1e-9, 0.0, 1.0, None), 0.0);
    }

    #[test]
    fn erfc_matches_reference_values() {
        assert!((erfc(0.0) - 1.0).abs() < 1e-7);
        assert!((erfc(1.0) - 0.157_299_207_050_285).abs() < 1e-7);
        assert!((erfc(-1.0) - 1.842_700_792_949_715).abs() < 1e-7);
        assert!((erf(0.5) - 0.520_499_877_813_047).abs() < 1e-7);
    }

    #[test]
    fn lennard_jones_tail_integral_is_negative_beyond_sigma() {
        let tail = lennard_jones_tail_integral(1.0, 1.0, 2.5);
        let expected = 4.0 * (1.0 / (9.0 * 2.5f64.powi(9)) - 1.0 / (3.0 * 2.5f64.powi(3)));
        assert!(f64_approx_equal(tail, expected));
        assert!(tail < 0.0);
    }
}
