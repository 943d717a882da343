use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Additive decomposition of a potential energy (or energy difference) in K.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningEnergy {
    pub external_field_vdw: f64,
    pub external_field_charge: f64,
    pub framework_molecule_vdw: f64,
    pub framework_molecule_charge: f64,
    pub molecule_molecule_vdw: f64,
    pub molecule_molecule_charge: f64,
    pub ewald_fourier: f64,
    pub ewald_self: f64,
    pub ewald_exclusion: f64,
    pub tail: f64,
}

impl RunningEnergy {
    #[inline]
    pub fn potential_energy(&self) -> f64 {
        self.external_field_vdw
            + self.external_field_charge
            + self.framework_molecule_vdw
            + self.framework_molecule_charge
            + self.molecule_molecule_vdw
            + self.molecule_molecule_charge
            + self.ewald_fourier
            + self.ewald_self
            + self.ewald_exclusion
            + self.tail
    }

    pub fn external_field(vdw: f64, charge: f64) -> Self {
        Self {
            external_field_vdw: vdw,
            external_field_charge: charge,
            ..Self::default()
        }
    }

    pub fn framework_molecule(vdw: f64, charge: f64) -> Self {
        Self {
            framework_molecule_vdw: vdw,
            framework_molecule_charge: charge,
            ..Self::default()
        }
    }

    pub fn molecule_molecule(vdw: f64, charge: f64) -> Self {
        Self {
            molecule_molecule_vdw: vdw,
            molecule_molecule_charge: charge,
            ..Self::default()
        }
    }

    pub fn tail_correction(tail: f64) -> Self {
        Self {
            tail,
            ..Self::default()
        }
    }

    fn zip_with(self, rhs: Self, op: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            external_field_vdw: op(self.external_field_vdw, rhs.external_field_vdw),
            external_field_charge: op(self.external_field_charge, rhs.external_field_charge),
            framework_molecule_vdw: op(self.framework_molecule_vdw, rhs.framework_molecule_vdw),
            framework_molecule_charge: op(
                self.framework_molecule_charge,
                rhs.framework_molecule_charge,
            ),
            molecule_molecule_vdw: op(self.molecule_molecule_vdw, rhs.molecule_molecule_vdw),
            molecule_molecule_charge: op(
                self.molecule_molecule_charge,
                rhs.molecule_molecule_charge,
            ),
            ewald_fourier: op(self.ewald_fourier, rhs.ewald_fourier),
            ewald_self: op(self.ewald_self, rhs.ewald_self),
            ewald_exclusion: op(self.ewald_exclusion, rhs.ewald_exclusion),
            tail: op(self.tail, rhs.tail),
        }
    }
}

impl Add for RunningEnergy {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl AddAssign for RunningEnergy {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for RunningEnergy {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Neg for RunningEnergy {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::default() - self
    }
}

impl Sum for RunningEnergy {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunningEnergy {
        RunningEnergy {
            external_field_vdw: 1.0,
            external_field_charge: 2.0,
            framework_molecule_vdw: 3.0,
            framework_molecule_charge: 4.0,
            molecule_molecule_vdw: 5.0,
            molecule_molecule_charge: 6.0,
            ewald_fourier: 7.0,
            ewald_self: 8.0,
            ewald_exclusion: 9.0,
            tail: 10.0,
        }
    }

    #[test]
    fn potential_energy_sums_every_contribution() {
        assert_eq!(sample().potential_energy(), 55.0);
    }

    #[test]
    fn default_initializes_all_fields_to_zero() {
        assert_eq!(RunningEnergy::default().potential_energy(), 0.0);
    }

    #[test]
    fn add_sums_each_field_correctly() {
        let result = sample() + sample();
        assert_eq!(result.framework_molecule_charge, 8.0);
        assert_eq!(result.tail, 20.0);
        assert_eq!(result.potential_energy(), 110.0);
    }

    #[test]
    fn add_assign_accumulates_each_field_correctly() {
        let mut a = RunningEnergy::molecule_molecule(1.0, -2.0);
        a += RunningEnergy::framework_molecule(0.5, 0.25);
        assert_eq!(a.molecule_molecule_vdw, 1.0);
        assert_eq!(a.molecule_molecule_charge, -2.0);
        assert_eq!(a.framework_molecule_vdw, 0.5);
        assert_eq!(a.potential_energy(), -0.25);
    }

    #[test]
    fn sub_and_neg_are_field_wise() {
        let a = sample();
        assert_eq!(a - a, RunningEnergy::default());
        assert_eq!((-a).potential_energy(), -55.0);
    }

    #[test]
    fn sum_folds_an_iterator_of_energies() {
        let total: RunningEnergy = [
            RunningEnergy::external_field(1.0, 0.0),
            RunningEnergy::tail_correction(-0.5),
            RunningEnergy::molecule_molecule(0.0, 2.0),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.potential_energy(), 2.5);
        assert_eq!(total.tail, -0.5);
    }
}
