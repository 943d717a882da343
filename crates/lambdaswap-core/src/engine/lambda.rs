use crate::core::utils::random::RandomSource;

/// Branch of a swap move, decoded from a proposed signed bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinSelection {
    /// The fractional molecule becomes integer and a new one starts at `bin`.
    Insertion { bin: usize },
    /// The fractional molecule vanishes and an integer one continues at `bin`.
    Deletion { bin: usize },
    /// The fractional molecule moves to `bin`.
    LambdaChange { bin: usize },
}

impl BinSelection {
    pub fn bin(&self) -> usize {
        match *self {
            Self::Insertion { bin } | Self::Deletion { bin } | Self::LambdaChange { bin } => bin,
        }
    }
}

/// Discretized coupling parameter of one component's fractional molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaHistogram {
    number_of_sample_points: usize,
    delta: f64,
    current_bin: usize,
    bias_factor: Vec<f64>,
    histogram: Vec<f64>,
}

impl LambdaHistogram {
    /// Creates a histogram with `number_of_sample_points` bins and the
    /// fractional molecule in bin 0.
    pub fn new(number_of_sample_points: usize) -> Self {
        let n = number_of_sample_points.max(1);
        Self {
            number_of_sample_points: n,
            delta: 1.0 / n as f64,
            current_bin: 0,
            bias_factor: vec![0.0; n],
            histogram: vec![0.0; n],
        }
    }

    pub fn number_of_sample_points(&self) -> usize {
        self.number_of_sample_points
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn current_bin(&self) -> usize {
        self.current_bin
    }

    pub fn lambda(&self) -> f64 {
        self.lambda_of_bin(self.current_bin)
    }

    #[inline]
    pub fn lambda_of_bin(&self, bin: usize) -> f64 {
        self.delta * bin as f64
    }

    /// Moves the fractional molecule to `bin`, clamped into range.
    pub fn set_current_bin(&mut self, bin: usize) {
        self.current_bin = bin.min(self.number_of_sample_points - 1);
    }

    /// Draws a bin within `±max_change` of the current one from a single
    /// deviate. The result may lie outside `[0, N)`: values `>= N` request an
    /// insertion and negative values a deletion.
    pub fn select_new_bin<R: RandomSource + ?Sized>(&self, random: &mut R, max_change: usize) -> isize {
        let width = 2 * max_change + 1;
        let step = ((random.uniform() * width as f64) as usize).min(width - 1);
        self.current_bin as isize + step as isize - max_change as isize
    }

    /// Decodes a signed bin into the branch it encodes.
    pub fn classify(&self, selected: isize) -> BinSelection {
        let n = self.number_of_sample_points as isize;
        if selected >= n {
            BinSelection::Insertion {
                bin: (selected - n) as usize,
            }
        } else if selected < 0 {
            BinSelection::Deletion {
                bin: (selected + n) as usize,
            }
        } else {
            BinSelection::LambdaChange {
                bin: selected as usize,
            }
        }
    }

    pub fn propose<R: RandomSource + ?Sized>(&self, random: &mut R, max_change: usize) -> BinSelection {
        self.classify(self.select_new_bin(random, max_change))
    }

    pub fn bias_factor(&self) -> &[f64] {
        &self.bias_factor
    }

    /// Replaces the bias weights, e.g. from a previous run.
    pub fn set_bias_factor(&mut self, bias: &[f64]) {
        for (dst, src) in self.bias_factor.iter_mut().zip(bias) {
            *dst = *src;
        }
    }

    /// `bias[new] - bias[old]`, the bias term entering the acceptance rule.
    #[inline]
    pub fn bias_difference(&self, new_bin: usize, old_bin: usize) -> f64 {
        self.bias_factor[new_bin] - self.bias_factor[old_bin]
    }

    pub fn histogram(&self) -> &[f64] {
        &self.histogram
    }

    pub fn record_visit(&mut self) {
        self.histogram[self.current_bin] += 1.0;
    }

    pub fn clear_histogram(&mut self) {
        self.histogram.iter_mut().for_each(|h| *h = 0.0);
    }

    /// Penalises the current bin by `factor`, pushing the walk towards
    /// less-visited bins.
    pub fn wang_landau_update(&mut self, factor: f64) {
        self.bias_factor[self.current_bin] -= factor;
    }

    /// Shifts the bias so that bin 0 carries zero weight.
    pub fn normalize_bias(&mut self) {
        let reference = self.bias_factor[0];
        self.bias_factor.iter_mut().for_each(|b| *b -= reference);
    }

    /// True when every bin has been visited at least `threshold` times the
    /// mean visit count.
    pub fn is_flat(&self, threshold: f64) -> bool {
        let total: f64 = self.histogram.iter().sum();
        if total == 0.0 {
            return false;
        }
        let mean = total / self.number_of_sample_points as f64;
        self.histogram.iter().all(|&h| h >= threshold * mean)
    }

    /// Unbiased free-energy profile `-ln p(lambda)` in units of kT, shifted to
    /// zero at bin 0. Bins never visited are `None`.
    pub fn free_energy_profile(&self) -> Vec<Option<f64>> {
        let unbiased: Vec<Option<f64>> = self
            .histogram
            .iter()
            .zip(&self.bias_factor)
            .map(|(&h, &b)| (h > 0.0).then(|| -(h.ln() - b)))
            .collect();
        let shift = unbiased.first().copied().flatten().unwrap_or(0.0);
        unbiased.into_iter().map(|v| v.map(|v| v - shift)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::random::ReplayRandom;

    fn histogram_at(bins: usize, current: usize) -> LambdaHistogram {
        let mut h = LambdaHistogram::new(bins);
        h.set_current_bin(current);
        h
    }

    #[test]
    fn new_histogram_has_uniform_bin_width() {
        let h = LambdaHistogram::new(10);
        assert_eq!(h.number_of_sample_points(), 10);
        assert!((h.delta() - 0.1).abs() < 1e-12);
        assert!((h.lambda_of_bin(7) - 0.7).abs() < 1e-12);
        assert_eq!(h.current_bin(), 0);
    }

    #[test]
    fn zero_max_change_always_keeps_the_current_bin() {
        let h = histogram_at(10, 5);
        for u in [0.0, 0.3, 0.999_999] {
            let mut random = ReplayRandom::new([u], 0.0);
            assert_eq!(h.select_new_bin(&mut random, 0), 5);
            assert_eq!(random.drawn(), 1);
        }
        let mut random = ReplayRandom::new([0.5], 0.0);
        assert_eq!(h.propose(&mut random, 0), BinSelection::LambdaChange { bin: 5 });
    }

    #[test]
    fn select_new_bin_spans_the_full_excursion() {
        let h = histogram_at(10, 4);
        let mut low = ReplayRandom::new([0.0], 0.0);
        let mut high = ReplayRandom::new([0.999_999], 0.0);
        assert_eq!(h.select_new_bin(&mut low, 2), 2);
        assert_eq!(h.select_new_bin(&mut high, 2), 6);
    }

    #[test]
    fn overflow_above_last_bin_encodes_insertion() {
        let h = histogram_at(10, 9);
        let mut random = ReplayRandom::new([0.99], 0.0);
        assert_eq!(h.propose(&mut random, 1), BinSelection::Insertion { bin: 0 });
        assert_eq!(h.classify(11), BinSelection::Insertion { bin: 1 });
    }

    #[test]
    fn underflow_below_first_bin_encodes_deletion() {
        let h = histogram_at(10, 0);
        let mut random = ReplayRandom::new([0.0], 0.0);
        assert_eq!(h.propose(&mut random, 1), BinSelection::Deletion { bin: 9 });
        assert_eq!(h.classify(-3), BinSelection::Deletion { bin: 7 });
    }

    #[test]
    fn bias_difference_and_wang_landau_update_act_on_current_bin() {
        let mut h = histogram_at(4, 2);
        h.wang_landau_update(0.5);
        assert_eq!(h.bias_factor(), &[0.0, 0.0, -0.5, 0.0]);
        assert!((h.bias_difference(2, 0) + 0.5).abs() < 1e-12);

        h.set_bias_factor(&[1.0, 2.0, 3.0, 4.0]);
        h.normalize_bias();
        assert_eq!(h.bias_factor(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn is_flat_requires_every_bin_near_the_mean() {
        let mut h = histogram_at(2, 0);
        assert!(!h.is_flat(0.8));
        h.record_visit();
        h.set_current_bin(1);
        h.record_visit();
        assert!(h.is_flat(0.8));
        h.record_visit();
        h.record_visit();
        assert!(!h.is_flat(0.8));
        h.clear_histogram();
        assert_eq!(h.histogram(), &[0.0, 0.0]);
    }

    #[test]
    fn free_energy_profile_removes_the_bias() {
        let mut h = histogram_at(3, 0);
        h.set_bias_factor(&[0.0, 2f64.ln(), 0.0]);
        h.record_visit();
        h.set_current_bin(1);
        h.record_visit();
        h.record_visit();
        let profile = h.free_energy_profile();
        assert_eq!(profile[0], Some(0.0));
        assert!(profile[1].unwrap().abs() < 1e-12);
        assert_eq!(profile[2], None);
    }
}
