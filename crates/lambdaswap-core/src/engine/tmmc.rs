use super::config::TmmcConfig;
use super::moves::TransitionProbabilities;

/// Transition-Matrix Monte Carlo over the integer-molecule count.
///
/// Collects the attempted transition probabilities of every swap move into a
/// collection matrix, derives the macrostate distribution `ln Π(N)` from it,
/// and, when biasing is on, feeds `-ln Π` back into the acceptance rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Tmmc {
    enabled: bool,
    use_bias: bool,
    min_macrostate: usize,
    max_macrostate: usize,
    update_every: usize,
    collection_matrix: Vec<[f64; 3]>,
    histogram: Vec<f64>,
    ln_pi: Vec<f64>,
    bias: Vec<f64>,
}

impl Default for Tmmc {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Tmmc {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            use_bias: false,
            min_macrostate: 0,
            max_macrostate: usize::MAX,
            update_every: usize::MAX,
            collection_matrix: Vec::new(),
            histogram: Vec::new(),
            ln_pi: Vec::new(),
            bias: Vec::new(),
        }
    }

    /// Creates a collecting gate over `[min, max]`. A window with
    /// `max < min` collapses to the single macrostate `min`.
    pub fn new(config: &TmmcConfig) -> Self {
        let max_macrostate = config.max_macrostate.max(config.min_macrostate);
        let states = max_macrostate - config.min_macrostate + 1;
        Self {
            enabled: true,
            use_bias: config.use_bias,
            min_macrostate: config.min_macrostate,
            max_macrostate,
            update_every: config.update_every.max(1),
            collection_matrix: vec![[0.0; 3]; states],
            histogram: vec![0.0; states],
            ln_pi: vec![0.0; states],
            bias: vec![0.0; states],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn min_macrostate(&self) -> usize {
        self.min_macrostate
    }

    pub fn max_macrostate(&self) -> usize {
        self.max_macrostate
    }

    pub fn update_every(&self) -> usize {
        self.update_every
    }

    fn index(&self, n: usize) -> Option<usize> {
        (self.enabled && n >= self.min_macrostate && n <= self.max_macrostate)
            .then(|| n - self.min_macrostate)
    }

    /// Whether a move may lead to macrostate `n`. Always true when disabled.
    pub fn allows(&self, n: usize) -> bool {
        !self.enabled || (self.min_macrostate..=self.max_macrostate).contains(&n)
    }

    /// Multiplicative acceptance bias for the transition `old -> new`.
    pub fn bias_factor(&self, new: usize, old: usize) -> f64 {
        if !self.use_bias {
            return 1.0;
        }
        match (self.index(new), self.index(old)) {
            (Some(i), Some(j)) => (self.bias[i] - self.bias[j]).exp(),
            _ => 1.0,
        }
    }

    /// Accumulates one move's probability vector at macrostate `n`.
    ///
    /// Administrative skips carry no probability mass and leave the matrix
    /// untouched.
    pub fn update_collection_matrix(&mut self, probabilities: &TransitionProbabilities, n: usize) {
        if probabilities.is_empty() {
            return;
        }
        if let Some(i) = self.index(n) {
            let row = &mut self.collection_matrix[i];
            row[0] += probabilities.deletion.clamp(0.0, 1.0);
            row[1] += probabilities.unchanged.clamp(0.0, 1.0);
            row[2] += probabilities.insertion.clamp(0.0, 1.0);
        }
    }

    pub fn record_visit(&mut self, n: usize) {
        if let Some(i) = self.index(n) {
            self.histogram[i] += 1.0;
        }
    }

    pub fn collection_matrix(&self) -> &[[f64; 3]] {
        &self.collection_matrix
    }

    pub fn histogram(&self) -> &[f64] {
        &self.histogram
    }

    pub fn ln_pi(&self) -> &[f64] {
        &self.ln_pi
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    /// Recomputes `ln Π(N)` from detailed balance between neighbouring
    /// macrostates and, when biasing, sets the bias to `-ln Π`.
    pub fn update_bias(&mut self) {
        if !self.enabled || self.collection_matrix.is_empty() {
            return;
        }
        let transition = |row: &[f64; 3], k: usize| {
            let total: f64 = row.iter().sum();
            if total > 0.0 { row[k] / total } else { 0.0 }
        };

        self.ln_pi[0] = 0.0;
        for i in 0..self.collection_matrix.len() - 1 {
            let up = transition(&self.collection_matrix[i], 2);
            let down = transition(&self.collection_matrix[i + 1], 0);
            self.ln_pi[i + 1] = if up > 0.0 && down > 0.0 {
                self.ln_pi[i] + up.ln() - down.ln()
            } else {
                self.ln_pi[i]
            };
        }

        let max = self.ln_pi.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_norm = max + self.ln_pi.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
        self.ln_pi.iter_mut().for_each(|v| *v -= log_norm);

        if self.use_bias {
            for (bias, ln_pi) in self.bias.iter_mut().zip(&self.ln_pi) {
                *bias = -ln_pi;
            }
        }
    }

    /// `(N, ln Π(N), visits)` for every macrostate in the window.
    pub fn macrostate_rows(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.ln_pi
            .iter()
            .zip(&self.histogram)
            .enumerate()
            .map(move |(i, (&ln_pi, &visits))| (self.min_macrostate + i, ln_pi, visits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmmc(min: usize, max: usize, use_bias: bool) -> Tmmc {
        Tmmc::new(&TmmcConfig {
            min_macrostate: min,
            max_macrostate: max,
            use_bias,
            update_every: 1,
        })
    }

    #[test]
    fn disabled_tmmc_allows_everything_and_never_biases() {
        let t = Tmmc::disabled();
        assert!(t.allows(0));
        assert!(t.allows(1_000_000));
        assert_eq!(t.bias_factor(3, 2), 1.0);
    }

    #[test]
    fn inverted_window_collapses_to_the_lower_bound() {
        let t = tmmc(5, 2, true);
        assert_eq!(t.min_macrostate(), 5);
        assert_eq!(t.max_macrostate(), 5);
        assert_eq!(t.histogram().len(), 1);
        assert!(t.allows(5));
        assert!(!t.allows(2));
        assert!(!t.allows(6));
    }

    #[test]
    fn allows_uses_inclusive_bounds() {
        let t = tmmc(2, 5, false);
        assert!(!t.allows(1));
        assert!(t.allows(2));
        assert!(t.allows(5));
        assert!(!t.allows(6));
    }

    #[test]
    fn collection_matrix_ignores_empty_vectors_and_out_of_range_states() {
        let mut t = tmmc(0, 2, false);
        t.update_collection_matrix(&TransitionProbabilities::SKIPPED, 1);
        t.update_collection_matrix(&TransitionProbabilities::insertion(0.4), 7);
        t.update_collection_matrix(&TransitionProbabilities::insertion(0.4), 1);
        assert_eq!(t.collection_matrix()[1], [0.0, 0.6, 0.4]);
        assert_eq!(t.collection_matrix()[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn update_bias_recovers_ratio_of_neighbouring_macrostates() {
        let mut t = tmmc(0, 1, true);
        // P(0 -> 1) = 0.5, P(1 -> 0) = 0.25, so Π(1)/Π(0) = 2.
        t.update_collection_matrix(&TransitionProbabilities::insertion(0.5), 0);
        t.update_collection_matrix(&TransitionProbabilities::deletion(0.25), 1);
        t.update_bias();

        let ln_pi = t.ln_pi();
        assert!((ln_pi[1] - ln_pi[0] - 2f64.ln()).abs() < 1e-12);
        let total: f64 = ln_pi.iter().map(|v| v.exp()).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((t.bias_factor(1, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bias_factor_is_one_without_biasing() {
        let mut t = tmmc(0, 1, false);
        t.update_collection_matrix(&TransitionProbabilities::insertion(0.5), 0);
        t.update_collection_matrix(&TransitionProbabilities::deletion(0.25), 1);
        t.update_bias();
        assert_eq!(t.bias_factor(1, 0), 1.0);
    }

    #[test]
    fn macrostate_rows_are_offset_by_the_window_start() {
        let mut t = tmmc(3, 4, false);
        t.record_visit(4);
        let rows: Vec<_> = t.macrostate_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, 4);
        assert_eq!(rows[1].2, 1.0);
    }
}
