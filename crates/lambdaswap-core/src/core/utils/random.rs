use rand::Rng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

/// Source of uniform deviates consumed by the Monte Carlo moves.
///
/// The order in which a move draws numbers is part of its contract: two runs
/// fed the same stream make the same decisions.
pub trait RandomSource {
    /// Returns a deviate in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Returns an index in `[0, n)` from a single uniform draw.
    fn uniform_index(&mut self, n: usize) -> usize {
        let index = (self.uniform() * n as f64) as usize;
        index.min(n.saturating_sub(1))
    }
}

impl RandomSource for StdRng {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// Replays a fixed list of deviates, then repeats a fallback value.
///
/// Used to drive moves down a chosen path deterministically.
#[derive(Debug, Clone)]
pub struct ReplayRandom {
    values: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl ReplayRandom {
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback,
            drawn: 0,
        }
    }

    /// Number of deviates handed out so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Number of scripted deviates not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ReplayRandom {
    fn uniform(&mut self) -> f64 {
        self.drawn += 1;
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
