use std::fmt;
use std::ops::{Index, IndexMut};
use std::time::Duration;

/// The three outcomes a swap move can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapBranch {
    Insertion = 0,
    Deletion = 1,
    LambdaChange = 2,
}

impl SwapBranch {
    pub const ALL: [SwapBranch; 3] = [Self::Insertion, Self::Deletion, Self::LambdaChange];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::Deletion => "deletion",
            Self::LambdaChange => "lambda-change",
        }
    }
}

/// Per-branch counters of the CFCMC swap move. Block counters are cleared
/// between reporting blocks; the `total_*` counters never are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapMoveStatistics {
    pub counts: [u64; 3],
    pub total_counts: [u64; 3],
    pub constructed: [u64; 3],
    pub total_constructed: [u64; 3],
    pub accepted: [u64; 3],
    pub total_accepted: [u64; 3],
}

impl SwapMoveStatistics {
    /// An attempt that got past the administrative checks.
    pub fn record_attempt(&mut self, branch: SwapBranch) {
        self.counts[branch as usize] += 1;
        self.total_counts[branch as usize] += 1;
    }

    /// The full energy pipeline succeeded for this attempt.
    pub fn record_constructed(&mut self, branch: SwapBranch) {
        self.constructed[branch as usize] += 1;
        self.total_constructed[branch as usize] += 1;
    }

    pub fn record_accepted(&mut self, branch: SwapBranch) {
        self.accepted[branch as usize] += 1;
        self.total_accepted[branch as usize] += 1;
    }

    pub fn clear_block(&mut self) {
        self.counts = [0; 3];
        self.constructed = [0; 3];
        self.accepted = [0; 3];
    }

    /// Accepted over attempted, for the running totals.
    pub fn acceptance_ratio(&self, branch: SwapBranch) -> f64 {
        let i = branch as usize;
        if self.total_counts[i] == 0 {
            0.0
        } else {
            self.total_accepted[i] as f64 / self.total_counts[i] as f64
        }
    }

    /// Accepted over attempted within the current block.
    pub fn block_acceptance_ratio(&self, branch: SwapBranch) -> f64 {
        let i = branch as usize;
        if self.counts[i] == 0 {
            0.0
        } else {
            self.accepted[i] as f64 / self.counts[i] as f64
        }
    }
}

impl fmt::Display for SwapMoveStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for branch in SwapBranch::ALL {
            let i = branch as usize;
            writeln!(
                f,
                "{:<14} total {:>10}  constructed {:>10}  accepted {:>10}  ratio {:.6}",
                branch.name(),
                self.total_counts[i],
                self.total_constructed[i],
                self.total_accepted[i],
                self.acceptance_ratio(branch)
            )?;
        }
        Ok(())
    }
}

/// The five stages of the energy pipeline, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Evaluator {
    ExternalField = 0,
    Framework = 1,
    Intermolecular = 2,
    Ewald = 3,
    Tail = 4,
}

impl Evaluator {
    pub const ALL: [Evaluator; 5] = [
        Self::ExternalField,
        Self::Framework,
        Self::Intermolecular,
        Self::Ewald,
        Self::Tail,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ExternalField => "external-field",
            Self::Framework => "framework",
            Self::Intermolecular => "intermolecular",
            Self::Ewald => "ewald",
            Self::Tail => "tail",
        }
    }
}

/// Where CPU time of a pipeline run is booked. Lambda changes made while
/// insertion or deletion is disabled are Widom-style sampling and get their
/// own bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    Insertion = 0,
    Deletion = 1,
    LambdaChange = 2,
    Widom = 3,
}

impl TimingBucket {
    pub const ALL: [TimingBucket; 4] = [Self::Insertion, Self::Deletion, Self::LambdaChange, Self::Widom];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::Deletion => "deletion",
            Self::LambdaChange => "lambda-change",
            Self::Widom => "widom",
        }
    }
}

/// Wall time spent per bucket and evaluator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveCpuTime {
    buckets: [[Duration; 5]; 4],
}

impl MoveCpuTime {
    pub fn add(&mut self, bucket: TimingBucket, evaluator: Evaluator, elapsed: Duration) {
        self[(bucket, evaluator)] += elapsed;
    }

    pub fn bucket_total(&self, bucket: TimingBucket) -> Duration {
        self.buckets[bucket as usize].iter().sum()
    }

    pub fn total(&self) -> Duration {
        TimingBucket::ALL.iter().map(|b| self.bucket_total(*b)).sum()
    }

    pub fn merge(&mut self, other: &MoveCpuTime) {
        for bucket in TimingBucket::ALL {
            for evaluator in Evaluator::ALL {
                self[(bucket, evaluator)] += other[(bucket, evaluator)];
            }
        }
    }
}

impl Index<(TimingBucket, Evaluator)> for MoveCpuTime {
    type Output = Duration;

    fn index(&self, (bucket, evaluator): (TimingBucket, Evaluator)) -> &Duration {
        &self.buckets[bucket as usize][evaluator as usize]
    }
}

impl IndexMut<(TimingBucket, Evaluator)> for MoveCpuTime {
    fn index_mut(&mut self, (bucket, evaluator): (TimingBucket, Evaluator)) -> &mut Duration {
        &mut self.buckets[bucket as usize][evaluator as usize]
    }
}

impl fmt::Display for MoveCpuTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in TimingBucket::ALL {
            let total = self.bucket_total(bucket);
            if total.is_zero() {
                continue;
            }
            write!(f, "{:<14} {:>12.6} s |", bucket.name(), total.as_secs_f64())?;
            for evaluator in Evaluator::ALL {
                write!(
                    f,
                    " {} {:.6}",
                    evaluator.name(),
                    self[(bucket, evaluator)].as_secs_f64()
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
