/// Events emitted by long-running workflows.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// Periodic summary of one component, emitted every `print_every` cycles.
    Block(BlockReport),

    Message(String),
}

/// Snapshot of one component's swap-move state at the end of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockReport {
    pub cycle: usize,
    pub component: usize,
    pub integer_molecules: usize,
    pub lambda_bin: usize,
    /// Block acceptance ratios for insertion, deletion and lambda change.
    pub acceptance: [f64; 3],
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
