use super::statistics::{Evaluator, MoveCpuTime, TimingBucket};
use crate::core::forcefield::term::RunningEnergy;
use crate::core::interactions::{EnergyKernels, FourierBase};
use crate::core::models::atom::Atom;
use crate::core::models::system::System;
use std::time::Instant;
use thiserror::Error;

/// The evaluator that found a trial configuration infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Overlap {
    #[error("trial configuration violates the external field")]
    ExternalField,
    #[error("trial configuration overlaps the framework")]
    Framework,
    #[error("trial configuration overlaps another molecule")]
    Intermolecular,
}

/// Runs one stage of a move through the five evaluators.
///
/// Order is fixed: external field, framework, intermolecular, Ewald, tail.
/// The first evaluator reporting an overlap ends the stage, and nothing after
/// it runs. The Ewald evaluator only writes the staged (`stored`)
/// accumulators; committing them is left to the caller.
pub fn evaluate<K: EnergyKernels + ?Sized>(
    kernels: &K,
    system: &mut System,
    base: FourierBase,
    trial: &[Atom],
    reference: &[Atom],
    cpu_time: &mut MoveCpuTime,
    bucket: TimingBucket,
) -> Result<RunningEnergy, Overlap> {
    let (ctx, fourier) = system.energy_context();
    let mut timed = |evaluator: Evaluator, start: Instant| cpu_time.add(bucket, evaluator, start.elapsed());

    let start = Instant::now();
    let external_field = kernels.external_field_difference(&ctx, trial, reference);
    timed(Evaluator::ExternalField, start);
    let mut energy = external_field.ok_or(Overlap::ExternalField)?;

    let start = Instant::now();
    let framework = kernels.framework_molecule_difference(&ctx, trial, reference);
    timed(Evaluator::Framework, start);
    energy += framework.ok_or(Overlap::Framework)?;

    let start = Instant::now();
    let intermolecular = kernels.intermolecular_difference(&ctx, trial, reference);
    timed(Evaluator::Intermolecular, start);
    energy += intermolecular.ok_or(Overlap::Intermolecular)?;

    let start = Instant::now();
    energy += kernels.ewald_fourier_difference(&ctx, fourier, base, trial, reference);
    timed(Evaluator::Ewald, start);

    let start = Instant::now();
    energy += kernels.tail_correction_difference(&ctx, trial, reference);
    timed(Evaluator::Tail, start);

    Ok(energy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{ScriptedKernels, test_system};

    #[test]
    fn successful_stage_sums_all_five_contributions() {
        let kernels = ScriptedKernels::uniform(1.0);
        let mut system = test_system(1.0, 0);
        let mut cpu = MoveCpuTime::default();

        let energy = evaluate(&kernels, &mut system, FourierBase::Total, &[], &[], &mut cpu, TimingBucket::LambdaChange)
            .unwrap();

        assert!((energy.potential_energy() - 5.0).abs() < 1e-12);
        assert_eq!(kernels.calls(), 5);
    }

    #[test]
    fn overlap_stops_the_pipeline_at_the_failing_evaluator() {
        let kernels = ScriptedKernels::uniform(1.0).with_overlap_at(Evaluator::Framework);
        let mut system = test_system(1.0, 0);
        let mut cpu = MoveCpuTime::default();

        let result = evaluate(&kernels, &mut system, FourierBase::Total, &[], &[], &mut cpu, TimingBucket::Insertion);

        assert_eq!(result, Err(Overlap::Framework));
        assert_eq!(kernels.calls(), 2);
        assert!(kernels.evaluated().iter().all(|e| *e != Evaluator::Ewald));
    }

    #[test]
    fn intermolecular_overlap_skips_ewald_and_tail() {
        let kernels = ScriptedKernels::uniform(1.0).with_overlap_at(Evaluator::Intermolecular);
        let mut system = test_system(1.0, 0);
        let mut cpu = MoveCpuTime::default();

        let result = evaluate(&kernels, &mut system, FourierBase::Stored, &[], &[], &mut cpu, TimingBucket::Deletion);

        assert_eq!(result, Err(Overlap::Intermolecular));
        assert_eq!(
            kernels.evaluated(),
            vec![Evaluator::ExternalField, Evaluator::Framework, Evaluator::Intermolecular]
        );
    }
}
