use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::checks::cost::*;
use crate::io::{instance_reader::*, solution_reader::*};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CheckerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    InstanceReaderError(#[from] InstanceReaderError),

    #[error(transparent)]
    SolutionReaderError(#[from] SolutionReaderError),

    #[error("Solution does not fit the instance: {0}")]
    ReferentialIntegrity(#[from] ReferentialIntegrityError),
}

/// Recomputed cost of a solution and how it compares to the cost the
/// solution claims. A mismatch is a regular outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub claimed_cost: i64,
    pub evaluation: Evaluation,
}

impl VerificationResult {
    pub fn cost(&self) -> Cost {
        self.evaluation.cost
    }

    pub fn spans(&self) -> &[NetSpan] {
        &self.evaluation.spans
    }

    pub fn matches(&self) -> bool {
        Cost::try_from(self.claimed_cost) == Ok(self.cost())
    }
}

pub fn verify(
    instance: &Instance,
    solution: &Solution,
) -> Result<VerificationResult, ReferentialIntegrityError> {
    let evaluation = evaluate(instance, solution.assignment())?;

    Ok(VerificationResult {
        claimed_cost: solution.claimed_cost(),
        evaluation,
    })
}

/// Reads both files and recomputes the cost of the solution. Both files stay
/// open until the check completes or fails.
pub fn check_instance_and_solution(
    instance_path: &Path,
    solution_path: &Path,
    paranoid: bool,
) -> Result<(Instance, Solution, VerificationResult), CheckerError> {
    debug!("Check {solution_path:?} against {instance_path:?}");
    let instance_reader = BufReader::new(File::open(instance_path)?);
    let solution_reader = BufReader::new(File::open(solution_path)?);
    check_instance_and_solution_from(instance_reader, solution_reader, paranoid)
}

pub fn check_instance_and_solution_from(
    instance_reader: impl BufRead,
    solution_reader: impl BufRead,
    paranoid: bool,
) -> Result<(Instance, Solution, VerificationResult), CheckerError> {
    let instance = Instance::read_from(instance_reader, paranoid)?;
    let solution = Solution::read_from(solution_reader, instance.num_cells(), paranoid)?;
    let result = verify(&instance, &solution)?;

    debug!(
        "Claimed cost {}, recomputed cost {}",
        result.claimed_cost,
        result.cost()
    );

    Ok((instance, solution, result))
}
