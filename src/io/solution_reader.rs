use std::{collections::HashSet, io::BufRead};

use thiserror::Error;
use tracing::warn;

use crate::io::{
    instance_reader::CellId,
    line_reader::{LineReader, ParseError},
};

pub type GroupId = i64;

#[derive(Debug, Error)]
pub enum SolutionReaderError {
    #[error("Error while reading solution: {0}")]
    ParseError(#[from] ParseError),
    #[error("Warning while reading solution (paranoid mode): {0}")]
    Warning(#[from] SolutionWarning),
}

#[derive(Debug, Error, PartialEq)]
pub enum SolutionWarning {
    #[error("Line {} has extra whitespace", lineno + 1)]
    ExtraWhitespace { lineno: usize },

    #[error("Solution declares {declared} groups, but assigns cells to {found} distinct groups")]
    GroupCountMismatch { declared: i64, found: usize },

    #[error("Line {} contains content after the last cell assignment", lineno + 1)]
    TrailingContent { lineno: usize },
}

/// Group of every cell, indexed by cell id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    groups: Vec<GroupId>,
}

impl Assignment {
    pub fn new(groups: Vec<GroupId>) -> Self {
        Self { groups }
    }

    pub fn group_of(&self, cell: CellId) -> Option<GroupId> {
        self.groups.get(cell).copied()
    }

    pub fn num_distinct_groups(&self) -> usize {
        self.groups.iter().collect::<HashSet<_>>().len()
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub claimed_cost: i64,
    pub num_groups: i64,
    pub assignment: Assignment,
}

impl Solution {
    pub fn claimed_cost(&self) -> i64 {
        self.claimed_cost
    }

    /// Number of groups as declared by the solution; not validated.
    pub fn num_groups(&self) -> i64 {
        self.num_groups
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn read_from(
        mut reader: impl BufRead,
        num_cells: usize,
        paranoid: bool,
    ) -> Result<Self, SolutionReaderError> {
        let SolutionInput {
            solution,
            mut warnings,
        } = SolutionInput::process(&mut reader, num_cells);

        for w in &warnings {
            warn!(" {w}");
        }

        let solution = solution?;

        if paranoid && !warnings.is_empty() {
            return Err(SolutionReaderError::Warning(warnings.remove(0)));
        }

        Ok(solution)
    }
}

/// Outcome of parsing a solution: the solution (or the first fatal error)
/// together with all warnings collected up to that point.
pub struct SolutionInput {
    pub solution: Result<Solution, ParseError>,
    pub warnings: Vec<SolutionWarning>,
}

impl SolutionInput {
    pub fn process(reader: &mut impl BufRead, num_cells: usize) -> SolutionInput {
        let mut lines = LineReader::new(reader);
        let mut warnings = Vec::new();

        let solution = parse_solution(&mut lines, num_cells, &mut warnings);

        warnings.extend(
            lines
                .extra_whitespace()
                .iter()
                .map(|&lineno| SolutionWarning::ExtraWhitespace { lineno }),
        );

        SolutionInput { solution, warnings }
    }
}

fn parse_solution(
    lines: &mut LineReader<impl BufRead>,
    num_cells: usize,
    warnings: &mut Vec<SolutionWarning>,
) -> Result<Solution, ParseError> {
    let claimed_cost: i64 = lines.next_line("claimed cost")?.parse_single("claimed cost")?;
    let num_groups: i64 = lines
        .next_line("number of groups")?
        .parse_single("number of groups")?;

    let groups = (0..num_cells)
        .map(|_| {
            lines
                .next_line("group of cell")?
                .parse_single::<GroupId>("group id")
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(lineno) = lines.first_non_blank_remaining()? {
        warnings.push(SolutionWarning::TrailingContent { lineno });
    }

    let assignment = Assignment::new(groups);
    let found = assignment.num_distinct_groups();
    if usize::try_from(num_groups) != Ok(found) {
        warnings.push(SolutionWarning::GroupCountMismatch {
            declared: num_groups,
            found,
        });
    }

    Ok(Solution {
        claimed_cost,
        num_groups,
        assignment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_assignment_in_cell_order() {
        let data = b"1\n2\n1\n1\n2\n";
        let input = SolutionInput::process(&mut &data[..], 3);
        assert!(input.warnings.is_empty(), "{:?}", input.warnings);

        let solution = input.solution.unwrap();
        assert_eq!(solution.claimed_cost(), 1);
        assert_eq!(solution.num_groups(), 2);
        assert_eq!(solution.assignment().groups(), &[1, 1, 2]);
        assert_eq!(solution.assignment().group_of(2), Some(2));
        assert_eq!(solution.assignment().group_of(3), None);
    }

    #[test]
    fn group_ids_are_arbitrary_integers() {
        let data = b"0\n3\n-7\n1000000\n42\n";
        let solution = Solution::read_from(&data[..], 3, true).unwrap();
        assert_eq!(solution.assignment().groups(), &[-7, 1_000_000, 42]);
        assert_eq!(solution.assignment().num_distinct_groups(), 3);
    }

    #[test]
    fn paranoid_rejects_group_count_mismatch() {
        let data = b"0\n5\n1\n1\n";
        assert!(Solution::read_from(&data[..], 2, false).is_ok());
        assert!(matches!(
            Solution::read_from(&data[..], 2, true),
            Err(SolutionReaderError::Warning(
                SolutionWarning::GroupCountMismatch {
                    declared: 5,
                    found: 1
                }
            ))
        ));
    }

    macro_rules! assert_raises_error {
        ($name : ident, $str : expr, $num_cells : expr, $pat : pat) => {
            #[test]
            fn $name() {
                let data = $str;
                let input = SolutionInput::process(&mut &data[..], $num_cells);
                assert!(matches!(input.solution, Err($pat)), "{:?}", input.solution);
            }
        };
    }

    macro_rules! assert_raises_warning {
        ($name : ident, $str : expr, $num_cells : expr, $pat : pat) => {
            #[test]
            fn $name() {
                let data = $str;
                let input = SolutionInput::process(&mut &data[..], $num_cells);
                assert!(input.solution.is_ok(), "{:?}", input.solution);
                assert!(input.warnings.iter().any(|w| matches!(w, $pat)));
            }
        };
    }

    assert_raises_error!(
        missing_assignment_line,
        b"1\n2\n1\n1\n",
        3,
        ParseError::UnexpectedEof {
            lineno: 4,
            expected: "group of cell"
        }
    );

    assert_raises_error!(
        missing_group_count,
        b"1\n",
        0,
        ParseError::UnexpectedEof { lineno: 1, .. }
    );

    assert_raises_error!(
        invalid_cost,
        b"1.5\n2\n1\n",
        1,
        ParseError::InvalidInteger { lineno: 0, .. }
    );

    assert_raises_error!(
        two_groups_for_one_cell,
        b"1\n2\n1 2\n",
        1,
        ParseError::TokenCount {
            lineno: 2,
            expected: 1,
            found: 2,
            ..
        }
    );

    assert_raises_warning!(
        trailing_content,
        b"0\n1\n1\n1\n1\n",
        2,
        SolutionWarning::TrailingContent { lineno: 4 }
    );

    assert_raises_warning!(
        extra_whitespace,
        b"0\n1\n 1\n",
        1,
        SolutionWarning::ExtraWhitespace { lineno: 2 }
    );

    assert_raises_warning!(
        negative_group_count,
        b"0\n-1\n1\n",
        1,
        SolutionWarning::GroupCountMismatch {
            declared: -1,
            found: 1
        }
    );
}
