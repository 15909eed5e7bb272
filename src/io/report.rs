use crate::{
    checks::{checker::VerificationResult, cost::*},
    io::{instance_reader::*, solution_reader::Solution},
};
use itertools::Itertools;
use serde::Serialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
};

pub const VERDICT_MATCH: &str = "cost matches";
pub const VERDICT_MISMATCH: &str = "COST MISMATCH";

/// Human readable diagnostics of a verification run: the parsed instance and
/// solution, the span of every net and the final verdict.
///
/// # Example
/// ```
/// use std::{path::PathBuf, io::stdout};
/// use partcheck::{checks::checker::check_instance_and_solution, io::report::*};
///
/// const PATH_INSTANCE: &str = "testcases/valid/two_nets.in";
/// const PATH_SOLUTION: &str = "testcases/valid/two_nets.out";
///
/// let (instance, solution, result) = check_instance_and_solution(
///         &PathBuf::from(PATH_INSTANCE),
///         &PathBuf::from(PATH_SOLUTION),
///         false,
///     )
///     .unwrap();
///
/// let report = Report::new(&instance, &solution, &result);
/// report.write_text(&mut stdout().lock()).unwrap();
/// ```
pub struct Report<'a> {
    instance: &'a Instance,
    solution: &'a Solution,
    result: &'a VerificationResult,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    max_group_area: Area,
    num_cells: usize,
    num_nets: usize,
    total_area: Option<Area>,
    min_num_groups: Option<u64>,
    cell_areas: &'a BTreeMap<CellId, Area>,
    nets: Vec<&'a BTreeSet<CellId>>,
    spans: &'a [NetSpan],
    declared_groups: i64,
    used_groups: usize,
    claimed_cost: i64,
    cost: Cost,
    matches: bool,
}

impl<'a> Report<'a> {
    pub fn new(
        instance: &'a Instance,
        solution: &'a Solution,
        result: &'a VerificationResult,
    ) -> Self {
        Self {
            instance,
            solution,
            result,
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.result.matches() {
            VERDICT_MATCH
        } else {
            VERDICT_MISMATCH
        }
    }

    pub fn write_text(&self, writer: &mut impl Write) -> std::io::Result<()> {
        let instance = self.instance;

        writeln!(writer, "max group area = {}", instance.max_group_area())?;
        writeln!(writer, "num of cells = {}", instance.num_cells())?;
        writeln!(writer, "num of nets = {}", instance.num_nets())?;
        match instance.total_area() {
            Some(area) => writeln!(writer, "total cell area = {area}")?,
            None => writeln!(writer, "total cell area = n/a")?,
        }
        match instance.min_num_groups() {
            Some(groups) => writeln!(writer, "min num of groups = {groups}")?,
            None => writeln!(writer, "min num of groups = n/a")?,
        }

        writeln!(writer, "CELL AREAS:")?;
        writeln!(
            writer,
            "{{{}}}",
            instance
                .cell_areas()
                .iter()
                .map(|(cell, area)| format!("{cell}: {area}"))
                .join(", ")
        )?;

        writeln!(writer, "NETS:")?;
        writeln!(
            writer,
            "{{{}}}",
            instance
                .nets()
                .iter()
                .enumerate()
                .map(|(net, members)| format!("{net}: {{{}}}", members.cells().iter().join(", ")))
                .join(", ")
        )?;

        for NetSpan { net, span, cost } in self.result.spans() {
            writeln!(writer, "Net {net} spans {span} groups (cost {cost})")?;
        }

        writeln!(
            writer,
            "num of groups = {} (used {})",
            self.solution.num_groups(),
            self.solution.assignment().num_distinct_groups()
        )?;
        writeln!(writer, "expected cost = {}", self.result.claimed_cost)?;
        writeln!(writer, "cost = {}", self.result.cost())?;
        writeln!(writer, "{}", self.verdict())
    }

    pub fn write_json(&self, writer: &mut impl Write) -> std::io::Result<()> {
        let instance = self.instance;
        let document = ReportDocument {
            max_group_area: instance.max_group_area(),
            num_cells: instance.num_cells(),
            num_nets: instance.num_nets(),
            total_area: instance.total_area(),
            min_num_groups: instance.min_num_groups(),
            cell_areas: instance.cell_areas(),
            nets: instance.nets().iter().map(Net::cells).collect(),
            spans: self.result.spans(),
            declared_groups: self.solution.num_groups(),
            used_groups: self.solution.assignment().num_distinct_groups(),
            claimed_cost: self.result.claimed_cost,
            cost: self.result.cost(),
            matches: self.result.matches(),
        };

        serde_json::to_writer_pretty(&mut *writer, &document)?;
        writeln!(writer)
    }
}
