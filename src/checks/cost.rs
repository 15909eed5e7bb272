use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::io::{
    instance_reader::{CellId, Instance, Net, NetId},
    solution_reader::Assignment,
};

pub type Cost = u64;

#[derive(Debug, Error, PartialEq)]
pub enum ReferentialIntegrityError {
    #[error("Net {net} references cell {cell}, which is not defined by the instance")]
    UnknownCell { net: NetId, cell: CellId },

    #[error("Net {net} references cell {cell}, but the solution assigns no group to it")]
    MissingAssignment { net: NetId, cell: CellId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NetSpan {
    pub net: NetId,
    /// Number of distinct groups the cells of the net are assigned to
    pub span: usize,
    pub cost: Cost,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub spans: Vec<NetSpan>,
    pub cost: Cost,
}

/// A net touching `span` groups crosses `span - 1` group boundaries and costs
/// the square of that. Nets without cells cost nothing.
pub fn net_cost(span: usize) -> Cost {
    let crossings = span.saturating_sub(1) as Cost;
    crossings * crossings
}

/// Number of distinct groups the cells of `net` are assigned to.
pub fn net_span(
    net_id: NetId,
    net: &Net,
    instance: &Instance,
    assignment: &Assignment,
) -> Result<usize, ReferentialIntegrityError> {
    let mut groups = HashSet::with_capacity(net.cells().len());

    for &cell in net.cells() {
        if !instance.has_cell(cell) {
            return Err(ReferentialIntegrityError::UnknownCell { net: net_id, cell });
        }

        let group = assignment
            .group_of(cell)
            .ok_or(ReferentialIntegrityError::MissingAssignment { net: net_id, cell })?;
        groups.insert(group);
    }

    Ok(groups.len())
}

/// Recomputes the cost of `assignment` over all nets of `instance` in
/// ascending net order. Aborts on the first net referencing a cell that is
/// either unknown to the instance or unassigned.
pub fn evaluate(
    instance: &Instance,
    assignment: &Assignment,
) -> Result<Evaluation, ReferentialIntegrityError> {
    let mut spans = Vec::with_capacity(instance.num_nets());
    for (net, members) in instance.nets().iter().enumerate() {
        let span = net_span(net, members, instance, assignment)?;
        trace!("Net {net} spans {span} groups");
        spans.push(NetSpan {
            net,
            span,
            cost: net_cost(span),
        });
    }

    let cost: Cost = spans.iter().map(|s| s.cost).sum();
    debug!("Recomputed cost {cost} over {} nets", spans.len());

    Ok(Evaluation { spans, cost })
}
