use crate::io::line_reader::{LineReader, ParseError};

use std::{
    collections::{BTreeMap, BTreeSet},
    io::BufRead,
};

use thiserror::Error;
use tracing::{debug, warn};

pub type CellId = usize;
pub type NetId = usize;
pub type Area = i64;

pub const CELL_SECTION_MARKER: &str = ".cell";
pub const NET_SECTION_MARKER: &str = ".net";

#[derive(Debug, Error)]
pub enum InstanceReaderError {
    #[error("Error while reading instance: {0}")]
    ParseError(#[from] ParseError),
    #[error("Warning while reading instance (paranoid mode): {0}")]
    Warning(#[from] InstanceWarning),
}

#[derive(Debug, Error, PartialEq)]
pub enum InstanceWarning {
    #[error("Line {} has extra whitespace", lineno + 1)]
    ExtraWhitespace { lineno: usize },

    #[error("Line {} should be the section marker `{expected}`, but reads `{found}`", lineno + 1)]
    UnexpectedSectionMarker {
        lineno: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Line {} redefines the area of cell {cell}", lineno + 1)]
    DuplicateCell { lineno: usize, cell: CellId },

    #[error("Line {} defines cell {cell}, but cell ids should be in [0, {num_cells})", lineno + 1)]
    CellOutOfRange {
        lineno: usize,
        cell: CellId,
        num_cells: usize,
    },

    #[error("Line {} lists {found} distinct cells for net {net}, but its size was declared as {declared}", lineno + 1)]
    NetSizeMismatch {
        lineno: usize,
        net: NetId,
        declared: usize,
        found: usize,
    },

    #[error("Line {} contains content after the last net", lineno + 1)]
    TrailingContent { lineno: usize },
}

/// A hyperedge over a set of cells. The declared size is kept as read and
/// may differ from the number of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Net {
    pub lineno: usize,
    pub declared_size: usize,
    pub cells: BTreeSet<CellId>,
}

impl Net {
    pub fn new(cells: impl IntoIterator<Item = CellId>) -> Self {
        let cells: BTreeSet<_> = cells.into_iter().collect();
        Self {
            lineno: 0,
            declared_size: cells.len(),
            cells,
        }
    }

    pub fn cells(&self) -> &BTreeSet<CellId> {
        &self.cells
    }
}

#[derive(Clone, Debug)]
pub struct Instance {
    pub max_group_area: Area,
    pub num_cells: usize,
    pub cell_areas: BTreeMap<CellId, Area>,
    pub nets: Vec<Net>,
}

impl Instance {
    pub fn new(
        max_group_area: Area,
        cell_areas: impl IntoIterator<Item = (CellId, Area)>,
        nets: impl IntoIterator<Item = Net>,
    ) -> Self {
        let cell_areas: BTreeMap<_, _> = cell_areas.into_iter().collect();
        Self {
            max_group_area,
            num_cells: cell_areas.len(),
            cell_areas,
            nets: nets.into_iter().collect(),
        }
    }

    pub fn max_group_area(&self) -> Area {
        self.max_group_area
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    pub fn cell_areas(&self) -> &BTreeMap<CellId, Area> {
        &self.cell_areas
    }

    pub fn has_cell(&self, cell: CellId) -> bool {
        self.cell_areas.contains_key(&cell)
    }

    /// Nets indexed by their id
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Sum of all cell areas. `None` if it does not fit into an [`Area`].
    pub fn total_area(&self) -> Option<Area> {
        self.cell_areas
            .values()
            .try_fold(0 as Area, |total, &area| total.checked_add(area))
    }

    /// Lower bound on the number of groups any partition satisfying the area
    /// limit needs. `None` if the limit is not positive or the total area
    /// overflows.
    pub fn min_num_groups(&self) -> Option<u64> {
        if self.max_group_area <= 0 {
            return None;
        }

        let total = self.total_area()?.max(0) as u64;
        Some(total.div_ceil(self.max_group_area as u64))
    }

    pub fn read_from(mut reader: impl BufRead, paranoid: bool) -> Result<Self, InstanceReaderError> {
        let InstanceInput {
            instance,
            mut warnings,
        } = InstanceInput::process(&mut reader);

        for w in &warnings {
            warn!(" {w}");
        }

        let instance = instance?;

        if paranoid && !warnings.is_empty() {
            return Err(InstanceReaderError::Warning(warnings.remove(0)));
        }

        debug!(
            "Instance has {} cells and {} nets",
            instance.num_cells(),
            instance.num_nets()
        );

        Ok(instance)
    }
}

//////////////////////////////////////////////////////////////////

/// Outcome of parsing an instance: the instance (or the first fatal error)
/// together with all warnings collected up to that point.
pub struct InstanceInput {
    pub instance: Result<Instance, ParseError>,
    pub warnings: Vec<InstanceWarning>,
}

impl InstanceInput {
    pub fn process(reader: &mut impl BufRead) -> InstanceInput {
        let mut lines = LineReader::new(reader);
        let mut warnings = Vec::new();

        let instance = parse_instance(&mut lines, &mut warnings);

        warnings.extend(
            lines
                .extra_whitespace()
                .iter()
                .map(|&lineno| InstanceWarning::ExtraWhitespace { lineno }),
        );

        InstanceInput { instance, warnings }
    }
}

fn check_marker(
    lines: &mut LineReader<impl BufRead>,
    expected: &'static str,
    warnings: &mut Vec<InstanceWarning>,
) -> Result<(), ParseError> {
    let line = lines.next_line("section marker")?;
    let found = line.content.trim();

    if found != expected {
        warnings.push(InstanceWarning::UnexpectedSectionMarker {
            lineno: line.lineno,
            expected,
            found: found.to_string(),
        });
    }

    Ok(())
}

fn parse_instance(
    lines: &mut LineReader<impl BufRead>,
    warnings: &mut Vec<InstanceWarning>,
) -> Result<Instance, ParseError> {
    let max_group_area: Area = lines
        .next_line("max group area")?
        .parse_single("max group area")?;

    check_marker(lines, CELL_SECTION_MARKER, warnings)?;

    let num_cells: usize = lines
        .next_line("number of cells")?
        .parse_single("number of cells")?;

    let mut cell_areas = BTreeMap::new();
    for _ in 0..num_cells {
        let line = lines.next_line("cell id and area")?;
        let [cell, area] = line.fields("cell id and area")?;
        let cell: CellId = line.parse(cell, "cell id")?;
        let area: Area = line.parse(area, "cell area")?;

        if cell >= num_cells {
            warnings.push(InstanceWarning::CellOutOfRange {
                lineno: line.lineno,
                cell,
                num_cells,
            });
        }

        if cell_areas.insert(cell, area).is_some() {
            warnings.push(InstanceWarning::DuplicateCell {
                lineno: line.lineno,
                cell,
            });
        }
    }

    check_marker(lines, NET_SECTION_MARKER, warnings)?;

    let num_nets: usize = lines
        .next_line("number of nets")?
        .parse_single("number of nets")?;

    let mut nets = Vec::with_capacity(num_nets);
    for net in 0..num_nets {
        let declared_size: usize = lines.next_line("net size")?.parse_single("net size")?;

        let line = lines.next_line("cells of net")?;
        let cells: BTreeSet<CellId> = line.parse_all::<CellId>("net cell id")?.into_iter().collect();

        if cells.is_empty() {
            return Err(ParseError::EmptyNet {
                lineno: line.lineno,
                net,
            });
        }

        if cells.len() != declared_size {
            warnings.push(InstanceWarning::NetSizeMismatch {
                lineno: line.lineno,
                net,
                declared: declared_size,
                found: cells.len(),
            });
        }

        nets.push(Net {
            lineno: line.lineno,
            declared_size,
            cells,
        });
    }

    if let Some(lineno) = lines.first_non_blank_remaining()? {
        warnings.push(InstanceWarning::TrailingContent { lineno });
    }

    Ok(Instance {
        max_group_area,
        num_cells,
        cell_areas,
        nets,
    })
}
