//! Additional forces applied to blob nodes

// crate modules
use crate::error::{Error, Result};
use crate::io::init_writer;
use crate::region::Region;

// ffeatools modules
use ffeatools_mesh::NodeSet;

// standard library
use std::io::Write;
use std::path::Path;

// external crates
use itertools::Itertools;
use log::{info, warn};
use nalgebra::Vector3;

/// A single kind of additional force
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Force {
    /// Fixed force along a direction
    Constant {
        direction: Vector3<f64>,
        magnitude: f64,
    },
    /// Torque about a fixed axis through a point
    ConstantTorque {
        point: Vector3<f64>,
        axis: Vector3<f64>,
        magnitude: f64,
    },
    /// Torque about the axis running from one node to another
    VariableTorque {
        base: usize,
        tip: usize,
        magnitude: f64,
    },
}

impl Force {
    /// Keyword used in the force file
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::ConstantTorque { .. } => "constant_torque",
            Self::VariableTorque { .. } => "variable_torque",
        }
    }
}

impl std::fmt::Display for Force {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Constant {
                direction: d,
                magnitude,
            } => write!(f, "constant {} {} {} {magnitude}", d.x, d.y, d.z),
            Self::ConstantTorque {
                point: p,
                axis: a,
                magnitude,
            } => write!(
                f,
                "constant_torque {} {} {} {} {} {} {magnitude}",
                p.x, p.y, p.z, a.x, a.y, a.z
            ),
            Self::VariableTorque {
                base,
                tip,
                magnitude,
            } => write!(f, "variable_torque {base} {tip} {magnitude}"),
        }
    }
}

/// Collection of forces on individual nodes
///
/// Forces are added to every node strictly inside a [Region], and a node may
/// be given any number of forces.
///
/// ```rust
/// # use ffeatools_blob::{ForceSet, Region};
/// # use ffeatools_mesh::NodeSet;
/// # use nalgebra::Vector3;
/// let nodes = NodeSet::new(vec![Vector3::new(0.5, 0.5, 0.5), Vector3::new(2.0, 0.0, 0.0)], 2);
/// let region = Region::new(Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
///
/// let mut forces = ForceSet::default();
/// let count = forces.add_constant_force(&nodes, &region, Vector3::x(), 1e-12);
///
/// assert_eq!(count, 1);
/// assert_eq!(forces.num_forced_nodes(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForceSet {
    /// Every (node, force) pair in the order added
    pub forces: Vec<(usize, Force)>,
}

impl ForceSet {
    /// Apply a force to every node in the region
    ///
    /// Returns the number of nodes forced, and an empty region is only
    /// worth a warning.
    pub fn add(&mut self, nodes: &NodeSet, region: &Region, force: Force) -> usize {
        let selected = region.select(nodes);
        if selected.is_empty() {
            warn!("No nodes inside the region, {} force not added", force.keyword());
        } else {
            info!("Applying {} force to {} nodes", force.keyword(), selected.len());
        }
        self.forces.extend(selected.iter().map(|&n| (n, force)));
        selected.len()
    }

    /// Constant force along `direction`
    pub fn add_constant_force(
        &mut self,
        nodes: &NodeSet,
        region: &Region,
        direction: Vector3<f64>,
        magnitude: f64,
    ) -> usize {
        let force = Force::Constant {
            direction,
            magnitude,
        };
        self.add(nodes, region, force)
    }

    /// Constant torque about the axis through `point` along `axis`
    pub fn add_constant_torque(
        &mut self,
        nodes: &NodeSet,
        region: &Region,
        point: Vector3<f64>,
        axis: Vector3<f64>,
        magnitude: f64,
    ) -> usize {
        let force = Force::ConstantTorque {
            point,
            axis,
            magnitude,
        };
        self.add(nodes, region, force)
    }

    /// Torque about the axis from node `base` to node `tip`
    ///
    /// The axis moves with the blob, so both nodes must exist.
    pub fn add_variable_torque(
        &mut self,
        nodes: &NodeSet,
        region: &Region,
        base: usize,
        tip: usize,
        magnitude: f64,
    ) -> Result<usize> {
        for index in [base, tip] {
            if index >= nodes.num_nodes() {
                return Err(Error::IndexOutOfRange {
                    what: "nodes",
                    index,
                    length: nodes.num_nodes(),
                });
            }
        }
        let force = Force::VariableTorque {
            base,
            tip,
            magnitude,
        };
        Ok(self.add(nodes, region, force))
    }

    /// Number of distinct nodes with at least one force
    pub fn num_forced_nodes(&self) -> usize {
        self.forces.iter().map(|(n, _)| n).unique().count()
    }

    /// Write to a `.force` file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = init_writer(path.as_ref())?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "ffea additional forces file")?;
        writeln!(writer, "num_forced_nodes {}", self.num_forced_nodes())?;
        writeln!(writer, "node|force type|stuff for type:")?;
        for (node, force) in &self.forces {
            writeln!(writer, "{node} {force}")?;
        }
        Ok(())
    }
}
