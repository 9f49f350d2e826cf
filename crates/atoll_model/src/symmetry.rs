//! Symmetry-group descriptors for analog placement constraints.

use crate::geom::Rect;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// The orientation of a symmetry axis.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SymmetryType {
    /// Mirror about a vertical line: paired modules share y, reflect in x.
    Vertical,
    /// Mirror about a horizontal line: paired modules share x, reflect in y.
    Horizontal,
}

/// A pair of modules mirrored across the symmetry axis.
///
/// The representative is the member encoded in the B*-tree; its mate is
/// positioned by reflection after packing.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SymmetryPair {
    /// Name of the in-tree representative module.
    pub rep: String,
    /// Name of the mirrored mate module.
    pub mate: String,
}

impl SymmetryPair {
    /// Creates a pair from representative and mate names.
    pub fn new(rep: impl Into<String>, mate: impl Into<String>) -> Self {
        Self {
            rep: rep.into(),
            mate: mate.into(),
        }
    }
}

/// A group of modules constrained to a mirror-symmetric placement.
///
/// Self-symmetric modules straddle the axis and mirror onto themselves; every
/// other member belongs to exactly one [`SymmetryPair`]. The axis coordinate
/// is computed during packing and written back here.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SymmetryGroup {
    /// Orientation of the symmetry axis.
    pub ty: SymmetryType,
    /// Mirrored module pairs.
    pub pairs: Vec<SymmetryPair>,
    /// Modules centered on the axis, in input order.
    pub self_symmetric: Vec<String>,
    /// Axis coordinate; negative until a packing pass computes it.
    pub axis: f64,
}

impl SymmetryGroup {
    /// Creates a group with an unset axis.
    pub fn new(ty: SymmetryType) -> Self {
        Self {
            ty,
            pairs: Vec::new(),
            self_symmetric: Vec::new(),
            axis: -1.0,
        }
    }

    /// Adds a mirrored pair; the first name is the representative.
    pub fn add_pair(&mut self, rep: impl Into<String>, mate: impl Into<String>) {
        self.pairs.push(SymmetryPair::new(rep, mate));
    }

    /// Adds a self-symmetric module.
    pub fn add_self_symmetric(&mut self, name: impl Into<String>) {
        self.self_symmetric.push(name.into());
    }

    /// Sets the axis coordinate.
    pub fn set_axis(&mut self, axis: f64) {
        self.axis = axis;
    }

    /// Returns `true` if the named module is self-symmetric.
    pub fn is_self_symmetric(&self, name: &str) -> bool {
        self.self_symmetric.iter().any(|s| s == name)
    }

    /// Returns the mate of a representative, if the name heads a pair.
    pub fn mate_of(&self, rep: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.rep == rep)
            .map(|p| p.mate.as_str())
    }

    /// Names of the in-tree representatives: pair reps first, then the
    /// self-symmetric modules, input order preserved.
    pub fn representatives(&self) -> Vec<String> {
        let mut reps: Vec<String> = self.pairs.iter().map(|p| p.rep.clone()).collect();
        reps.extend(self.self_symmetric.iter().cloned());
        reps
    }

    /// Every module name the group touches: representatives, mates, and
    /// self-symmetric modules.
    pub fn members(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.pairs.len() * 2 + self.self_symmetric.len());
        for pair in &self.pairs {
            names.push(pair.rep.clone());
            names.push(pair.mate.clone());
        }
        names.extend(self.self_symmetric.iter().cloned());
        names
    }

    /// Checks that the group's placed rectangles form a symmetry island.
    ///
    /// Builds the adjacency graph over member rectangles, where touching or
    /// overlapping rectangles are connected, and requires a single connected
    /// component. Members missing from `rects` are skipped; a group with at
    /// most one placed member is trivially an island.
    pub fn is_symmetry_island(&self, rects: &HashMap<String, Rect>) -> bool {
        let placed: Vec<&Rect> = self
            .members()
            .iter()
            .filter_map(|name| rects.get(name))
            .collect();
        if placed.len() <= 1 {
            return true;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(0usize);
        visited.insert(0usize);
        while let Some(i) = queue.pop_front() {
            for j in 0..placed.len() {
                if !visited.contains(&j) && placed[i].touches(placed[j]) {
                    visited.insert(j);
                    queue.push_back(j);
                }
            }
        }
        visited.len() == placed.len()
    }
}
