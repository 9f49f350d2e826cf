//! ASF-B*-tree placement core for the Atoll analog floorplanner.
//!
//! This crate packs one symmetry group of rectangular modules into a
//! symmetry island: a connected placement that is mirror-symmetric about a
//! vertical or horizontal axis. The tree encodes only the *representative*
//! half of the group; mates are positioned by reflection and self-symmetric
//! modules are centered on the axis.
//!
//! # Pipeline
//!
//! 1. **Build** — deterministic symmetric-feasible initial topology with the
//!    self-symmetric chain pinned to the axis-side boundary branch
//! 2. **Pack** — BFS placement over a contour, followed by
//!    topology-preserving compaction
//! 3. **Symmetrize** — axis computation and exact mirror positioning
//! 4. **Validate** — symmetry equations within a 1.0-unit grid tolerance
//!
//! An outer annealer perturbs the tree (`rotate`, `swap`, `move_node`) and
//! re-packs after every move; `pack()` reports success as a boolean so the
//! annealer can reject infeasible moves without unwinding.
//!
//! # Usage
//!
//! ```ignore
//! use atoll_place::AsfBStarTree;
//!
//! let mut core = AsfBStarTree::new(&mut modules, &mut group);
//! core.build_initial_tree(&sink)?;
//! assert!(core.pack(&sink));
//! ```

#![warn(missing_docs)]

pub mod asf;
pub mod contour;
pub mod error;
pub mod tree;

mod builder;
mod compact;
mod packer;
mod symmetry;
mod validate;

pub use asf::AsfBStarTree;
pub use contour::{Contour, ContourPoint};
pub use error::PlaceError;
pub use tree::{BStarNode, BStarTree, NodeId};

use atoll_model::{Module, ModuleMap};

pub(crate) fn module_ref<'m>(modules: &'m ModuleMap, name: &str) -> Result<&'m Module, PlaceError> {
    modules.get(name).ok_or_else(|| PlaceError::UnknownModule {
        name: name.to_string(),
    })
}

pub(crate) fn module_mut<'m>(
    modules: &'m mut ModuleMap,
    name: &str,
) -> Result<&'m mut Module, PlaceError> {
    modules.get_mut(name).ok_or_else(|| PlaceError::UnknownModule {
        name: name.to_string(),
    })
}
