//! Deterministic construction of a symmetric-feasible initial tree.
//!
//! The builder produces a tree shape that is a symmetry island by
//! construction: self-symmetric modules form a contiguous chain on the
//! boundary branch that will sit against the axis, and the remaining
//! representatives alternate between the stacking and spreading sides so the
//! packed block grows compactly in both directions.

use crate::error::PlaceError;
use crate::tree::{BStarTree, NodeId};
use atoll_model::{ModuleMap, SymmetryGroup, SymmetryType};

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn attach(tree: &mut BStarTree, parent: NodeId, child: NodeId, side: Side) {
    match side {
        Side::Left => tree.node_mut(parent).left = Some(child),
        Side::Right => tree.node_mut(parent).right = Some(child),
    }
}

fn has_free_slot(tree: &BStarTree, id: NodeId, side: Side) -> bool {
    match side {
        Side::Left => tree.node(id).left.is_none(),
        Side::Right => tree.node(id).right.is_none(),
    }
}

fn find_open_slot(tree: &BStarTree, from: NodeId, side: Side) -> Option<NodeId> {
    match side {
        Side::Left => tree.find_open_left_slot(from),
        Side::Right => tree.find_open_right_slot(from),
    }
}

/// Builds the initial tree over the group's representatives.
///
/// Fails with [`PlaceError::EmptyGroup`] when the group names no modules,
/// [`PlaceError::UnknownModule`] when a representative is missing from the
/// registry, and [`PlaceError::InvalidTopology`] /
/// [`PlaceError::SymmetryFeasibility`] when the finished tree does not pass
/// the structural or boundary-branch checks.
pub(crate) fn build_initial_tree(
    modules: &ModuleMap,
    group: &SymmetryGroup,
) -> Result<BStarTree, PlaceError> {
    let reps = group.representatives();
    for name in &reps {
        if !modules.contains_key(name) {
            return Err(PlaceError::UnknownModule { name: name.clone() });
        }
    }

    let mut self_sym: Vec<String> = group.self_symmetric.clone();
    let mut non_self: Vec<String> = reps
        .iter()
        .filter(|name| !group.is_self_symmetric(name))
        .cloned()
        .collect();

    // Short modules first so the stacked chain grows evenly; name tie-break
    // keeps the shape deterministic across runs.
    match group.ty {
        SymmetryType::Vertical => non_self.sort_by(|a, b| {
            let (ha, hb) = (modules[a].height, modules[b].height);
            ha.cmp(&hb).then_with(|| a.cmp(b))
        }),
        SymmetryType::Horizontal => non_self.sort_by(|a, b| {
            let (wa, wb) = (modules[a].width, modules[b].width);
            wa.cmp(&wb).then_with(|| a.cmp(b))
        }),
    }

    let root_name = if !non_self.is_empty() {
        non_self.remove(0)
    } else if !self_sym.is_empty() {
        self_sym.remove(0)
    } else {
        return Err(PlaceError::EmptyGroup);
    };

    let mut tree = BStarTree::new();
    let root = tree.alloc(root_name);
    tree.set_root(root);

    // The stacking side doubles as the boundary side: right children share
    // their parent's x (vertical axis), left children share its y
    // (horizontal axis).
    let (stack_side, spread_side) = match group.ty {
        SymmetryType::Vertical => (Side::Right, Side::Left),
        SymmetryType::Horizontal => (Side::Left, Side::Right),
    };

    // Pin the self-symmetric chain to the boundary branch, input order
    // preserved.
    let mut cursor = root;
    for name in &self_sym {
        let id = tree.alloc(name.clone());
        attach(&mut tree, cursor, id, stack_side);
        cursor = id;
    }

    for (i, name) in non_self.iter().enumerate() {
        let id = tree.alloc(name.clone());
        let side = if i % 2 == 0 { stack_side } else { spread_side };
        let parent = if i == 0 {
            // Continue below the deepest boundary node so the
            // self-symmetric chain stays intact.
            tree.boundary_branch(group.ty).last().copied().unwrap_or(root)
        } else if has_free_slot(&tree, cursor, side) {
            cursor
        } else {
            match find_open_slot(&tree, root, side) {
                Some(target) => target,
                None => {
                    return Err(PlaceError::InvalidTopology {
                        reason: format!("no open slot for `{name}`"),
                    })
                }
            }
        };
        attach(&mut tree, parent, id, side);
        cursor = id;
    }

    tree.validate_structure(&reps)?;
    validate_boundary(&tree, group)?;
    Ok(tree)
}

/// Checks that the self-symmetric modules form a contiguous chain on the
/// boundary branch, in input order, starting at the root or directly below
/// it.
pub(crate) fn validate_boundary(
    tree: &BStarTree,
    group: &SymmetryGroup,
) -> Result<(), PlaceError> {
    if group.self_symmetric.is_empty() {
        return Ok(());
    }
    let branch = tree.boundary_branch(group.ty);
    let names: Vec<&str> = branch
        .iter()
        .map(|&id| tree.node(id).module.as_str())
        .collect();
    let start = match names.first() {
        Some(first) if group.is_self_symmetric(first) => 0,
        Some(_) => 1,
        None => {
            return Err(PlaceError::SymmetryFeasibility {
                reason: "tree has no boundary branch".to_string(),
            })
        }
    };
    for (k, want) in group.self_symmetric.iter().enumerate() {
        let found = names.get(start + k).copied();
        if found != Some(want.as_str()) {
            let found = found.map_or_else(|| "nothing".to_string(), |f| format!("`{f}`"));
            return Err(PlaceError::SymmetryFeasibility {
                reason: format!(
                    "expected self-symmetric `{want}` at boundary position {}, found {found}",
                    start + k
                ),
            });
        }
    }
    Ok(())
}
