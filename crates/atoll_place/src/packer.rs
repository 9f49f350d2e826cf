//! BFS packing of the tree onto the plane via the B*-tree placement rule.
//!
//! Nodes are visited level by level so every parent has coordinates before
//! its children are placed. A left child sits flush against its parent's
//! right edge at the lowest clear height; a right child sits directly above
//! its parent at the same x. The contour absorbs each placement, and a
//! compaction pass removes residual slack once the whole tree is down.

use crate::compact;
use crate::contour::Contour;
use crate::error::PlaceError;
use crate::tree::BStarTree;
use crate::{module_mut, module_ref};
use atoll_model::{ModuleMap, SymmetryGroup};
use std::collections::VecDeque;

/// Packs the tree, assigning coordinates to every representative.
///
/// The contour is local to this pass and discarded afterwards. Fails with
/// [`PlaceError::UnknownModule`] when a tree node names a module absent from
/// the registry and [`PlaceError::InvalidTopology`] when the tree has no
/// root.
pub(crate) fn pack_tree(
    tree: &BStarTree,
    modules: &mut ModuleMap,
    group: &SymmetryGroup,
) -> Result<(), PlaceError> {
    let root = match tree.root() {
        Some(root) => root,
        None => {
            return Err(PlaceError::InvalidTopology {
                reason: "tree has no root".to_string(),
            })
        }
    };

    let mut contour = Contour::new();
    let mut queue = VecDeque::new();

    let root_name = tree.node(root).module.clone();
    let (root_w, root_h) = dims(modules, &root_name)?;
    module_mut(modules, &root_name)?.set_position(0, 0);
    contour.update(0, 0, root_w, root_h);
    queue.push_back((root, 0, 0));

    while let Some((id, x, y)) = queue.pop_front() {
        let node = tree.node(id);
        let (w, h) = dims(modules, &node.module)?;

        if let Some(left) = node.left {
            let child = tree.node(left).module.clone();
            let (cw, ch) = dims(modules, &child)?;
            let lx = x + w;
            // Prefer the parent's bottom edge when the strip is clear; a
            // shared baseline keeps the island tight. Otherwise rest the
            // child on the contour.
            let ly = if contour.overlaps(lx, y, cw) {
                contour.max_height(lx, lx + cw)
            } else {
                y
            };
            module_mut(modules, &child)?.set_position(lx, ly);
            contour.update(lx, ly, cw, ch);
            queue.push_back((left, lx, ly));
        }

        if let Some(right) = node.right {
            let child = tree.node(right).module.clone();
            let (cw, ch) = dims(modules, &child)?;
            let rx = x;
            let ry = y + h;
            module_mut(modules, &child)?.set_position(rx, ry);
            contour.update(rx, ry, cw, ch);
            queue.push_back((right, rx, ry));
        }
    }

    compact::compact(modules, group)
}

fn dims(modules: &ModuleMap, name: &str) -> Result<(i32, i32), PlaceError> {
    module_ref(modules, name).map(|m| (m.width, m.height))
}
